//! Turning command-line strings into triangulations and policies.

use anyhow::{bail, Context, Result};
use normal_surfaces::constraints::BanConstraint;
use normal_surfaces::triangulation::{examples, Triangulation};
use std::fs;

/// Named example, `loop:N`, `twisted-loop:N`, `random:N[:SEED]`, or a path
/// to a gluing file.
pub fn load_triangulation(name: &str) -> Result<Triangulation> {
    let (head, rest) = name.split_once(':').unwrap_or((name, ""));
    let tri = match head {
        "empty" => examples::empty(),
        "ball" => examples::ball(),
        "s3" => examples::layered_loop(1, false)?,
        "rp3" => examples::layered_loop(2, false)?,
        "l31" => examples::lens_3_1()?,
        "figure-eight" | "fig8" => examples::figure_eight()?,
        "gieseking" => examples::gieseking()?,
        "kxi" => examples::twisted_kxi()?,
        "loop" | "twisted-loop" => {
            let len: usize = rest.parse().with_context(|| format!("bad loop length in {name:?}"))?;
            if len == 0 {
                bail!("loop length must be positive");
            }
            examples::layered_loop(len, head == "twisted-loop")?
        }
        "random" => {
            let (n, seed) = rest.split_once(':').unwrap_or((rest, "0"));
            let n: usize = n.parse().with_context(|| format!("bad size in {name:?}"))?;
            let seed: u64 = seed.parse().with_context(|| format!("bad seed in {name:?}"))?;
            examples::random_closed(n, seed)
        }
        _ => {
            let text = fs::read_to_string(name).with_context(|| format!("reading triangulation {name}"))?;
            Triangulation::from_text(&text).with_context(|| format!("parsing {name}"))?
        }
    };
    Ok(tri)
}

/// `none`, `boundary`, `torus-boundary` or `edges:3,5`.
pub fn parse_ban(s: &str) -> Result<BanConstraint, String> {
    match s.split_once(':') {
        None => match s {
            "none" => Ok(BanConstraint::None),
            "boundary" => Ok(BanConstraint::Boundary),
            "torus-boundary" => Ok(BanConstraint::TorusBoundary),
            _ => Err(format!("unknown ban {s:?}")),
        },
        Some(("edges", list)) => list
            .split(',')
            .map(|e| e.trim().parse::<usize>().map_err(|_| format!("bad edge index {e:?}")))
            .collect::<Result<Vec<_>, _>>()
            .map(BanConstraint::Edges),
        Some(_) => Err(format!("unknown ban {s:?}")),
    }
}
