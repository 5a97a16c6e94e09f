mod input;
mod output;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use normal_surfaces::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use output::{AngleRecord, OutcomeRecord, Report, SurfaceRecord};
use provenance::Payload;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Normal surface enumeration runner")]
struct Cmd {
    /// Log at debug level
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Enumerate vertex surfaces
    Enumerate(EnumerateArgs),
    /// Search for one non-vertex-linking surface
    Single(SingleArgs),
    /// Enumerate taut angle structures
    Taut(TautArgs),
    /// Print the matching equations of a coordinate system
    Equations(EquationsArgs),
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone)]
struct Target {
    /// Example name (ball, s3, rp3, l31, fig8, gieseking, kxi), loop:N,
    /// twisted-loop:N, random:N[:SEED], or a gluing file
    #[arg(long)]
    tri: String,
    /// Write JSON here (plus a provenance sidecar) instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct EnumerateArgs {
    #[command(flatten)]
    target: Target,
    #[arg(long)]
    coords: CoordinateSystem,
    #[arg(long, value_enum, default_value_t = ConstraintArg::None)]
    constraint: ConstraintArg,
    /// none, boundary, torus-boundary or edges:I,J,..
    #[arg(long, value_parser = input::parse_ban, default_value = "none")]
    ban: BanConstraint,
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    backend: BackendArg,
    /// Stop after this many surfaces
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Clone)]
struct SingleArgs {
    #[command(flatten)]
    target: Target,
    #[arg(long, default_value = "standard")]
    coords: CoordinateSystem,
    #[arg(long, value_enum, default_value_t = EulerArg::Any)]
    euler: EulerArg,
}

#[derive(Args, Clone)]
struct TautArgs {
    #[command(flatten)]
    target: Target,
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Args, Clone)]
struct EquationsArgs {
    #[command(flatten)]
    target: Target,
    #[arg(long)]
    coords: CoordinateSystem,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ConstraintArg {
    None,
    EulerPositive,
    EulerZero,
    NonSpun,
}

impl From<ConstraintArg> for LpConstraint {
    fn from(c: ConstraintArg) -> Self {
        match c {
            ConstraintArg::None => LpConstraint::None,
            ConstraintArg::EulerPositive => LpConstraint::EulerPositive,
            ConstraintArg::EulerZero => LpConstraint::EulerZero,
            ConstraintArg::NonSpun => LpConstraint::NonSpun,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum BackendArg {
    Auto,
    I64,
    I128,
    Exact,
}

impl From<BackendArg> for Backend {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Auto => Backend::Auto,
            BackendArg::I64 => Backend::Native64,
            BackendArg::I128 => Backend::Native128,
            BackendArg::Exact => Backend::Exact,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum EulerArg {
    Positive,
    Zero,
    Any,
}

impl From<EulerArg> for EulerTarget {
    fn from(e: EulerArg) -> Self {
        match e {
            EulerArg::Positive => EulerTarget::Positive,
            EulerArg::Zero => EulerTarget::Zero,
            EulerArg::Any => EulerTarget::Any,
        }
    }
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Enumerate(args) => {
            let doc = enumerate_cmd(&args)?;
            let params = json!({
                "tri": args.target.tri,
                "coords": args.coords.name(),
                "constraint": args.constraint,
                "ban": format!("{:?}", args.ban),
                "backend": args.backend,
                "limit": args.limit,
            });
            emit(args.target.out.as_deref(), &doc, Payload::new("enumerate", params))
        }
        Action::Single(args) => {
            let doc = single_cmd(&args)?;
            let params = json!({"tri": args.target.tri, "coords": args.coords.name(), "euler": args.euler});
            emit(args.target.out.as_deref(), &doc, Payload::new("single", params))
        }
        Action::Taut(args) => {
            let doc = taut_cmd(&args)?;
            let params = json!({"tri": args.target.tri, "limit": args.limit});
            emit(args.target.out.as_deref(), &doc, Payload::new("taut", params))
        }
        Action::Equations(args) => {
            let doc = equations_cmd(&args)?;
            let params = json!({"tri": args.target.tri, "coords": args.coords.name()});
            emit(args.target.out.as_deref(), &doc, Payload::new("equations", params))
        }
        Action::Report => report(),
    }
}

/// Sink that stops once `limit` items have been taken.
fn limited<T>(limit: Option<usize>, into: &mut Vec<T>) -> impl FnMut(T) -> SearchCommand + '_ {
    move |item| {
        into.push(item);
        match limit {
            Some(n) if into.len() >= n => SearchCommand::Stop,
            _ => SearchCommand::Continue,
        }
    }
}

fn enumerate_cmd(args: &EnumerateArgs) -> Result<Report<SurfaceRecord>> {
    let tri = input::load_triangulation(&args.target.tri)?;
    let tets = tri.size();
    tracing::info!(coords = %args.coords, tets, "enumerate");
    let cfg = TraversalCfg {
        constraint: args.constraint.into(),
        ban: args.ban.clone(),
        backend: args.backend.into(),
    };
    let mut found = Vec::new();
    let outcome = enumerate(&tri, args.coords, &cfg, limited(args.limit, &mut found), None)
        .with_context(|| format!("enumerating {} in {}", args.target.tri, args.coords))?;
    let truncated = args.limit.is_some_and(|n| found.len() >= n && n > 0);
    tracing::info!(count = outcome.count, visited = outcome.visited, "done");
    Ok(Report {
        triangulation: tri.to_text(),
        tetrahedra: tets,
        coords: args.coords.name().to_string(),
        outcome: OutcomeRecord::new(outcome, truncated),
        solutions: found.iter().map(SurfaceRecord::from).collect(),
    })
}

fn single_cmd(args: &SingleArgs) -> Result<Report<SurfaceRecord>> {
    let tri = input::load_triangulation(&args.target.tri)?;
    tracing::info!(coords = %args.coords, tets = tri.size(), "single");
    let (found, outcome) = find_single_solution(&tri, args.coords, args.euler.into(), |_| true, None)
        .with_context(|| format!("searching {} in {}", args.target.tri, args.coords))?;
    Ok(Report {
        triangulation: tri.to_text(),
        tetrahedra: tri.size(),
        coords: args.coords.name().to_string(),
        outcome: OutcomeRecord::new(outcome, false),
        solutions: found.iter().map(SurfaceRecord::from).collect(),
    })
}

fn taut_cmd(args: &TautArgs) -> Result<Report<AngleRecord>> {
    let tri = input::load_triangulation(&args.target.tri)?;
    tracing::info!(tets = tri.size(), "taut");
    let mut found = Vec::new();
    let outcome = enumerate_taut(&tri, limited(args.limit, &mut found), None)
        .with_context(|| format!("taut structures of {}", args.target.tri))?;
    let truncated = args.limit.is_some_and(|n| found.len() >= n && n > 0);
    Ok(Report {
        triangulation: tri.to_text(),
        tetrahedra: tri.size(),
        coords: CoordinateSystem::Angle.name().to_string(),
        outcome: OutcomeRecord::new(outcome, truncated),
        solutions: found.iter().map(AngleRecord::from).collect(),
    })
}

fn equations_cmd(args: &EquationsArgs) -> Result<serde_json::Value> {
    let tri = input::load_triangulation(&args.target.tri)?;
    let m = recreate_matching_equations(&tri, args.coords)
        .with_context(|| format!("matching equations of {} in {}", args.target.tri, args.coords))?;
    let rows: Vec<Vec<i64>> = m.row_iter().map(|r| r.iter().copied().collect()).collect();
    Ok(json!({
        "coords": args.coords.name(),
        "rows": m.nrows(),
        "cols": m.ncols(),
        "equations": rows,
    }))
}

fn emit<T: Serialize>(out: Option<&Path>, doc: &T, payload: Payload) -> Result<()> {
    let Some(out) = out else {
        println!("{}", serde_json::to_string_pretty(doc)?);
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(out, serde_json::to_vec_pretty(doc)?).with_context(|| format!("writing {}", out.display()))?;
    let prov = provenance::write_sidecar(out, &payload)?;
    tracing::info!(out = %out.display(), provenance = %prov.display(), "written");
    Ok(())
}

fn report() -> Result<()> {
    let payload = Payload::new("report", json!({}));
    println!("{}", serde_json::to_string_pretty(&payload.to_json(&[]))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn target(tri: &str) -> Target {
        Target {
            tri: tri.to_string(),
            out: None,
        }
    }

    fn enumerate_args(tri: &str, coords: CoordinateSystem) -> EnumerateArgs {
        EnumerateArgs {
            target: target(tri),
            coords,
            constraint: ConstraintArg::None,
            ban: BanConstraint::None,
            backend: BackendArg::Auto,
            limit: None,
        }
    }

    #[test]
    fn enumerate_reports_every_surface() {
        let doc = enumerate_cmd(&enumerate_args("kxi", CoordinateSystem::Quad)).unwrap();
        assert_eq!(doc.outcome.count, 6);
        assert_eq!(doc.solutions.len(), 6);
        assert!(!doc.outcome.truncated);
        assert_eq!(doc.tetrahedra, 3);
    }

    #[test]
    fn limit_truncates() {
        let mut args = enumerate_args("kxi", CoordinateSystem::Standard);
        args.limit = Some(2);
        let doc = enumerate_cmd(&args).unwrap();
        assert_eq!(doc.solutions.len(), 2);
        assert!(doc.outcome.truncated);
    }

    #[test]
    fn unsupported_requests_fail_with_context() {
        let mut args = enumerate_args("fig8", CoordinateSystem::Quad);
        args.constraint = ConstraintArg::EulerPositive;
        let err = enumerate_cmd(&args).unwrap_err();
        assert!(format!("{err:#}").contains("enumerating fig8"));
    }

    #[test]
    fn taut_and_single() {
        let taut = taut_cmd(&TautArgs {
            target: target("fig8"),
            limit: None,
        })
        .unwrap();
        assert_eq!(taut.outcome.count, 3);
        assert_eq!(taut.solutions[0].angles.len(), 6);

        let single = single_cmd(&SingleArgs {
            target: target("rp3"),
            coords: CoordinateSystem::Standard,
            euler: EulerArg::Positive,
        })
        .unwrap();
        assert_eq!(single.solutions.len(), 1);
        assert_eq!(single.solutions[0].vertex_link, None);

        let lens = single_cmd(&SingleArgs {
            target: target("l31"),
            coords: CoordinateSystem::Standard,
            euler: EulerArg::Positive,
        })
        .unwrap();
        assert_eq!(lens.solutions.len(), 1);
        assert_eq!(lens.solutions[0].vertex_link, None);
    }

    #[test]
    fn equations_shape() {
        let doc = equations_cmd(&EquationsArgs {
            target: target("ball"),
            coords: CoordinateSystem::Standard,
        })
        .unwrap();
        assert_eq!(doc["cols"], 7);
        assert_eq!(doc["rows"], 0);
    }

    #[test]
    fn emit_writes_output_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("runs").join("kxi.json");
        let doc = enumerate_cmd(&enumerate_args("kxi", CoordinateSystem::Quad)).unwrap();
        emit(Some(&out), &doc, Payload::new("enumerate", json!({"tri": "kxi"}))).unwrap();
        let written: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(written["outcome"]["count"], 6);
        assert!(dir.path().join("runs").join("kxi.provenance.json").exists());
    }

    #[test]
    fn flags_parse() {
        let cmd = Cmd::try_parse_from([
            "cli", "enumerate", "--tri", "fig8", "--coords", "quad-closed", "--ban", "edges:0", "--limit", "3",
            "--verbose",
        ])
        .unwrap();
        assert!(cmd.verbose);
        let Action::Enumerate(args) = cmd.action else {
            panic!("expected enumerate");
        };
        assert_eq!(args.coords, CoordinateSystem::QuadClosed);
        assert_eq!(args.ban, BanConstraint::Edges(vec![0]));
        assert!(Cmd::try_parse_from(["cli", "enumerate", "--tri", "fig8", "--coords", "nope"]).is_err());
    }
}
