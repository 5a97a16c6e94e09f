//! Normal and almost normal surfaces as coordinate vectors.
//!
//! Purpose
//! - `NormalSurface` wraps a non-negative integer vector in one coordinate
//!   system together with a shared handle to its triangulation, and
//!   answers the questions recognition code asks: Euler characteristic,
//!   compactness, vertex links, central and splitting surfaces, edge
//!   weights and arc counts.
//! - Conversions: quad vectors are reconstructed in standard coordinates
//!   through vertex-link potentials; standard vectors project to quads.
//!
//! Why this design
//! - Surfaces outlive the search that produced them, so they hold an
//!   `Arc<Triangulation>` instead of a borrow.
//! - Derived data that needs the standard vector (Euler characteristic,
//!   triangle counts in quad systems) is computed once on demand.

mod convert;
mod props;
mod types;

pub use types::NormalSurface;
