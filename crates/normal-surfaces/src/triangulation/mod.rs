//! Triangulated 3-manifolds: gluings, skeleton, and a few named examples.
//!
//! Purpose
//! - `Triangulation` stores tetrahedra and face gluings. Gluings are always
//!   symmetric: if face `f` of `A` meets `B` through `g`, then face `g(f)` of
//!   `B` meets `A` through `g⁻¹`.
//! - `Skeleton` is derived once on demand (vertices, edges, triangles with
//!   their embeddings, components, real boundary components and vertex
//!   links) and cached until the next gluing change.
//!
//! Embedding conventions
//! - Triangle: `vertices[3]` is the tetrahedron face; the second embedding of
//!   an internal triangle is `gluing * first`.
//! - Edge: `vertices[0..2]` are the endpoints. The next embedding crosses the
//!   face opposite `vertices[2]` and uses `gluing * vertices * (2 3)`.
//! - Vertex: `vertices[0]` is the vertex.

pub mod examples;
mod skeleton;
mod types;

pub use skeleton::{BoundaryComponent, Edge, Embedding, LinkType, Skeleton, Triangle, Vertex};
pub use types::{Gluing, Triangulation};

#[cfg(test)]
mod tests;
