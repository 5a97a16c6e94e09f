//! Permutations of {0, .., N-1} for small N.
//!
//! Purpose
//! - Gluings between tetrahedron faces are `Perm4`s; embeddings of skeletal
//!   faces into tetrahedra are `Perm4`s whose leading images name the face
//!   vertices. `Perm3` and `Perm5` cover triangle corners and the
//!   lexicographic indexing used in tests.
//!
//! Representation
//! - A packed image code, three bits per image, in a `u16`. Values are
//!   `Copy` and compare by image sequence (lexicographic), which agrees with
//!   `index()`.

mod types;

pub use types::{Perm, Perm3, Perm4, Perm5};
