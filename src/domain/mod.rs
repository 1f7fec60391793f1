//! Pure domain types with minimal dependencies
//!
//! This module contains the collage core: shared vertices, piece polygons,
//! and per-piece image fitting. Types here have no rendering dependencies
//! (tiny-skia, image) so they can be tested in isolation.

pub mod fit;
pub mod geometry;
pub mod mesh;
pub mod ratio;
pub mod vertex;

pub use fit::*;
pub use geometry::*;
pub use mesh::*;
pub use ratio::*;
pub use vertex::*;
