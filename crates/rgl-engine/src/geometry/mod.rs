//! Vertex records and their GPU memory layouts.
//!
//! `Vertex` is the host-side record; `VertexLayout` decides how a slice of
//! records becomes a float stream and which attribute declarations describe it.

mod layout;
mod quad;
mod vertex;

pub use layout::{Attribute, Field, VertexLayout};
pub use quad::{SCREEN_QUAD_INDICES, SCREEN_QUAD_STRIP};
pub use vertex::{OMITTED_FILL, Vertex};
