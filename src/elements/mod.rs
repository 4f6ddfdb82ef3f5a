//! Structural entities of a frame model

mod constraint;
mod element;
mod material;
mod node;
mod section;

pub use constraint::Constraint;
pub use element::{Element, ElementId, TransformTag};
pub use material::Material;
pub use node::{Node, NodeId};
pub use section::Section;
