//! Degree-of-freedom bearing elements and the groups owning them.
mod element;
mod group;
mod integration;
mod link;
pub mod pipette;

pub use element::*;
pub use group::*;
pub use integration::*;
pub use link::*;
