//! Application layer: services orchestrating the domain and collaborators.

pub mod articles;
pub mod error;
pub mod newsletter;
pub mod preview;
pub mod render;
