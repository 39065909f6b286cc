//! Infrastructure: HTTP surface, external collaborators, telemetry.

pub mod content;
pub mod error;
pub mod http;
pub mod newsletter;
pub mod telemetry;
