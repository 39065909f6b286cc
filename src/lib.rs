//! Brezza: a small content-driven publishing server.
//!
//! Articles are authored in a headless content store as titled sections of
//! portable content. The pipeline in [`application::render`] turns each
//! document into a presentation tree with stable anchors and a synchronized
//! table of contents; the HTTP layer serves the rendered pages alongside a
//! newsletter-capture endpoint and per-article social preview images.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
