//! floodjoin - Assign flood depths to network links from flood-extent polygons

pub mod config;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod io;
pub mod join;
pub mod pipeline;

pub use error::Error;
pub use pipeline::{Pipeline, RunSummary};
