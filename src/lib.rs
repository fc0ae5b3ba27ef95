//! storychart: chart-widget engine for narrative data pages.
//!
//! The crate provides the shared machinery behind a set of interactive
//! story widgets: row wrangling into a normalized domain model, geometric
//! scale resolution, keyed scene reconciliation with timed transitions,
//! and pure view-state interaction transitions. Hosts supply parsed rows
//! and a `Renderer`; everything in between is deterministic and testable
//! without a drawing surface.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod telemetry;

pub use error::{ChartError, ChartResult};
