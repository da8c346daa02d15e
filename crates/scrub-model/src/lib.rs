//! Data model for the sales cleaning pipeline.
//!
//! The model is deliberately small: a typed cell [`Value`], an ordered
//! [`Table`] of rows with run-scoped [`RowId`]s, the typed configuration
//! documents, and the shared error type. All transformation logic lives in
//! `scrub-core`; all statistics live in `scrub-profile`.

pub mod config;
pub mod error;
pub mod table;
pub mod value;

pub use config::{PipelineConfig, ProfileConfig};
pub use error::{Result, ScrubError};
pub use table::{Row, RowId, Table};
pub use value::Value;
