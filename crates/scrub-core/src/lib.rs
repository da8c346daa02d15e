//! Normalization engine for the sales cleaning pipeline.
//!
//! The engine is an ordered, configuration-driven set of row/column
//! transformations with integrated change-lineage capture:
//!
//! - [`lineage`] buffers and persists change records keyed by stable row
//!   identifiers.
//! - [`rules`] holds the independent, order-sensitive transformation units.
//! - [`pipeline`] assigns row identifiers, invokes the rules in fixed order,
//!   and wires the lineage writer through the rules that mutate or drop data.
//! - [`curate`] is the post-normalization business-rule pass producing the
//!   final published dataset.

pub mod curate;
pub mod lineage;
pub mod pipeline;
pub mod rules;

pub use curate::curate;
pub use lineage::{DEFAULT_BUFFER_SIZE, LineageRecord, LineageWriter};
pub use pipeline::{NormalizePipeline, NormalizeStage, normalize};
