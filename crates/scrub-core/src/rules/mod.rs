//! The rule library: independent, order-sensitive transformation units.
//!
//! Each rule is a pure function over `(table, rule config, [lineage])`
//! returning a new table; rules never read another rule's configuration.
//! The fixed application order lives in [`crate::pipeline`].

pub mod columns;
pub mod dates;
pub mod features;
pub mod filters;
pub mod numeric;
pub mod reference;
pub mod rows;
pub mod schema;
pub mod text;
pub mod validation;

pub use columns::rename_columns;
pub use dates::parse_dates;
pub use features::derive_features;
pub use filters::apply_filters;
pub use numeric::clean_numeric_values;
pub use reference::normalize_with_reference;
pub use rows::{drop_duplicate_rows, drop_empty_rows, drop_rows_missing_required};
pub use schema::enforce_schema;
pub use text::{clean_text, standardize_text};
pub use validation::{ValidationReport, run_validation};
