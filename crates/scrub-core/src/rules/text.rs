//! Text cleaning and standardization.
//!
//! Both rules are lineage-silent: cleaning is cosmetic and standardization
//! is deterministic formatting, neither changes what a value means. They
//! only touch `Text` cells.

use anyhow::Result;
use scrub_model::config::{TextCleaningConfig, TextStandardizationConfig};
use scrub_model::{Table, Value};
use tracing::{debug, info};

/// Characters kept by `remove_special_characters`: word characters,
/// whitespace, and the small punctuation set real product names use.
fn is_allowed_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch.is_whitespace() || matches!(ch, '.' | '-' | '/' | ',')
}

fn collapse_whitespace(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;
    for ch in input.chars() {
        if ch.is_whitespace() {
            in_run = true;
        } else {
            if in_run && !out.is_empty() {
                out.push(' ');
            }
            in_run = false;
            out.push(ch);
        }
    }
    out
}

/// Title-case in the manner of Python's `str.title`: a letter is uppercased
/// when it follows a non-alphabetic character, lowercased otherwise.
fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

/// Clean text cells per configuration. The enabled operations run in a fixed
/// order: strip surrounding whitespace, collapse internal whitespace runs,
/// then remove characters outside the allowed set.
pub fn clean_text(mut table: Table, cfg: &TextCleaningConfig) -> Result<Table> {
    info!("Applying text cleaning");
    let ops = &cfg.cleaning;
    for column in &cfg.columns {
        if !table.has_column(column) {
            continue;
        }
        for row in &mut table.rows {
            let Some(text) = row.get(column).as_str() else {
                continue;
            };
            let mut cleaned = text.to_string();
            if ops.strip {
                cleaned = cleaned.trim().to_string();
            }
            if ops.collapse_whitespace {
                cleaned = collapse_whitespace(&cleaned);
            }
            if ops.remove_special_characters {
                cleaned.retain(is_allowed_char);
            }
            row.set(column.clone(), Value::Text(cleaned));
        }
        if ops.log {
            debug!(column, "Applied text cleaning");
        }
    }
    Ok(table)
}

/// Apply exactly one named transform per configured column.
///
/// Recognized transforms: `title`, `upper`, `lower`, `strip`. Anything else
/// is a no-op for that column.
pub fn standardize_text(mut table: Table, cfg: &TextStandardizationConfig) -> Result<Table> {
    info!("Applying text standardization");
    for (column, rule) in &cfg.columns {
        if !table.has_column(column) {
            continue;
        }
        for row in &mut table.rows {
            let Some(text) = row.get(column).as_str() else {
                continue;
            };
            let standardized = match rule.as_str() {
                "title" => title_case(text),
                "upper" => text.to_uppercase(),
                "lower" => text.to_lowercase(),
                "strip" => text.trim().to_string(),
                _ => continue,
            };
            row.set(column.clone(), Value::Text(standardized));
        }
        if cfg.log {
            debug!(column, rule, "Standardized column");
        }
    }
    Ok(table)
}
