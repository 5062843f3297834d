//! Read-through parse cache keyed by formula source text
//!
//! The same formula text is parsed once and reused across every subject it
//! is evaluated for. Reads take a shared lock; a miss parses outside any
//! lock and may race another thread doing the same, in which case both
//! produce identical trees and the second insert wins harmlessly.

use crate::parse;
use nutrivault_formula_ast::{Expression, Spanned};
use nutrivault_formula_diagnostics::Result;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

static PARSE_CACHE: Lazy<RwLock<HashMap<String, Arc<Spanned<Expression>>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Parse formula source, reusing a previously parsed tree when available
///
/// Only successful parses are cached; errors are authoring-time events and
/// re-validating a bad formula re-parses it.
pub fn parse_cached(source: &str) -> Result<Arc<Spanned<Expression>>> {
    if let Some(hit) = PARSE_CACHE.read().get(source) {
        return Ok(Arc::clone(hit));
    }

    let parsed = Arc::new(parse(source)?);
    PARSE_CACHE
        .write()
        .entry(source.to_string())
        .or_insert_with(|| Arc::clone(&parsed));
    Ok(parsed)
}

/// Number of distinct formula texts currently cached
pub fn cached_expression_count() -> usize {
    PARSE_CACHE.read().len()
}
