//! Collection root configuration
//!
//! The root element carries its configuration as data attributes. Values are
//! read the way browsers read them with `parseInt`: leading whitespace, an
//! optional sign and leading digits, ignoring anything after. Missing or
//! unusable values fall back to documented defaults instead of failing.

use crate::constants::{
    COUNTER_ATTR, DEFAULT_ITEMS_ATTR, FALLBACK_COUNTER, FALLBACK_DEFAULT_ITEMS,
    FALLBACK_REQUIRED_ITEMS, REQUIRED_ITEMS_ATTR,
};
use crate::dom::ElementData;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LEADING_INT: Regex = Regex::new(r"^\s*([+-]?\d+)").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Next identifier to allocate
    pub counter: u64,
    /// Items to materialize at startup
    pub default_items: usize,
    /// Minimum number of items that must remain
    pub required_items: usize,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        CollectionConfig {
            counter: FALLBACK_COUNTER,
            default_items: FALLBACK_DEFAULT_ITEMS,
            required_items: FALLBACK_REQUIRED_ITEMS,
        }
    }
}

impl CollectionConfig {
    pub fn from_element(root: &ElementData) -> Self {
        CollectionConfig {
            counter: read_counter(root),
            default_items: positive_or(root.attr(DEFAULT_ITEMS_ATTR), FALLBACK_DEFAULT_ITEMS),
            required_items: positive_or(root.attr(REQUIRED_ITEMS_ATTR), FALLBACK_REQUIRED_ITEMS),
        }
    }
}

/// Current counter of a collection root
pub fn read_counter(root: &ElementData) -> u64 {
    root.attr(COUNTER_ATTR)
        .and_then(parse_leading_int)
        .and_then(|n| u64::try_from(n).ok())
        .unwrap_or(FALLBACK_COUNTER)
}

/// Parse an integer prefix, `parseInt`-style
///
/// Returns `None` when there are no leading digits or the value overflows.
pub fn parse_leading_int(value: &str) -> Option<i64> {
    let captures = LEADING_INT.captures(value)?;
    captures.get(1)?.as_str().parse().ok()
}

fn positive_or(value: Option<&str>, fallback: usize) -> usize {
    match value.and_then(parse_leading_int) {
        Some(n) if n > 0 => usize::try_from(n).unwrap_or(fallback),
        Some(n) => {
            if n < 0 {
                tracing::warn!("Negative item count {} ignored, using {}", n, fallback);
            }
            fallback
        }
        None => fallback,
    }
}
