//! Region name normalization.
//!
//! Applied symmetrically at query time: both the identifier coming in on
//! a drill-down route and the region name of every candidate record are
//! normalized before comparison. Datasets are never rewritten at rest.
//! This makes "Jammu & Kashmir", "jammu and kashmir" and
//! "  Jammu  and Kashmir " compare equal. `&` is replaced without
//! padding, so "Jammu&Kashmir" matches "Jammuandkashmir".

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Canonical form of a region name. Only comparable to other keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the key of a blank or missing name.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a region name.
///
/// The pipeline:
/// 1. Trim
/// 2. Lowercase
/// 3. Replace `&` with `and`
/// 4. Collapse whitespace
///
/// Never fails and is idempotent.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedKey {
    let lower = raw.trim().to_lowercase();
    let expanded = lower.replace('&', "and");
    NormalizedKey(WHITESPACE_RE.replace_all(&expanded, " ").trim().to_owned())
}

/// Normalizes an optional name; `None` maps to the empty key.
#[must_use]
pub fn normalize_opt(raw: Option<&str>) -> NormalizedKey {
    raw.map_or_else(NormalizedKey::default, normalize)
}
