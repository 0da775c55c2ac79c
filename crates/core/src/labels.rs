//! Label parsing for worker templates.
//!
//! Labels are entered as a single space-delimited string and parsed into
//! a set of atoms. The pool uses the set for scheduling affinity.

use std::collections::BTreeSet;

/// Parsed, deduplicated label atoms.
pub type LabelSet = BTreeSet<String>;

/// Parse a label string into a set of atoms.
///
/// Any run of whitespace separates atoms. Duplicates collapse and an empty
/// (or all-whitespace) string yields an empty set.
///
/// ```
/// use skiff_core::labels::parse_labels;
///
/// let set = parse_labels("linux  docker linux");
/// assert_eq!(set.len(), 2);
/// assert!(set.contains("docker"));
/// assert!(parse_labels("").is_empty());
/// ```
pub fn parse_labels(labels: &str) -> LabelSet {
    labels.split_whitespace().map(str::to_string).collect()
}

/// Whether `set` satisfies a label expression of one or more atoms.
///
/// An empty expression matches every set; otherwise every atom must be
/// present.
pub fn satisfies(set: &LabelSet, expression: &str) -> bool {
    expression.split_whitespace().all(|atom| set.contains(atom))
}
