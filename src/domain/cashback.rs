//! Cleanup of the cashback reference columns.

/// Token used in the source file for an unused cashback slot.
pub(crate) const PLACEHOLDER: &str = "X";

/// Drops empty and placeholder references, keeping the survivors in their original order.
pub fn filter_cashback_refs<S: AsRef<str>>(refs: &[S]) -> Vec<String> {
    refs.iter()
        .map(AsRef::as_ref)
        .filter(|r| !r.is_empty() && *r != PLACEHOLDER)
        .map(str::to_owned)
        .collect()
}
