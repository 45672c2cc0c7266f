//! Mapping of raw package names onto the names used in customer communication.

const PRIVATE_MARKER: &str = "Private";
const PRIVATE_LABEL: &str = "Ufirst Private";

const GOLD_MARKER: &str = "Gold";
const GOLD_LABEL: &str = "Ufirst Gold";

/// Returns the display name for a package. Matching is case-sensitive and
/// "Private" wins over "Gold"; unknown packages keep their raw name.
pub fn normalize_package_name(raw: &str) -> String {
    if raw.contains(PRIVATE_MARKER) {
        PRIVATE_LABEL.to_string()
    } else if raw.contains(GOLD_MARKER) {
        GOLD_LABEL.to_string()
    } else {
        raw.to_string()
    }
}
