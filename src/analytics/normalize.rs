//! Canonical handling of names read through optional joins.

/// Shown when a joined record has no usable name, e.g. a sale whose client
/// was deleted. Kept in one place so it can be localized later.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Resolves a name read through a LEFT JOIN to display text.
///
/// Every call site that reads a joined client, product, material, or tool
/// name goes through here, so a missing name always renders as
/// [`UNKNOWN_LABEL`] and never as an empty cell in one view and "Unknown"
/// in another.
pub fn related_name(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => UNKNOWN_LABEL.to_owned(),
    }
}
