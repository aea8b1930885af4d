//! Name rules shared by node and task names.

/// Returns `true` when `name` can be used verbatim as a URL path segment.
///
/// Accepted names are non-empty and made of ASCII letters, digits, `_`,
/// `-` and `.`, excluding the relative segments `.` and `..`.
#[must_use]
pub fn is_route_safe(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}
