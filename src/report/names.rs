//! Display-name normalization for users.

/// Label used for teacher rows whose name parts are all empty
pub const UNNAMED_TEACHER: &str = "Unnamed Teacher";

/// Join name parts into a trimmed, single-spaced display name.
///
/// Empty and missing parts are skipped; whitespace runs inside a part
/// collapse to one space. All-empty input yields an empty string.
pub fn display_name<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display name with a fallback label when empty
pub fn display_name_or<'a, I>(parts: I, fallback: &str) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let name = display_name(parts);
    if name.is_empty() {
        fallback.to_string()
    } else {
        name
    }
}
