//! Small text checks shared by entity validation.

/// True when the value holds nothing but whitespace.
pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// True when the value is longer than `max` characters.
pub(crate) fn exceeds(value: &str, max: usize) -> bool {
    value.chars().count() > max
}
