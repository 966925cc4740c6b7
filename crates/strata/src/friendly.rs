//! Helpers for human readable error messages.

use itertools::Itertools;

/// Joins items as `a, b or c`, dropping duplicates while keeping first occurrences in order.
/// - Returns [`None`] for an empty list.
/// ```
/// # use strata::friendly::list;
/// assert_eq!(list(["a", "b", "a", "c"]).as_deref(), Some("a, b or c"));
/// assert_eq!(list(["a"]).as_deref(), Some("a"));
/// ```
pub fn list<I>(items: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let items = items
        .into_iter()
        .map(|i| i.as_ref().to_owned())
        .unique()
        .collect::<Vec<_>>();
    match items.as_slice() {
        [] => None,
        [single] => Some(single.clone()),
        [init @ .., last] => Some(format!("{} or {last}", init.iter().join(", "))),
    }
}

/// Shortens `value` to at most `max_chars` characters, ending clipped values with `...`.
pub fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_owned()
    } else {
        let kept = value.chars().take(max_chars.saturating_sub(3)).collect::<String>();
        format!("{kept}...")
    }
}

/// Presents a character, naming the invisible ones.
pub fn char_literal(ch: char) -> String {
    match ch {
        '\r' => String::from("carriage return"),
        '\n' => String::from("line feed"),
        '\t' => String::from("tab"),
        '\0' => String::from("NUL byte"),
        _ => format!("`{ch}`"),
    }
}

pub fn str_literal(text: &str) -> String {
    format!("`{text}`")
}
