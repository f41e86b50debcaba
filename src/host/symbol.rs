use once_cell::sync::Lazy;
use regex::Regex;

/// Java identifiers and dotted/qualified names, `$` included for inner
/// classes.
static SYMBOL_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"[\w$.]+").ok());

/// Symbol under the cursor at `column` (0-based, in characters) of `line`.
///
/// A cursor sitting right after the last character of a symbol still counts
/// as on it. Returns `None` between symbols.
pub fn symbol_at(line: &str, column: usize) -> Option<&str> {
    let cursor = line
        .char_indices()
        .nth(column)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len());

    SYMBOL_PATTERN
        .as_ref()?
        .find_iter(line)
        .find(|m| m.start() <= cursor && cursor <= m.end())
        .map(|m| m.as_str().trim_matches('.'))
        .filter(|symbol| !symbol.is_empty())
}
