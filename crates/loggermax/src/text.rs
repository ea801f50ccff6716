//! Small string helpers used when building entry headers.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Byte offset of the `instance`-th occurrence (1-indexed) of `needle` in
/// `haystack`, or `0` when there are fewer occurrences.
///
/// An `instance` of 0 is treated as 1.
pub fn x_index_of(needle: &str, haystack: &str, instance: usize) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack
        .match_indices(needle)
        .nth(instance.max(1) - 1)
        .map(|(offset, _)| offset)
        .unwrap_or(0)
}

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(r"\w\S*").expect("word pattern is a valid static regex"))
}

/// Capitalize the first letter of every word and lowercase the rest.
pub fn to_title_case(text: &str) -> String {
    word_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[0];
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(&chars.as_str().to_lowercase());
                    out
                }
                None => String::new(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_index_of_second_instance() {
        assert_eq!(x_index_of("/", "/a/b/c", 2), 2);
        assert_eq!(x_index_of("/", "/a/b/c", 3), 4);
    }

    #[test]
    fn test_x_index_of_too_few() {
        assert_eq!(x_index_of("/", "/a", 5), 0);
        assert_eq!(x_index_of("::", "main", 1), 0);
    }

    #[test]
    fn test_x_index_of_zero_instance_is_first() {
        assert_eq!(x_index_of("b", "abab", 0), 1);
    }

    #[test]
    fn test_x_index_of_multichar_needle() {
        assert_eq!(x_index_of("::", "app::billing::create", 2), 12);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(to_title_case("hello world"), "Hello World");
        assert_eq!(to_title_case("hELLO wORLD"), "Hello World");
        assert_eq!(to_title_case("billing"), "Billing");
    }

    #[test]
    fn test_title_case_keeps_spacing() {
        assert_eq!(to_title_case("  two  spaces "), "  Two  Spaces ");
        assert_eq!(to_title_case(""), "");
    }
}
