// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::Template;

/// Case-insensitive ordered-subsequence test.
pub fn fuzzy_match(query: &str, target: &str) -> bool {
    let mut needle = query.chars().flat_map(char::to_lowercase).peekable();
    if needle.peek().is_none() {
        return true;
    }

    for ch in target.chars().flat_map(char::to_lowercase) {
        if needle.peek() == Some(&ch) {
            needle.next();
            if needle.peek().is_none() {
                return true;
            }
        }
    }
    false
}

/// Indices of templates matching `query` by name, category or path, in load order.
pub fn filter_templates(templates: &[Template], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..templates.len()).collect();
    }

    templates
        .iter()
        .enumerate()
        .filter(|(_, template)| {
            fuzzy_match(query, &template.name)
                || fuzzy_match(query, template.category.as_str())
                || fuzzy_match(query, &template.path.to_string_lossy())
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::fuzzy_match;

    #[test]
    fn empty_query_matches_everything() {
        assert!(fuzzy_match("", ""));
        assert!(fuzzy_match("", "account_1"));
    }

    #[test]
    fn query_matches_itself() {
        for query in ["a", "account_1", "Shared Parts", "ü-ß"] {
            assert!(fuzzy_match(query, query), "{query}");
        }
    }

    #[test]
    fn match_is_order_sensitive() {
        assert!(fuzzy_match("abc", "a_b_c"));
        assert!(!fuzzy_match("acb", "abc"));
    }

    #[test]
    fn match_ignores_case() {
        assert!(fuzzy_match("ACCOUNT", "account_1"));
        assert!(fuzzy_match("rt", "Reconciliation_Text"));
    }

    #[test]
    fn longer_query_than_target_fails() {
        assert!(!fuzzy_match("abcd", "abc"));
        assert!(!fuzzy_match("zzz", "account_templates"));
    }
}
