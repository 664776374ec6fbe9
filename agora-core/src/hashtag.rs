//! Hashtag parsing and reconciliation.
//!
//! Extraction turns free-form article text into the unique hashtag names it
//! contains. Reconciliation decides which stored records to reuse, which to
//! create, and which previously linked records became orphans. Both halves
//! are pure; the storage layer supplies lookups and predicates.

use std::collections::HashSet;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use agora_types::Hashtag;

/// A hashtag is `#` immediately followed by ASCII letters, digits or
/// underscores. Any other character directly after `#` blocks the token;
/// one inside the token ends it there (`#java-spring` yields `java`).
static HASHTAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([A-Za-z0-9_]+)").expect("hashtag regex must compile"));

/// Extract the unique hashtag names from `text`, without the `#` prefix.
///
/// Matching is case-sensitive and case is preserved. The result keeps
/// first-seen order; duplicates collapse. Total over any input: text with
/// no valid token yields an empty vec.
///
/// # Examples
///
/// ```
/// use agora_core::hashtag::extract_hashtag_names;
/// assert_eq!(extract_hashtag_names("#java #spring#java"), ["java", "spring"]);
/// assert_eq!(extract_hashtag_names("no tags here"), Vec::<String>::new());
/// ```
pub fn extract_hashtag_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut seen = HashSet::new();

    for cap in HASHTAG_REGEX.captures_iter(text) {
        let name = &cap[1];
        if seen.insert(name.to_string()) {
            names.push(name.to_string());
        }
    }

    names
}

/// Outcome of matching extracted names against stored records.
#[derive(Debug, Clone, Default)]
pub struct ResolvedHashtags {
    /// Records already present in storage.
    pub existing: Vec<Hashtag>,
    /// Freshly constructed records the caller still has to persist.
    pub created: Vec<Hashtag>,
}

impl ResolvedHashtags {
    /// Every record that should end up associated with the content.
    pub fn all(&self) -> impl Iterator<Item = &Hashtag> {
        self.existing.iter().chain(self.created.iter())
    }

    pub fn len(&self) -> usize {
        self.existing.len() + self.created.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty() && self.created.is_empty()
    }
}

/// Match `names` against the records storage already holds for them.
///
/// Every name with no matching record gets a new, not-yet-persisted
/// [`Hashtag`]. Names already covered by `existing` are never duplicated.
pub fn resolve_hashtags(names: &[String], existing: Vec<Hashtag>) -> ResolvedHashtags {
    let existing_names: HashSet<&str> = existing.iter().map(|h| h.name.as_str()).collect();

    let created = names
        .iter()
        .filter(|name| !existing_names.contains(name.as_str()))
        .map(Hashtag::new)
        .collect();

    ResolvedHashtags { existing, created }
}

/// Decide which previously associated hashtag records became orphans.
///
/// `still_referenced` is the storage-supplied predicate "does any article
/// reference this record". Each id in `previous_ids` is checked exactly
/// once; ids with no remaining reference are returned for deletion.
///
/// Callers updating an article must invoke this only after the fresh
/// association set is attached again, so a tag retained across the edit is
/// visible to the predicate and survives with its original identity.
pub fn orphaned_hashtag_ids<F>(previous_ids: &HashSet<Uuid>, mut still_referenced: F) -> Result<Vec<Uuid>>
where
    F: FnMut(Uuid) -> Result<bool>,
{
    let mut orphans = Vec::new();
    for &id in previous_ids {
        if !still_referenced(id)? {
            orphans.push(id);
        }
    }
    Ok(orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_extracts(text: &str, expected: &[&str]) {
        let mut actual = extract_hashtag_names(text);
        actual.sort();
        let mut expected: Vec<String> = expected.iter().map(|s| s.to_string()).collect();
        expected.sort();
        assert_eq!(actual, expected, "input: {text:?}");
    }

    #[test]
    fn test_blank_input_yields_nothing() {
        assert_extracts("", &[]);
        assert_extracts("   ", &[]);
    }

    #[test]
    fn test_bare_or_trailing_hash_yields_nothing() {
        assert_extracts("#", &[]);
        assert_extracts("  #", &[]);
        assert_extracts("#   ", &[]);
        assert_extracts("java#", &[]);
    }

    #[test]
    fn test_plain_text_yields_nothing() {
        assert_extracts("java", &[]);
        assert_extracts("This post has no tags at all", &[]);
    }

    #[test]
    fn test_hash_inside_a_word_starts_a_token() {
        assert_extracts("ja#va", &["va"]);
    }

    #[test]
    fn test_single_tag() {
        assert_extracts("#java", &["java"]);
    }

    #[test]
    fn test_underscores_are_valid_anywhere() {
        assert_extracts("#java_spring", &["java_spring"]);
        assert_extracts("#_java_spring", &["_java_spring"]);
        assert_extracts("#_java_spring__", &["_java_spring__"]);
    }

    #[test]
    fn test_interior_hyphen_ends_the_token() {
        assert_extracts("#java-spring", &["java"]);
    }

    #[test]
    fn test_leading_hyphen_blocks_the_token() {
        assert_extracts("#-java-spring", &[]);
    }

    #[test]
    fn test_adjacent_tags() {
        assert_extracts("#java#spring", &["java", "spring"]);
        assert_extracts("#java#spring#boot", &["java", "spring", "boot"]);
    }

    #[test]
    fn test_whitespace_separated_tags() {
        assert_extracts("#java #spring", &["java", "spring"]);
        assert_extracts("#java  #spring", &["java", "spring"]);
        assert_extracts("#java   #spring", &["java", "spring"]);
        assert_extracts("  #java     #spring ", &["java", "spring"]);
        assert_extracts("#java #spring#boot", &["java", "spring", "boot"]);
        assert_extracts("#java#spring #boot", &["java", "spring", "boot"]);
    }

    #[test]
    fn test_punctuation_separated_tags() {
        assert_extracts("#java,#spring,#boot", &["java", "spring", "boot"]);
        assert_extracts("#java.#spring;#boot", &["java", "spring", "boot"]);
        assert_extracts("#java|#spring:#boot", &["java", "spring", "boot"]);
        assert_extracts("   #java,? #spring  ...  #boot ", &["java", "spring", "boot"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_extracts("#java#java#spring#boot", &["java", "spring", "boot"]);
        assert_extracts("#java#java#java#spring#boot", &["java", "spring", "boot"]);
        assert_extracts("#java#spring#java#boot#java", &["java", "spring", "boot"]);
    }

    #[test]
    fn test_tags_embedded_in_long_text() {
        assert_extracts("#java#spring long text~~~~~~~~~~~~~~~~~~~~~", &["java", "spring"]);
        assert_extracts("long text~~~~~~~~~~~~~~~~~~~~~#java#spring", &["java", "spring"]);
        assert_extracts("long text~~~~~~#java#spring~~~~~~~~~~~~~~~", &["java", "spring"]);
        assert_extracts("long text~~~~~~#java~~~~~~~#spring~~~~~~~~", &["java", "spring"]);
    }

    #[test]
    fn test_case_is_preserved_and_significant() {
        assert_extracts("#Java #java", &["Java", "java"]);
    }

    #[test]
    fn test_first_seen_order_is_kept() {
        assert_eq!(
            extract_hashtag_names("#spring #java #spring #boot"),
            ["spring", "java", "boot"]
        );
    }

    #[test]
    fn test_resolve_reuses_existing_and_creates_missing() {
        let names: Vec<String> = ["java", "spring", "boots"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let existing = vec![Hashtag::new("java"), Hashtag::new("spring")];
        let existing_ids: Vec<Uuid> = existing.iter().map(|h| h.id).collect();

        let resolved = resolve_hashtags(&names, existing);

        assert_eq!(resolved.existing.len(), 2);
        assert_eq!(resolved.created.len(), 1);
        assert_eq!(resolved.created[0].name, "boots");
        assert_eq!(resolved.len(), 3);
        // Matched records keep their stored identity
        for hashtag in &resolved.existing {
            assert!(existing_ids.contains(&hashtag.id));
        }
    }

    #[test]
    fn test_resolve_with_no_names_creates_nothing() {
        let resolved = resolve_hashtags(&[], Vec::new());
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_orphan_sweep_checks_every_id_once() {
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let previous: HashSet<Uuid> = [keep, drop].into_iter().collect();

        let mut checked = Vec::new();
        let orphans = orphaned_hashtag_ids(&previous, |id| {
            checked.push(id);
            Ok(id == keep)
        })
        .unwrap();

        assert_eq!(orphans, vec![drop]);
        assert_eq!(checked.len(), 2);
        assert!(checked.contains(&keep) && checked.contains(&drop));
    }

    #[test]
    fn test_orphan_sweep_propagates_predicate_errors() {
        let previous: HashSet<Uuid> = [Uuid::new_v4()].into_iter().collect();
        let result = orphaned_hashtag_ids(&previous, |_| anyhow::bail!("storage down"));
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_text_without_hash_extracts_nothing(text in "[^#]*") {
            prop_assert!(extract_hashtag_names(&text).is_empty());
        }

        #[test]
        fn prop_extracted_names_are_word_characters(text in ".*") {
            for name in extract_hashtag_names(&text) {
                prop_assert!(!name.is_empty());
                prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
            }
        }
    }
}
