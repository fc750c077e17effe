//! Keyword extraction for tag suggestions.

use crate::context::Context;

/// Cap applied both to extracted keywords and to the final suggested tag list.
const MAX_SUGGESTED_TAGS: usize = 5;

/// Filler words ignored during extraction, French and English.
const STOPWORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "de", "du", "et", "ou", "mais", "est", "sont", "a",
    "ont", "pour", "dans", "sur", "avec", "sans", "the", "an", "and", "or", "but", "is", "are",
    "was", "were", "in", "on", "at", "to", "for", "of", "with", "by",
];

/// Extract up to `max_keywords` keywords from free text, most frequent first.
///
/// Tokens are lowercased, stripped of non-alphanumeric characters, and dropped
/// when 3 characters or shorter or present in the stopword set. Counting is
/// order-preserving and the sort is stable, so equally-frequent words come out
/// in first-seen order.
pub fn extract(text: &str, max_keywords: usize) -> Vec<String> {
    let normalized = text.to_lowercase().replace('\n', " ");

    let mut counts: Vec<(String, u32)> = Vec::new();
    for token in normalized.split_whitespace() {
        let word: String = token.chars().filter(|c| c.is_alphanumeric()).collect();
        if word.chars().count() <= 3 || STOPWORDS.contains(&word.as_str()) {
            continue;
        }
        match counts.iter_mut().find(|(seen, _)| *seen == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((word, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word)
        .collect()
}

/// Build a comma-joined tag suggestion for snippet content: the top extracted
/// keywords, with the current application name prepended when it adds signal.
pub fn suggest_tags(text: &str, context: &Context) -> String {
    let mut keywords = extract(text, MAX_SUGGESTED_TAGS);

    let app_name = context.app_name.to_lowercase();
    if !app_name.is_empty() && !keywords.contains(&app_name) {
        keywords.insert(0, app_name);
    }

    keywords.truncate(MAX_SUGGESTED_TAGS);
    keywords.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in_app(app_name: &str) -> Context {
        Context {
            app_name: app_name.to_string(),
            ..Context::unknown()
        }
    }

    #[test]
    fn short_words_and_stopwords_are_filtered() {
        // cat/sat/big/red are too short, the/on are stopwords
        let keywords = extract("the cat sat on a big red mat1 mat1 mat1", 5);
        assert_eq!(keywords, vec!["mat1"]);
    }

    #[test]
    fn most_frequent_words_come_first() {
        let keywords = extract("alpha beta beta gamma beta gamma", 5);
        assert_eq!(keywords, vec!["beta", "gamma", "alpha"]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let keywords = extract("zulu yankee xray zulu yankee xray", 5);
        assert_eq!(keywords, vec!["zulu", "yankee", "xray"]);
    }

    #[test]
    fn punctuation_is_stripped_before_counting() {
        let keywords = extract("rust, rust! (rust) python;", 5);
        assert_eq!(keywords, vec!["rust", "python"]);
    }

    #[test]
    fn newlines_are_treated_as_separators() {
        let keywords = extract("first\nsecond\nfirst", 5);
        assert_eq!(keywords, vec!["first", "second"]);
    }

    #[test]
    fn max_keywords_truncates() {
        let keywords = extract("aaaa bbbb cccc dddd", 2);
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn suggest_tags_prepends_application_name() {
        let tags = suggest_tags("deploy deploy pipeline", &context_in_app("Slack"));
        assert_eq!(tags, "slack,deploy,pipeline");
    }

    #[test]
    fn suggest_tags_does_not_duplicate_application_name() {
        let tags = suggest_tags("slack slack reminder", &context_in_app("Slack"));
        assert_eq!(tags, "slack,reminder");
    }

    #[test]
    fn suggest_tags_caps_at_five_entries() {
        let tags = suggest_tags(
            "alpha alpha alpha bravo bravo charlie delta echo",
            &context_in_app("Code"),
        );
        let entries: Vec<&str> = tags.split(',').collect();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0], "code");
    }
}
