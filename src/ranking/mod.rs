//! Contextual relevance scoring for stored snippets.
//!
//! Pure functions over a snippet list and one context snapshot; safe to call
//! from any thread.

use crate::context::Context;
use crate::db::models::Snippet;

const CATEGORY_BONUS: i64 = 50;
const FREQUENT_USE_BONUS: i64 = 20;
const FREQUENT_USE_THRESHOLD: i64 = 5;
const TITLE_WORD_BONUS: i64 = 10;

/// Order snippets by descending contextual score, truncated to `limit`.
/// The sort is stable, so equally-scored snippets keep the store's order
/// (usage, then recency).
pub fn rank(snippets: Vec<Snippet>, context: &Context, limit: usize) -> Vec<Snippet> {
    let mut scored: Vec<(i64, Snippet)> = snippets
        .into_iter()
        .map(|snippet| (score(&snippet, context), snippet))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, snippet)| snippet)
        .collect()
}

/// Additive relevance score for one snippet against one context snapshot.
/// Missing context fields and missing snippet fields contribute zero; the
/// result is always non-negative.
pub fn score(snippet: &Snippet, context: &Context) -> i64 {
    let mut score = snippet.usage_count * 2;

    if let Some(category) = context.category.as_deref() {
        if snippet.category.as_deref() == Some(category) {
            score += CATEGORY_BONUS;
        }
    }

    if snippet.usage_count > FREQUENT_USE_THRESHOLD {
        score += FREQUENT_USE_BONUS;
    }

    score += TITLE_WORD_BONUS * matching_title_words(snippet, &context.window_title);

    score
}

/// Count distinct significant window-title words (longer than 3 characters)
/// that occur in the snippet title or tags, case-insensitively.
fn matching_title_words(snippet: &Snippet, window_title: &str) -> i64 {
    let title = snippet.title.to_lowercase();
    let tags = snippet
        .tags
        .as_deref()
        .map(str::to_lowercase)
        .unwrap_or_default();

    let lowered = window_title.to_lowercase();
    let mut seen: Vec<&str> = Vec::new();
    let mut matches = 0;

    for word in lowered.split_whitespace() {
        if word.chars().count() <= 3 || seen.contains(&word) {
            continue;
        }
        seen.push(word);
        if title.contains(word) || tags.contains(word) {
            matches += 1;
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snippet(id: i64, title: &str, category: Option<&str>, tags: Option<&str>, usage: i64) -> Snippet {
        Snippet {
            id,
            title: title.to_string(),
            content: String::new(),
            category: category.map(str::to_string),
            tags: tags.map(str::to_string),
            created_at: Utc::now(),
            usage_count: usage,
        }
    }

    fn context(category: Option<&str>, window_title: &str) -> Context {
        Context {
            category: category.map(str::to_string),
            window_title: window_title.to_string(),
            ..Context::unknown()
        }
    }

    #[test]
    fn higher_usage_scores_higher() {
        let ctx = context(None, "");
        let low = snippet(1, "a", None, None, 1);
        let high = snippet(2, "b", None, None, 3);
        assert!(score(&high, &ctx) > score(&low, &ctx));
    }

    #[test]
    fn category_match_outranks_heavy_usage() {
        let ctx = context(Some("Development"), "");
        // usage 10: 20 base + 20 frequent-use bonus = 40
        let popular = snippet(1, "popular", Some("Writing"), None, 10);
        // category match with no usage: 50
        let matching = snippet(2, "matching", Some("Development"), None, 0);

        assert_eq!(score(&popular, &ctx), 40);
        assert_eq!(score(&matching, &ctx), 50);

        let ranked = rank(vec![popular, matching], &ctx, 10);
        assert_eq!(ranked[0].id, 2);
    }

    #[test]
    fn frequent_use_bonus_applies_above_threshold() {
        let ctx = context(None, "");
        assert_eq!(score(&snippet(1, "a", None, None, 5), &ctx), 10);
        assert_eq!(score(&snippet(2, "b", None, None, 6), &ctx), 32);
    }

    #[test]
    fn title_words_match_against_title_and_tags() {
        let ctx = context(None, "Debugging python services");
        let by_title = snippet(1, "Python helper", None, None, 0);
        let by_tags = snippet(2, "Helper", None, Some("python,debugging"), 0);
        let no_match = snippet(3, "Helper", None, None, 0);

        assert_eq!(score(&by_title, &ctx), 10);
        assert_eq!(score(&by_tags, &ctx), 20);
        assert_eq!(score(&no_match, &ctx), 0);
    }

    #[test]
    fn repeated_title_words_count_once() {
        let ctx = context(None, "python python python");
        let s = snippet(1, "python notes", None, None, 0);
        assert_eq!(score(&s, &ctx), 10);
    }

    #[test]
    fn short_title_words_are_ignored() {
        let ctx = context(None, "git api sql");
        let s = snippet(1, "git api sql", None, None, 0);
        assert_eq!(score(&s, &ctx), 0);
    }

    #[test]
    fn missing_fields_contribute_zero() {
        let ctx = context(Some("Development"), "refactoring session");
        let bare = snippet(1, "", None, None, 0);
        assert_eq!(score(&bare, &ctx), 0);
    }

    #[test]
    fn equal_scores_preserve_input_order() {
        let ctx = context(None, "");
        let ranked = rank(
            vec![
                snippet(10, "first", None, None, 2),
                snippet(11, "second", None, None, 2),
                snippet(12, "third", None, None, 2),
            ],
            &ctx,
            10,
        );
        let ids: Vec<i64> = ranked.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn limit_truncates_results() {
        let ctx = context(None, "");
        let ranked = rank(
            (0..8).map(|i| snippet(i, "s", None, None, i)).collect(),
            &ctx,
            3,
        );
        assert_eq!(ranked.len(), 3);
        // highest usage first
        assert_eq!(ranked[0].id, 7);
    }
}
