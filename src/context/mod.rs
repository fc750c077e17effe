mod categories;
mod probe;

pub use probe::ContextProbe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the foreground application at one point in time. Recomputed on
/// every probe, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub app_name: String,
    pub window_title: String,
    pub process_name: String,
    pub category: Option<String>,
    pub observed_at: DateTime<Utc>,
}

impl Context {
    /// The context reported when foreground introspection is unavailable or
    /// fails mid-lookup.
    pub fn unknown() -> Self {
        Self {
            app_name: "Unknown".to_string(),
            window_title: String::new(),
            process_name: "unknown".to_string(),
            category: None,
            observed_at: Utc::now(),
        }
    }

    /// One-line human-readable description for the launcher header.
    pub fn summary(&self) -> String {
        let category = self.category.as_deref().unwrap_or("General");
        if self.window_title.is_empty() {
            return format!("{} • {}", self.app_name, category);
        }

        let mut title = self.window_title.clone();
        if title.chars().count() > 50 {
            title = title.chars().take(47).collect::<String>() + "...";
        }
        format!("{} • {} • {}", self.app_name, category, title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_context_has_no_category() {
        let context = Context::unknown();
        assert_eq!(context.app_name, "Unknown");
        assert_eq!(context.process_name, "unknown");
        assert!(context.category.is_none());
        assert!(context.window_title.is_empty());
    }

    #[test]
    fn summary_omits_title_when_empty() {
        let context = Context::unknown();
        assert_eq!(context.summary(), "Unknown • General");
    }

    #[test]
    fn summary_truncates_long_titles() {
        let context = Context {
            window_title: "x".repeat(80),
            ..Context::unknown()
        };
        let summary = context.summary();
        assert!(summary.ends_with("..."));
        assert!(summary.chars().count() < 80);
    }
}
