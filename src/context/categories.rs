//! Static classification rules for foreground applications.

/// Category assigned to browsers before the window title is consulted.
const BROWSING: &str = "Browsing";

/// Exact-match table from normalized process name to category. Covers the
/// Windows executable names and the macOS/Linux spellings of the same
/// applications.
const APP_CATEGORIES: &[(&str, &str)] = &[
    ("code.exe", "Development"),
    ("code", "Development"),
    ("vscode.exe", "Development"),
    ("pycharm64.exe", "Development"),
    ("pycharm", "Development"),
    ("sublime_text.exe", "Development"),
    ("sublime_text", "Development"),
    ("notepad++.exe", "Development"),
    ("chrome.exe", BROWSING),
    ("chrome", BROWSING),
    ("google chrome", BROWSING),
    ("firefox.exe", BROWSING),
    ("firefox", BROWSING),
    ("msedge.exe", BROWSING),
    ("microsoft edge", BROWSING),
    ("brave.exe", BROWSING),
    ("brave browser", BROWSING),
    ("safari", BROWSING),
    ("slack.exe", "Communication"),
    ("slack", "Communication"),
    ("teams.exe", "Communication"),
    ("teams", "Communication"),
    ("discord.exe", "Communication"),
    ("discord", "Communication"),
    ("notion.exe", "Productivity"),
    ("notion", "Productivity"),
    ("onenote.exe", "Productivity"),
    ("obsidian.exe", "Productivity"),
    ("obsidian", "Productivity"),
    ("word.exe", "Writing"),
    ("winword.exe", "Writing"),
    ("microsoft word", "Writing"),
    ("excel.exe", "Writing"),
    ("figma.exe", "Design"),
    ("figma", "Design"),
    ("photoshop.exe", "Design"),
];

/// Keyword rules for disambiguating browser windows by title. Declaration
/// order is significant: the first matching keyword wins. Each entry carries
/// the category plus a secondary tag describing the kind of site.
const WEB_KEYWORDS: &[(&str, &str, &str)] = &[
    ("github", "Development", "git"),
    ("stackoverflow", "Development", "code"),
    ("linkedin", "Business", "professional"),
    ("twitter", "Marketing", "social"),
    ("facebook", "Marketing", "social"),
    ("gmail", "Communication", "email"),
    ("outlook", "Communication", "email"),
    ("notion", "Productivity", "notes"),
    ("figma", "Design", "ui"),
    ("canva", "Design", "marketing"),
    ("docs.google", "Writing", "document"),
    ("youtube", "Video", "content"),
];

/// Resolve a category for a foreground process, consulting the window title
/// when the process is a browser. Unmapped processes yield `None`.
pub fn classify(process_name: &str, window_title: &str) -> Option<&'static str> {
    let process = process_name.to_lowercase();
    let category = APP_CATEGORIES
        .iter()
        .find(|(name, _)| *name == process)
        .map(|(_, category)| *category)?;

    if category != BROWSING {
        return Some(category);
    }

    // A browser window says nothing about what is being browsed except
    // through its title.
    let title = window_title.to_lowercase();
    for (keyword, web_category, _tag) in WEB_KEYWORDS {
        if title.contains(keyword) {
            return Some(web_category);
        }
    }

    Some(BROWSING)
}
