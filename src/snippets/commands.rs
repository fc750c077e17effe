use tauri::State;

use crate::{
    db::models::{Snippet, SnippetInput, SnippetPatch},
    keywords, ranking, AppState,
};

#[tauri::command]
pub async fn list_snippets(state: State<'_, AppState>) -> Result<Vec<Snippet>, String> {
    state.db.get_all_snippets().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn search_snippets(
    state: State<'_, AppState>,
    query: String,
) -> Result<Vec<Snippet>, String> {
    state
        .db
        .search_snippets(query)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn create_snippet(
    state: State<'_, AppState>,
    input: SnippetInput,
) -> Result<Snippet, String> {
    state
        .db
        .insert_snippet(input)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn update_snippet(
    state: State<'_, AppState>,
    snippet_id: i64,
    patch: SnippetPatch,
) -> Result<Snippet, String> {
    state
        .db
        .update_snippet(snippet_id, patch)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn delete_snippet(state: State<'_, AppState>, snippet_id: i64) -> Result<bool, String> {
    state
        .db
        .delete_snippet(snippet_id)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn get_categories(state: State<'_, AppState>) -> Result<Vec<String>, String> {
    state.db.get_categories().await.map_err(|e| e.to_string())
}

/// The launcher's default view: every stored snippet, ordered by relevance to
/// the current foreground context.
#[tauri::command]
pub async fn get_contextual_snippets(
    state: State<'_, AppState>,
    limit: Option<usize>,
) -> Result<Vec<Snippet>, String> {
    let limit = limit.unwrap_or_else(|| state.settings.launcher().max_results);
    let context = state.probe.detect();
    let snippets = state.db.get_all_snippets().await.map_err(|e| e.to_string())?;

    Ok(ranking::rank(snippets, &context, limit))
}

/// Mark a snippet as used and place its content on the clipboard.
#[tauri::command]
pub async fn use_snippet(state: State<'_, AppState>, snippet_id: i64) -> Result<(), String> {
    let snippet = state
        .db
        .get_snippet_by_id(snippet_id)
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("snippet {snippet_id} not found"))?;

    state
        .db
        .increment_usage(snippet_id)
        .await
        .map_err(|e| e.to_string())?;

    tauri::async_runtime::spawn_blocking(move || {
        arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(snippet.content))
    })
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())?;

    Ok(())
}

/// Tag suggestions for the snippet editor, seeded from the content being
/// saved and the current application.
#[tauri::command]
pub async fn suggest_snippet_tags(
    state: State<'_, AppState>,
    text: String,
) -> Result<String, String> {
    let context = state.probe.detect();
    Ok(keywords::suggest_tags(&text, &context))
}
