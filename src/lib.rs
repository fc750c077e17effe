mod capture;
mod context;
mod db;
mod hotkey;
mod keywords;
mod ranking;
mod settings;
mod snippets;

use std::sync::Arc;

use capture::SelectionCapture;
use context::{Context, ContextProbe};
use db::Database;
use hotkey::HotkeyController;
use settings::{LauncherSettings, SettingsStore};
use snippets::commands::{
    create_snippet, delete_snippet, get_categories, get_contextual_snippets, list_snippets,
    search_snippets, suggest_snippet_tags, update_snippet, use_snippet,
};
use tauri::{Emitter, Manager, State};

pub(crate) struct AppState {
    pub(crate) db: Database,
    pub(crate) probe: ContextProbe,
    pub(crate) settings: Arc<SettingsStore>,
    pub(crate) hotkey: HotkeyController,
}

#[tauri::command]
fn get_active_context(state: State<AppState>) -> Result<Context, String> {
    Ok(state.probe.detect())
}

#[tauri::command]
fn describe_active_context(state: State<AppState>) -> Result<String, String> {
    Ok(state.probe.detect().summary())
}

/// Called by the frontend when it shows or hides the launcher itself (e.g.
/// Escape), so the toggle state machine stays truthful.
#[tauri::command]
fn sync_launcher_visibility(visible: bool, state: State<AppState>) {
    state.hotkey.set_window_visible(visible);
}

#[tauri::command]
fn get_launcher_settings(state: State<AppState>) -> Result<LauncherSettings, String> {
    Ok(state.settings.launcher())
}

#[tauri::command]
fn set_launcher_settings(
    settings: LauncherSettings,
    state: State<AppState>,
    app_handle: tauri::AppHandle,
) -> Result<(), String> {
    state
        .settings
        .update_launcher(settings.clone())
        .map_err(|e| e.to_string())?;

    app_handle
        .emit("launcher-settings-updated", &settings)
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("promptdeck starting up...");

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let result = (|| -> anyhow::Result<()> {
                let app_data_dir = app
                    .path()
                    .app_data_dir()
                    .map_err(|err| anyhow::anyhow!(err))?;
                std::fs::create_dir_all(&app_data_dir)?;

                let db_path = app_data_dir.join("promptdeck.sqlite3");
                let database = Database::new(db_path)?;

                let settings_path = app_data_dir.join("settings.json");
                let settings = Arc::new(SettingsStore::new(settings_path)?);

                let selection_capture = Arc::new(SelectionCapture::new());

                let mut hotkey = HotkeyController::new();
                hotkey.start(
                    app.handle().clone(),
                    Arc::clone(&selection_capture),
                    Arc::clone(&settings),
                )?;

                app.manage(AppState {
                    db: database,
                    probe: ContextProbe::new(),
                    settings,
                    hotkey,
                });

                Ok(())
            })();

            result.map_err(|err| err.into())
        })
        .invoke_handler(tauri::generate_handler![
            list_snippets,
            search_snippets,
            create_snippet,
            update_snippet,
            delete_snippet,
            get_categories,
            get_contextual_snippets,
            use_snippet,
            suggest_snippet_tags,
            get_active_context,
            describe_active_context,
            sync_launcher_visibility,
            get_launcher_settings,
            set_launcher_settings,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
