use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{bail, Context as _, Result};
use log::{error, info, warn};
use rdev::{listen, Event, EventType};
use serde::Serialize;
use tauri::{AppHandle, Emitter, Manager};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;

use crate::capture::SelectionCapture;
use crate::settings::SettingsStore;

use super::state::{HotkeyState, ToggleAction};

#[derive(Serialize, Clone)]
struct OpenWithContentEvent {
    text: String,
}

/// Owns the global key listener and the dispatch task that turns toggle
/// decisions into window operations and frontend events.
pub struct HotkeyController {
    machine: Arc<Mutex<HotkeyState>>,
    dispatch: Option<tauri::async_runtime::JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl HotkeyController {
    pub fn new() -> Self {
        Self {
            machine: Arc::new(Mutex::new(HotkeyState::new())),
            dispatch: None,
            cancel_token: None,
        }
    }

    /// Spawn the OS hook thread and the dispatch task. The hook thread lives
    /// for the rest of the process; only the dispatch side is cancellable.
    pub fn start(
        &mut self,
        app_handle: AppHandle,
        capture: Arc<SelectionCapture>,
        settings: Arc<SettingsStore>,
    ) -> Result<()> {
        if self.dispatch.is_some() {
            bail!("hotkey listener already active");
        }

        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let machine = Arc::clone(&self.machine);
        thread::Builder::new()
            .name("promptdeck-hotkeys".into())
            .spawn(move || {
                let callback = move |event: Event| {
                    let action = {
                        let mut machine = match machine.lock() {
                            Ok(guard) => guard,
                            Err(poisoned) => poisoned.into_inner(),
                        };
                        match event.event_type {
                            EventType::KeyPress(key) => machine.on_press(key),
                            EventType::KeyRelease(key) => {
                                machine.on_release(key);
                                None
                            }
                            _ => None,
                        }
                    };

                    if let Some(action) = action {
                        // Receiver gone means the app is shutting down.
                        let _ = action_tx.send(action);
                    }
                };

                if let Err(err) = listen(callback) {
                    error!("global key listener unavailable: {err:?}");
                }
            })
            .context("failed to spawn hotkey listener thread")?;

        let cancel_token = CancellationToken::new();
        let dispatch = tauri::async_runtime::spawn(dispatch_loop(
            app_handle,
            capture,
            settings,
            action_rx,
            cancel_token.clone(),
        ));

        self.dispatch = Some(dispatch);
        self.cancel_token = Some(cancel_token);

        info!("Global hotkey armed: Ctrl+Space");
        Ok(())
    }

    /// Keep the state machine's visibility flag truthful when the frontend
    /// shows or hides the window itself.
    pub fn set_window_visible(&self, visible: bool) {
        let mut machine = match self.machine.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        machine.set_window_visible(visible);
    }
}

impl Drop for HotkeyController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(handle) = self.dispatch.take() {
            handle.abort();
        }
    }
}

async fn dispatch_loop(
    app_handle: AppHandle,
    capture: Arc<SelectionCapture>,
    settings: Arc<SettingsStore>,
    mut action_rx: UnboundedReceiver<ToggleAction>,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            action = action_rx.recv() => {
                match action {
                    Some(ToggleAction::Reveal) => reveal(&app_handle, &capture, &settings).await,
                    Some(ToggleAction::Hide) => hide(&app_handle),
                    None => break,
                }
            }
            _ = cancel_token.cancelled() => {
                info!("hotkey dispatch shutting down");
                break;
            }
        }
    }
}

async fn reveal(
    app_handle: &AppHandle,
    capture: &Arc<SelectionCapture>,
    settings: &Arc<SettingsStore>,
) {
    let selection = if settings.launcher().capture_enabled {
        let capture = Arc::clone(capture);
        match tauri::async_runtime::spawn_blocking(move || capture.capture()).await {
            Ok(selection) => selection,
            Err(err) => {
                warn!("selection capture worker join failed: {err}");
                None
            }
        }
    } else {
        None
    };

    match selection {
        Some(text) => {
            info!("revealing launcher with {} captured characters", text.len());
            if let Err(err) = app_handle.emit("launcher-open-with-content", OpenWithContentEvent { text }) {
                error!("failed to emit launcher-open-with-content: {err}");
            }
        }
        None => {
            if let Err(err) = app_handle.emit("launcher-open", ()) {
                error!("failed to emit launcher-open: {err}");
            }
        }
    }

    show_main_window(app_handle);
}

fn hide(app_handle: &AppHandle) {
    match app_handle.get_webview_window("main") {
        Some(window) => {
            if let Err(err) = window.hide() {
                error!("Failed to hide main window: {err}");
            }
        }
        None => {
            error!("Main window not found when hiding launcher");
        }
    }

    if let Err(err) = app_handle.emit("launcher-hide", ()) {
        error!("failed to emit launcher-hide: {err}");
    }
}

fn show_main_window(app_handle: &AppHandle) {
    match app_handle.get_webview_window("main") {
        Some(window) => {
            if let Err(err) = window.show() {
                error!("Failed to show main window: {err}");
            }
            if let Err(err) = window.unminimize() {
                warn!("Failed to unminimize main window: {err}");
            }
            if let Err(err) = window.set_focus() {
                error!("Failed to focus main window: {err}");
            }
        }
        None => {
            error!("Main window not found when attempting to focus launcher");
        }
    }
}
