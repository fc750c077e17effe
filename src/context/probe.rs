use std::sync::Mutex;

use active_win_pos_rs::get_active_window;
use chrono::Utc;
use log::debug;
use sysinfo::{Pid, ProcessesToUpdate, System};

use super::{categories, Context};

/// Queries the OS for the foreground window and classifies it. Every failure
/// path degrades to [`Context::unknown`]; callers never see an error and never
/// need to branch on platform capability.
pub struct ContextProbe {
    /// Reused across probes so sysinfo can refresh a single pid instead of
    /// rebuilding its process table each time.
    system: Mutex<System>,
}

impl ContextProbe {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }

    /// Snapshot the foreground window, its owning process and the derived
    /// category.
    pub fn detect(&self) -> Context {
        let window = match get_active_window() {
            Ok(window) => window,
            Err(()) => {
                debug!("foreground window lookup failed; reporting unknown context");
                return Context::unknown();
            }
        };

        let (process_name, app_name) = match self.resolve_process_name(window.process_id) {
            Some(name) => {
                let app_name = friendly_app_name(&name);
                (name, app_name)
            }
            // Process exited between lookup and read, or access was denied.
            None => ("unknown".to_string(), "Unknown".to_string()),
        };

        let category =
            categories::classify(&process_name, &window.title).map(str::to_string);

        Context {
            app_name,
            window_title: window.title,
            process_name,
            category,
            observed_at: Utc::now(),
        }
    }

    fn resolve_process_name(&self, process_id: u64) -> Option<String> {
        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let pid = Pid::from_u32(u32::try_from(process_id).ok()?);
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]));
        let process = system.process(pid)?;
        Some(process.name().to_string_lossy().into_owned())
    }
}

/// Turn an executable name into a display name: "chrome.exe" -> "Chrome".
fn friendly_app_name(process_name: &str) -> String {
    let lowered = process_name.to_lowercase();
    let base = lowered.strip_suffix(".exe").unwrap_or(&lowered);

    base.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friendly_name_strips_exe_suffix() {
        assert_eq!(friendly_app_name("chrome.exe"), "Chrome");
        assert_eq!(friendly_app_name("CODE.EXE"), "Code");
    }

    #[test]
    fn friendly_name_capitalizes_words() {
        assert_eq!(friendly_app_name("google chrome"), "Google Chrome");
        assert_eq!(friendly_app_name("slack"), "Slack");
    }
}
