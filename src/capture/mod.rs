//! Selection capture: grab whatever text is highlighted in the foreground
//! application by synthesizing the platform copy chord, without corrupting
//! the clipboard the user left behind.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Result};
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use log::warn;

/// OS clipboard seam. Faked in tests.
pub trait Clipboard {
    fn read_text(&mut self) -> Result<String>;
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Copy-chord synthesis seam. Faked in tests.
pub trait KeyInjector {
    /// Hold the copy modifier, tap the letter key, release the modifier.
    /// The delay keeps both keys registered as concurrently held by the OS.
    fn press_copy_chord(&mut self, inter_key_delay: Duration) -> Result<()>;
}

struct SystemClipboard(arboard::Clipboard);

impl SystemClipboard {
    fn new() -> Result<Self> {
        Ok(Self(arboard::Clipboard::new()?))
    }
}

impl Clipboard for SystemClipboard {
    fn read_text(&mut self) -> Result<String> {
        Ok(self.0.get_text()?)
    }

    fn write_text(&mut self, text: &str) -> Result<()> {
        Ok(self.0.set_text(text.to_string())?)
    }
}

#[cfg(target_os = "macos")]
const COPY_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COPY_MODIFIER: Key = Key::Control;

struct SystemKeyInjector(Enigo);

impl SystemKeyInjector {
    fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|err| anyhow!("key injection unavailable: {err}"))?;
        Ok(Self(enigo))
    }
}

impl KeyInjector for SystemKeyInjector {
    fn press_copy_chord(&mut self, inter_key_delay: Duration) -> Result<()> {
        self.0
            .key(COPY_MODIFIER, Direction::Press)
            .map_err(|err| anyhow!("modifier press failed: {err}"))?;
        thread::sleep(inter_key_delay);
        self.0
            .key(Key::Unicode('c'), Direction::Press)
            .map_err(|err| anyhow!("copy key press failed: {err}"))?;
        self.0
            .key(Key::Unicode('c'), Direction::Release)
            .map_err(|err| anyhow!("copy key release failed: {err}"))?;
        self.0
            .key(COPY_MODIFIER, Direction::Release)
            .map_err(|err| anyhow!("modifier release failed: {err}"))?;
        Ok(())
    }
}

/// Settle delays around the synthesized copy. Shortening these reintroduces
/// the clipboard races they exist to avoid.
#[derive(Debug, Clone, Copy)]
pub struct CaptureTiming {
    /// After clearing the clipboard, before injecting keys.
    pub clear_settle: Duration,
    /// Between modifier press and letter press.
    pub inter_key: Duration,
    /// After the chord, while the foreground app services the copy.
    pub copy_settle: Duration,
    /// Before restoring the user's previous clipboard.
    pub restore_delay: Duration,
}

impl Default for CaptureTiming {
    fn default() -> Self {
        Self {
            clear_settle: Duration::from_millis(100),
            inter_key: Duration::from_millis(50),
            copy_settle: Duration::from_millis(200),
            restore_delay: Duration::from_millis(50),
        }
    }
}

impl CaptureTiming {
    #[cfg(test)]
    fn immediate() -> Self {
        Self {
            clear_settle: Duration::ZERO,
            inter_key: Duration::ZERO,
            copy_settle: Duration::ZERO,
            restore_delay: Duration::ZERO,
        }
    }
}

/// Best-effort extraction of the current selection. One capture at a time:
/// two overlapping runs would trample each other's saved clipboard.
pub struct SelectionCapture {
    timing: CaptureTiming,
    guard: Mutex<()>,
}

impl SelectionCapture {
    pub fn new() -> Self {
        Self::with_timing(CaptureTiming::default())
    }

    pub fn with_timing(timing: CaptureTiming) -> Self {
        Self {
            timing,
            guard: Mutex::new(()),
        }
    }

    /// Returns the trimmed selection text, or `None` when nothing is selected
    /// or the platform refuses clipboard/key access. Blocks for the settle
    /// delays; callers should run it on a blocking-capable thread.
    pub fn capture(&self) -> Option<String> {
        let _serialized = match self.guard.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut clipboard = match SystemClipboard::new() {
            Ok(clipboard) => clipboard,
            Err(err) => {
                warn!("clipboard unavailable: {err}");
                return None;
            }
        };
        let mut keys = match SystemKeyInjector::new() {
            Ok(keys) => keys,
            Err(err) => {
                warn!("{err}");
                return None;
            }
        };

        run_capture(&mut clipboard, &mut keys, &self.timing)
    }
}

fn run_capture<C: Clipboard, K: KeyInjector>(
    clipboard: &mut C,
    keys: &mut K,
    timing: &CaptureTiming,
) -> Option<String> {
    // Read failure is treated as an empty clipboard.
    let previous = clipboard.read_text().unwrap_or_default();

    // Clear first so a stale value cannot be misread as a fresh capture.
    if let Err(err) = clipboard.write_text("") {
        warn!("could not clear clipboard before capture: {err}");
        return None;
    }
    thread::sleep(timing.clear_settle);

    if let Err(err) = keys.press_copy_chord(timing.inter_key) {
        warn!("copy chord failed: {err}");
        restore_previous(clipboard, &previous, Duration::ZERO);
        return None;
    }

    thread::sleep(timing.copy_settle);
    let captured = clipboard.read_text().unwrap_or_default();

    restore_previous(clipboard, &previous, timing.restore_delay);

    let trimmed = captured.trim();
    if trimmed.is_empty() || captured == previous {
        return None;
    }
    Some(trimmed.to_string())
}

fn restore_previous<C: Clipboard>(clipboard: &mut C, previous: &str, delay: Duration) {
    if previous.is_empty() {
        return;
    }
    thread::sleep(delay);
    if let Err(err) = clipboard.write_text(previous) {
        warn!("could not restore previous clipboard contents: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// In-memory clipboard shared with the fake injector.
    struct FakeClipboard {
        content: Rc<RefCell<String>>,
        fail_reads: bool,
        writes: Rc<RefCell<Vec<String>>>,
    }

    impl FakeClipboard {
        fn new(initial: &str) -> (Self, Rc<RefCell<String>>) {
            let content = Rc::new(RefCell::new(initial.to_string()));
            let clipboard = Self {
                content: Rc::clone(&content),
                fail_reads: false,
                writes: Rc::new(RefCell::new(Vec::new())),
            };
            (clipboard, content)
        }
    }

    impl Clipboard for FakeClipboard {
        fn read_text(&mut self) -> Result<String> {
            if self.fail_reads {
                bail!("clipboard read denied");
            }
            Ok(self.content.borrow().clone())
        }

        fn write_text(&mut self, text: &str) -> Result<()> {
            *self.content.borrow_mut() = text.to_string();
            self.writes.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    /// Copies the configured "selection" into the shared clipboard, exactly
    /// as a foreground app servicing Ctrl+C would. No selection leaves the
    /// clipboard untouched.
    struct FakeKeyInjector {
        selection: Option<String>,
        clipboard: Rc<RefCell<String>>,
        fail: bool,
    }

    impl KeyInjector for FakeKeyInjector {
        fn press_copy_chord(&mut self, _inter_key_delay: Duration) -> Result<()> {
            if self.fail {
                bail!("injection denied");
            }
            if let Some(selection) = &self.selection {
                *self.clipboard.borrow_mut() = selection.clone();
            }
            Ok(())
        }
    }

    fn capture_with(
        initial_clipboard: &str,
        selection: Option<&str>,
    ) -> (Option<String>, String) {
        let (mut clipboard, content) = FakeClipboard::new(initial_clipboard);
        let mut keys = FakeKeyInjector {
            selection: selection.map(str::to_string),
            clipboard: Rc::clone(&content),
            fail: false,
        };
        let result = run_capture(&mut clipboard, &mut keys, &CaptureTiming::immediate());
        let final_clipboard = content.borrow().clone();
        (result, final_clipboard)
    }

    #[test]
    fn no_selection_returns_none_and_restores_clipboard() {
        let (result, clipboard) = capture_with("previous value", None);
        assert_eq!(result, None);
        assert_eq!(clipboard, "previous value");
    }

    #[test]
    fn selection_is_returned_trimmed_and_clipboard_restored() {
        let (result, clipboard) = capture_with("previous value", Some("  selected text \n"));
        assert_eq!(result.as_deref(), Some("selected text"));
        assert_eq!(clipboard, "previous value");
    }

    #[test]
    fn empty_prior_clipboard_is_not_restored() {
        let (result, clipboard) = capture_with("", Some("fresh"));
        assert_eq!(result.as_deref(), Some("fresh"));
        assert_eq!(clipboard, "fresh");
    }

    #[test]
    fn selection_identical_to_clipboard_counts_as_no_selection() {
        let (result, clipboard) = capture_with("same text", Some("same text"));
        assert_eq!(result, None);
        assert_eq!(clipboard, "same text");
    }

    #[test]
    fn whitespace_only_selection_counts_as_no_selection() {
        let (result, _) = capture_with("previous", Some("   \n  "));
        assert_eq!(result, None);
    }

    #[test]
    fn failed_read_is_treated_as_empty_clipboard() {
        let (mut clipboard, content) = FakeClipboard::new("locked value");
        clipboard.fail_reads = true;
        let mut keys = FakeKeyInjector {
            selection: None,
            clipboard: Rc::clone(&content),
            fail: false,
        };
        let result = run_capture(&mut clipboard, &mut keys, &CaptureTiming::immediate());
        assert_eq!(result, None);
    }

    #[test]
    fn failed_injection_restores_clipboard_and_returns_none() {
        let (mut clipboard, content) = FakeClipboard::new("keep me");
        let mut keys = FakeKeyInjector {
            selection: Some("never copied".to_string()),
            clipboard: Rc::clone(&content),
            fail: true,
        };
        let result = run_capture(&mut clipboard, &mut keys, &CaptureTiming::immediate());
        assert_eq!(result, None);
        assert_eq!(*content.borrow(), "keep me");
    }

    #[test]
    fn clipboard_is_cleared_before_the_chord() {
        let (mut clipboard, content) = FakeClipboard::new("old");
        let writes = Rc::clone(&clipboard.writes);
        let mut keys = FakeKeyInjector {
            selection: Some("new".to_string()),
            clipboard: Rc::clone(&content),
            fail: false,
        };
        run_capture(&mut clipboard, &mut keys, &CaptureTiming::immediate());
        assert_eq!(writes.borrow().first().map(String::as_str), Some(""));
    }
}
