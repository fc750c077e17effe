use std::collections::HashSet;

use rdev::Key;

const TRIGGER_KEY: Key = Key::Space;
const MODIFIER_KEYS: [Key; 2] = [Key::ControlLeft, Key::ControlRight];

/// What the dispatcher should do with the launcher window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Reveal,
    Hide,
}

/// Edge-triggered Ctrl+Space toggle over the raw key event stream.
///
/// Owns the held-keys set and the launcher's visible/hidden state. Mutated
/// only from the listener thread; the visibility flag can additionally be
/// corrected when the frontend hides itself.
pub struct HotkeyState {
    held: HashSet<Key>,
    /// The current physical press already produced a toggle. Re-armed only by
    /// the trigger key's release, so OS auto-repeat cannot fire twice.
    triggered: bool,
    window_visible: bool,
}

impl HotkeyState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            triggered: false,
            window_visible: false,
        }
    }

    /// Feed a key-down event. Returns an action exactly when this is a fresh
    /// trigger edge with a modifier already held.
    pub fn on_press(&mut self, key: Key) -> Option<ToggleAction> {
        self.held.insert(key);

        if key != TRIGGER_KEY || self.triggered {
            return None;
        }
        if !MODIFIER_KEYS.iter().any(|modifier| self.held.contains(modifier)) {
            return None;
        }

        self.triggered = true;
        if self.window_visible {
            self.window_visible = false;
            Some(ToggleAction::Hide)
        } else {
            self.window_visible = true;
            Some(ToggleAction::Reveal)
        }
    }

    /// Feed a key-up event.
    pub fn on_release(&mut self, key: Key) {
        if key == TRIGGER_KEY {
            self.triggered = false;
        }
        self.held.remove(&key);
    }

    /// Correct the visibility flag when the window was hidden or shown outside
    /// the toggle path (e.g. Escape pressed in the frontend).
    pub fn set_window_visible(&mut self, visible: bool) {
        self.window_visible = visible;
    }
}
