//! Keyboard shortcuts for the history commands.

use sketchpad_core::PadEvent;

/// A keyboard shortcut bound to a canvas command.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub event: PadEvent,
}

impl Shortcut {
    pub fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        event: PadEvent,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            event,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Letter keys match regardless of case, since Shift changes `KeyboardEvent.key`.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("Z", true, false, "Undo", PadEvent::Undo),
            Shortcut::new("Z", true, true, "Redo", PadEvent::Redo),
            Shortcut::new("Y", true, false, "Redo", PadEvent::Redo),
            Shortcut::new("Delete", true, false, "Clear canvas", PadEvent::Clear),
            Shortcut::new("Escape", false, false, "Hide preview", PadEvent::PointerLeave),
        ]
    }

    /// Command bound to a key press, if any.
    pub fn lookup(key: &str, ctrl: bool, shift: bool) -> Option<PadEvent> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
            .map(|s| s.event)
    }

    /// One line per shortcut, for help output.
    pub fn help_text() -> String {
        Self::all()
            .iter()
            .map(|s| format!("  {:14} {}", s.format(), s.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
