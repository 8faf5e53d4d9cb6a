//! One-slot clipboard for pending copy and move operations.

use super::entry::FileEntry;
use crate::api::Action;

/// Kind of pending paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipAction {
    Copy,
    Move,
}

impl ClipAction {
    /// Server action a paste of this kind dispatches.
    pub fn action(self) -> Action {
        match self {
            ClipAction::Copy => Action::Copy,
            ClipAction::Move => Action::Move,
        }
    }

    /// Verb shown in the status line ("Copied" / "Cut").
    pub fn past_tense(self) -> &'static str {
        match self {
            ClipAction::Copy => "Copied",
            ClipAction::Move => "Cut",
        }
    }
}

/// The remembered source of a pending paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub action: ClipAction,
    pub source_path: String,
    pub name: String,
}

impl ClipboardEntry {
    pub fn new(action: ClipAction, entry: &FileEntry) -> Self {
        Self {
            action,
            source_path: entry.path.clone(),
            name: entry.name.clone(),
        }
    }
}

/// Holds at most one [`ClipboardEntry`]; a new one replaces the old.
///
/// The slot survives navigation. A paste reads it with
/// [`Clipboard::take_for_paste`], which does not consume it; only
/// [`Clipboard::complete_paste`] after a successful server call empties it,
/// so a failed paste can simply be retried.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<ClipboardEntry>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot.
    pub fn set(&mut self, entry: ClipboardEntry) {
        self.slot = Some(entry);
    }

    /// Empty the slot.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Current entry, without consuming it.
    pub fn peek(&self) -> Option<&ClipboardEntry> {
        self.slot.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Copy of the entry to paste. The slot is left intact.
    pub fn take_for_paste(&self) -> Option<ClipboardEntry> {
        self.slot.clone()
    }

    /// Empty the slot after `pasted` succeeded, unless it was replaced while
    /// the paste was in flight. Returns whether the slot was cleared.
    pub fn complete_paste(&mut self, pasted: &ClipboardEntry) -> bool {
        if self.slot.as_ref() == Some(pasted) {
            self.slot = None;
            true
        } else {
            false
        }
    }
}
