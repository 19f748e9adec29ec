//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The map lives in Rust so the browser bridge and native tests agree.

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Remove the selected element (and, for nodes, its edges).
    Delete,
    Deselect,
}

impl ShortcutAction {
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::Delete => "delete",
            ShortcutAction::Deselect => "deselect",
        }
    }
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"Delete"`).
    /// Returns `None` if the key combo has no binding. Command-key combos
    /// belong to the browser and are never bound.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        if modifiers.cmd() || modifiers.alt {
            return None;
        }
        match key {
            "Delete" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> Modifiers {
        Modifiers::default()
    }

    #[test]
    fn resolve_delete_key() {
        assert_eq!(
            ShortcutMap::resolve("Delete", plain()),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn backspace_is_left_to_text_fields() {
        assert_eq!(ShortcutMap::resolve("Backspace", plain()), None);
    }

    #[test]
    fn resolve_escape() {
        assert_eq!(
            ShortcutMap::resolve("Escape", plain()),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn shift_does_not_block_delete() {
        let shift = Modifiers {
            shift: true,
            ..plain()
        };
        assert_eq!(
            ShortcutMap::resolve("Delete", shift),
            Some(ShortcutAction::Delete)
        );
    }

    #[test]
    fn command_combos_are_unbound() {
        let cmd = Modifiers {
            meta: true,
            ..plain()
        };
        assert_eq!(ShortcutMap::resolve("Delete", cmd), None);
        assert_eq!(ShortcutMap::resolve("q", plain()), None);
    }
}
