//! Keybinding records and accelerator reconciliation.
//!
//! Consumes the full ordered list of registered keybindings and produces,
//! per command, the ordered list of keystrokes shown as menu accelerators.
//! The first entry is the most relevant one; the rendering process uses it
//! as the native accelerator and keeps the rest for tooltips.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Command value meaning "remove this keystroke's effect" rather than
/// binding it to real behavior.
pub const UNSET_COMMAND: &str = "unset!";

/// A registered keybinding, read-only for this module.
///
/// Bindings arrive in registration priority order; this module never
/// reorders them, it only filters and accumulates per command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding {
    /// CSS-like selector describing where the binding applies.
    pub selector: String,
    /// Keystroke string, e.g. `ctrl-s`. Chorded sequences separate
    /// keystrokes with spaces, e.g. `ctrl-x ctrl-s`.
    pub keystrokes: String,
    /// Command dispatched by the binding.
    pub command: String,
}

impl KeyBinding {
    /// Creates a binding record.
    pub fn new(
        selector: impl Into<String>,
        keystrokes: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            selector: selector.into(),
            keystrokes: keystrokes.into(),
            command: command.into(),
        }
    }
}

/// Supplier of the registered keybindings, implemented by the keybinding
/// engine. Bindings are returned in registration order.
pub trait KeymapSource {
    fn bindings(&self) -> Vec<KeyBinding>;
}

/// Mapping from command name to its keystrokes, most relevant first.
/// Recomputed fully on every update, never persisted. A BTreeMap keeps the
/// serialized boundary message deterministic.
pub type KeystrokeMap = BTreeMap<String, Vec<String>>;

/// Reconciles registered keybindings into the per-command keystroke map.
///
/// Keystrokes claimed by an [`UNSET_COMMAND`] binding are suppressed
/// everywhere, regardless of registration order. Chorded keystrokes,
/// platform-reserved combinations, and bindings whose selector fails
/// `include_selector` are skipped. Surviving keystrokes are pushed to the
/// front of their command's list, so the last registered binding wins
/// positional priority.
pub fn keystrokes_by_command(
    bindings: &[KeyBinding],
    platform: Platform,
    mut include_selector: impl FnMut(&str) -> bool,
) -> KeystrokeMap {
    let unset: HashSet<&str> = bindings
        .iter()
        .filter(|binding| binding.command == UNSET_COMMAND)
        .map(|binding| binding.keystrokes.as_str())
        .collect();

    let mut map = KeystrokeMap::new();
    for binding in bindings {
        if binding.command == UNSET_COMMAND {
            continue;
        }
        // Sequential keystrokes cannot be shown as a single accelerator.
        if binding.keystrokes.contains(' ') {
            continue;
        }
        if unset.contains(binding.keystrokes.as_str()) {
            continue;
        }
        if platform.reserves_keystroke(&binding.keystrokes) {
            continue;
        }
        if !include_selector(&binding.selector) {
            continue;
        }
        map.entry(binding.command.clone())
            .or_default()
            .insert(0, binding.keystrokes.clone());
    }
    map
}
