//! Menu template data model and merge engine.
//!
//! Defines the MenuItem tree that describes the application menu and the
//! label-keyed merge/unmerge operations used to combine menu contributions
//! from multiple sources without duplicating entries.

use crate::platform::Platform;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;

/// A single entry in the menu template.
///
/// A leaf item carries a command and no submenu (or neither, for inert
/// entries); a branch item carries a submenu and no command. Within a
/// sibling list, normalized labels are effectively unique: merge and
/// unmerge match by normalized label, never by identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Display label, possibly containing mnemonic markers (`&File`).
    pub label: String,
    /// Canonical form of the label used as the merge and sort key.
    /// Populated when the item enters the menu manager.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_label: Option<String>,
    /// Command dispatched when the item is activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Child items, in order. Present on branch items only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submenu: Option<Vec<MenuItem>>,
}

impl MenuItem {
    /// Creates a leaf item with a command.
    pub fn leaf(label: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            normalized_label: None,
            command: Some(command.into()),
            submenu: None,
        }
    }

    /// Creates a branch item with a submenu.
    pub fn branch(label: impl Into<String>, submenu: Vec<MenuItem>) -> Self {
        Self {
            label: label.into(),
            normalized_label: None,
            command: None,
            submenu: Some(submenu),
        }
    }

    /// Normalizes this item and every nested submenu item.
    ///
    /// On the platform without mnemonic markers (macOS) the stored label is
    /// unescaped for display first. Must be applied exactly once per item:
    /// unescaping is not idempotent for labels containing literal `&&`.
    pub fn normalize(&mut self, platform: Platform) {
        if !platform.uses_mnemonics() {
            self.label = unescape_mnemonics(&self.label);
        }
        self.normalized_label = Some(normalize_label(&self.label, platform));
        if let Some(submenu) = &mut self.submenu {
            for child in submenu {
                child.normalize(platform);
            }
        }
    }
}

/// Returns the canonical form of a label used as the merge/sort key.
///
/// On macOS labels carry no mnemonic markup and are returned unchanged;
/// elsewhere the mnemonic ampersands are stripped so `&File` and `File`
/// compare equal. Deterministic for a given input.
pub fn normalize_label(label: &str, platform: Platform) -> String {
    if platform.uses_mnemonics() {
        unescape_mnemonics(label)
    } else {
        label.to_string()
    }
}

/// Removes mnemonic markers from a label: `&File` becomes `File`, the
/// escaped `&&` becomes a literal `&`.
pub fn unescape_mnemonics(label: &str) -> String {
    let mut result = String::with_capacity(label.len());
    let mut chars = label.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if chars.peek() == Some(&'&') {
                chars.next();
                result.push('&');
            }
            // A single ampersand marks the mnemonic character; drop it.
        } else {
            result.push(c);
        }
    }
    result
}

/// Inserts `item` into `tree`, preserving the relative order of existing
/// siblings.
///
/// A sibling with the same normalized label absorbs `item`: when both are
/// branches their submenus merge recursively (the existing branch keeps its
/// position); when either side lacks a submenu the existing item is left
/// untouched, since menu identity is keyed purely by normalized label.
/// Without a match, `item` is appended at the end.
pub fn merge(tree: &mut Vec<MenuItem>, item: MenuItem, platform: Platform) {
    let Some(index) = matching_index(tree, &item, platform) else {
        tree.push(item);
        return;
    };
    if let (Some(existing), Some(incoming)) = (tree[index].submenu.as_mut(), item.submenu) {
        for child in incoming {
            merge(existing, child, platform);
        }
    }
}

/// Removes `item` from `tree`; the inverse of [`merge`].
///
/// When `item` and the matched sibling are both branches, `item`'s children
/// are unmerged recursively and the branch is removed once its submenu is
/// empty. Otherwise the matched sibling is removed directly. Unmerging an
/// item that is not present is a no-op.
pub fn unmerge(tree: &mut Vec<MenuItem>, item: &MenuItem, platform: Platform) {
    let Some(index) = matching_index(tree, item, platform) else {
        return;
    };
    if let (Some(existing), Some(children)) = (tree[index].submenu.as_mut(), &item.submenu) {
        for child in children {
            unmerge(existing, child, platform);
        }
        if !existing.is_empty() {
            return;
        }
    }
    tree.remove(index);
}

/// Sorts items in place by normalized label, case-insensitively.
///
/// Items without a normalized label compare equal, so the stable sort
/// leaves them in their relative order.
pub fn sort_alphabetically(items: &mut [MenuItem]) {
    items.sort_by(|a, b| match (&a.normalized_label, &b.normalized_label) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        _ => Ordering::Equal,
    });
}

/// Finds the sibling whose normalized label matches `item`'s.
fn matching_index(tree: &[MenuItem], item: &MenuItem, platform: Platform) -> Option<usize> {
    let key = merge_key(item, platform);
    tree.iter()
        .position(|existing| merge_key(existing, platform) == key)
}

/// The comparison key for merge and unmerge. Items normally enter the
/// manager already normalized; an item without a normalized label is keyed
/// by normalizing on the fly.
fn merge_key(item: &MenuItem, platform: Platform) -> Cow<'_, str> {
    match &item.normalized_label {
        Some(normalized) => Cow::Borrowed(normalized.as_str()),
        None => Cow::Owned(normalize_label(&item.label, platform)),
    }
}
