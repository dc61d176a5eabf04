//! Menu manager orchestration.
//!
//! Owns the menu template, applies contributions through the merge engine,
//! reconciles keybindings into accelerators, and ships the combined result
//! to the rendering process. Single-threaded and event-driven: mutations
//! are synchronous, and recomputation is debounced onto the host's next
//! idle tick.

use crate::keybinding::{self, KeymapSource, KeystrokeMap};
use crate::menu::{self, MenuItem};
use crate::platform::{self, Platform};
use crate::renderer::RendererProxy;
use crate::selector::{SyntheticContext, UiContext};
use anyhow::Result;
use std::path::PathBuf;
use tracing::debug;

/// Debounce state for recomputation. At most one flush is ever pending;
/// scheduling again while one is pending replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdateState {
    Idle,
    Scheduled,
}

/// Maintains the application menu template and its keystroke accelerators.
///
/// Constructed once and handed by reference to every call site that
/// contributes menu items. The host's event loop is expected to call
/// [`MenuManager::flush_pending`] on idle ticks.
pub struct MenuManager {
    template: Vec<MenuItem>,
    platform: Platform,
    keymap: Box<dyn KeymapSource>,
    ui: Box<dyn UiContext>,
    renderer: Box<dyn RendererProxy>,
    /// Fallback selector context, built lazily once and cached for the
    /// lifetime of the manager. Its body classes are never refreshed.
    synthetic: Option<SyntheticContext>,
    update_state: UpdateState,
    platform_items_loaded: bool,
    menus_dir: Option<PathBuf>,
}

impl MenuManager {
    pub fn new(
        platform: Platform,
        keymap: Box<dyn KeymapSource>,
        ui: Box<dyn UiContext>,
        renderer: Box<dyn RendererProxy>,
    ) -> Self {
        Self {
            template: Vec::new(),
            platform,
            keymap,
            ui,
            renderer,
            synthetic: None,
            update_state: UpdateState::Idle,
            platform_items_loaded: false,
            menus_dir: None,
        }
    }

    /// Loads per-platform menu definitions from `dir` instead of the
    /// embedded ones.
    pub fn with_menus_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.menus_dir = dir;
        self
    }

    /// The current menu template.
    pub fn template(&self) -> &[MenuItem] {
        &self.template
    }

    /// Adds menu items, returning a handle that removes exactly those
    /// items when disposed.
    ///
    /// Input items are deep-cloned, so later mutation of caller-owned
    /// structures cannot corrupt the stored template, and normalized at
    /// every depth (with mnemonic unescaping on macOS) before merging.
    pub fn add(&mut self, items: &[MenuItem]) -> MenuAddition {
        let mut added = items.to_vec();
        for item in &mut added {
            item.normalize(self.platform);
        }
        for item in added.iter().cloned() {
            menu::merge(&mut self.template, item, self.platform);
        }
        self.update();
        MenuAddition {
            items: added,
            released: false,
        }
    }

    /// Removes the given items from the template.
    pub fn remove(&mut self, items: &[MenuItem]) {
        for item in items {
            let mut item = item.clone();
            item.normalize(self.platform);
            menu::unmerge(&mut self.template, &item, self.platform);
        }
        self.update();
    }

    /// Replaces the template with an empty menu.
    pub fn clear(&mut self) {
        self.template.clear();
        self.update();
    }

    /// Schedules a recomputation for the host's next idle tick.
    ///
    /// Never recomputes synchronously. Calling again before the pending
    /// flush runs replaces it, coalescing bursts of mutations into a
    /// single boundary message.
    pub fn update(&mut self) {
        self.update_state = UpdateState::Scheduled;
    }

    /// Runs the pending recomputation, if any.
    ///
    /// Recomputes the keystroke map and sends one `update-application-menu`
    /// message reflecting every mutation since the previous flush. Returns
    /// whether a message was sent.
    pub fn flush_pending(&mut self) -> Result<bool> {
        if self.update_state != UpdateState::Scheduled {
            return Ok(false);
        }
        self.update_state = UpdateState::Idle;

        let keystrokes = self.keystrokes_by_command();
        debug!(
            items = self.template.len(),
            commands = keystrokes.len(),
            "sending application menu update"
        );
        self.renderer
            .update_application_menu(&self.template, &keystrokes)?;
        Ok(true)
    }

    /// Reconciles the registered keybindings into the per-command
    /// keystroke map, using the live UI context with the synthetic
    /// fallback.
    pub fn keystrokes_by_command(&mut self) -> KeystrokeMap {
        let bindings = self.keymap.bindings();
        let ui = &*self.ui;
        let synthetic = &mut self.synthetic;
        keybinding::keystrokes_by_command(&bindings, self.platform, |selector| {
            if ui.matches(selector) {
                return true;
            }
            synthetic
                .get_or_insert_with(|| SyntheticContext::new(ui.body_classes()))
                .matches(selector)
        })
    }

    /// Whether keybindings registered under `selector` should surface as
    /// menu accelerators in the current context.
    pub fn include_selector(&mut self, selector: &str) -> bool {
        if self.ui.matches(selector) {
            return true;
        }
        let ui = &*self.ui;
        self.synthetic
            .get_or_insert_with(|| SyntheticContext::new(ui.body_classes()))
            .matches(selector)
    }

    /// Signal: the bundled keybindings finished loading.
    ///
    /// The first call installs the platform's default menu; later calls
    /// are no-ops.
    pub fn on_bundled_keybindings_loaded(&mut self) -> Result<()> {
        if self.platform_items_loaded {
            return Ok(());
        }
        let items = platform::default_menu(self.platform, self.menus_dir.as_deref())?;
        self.platform_items_loaded = true;
        debug!(items = items.len(), "loading platform default menu");
        self.add(&items);
        Ok(())
    }

    /// Signal: the keymap was reloaded.
    pub fn on_keymap_reloaded(&mut self) {
        self.update();
    }

    /// Signal: the initial set of packages finished activating.
    pub fn on_initial_packages_activated(&mut self) {
        self.sort_packages_menu();
    }

    /// Sorts the Packages submenu alphabetically by normalized label.
    pub fn sort_packages_menu(&mut self) {
        if let Some(packages) = self
            .template
            .iter_mut()
            .find(|item| item.normalized_label.as_deref() == Some("Packages"))
        {
            if let Some(submenu) = packages.submenu.as_mut() {
                menu::sort_alphabetically(submenu);
            }
        }
        self.update();
    }

    /// Removal path for disposed additions: their items are already
    /// normalized, so normalizing again (which would unescape mnemonics a
    /// second time) must be skipped.
    fn remove_added(&mut self, items: &[MenuItem]) {
        for item in items {
            menu::unmerge(&mut self.template, item, self.platform);
        }
        self.update();
    }
}

/// Handle returned by [`MenuManager::add`]; removes exactly the items that
/// were added. Disposing twice is a no-op, never an error.
#[derive(Debug)]
pub struct MenuAddition {
    items: Vec<MenuItem>,
    released: bool,
}

impl MenuAddition {
    pub fn dispose(&mut self, manager: &mut MenuManager) {
        if self.released {
            return;
        }
        self.released = true;
        manager.remove_added(&self.items);
    }
}
