pub mod config;
pub mod keybinding;
pub mod manager;
pub mod menu;
pub mod platform;
pub mod renderer;
pub mod selector;

pub use config::Config;
pub use keybinding::{keystrokes_by_command, KeyBinding, KeymapSource, KeystrokeMap, UNSET_COMMAND};
pub use manager::{MenuAddition, MenuManager};
pub use menu::{merge, normalize_label, sort_alphabetically, unescape_mnemonics, unmerge, MenuItem};
pub use platform::{default_menu, parse_menu, Platform};
pub use renderer::{MenuUpdate, RendererProxy, SnapshotWriter, UPDATE_APPLICATION_MENU};
pub use selector::{SyntheticContext, UiContext};
