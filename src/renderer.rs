//! Outbound boundary to the menu rendering process.
//!
//! The menu manager ships exactly one message kind: `update-application-menu`,
//! carrying the full template and the per-command keystroke map. The process
//! that renders the native menu is a separate program; it only ever sees the
//! serialized message.

use crate::keybinding::KeystrokeMap;
use crate::menu::MenuItem;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Name of the single message sent across the rendering boundary.
pub const UPDATE_APPLICATION_MENU: &str = "update-application-menu";

/// The serialized form of an application menu update.
#[derive(Debug, Serialize)]
pub struct MenuUpdate<'a> {
    pub message: &'static str,
    pub template: &'a [MenuItem],
    pub keystrokes_by_command: &'a KeystrokeMap,
}

impl<'a> MenuUpdate<'a> {
    pub fn new(template: &'a [MenuItem], keystrokes_by_command: &'a KeystrokeMap) -> Self {
        Self {
            message: UPDATE_APPLICATION_MENU,
            template,
            keystrokes_by_command,
        }
    }
}

/// Receiver of menu updates. Implemented over whatever transport reaches
/// the rendering process; tests substitute a recording implementation.
pub trait RendererProxy {
    fn update_application_menu(
        &mut self,
        template: &[MenuItem],
        keystrokes: &KeystrokeMap,
    ) -> Result<()>;
}

/// Writes each menu update as JSON to a file the rendering process watches.
///
/// Writes go to a temporary file first, then rename into place, so the
/// rendering process never observes a partial message.
pub struct SnapshotWriter {
    path: PathBuf,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl RendererProxy for SnapshotWriter {
    fn update_application_menu(
        &mut self,
        template: &[MenuItem],
        keystrokes: &KeystrokeMap,
    ) -> Result<()> {
        let update = MenuUpdate::new(template, keystrokes);
        let json =
            serde_json::to_string_pretty(&update).context("Failed to serialize menu update")?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, &json)
            .with_context(|| format!("Failed to write temp file: {:?}", temp_path))?;
        fs::rename(&temp_path, &self.path)
            .with_context(|| format!("Failed to rename temp file to {:?}", self.path))?;

        Ok(())
    }
}
