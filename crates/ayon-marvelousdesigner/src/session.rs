/*
 *  Copyright 2025 Colliery Software
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! # Tools Session
//!
//! The host shows one small dialog with buttons leading to the pipeline tools.
//! [`ToolsSession`] owns that dialog's lifecycle: the dialog is created on the
//! first show request, reused while it is open and replaced once the artist
//! has closed it. Actually drawing the dialog and opening tools is left to a
//! [`ToolLauncher`].

use std::fmt;

/// Pipeline tools reachable from the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Loader,
    SceneInventory,
    Publisher,
    Workfiles,
}

impl Tool {
    /// Buttons in the order they appear in the dialog.
    pub const ALL: [Tool; 4] = [
        Tool::Loader,
        Tool::SceneInventory,
        Tool::Publisher,
        Tool::Workfiles,
    ];

    /// Name the pipeline uses to open the tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Loader => "loader",
            Tool::SceneInventory => "sceneinventory",
            Tool::Publisher => "publisher",
            Tool::Workfiles => "workfiles",
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self {
            Tool::Loader => "Load...",
            Tool::SceneInventory => "Manage...",
            Tool::Publisher => "Publish...",
            Tool::Workfiles => "Workfile...",
        }
    }

    pub fn from_button(label: &str) -> Option<Tool> {
        Self::ALL.into_iter().find(|tool| tool.button_label() == label)
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opens pipeline tools and presents the dialog in the embedding UI.
pub trait ToolLauncher: Send + Sync {
    /// Bring the dialog to the front, creating the window if `fresh`.
    fn present_dialog(&self, dialog: &ToolsDialog, fresh: bool);

    fn show_tool(&self, tool: Tool);
}

/// State of one tools dialog window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsDialog {
    generation: u64,
    open: bool,
}

impl ToolsDialog {
    pub const TITLE: &'static str = "Ayon tools";

    fn new(generation: u64) -> Self {
        Self {
            generation,
            open: true,
        }
    }

    /// Counts dialogs created by the owning session, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn buttons(&self) -> [(&'static str, Tool); 4] {
        Tool::ALL.map(|tool| (tool.button_label(), tool))
    }

    /// Handle a button click. Unknown labels are ignored.
    pub fn press(&self, label: &str, launcher: &dyn ToolLauncher) -> Option<Tool> {
        let tool = Tool::from_button(label)?;
        tracing::debug!(tool = %tool, "Tool requested from dialog");
        launcher.show_tool(tool);
        Some(tool)
    }
}

/// Process-wide UI session holding at most one tools dialog.
#[derive(Debug, Default)]
pub struct ToolsSession {
    dialog: Option<ToolsDialog>,
    created: u64,
}

impl ToolsSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the dialog, creating a new one unless an open one exists.
    pub fn show(&mut self, launcher: &dyn ToolLauncher) -> &ToolsDialog {
        let reuse = matches!(&self.dialog, Some(dialog) if dialog.is_open());
        if !reuse {
            self.created += 1;
            self.dialog = None;
            tracing::debug!(generation = self.created, "Creating tools dialog");
        }
        let generation = self.created;
        let dialog = self
            .dialog
            .get_or_insert_with(|| ToolsDialog::new(generation));
        launcher.present_dialog(dialog, !reuse);
        dialog
    }

    /// Record that the artist closed the dialog.
    pub fn close(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.open = false;
        }
    }

    pub fn dialog(&self) -> Option<&ToolsDialog> {
        self.dialog.as_ref()
    }

    pub fn dialogs_created(&self) -> u64 {
        self.created
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLauncher {
        presented: Mutex<Vec<(u64, bool)>>,
        tools: Mutex<Vec<Tool>>,
    }

    impl ToolLauncher for RecordingLauncher {
        fn present_dialog(&self, dialog: &ToolsDialog, fresh: bool) {
            self.presented.lock().push((dialog.generation(), fresh));
        }

        fn show_tool(&self, tool: Tool) {
            self.tools.lock().push(tool);
        }
    }

    #[test]
    fn test_dialog_reused_while_open() {
        let launcher = RecordingLauncher::default();
        let mut session = ToolsSession::new();

        assert_eq!(session.show(&launcher).generation(), 1);
        assert_eq!(session.show(&launcher).generation(), 1);

        assert_eq!(session.dialogs_created(), 1);
        assert_eq!(*launcher.presented.lock(), vec![(1, true), (1, false)]);
    }

    #[test]
    fn test_dialog_replaced_after_close() {
        let launcher = RecordingLauncher::default();
        let mut session = ToolsSession::new();
        session.show(&launcher);

        session.close();
        assert!(!session.dialog().unwrap().is_open());

        let dialog = session.show(&launcher);
        assert_eq!(dialog.generation(), 2);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_buttons_map_to_tool_names() {
        let launcher = RecordingLauncher::default();
        let mut session = ToolsSession::new();
        let dialog = session.show(&launcher).clone();

        let names: Vec<_> = dialog
            .buttons()
            .iter()
            .map(|(label, tool)| (*label, tool.name()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Load...", "loader"),
                ("Manage...", "sceneinventory"),
                ("Publish...", "publisher"),
                ("Workfile...", "workfiles"),
            ]
        );

        assert_eq!(dialog.press("Publish...", &launcher), Some(Tool::Publisher));
        assert_eq!(dialog.press("Render...", &launcher), None);
        assert_eq!(*launcher.tools.lock(), vec![Tool::Publisher]);
    }
}
