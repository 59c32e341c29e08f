// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The list → select → read → render pipeline behind every UI.
//!
//! [`Viewer`] is a small state machine: `Idle` until something is selected, then `Rendered` or
//! `Error` depending on how the last selection went. Each selection re-reads the file; nothing
//! is cached between selections.

use std::fmt;

use tracing::{info, warn};

use crate::model::FileName;
use crate::render::{render_graph_source, RenderError, RenderedGraph};
use crate::store::{DotFolder, StoreError};

#[derive(Debug)]
pub enum ViewerError {
    Store(StoreError),
    Render(RenderError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerErrorKind {
    DirectoryNotFound,
    FileNotFound,
    Read,
    Render,
}

impl ViewerError {
    pub fn kind(&self) -> ViewerErrorKind {
        match self {
            Self::Store(StoreError::DirectoryNotFound { .. }) => ViewerErrorKind::DirectoryNotFound,
            Self::Store(StoreError::FileNotFound { .. }) => ViewerErrorKind::FileNotFound,
            Self::Store(StoreError::Read { .. }) => ViewerErrorKind::Read,
            Self::Render(_) => ViewerErrorKind::Render,
        }
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Render(err) => Some(err),
        }
    }
}

impl From<StoreError> for ViewerError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<RenderError> for ViewerError {
    fn from(err: RenderError) -> Self {
        Self::Render(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Idle,
    Rendered {
        file_name: FileName,
        rendered: RenderedGraph,
    },
    Error {
        file_name: FileName,
        kind: ViewerErrorKind,
        message: String,
    },
}

impl ViewState {
    pub fn file_name(&self) -> Option<&FileName> {
        match self {
            Self::Idle => None,
            Self::Rendered { file_name, .. } | Self::Error { file_name, .. } => Some(file_name),
        }
    }

    pub fn rendered(&self) -> Option<&RenderedGraph> {
        match self {
            Self::Rendered { rendered, .. } => Some(rendered),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewer {
    folder: DotFolder,
    files: Vec<FileName>,
    state: ViewState,
    rev: u64,
}

impl Viewer {
    pub fn new(folder: DotFolder) -> Self {
        Self {
            folder,
            files: Vec::new(),
            state: ViewState::Idle,
            rev: 0,
        }
    }

    pub fn folder(&self) -> &DotFolder {
        &self.folder
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Incremented on every state transition.
    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// Files from the most recent successful listing.
    pub fn files(&self) -> &[FileName] {
        &self.files
    }

    /// Scans the directory; the result is not cached for later calls.
    pub fn list_available_files(&self) -> Result<Vec<FileName>, ViewerError> {
        Ok(self.folder.list_available_files()?)
    }

    /// Re-lists the directory and remembers the result for [`Viewer::files`].
    ///
    /// On failure the previous list is dropped so stale names are never offered.
    pub fn refresh(&mut self) -> Result<&[FileName], ViewerError> {
        match self.list_available_files() {
            Ok(files) => {
                self.files = files;
                Ok(&self.files)
            }
            Err(err) => {
                self.files.clear();
                Err(err)
            }
        }
    }

    /// Reads and renders `file_name`; the outcome replaces the current state.
    pub fn select(&mut self, file_name: &FileName) -> &ViewState {
        let next = match self.load_and_render(file_name) {
            Ok(rendered) => {
                info!(file = %file_name, summary = %rendered.summary, "rendered graph");
                ViewState::Rendered {
                    file_name: file_name.clone(),
                    rendered,
                }
            }
            Err(err) => {
                warn!(file = %file_name, error = %err, "selection failed");
                ViewState::Error {
                    file_name: file_name.clone(),
                    kind: err.kind(),
                    message: err.to_string(),
                }
            }
        };
        self.set_state(next);
        &self.state
    }

    pub fn clear(&mut self) {
        if self.state != ViewState::Idle {
            self.set_state(ViewState::Idle);
        }
    }

    fn load_and_render(&self, file_name: &FileName) -> Result<RenderedGraph, ViewerError> {
        let source = self.folder.load(file_name)?;
        Ok(render_graph_source(&source)?)
    }

    fn set_state(&mut self, state: ViewState) {
        self.state = state;
        self.rev = self.rev.wrapping_add(1);
    }
}
