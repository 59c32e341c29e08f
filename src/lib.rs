// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dotlens: a terminal viewer for directories of Graphviz dot files.
//!
//! The pipeline is `store` (list and read) → `format::dot` (parse) → `layout` (layered
//! placement) → `render` (Unicode text), driven by [`viewer::Viewer`] and shown by [`tui`].

pub mod format;
pub mod layout;
pub mod logging;
pub mod model;
pub mod render;
pub mod store;
pub mod tui;
pub mod viewer;
