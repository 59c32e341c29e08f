// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Filesystem access for the viewer.
//!
//! The store lists and reads dot files in one directory and decodes the metadata that agent
//! loggers put into their file names.

pub mod dot_folder;
pub mod log_name;

pub use dot_folder::{DotFolder, StoreError, DOT_EXTENSION};
pub use log_name::{
    group_log_files, LogFileInfo, LogGroups, PATTERN_MISMATCH_MESSAGE, VISUALIZATION_TYPE,
};
