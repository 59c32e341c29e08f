// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;
use std::path::{Component, Path};

use serde::Serialize;

/// Name of a dot file inside the configured directory.
///
/// Always a single path segment: it never contains a separator and is never `.` or `..`, so
/// joining it onto the directory cannot escape that directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileName(String);

impl FileName {
    pub fn new(value: impl Into<String>) -> Result<Self, FileNameError> {
        let value = value.into();
        if value.is_empty() {
            return Err(FileNameError::Empty);
        }
        if value.contains('/') || value.contains('\\') {
            return Err(FileNameError::ContainsSeparator { value });
        }

        let mut components = Path::new(&value).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Self(value)),
            _ => Err(FileNameError::NotASegment { value }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        match self.0.rfind('.') {
            Some(idx) if idx > 0 => &self.0[..idx],
            _ => &self.0,
        }
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNameError {
    Empty,
    ContainsSeparator { value: String },
    NotASegment { value: String },
}

impl fmt::Display for FileNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("file name must not be empty"),
            Self::ContainsSeparator { value } => {
                write!(f, "file name must not contain a path separator: {value:?}")
            }
            Self::NotASegment { value } => {
                write!(f, "file name must be a plain path segment: {value:?}")
            }
        }
    }
}

impl std::error::Error for FileNameError {}

/// Raw text of one dot file.
///
/// The viewer pipeline never looks inside; it only hands the text to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSource(String);

impl GraphSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for GraphSource {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GraphSource {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}
