// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Process-wide `tracing` setup.
//!
//! The filter comes from `DOTLENS_LOG` (default `info`). While the TUI owns the terminal, logs
//! must never reach stdout/stderr, so the binary picks the target per mode.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILTER_ENV: &str = "DOTLENS_LOG";
const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// No subscriber is installed.
    Discard,
    Stderr,
    /// Appends to the given file.
    File(PathBuf),
}

#[derive(Debug)]
pub enum LoggingError {
    OpenLogFile { path: PathBuf, source: io::Error },
    AlreadyInitialized(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenLogFile { path, source } => {
                write!(f, "cannot open log file {}: {source}", path.display())
            }
            Self::AlreadyInitialized(reason) => write!(f, "logging already initialized: {reason}"),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::OpenLogFile { source, .. } => Some(source),
            Self::AlreadyInitialized(_) => None,
        }
    }
}

/// Builds the filter from a raw directive string, falling back to `info` when it is missing or
/// malformed.
pub fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

pub fn init_logging(target: &LogTarget) -> Result<(), LoggingError> {
    let raw = std::env::var(LOG_FILTER_ENV).ok();
    let filter = env_filter(raw.as_deref());

    let result = match target {
        LogTarget::Discard => return Ok(()),
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
    };

    result.map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}

fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenLogFile {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::{env_filter, init_logging, LogTarget, LoggingError};

    #[test]
    fn missing_or_malformed_filters_default_to_info() {
        assert_eq!(env_filter(None).to_string(), "info");
        assert_eq!(env_filter(Some("  ")).to_string(), "info");
        assert_eq!(env_filter(Some("dotlens=debug")).to_string(), "dotlens=debug");
    }

    #[test]
    fn discard_installs_nothing() {
        init_logging(&LogTarget::Discard).expect("discard");
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let path = tmp.path().join("missing-dir").join("dotlens.log");

        let err = init_logging(&LogTarget::File(path.clone())).unwrap_err();
        assert!(matches!(err, LoggingError::OpenLogFile { path: ref p, .. } if *p == path));
    }
}
