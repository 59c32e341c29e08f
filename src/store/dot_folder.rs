// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::model::{FileName, GraphSource};

pub const DOT_EXTENSION: &str = "dot";

#[derive(Debug)]
pub enum StoreError {
    DirectoryNotFound { path: PathBuf },
    FileNotFound { path: PathBuf },
    Read { path: PathBuf, source: io::Error },
}

impl StoreError {
    pub fn path(&self) -> &Path {
        match self {
            Self::DirectoryNotFound { path }
            | Self::FileNotFound { path }
            | Self::Read { path, .. } => path,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => write!(f, "directory not found: {}", path.display()),
            Self::FileNotFound { path } => write!(f, "file not found: {}", path.display()),
            Self::Read { path, source } => write!(f, "cannot read {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::DirectoryNotFound { .. } | Self::FileNotFound { .. } => None,
        }
    }
}

/// A directory of dot files.
///
/// Nothing is cached: every listing re-scans the directory and every load re-reads the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotFolder {
    root: PathBuf,
}

impl DotFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Names of the regular `*.dot` files in the directory, in byte order.
    ///
    /// An empty directory yields an empty list. Symlinks are followed; subdirectories, broken
    /// links and names that are not UTF-8 are skipped.
    pub fn list_available_files(&self) -> Result<Vec<FileName>, StoreError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(StoreError::DirectoryNotFound { path: self.root.clone() }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::DirectoryNotFound { path: self.root.clone() });
            }
            Err(source) => return Err(StoreError::Read { path: self.root.clone(), source }),
        }

        let entries = fs::read_dir(&self.root).map_err(|source| StoreError::Read {
            path: self.root.clone(),
            source,
        })?;

        let mut names = Vec::<FileName>::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Read {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension() != Some(OsStr::new(DOT_EXTENSION)) {
                continue;
            }

            let Ok(raw_name) = entry.file_name().into_string() else {
                debug!(path = %path.display(), "skipping non-UTF-8 file name");
                continue;
            };

            match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => {
                    debug!(name = %raw_name, "skipping non-regular entry");
                    continue;
                }
                Err(err) => {
                    debug!(name = %raw_name, error = %err, "skipping unreadable entry");
                    continue;
                }
            }

            match FileName::new(raw_name) {
                Ok(name) => names.push(name),
                Err(err) => debug!(error = %err, "skipping invalid file name"),
            }
        }

        names.sort_by(|a, b| a.as_str().as_bytes().cmp(b.as_str().as_bytes()));
        info!(dir = %self.root.display(), count = names.len(), "listed dot files");
        Ok(names)
    }

    /// Reads the whole file. The returned text is byte-for-byte the file content.
    pub fn load(&self, name: &FileName) -> Result<GraphSource, StoreError> {
        let path = self.path_of(name);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::FileNotFound { path });
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };

        let text = String::from_utf8(bytes).map_err(|err| StoreError::Read {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })?;

        debug!(name = %name, bytes = text.len(), "loaded dot file");
        Ok(GraphSource::new(text))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{DotFolder, StoreError};
    use crate::model::FileName;

    struct DotFolderTestCtx {
        tmp: TempDir,
        folder: DotFolder,
    }

    impl DotFolderTestCtx {
        fn write(&self, name: &str, content: &[u8]) -> PathBuf {
            let path = self.tmp.path().join(name);
            fs::write(&path, content).expect("write fixture");
            path
        }
    }

    #[fixture]
    fn ctx() -> DotFolderTestCtx {
        let tmp = TempDir::new().expect("temp dir");
        let folder = DotFolder::new(tmp.path());
        DotFolderTestCtx { tmp, folder }
    }

    fn names(list: &[FileName]) -> Vec<&str> {
        list.iter().map(FileName::as_str).collect()
    }

    #[rstest]
    fn empty_directory_lists_nothing(ctx: DotFolderTestCtx) {
        assert!(ctx.folder.list_available_files().expect("list").is_empty());
    }

    #[rstest]
    fn lists_only_dot_files_in_byte_order(ctx: DotFolderTestCtx) {
        ctx.write("b.dot", b"digraph {}");
        ctx.write("a.dot", b"digraph {}");
        ctx.write("Z.dot", b"digraph {}");
        ctx.write("notes.txt", b"hello");
        ctx.write("upper.DOT", b"digraph {}");
        ctx.write("archive.dot.bak", b"digraph {}");
        fs::create_dir(ctx.tmp.path().join("dir.dot")).expect("mkdir");

        let listed = ctx.folder.list_available_files().expect("list");
        assert_eq!(names(&listed), vec!["Z.dot", "a.dot", "b.dot"]);
    }

    #[rstest]
    fn listing_rescans_every_time(ctx: DotFolderTestCtx) {
        ctx.write("a.dot", b"digraph {}");
        assert_eq!(ctx.folder.list_available_files().expect("list").len(), 1);

        ctx.write("b.dot", b"digraph {}");
        assert_eq!(ctx.folder.list_available_files().expect("list").len(), 2);
    }

    #[rstest]
    fn missing_directory_is_reported(ctx: DotFolderTestCtx) {
        let folder = DotFolder::new(ctx.tmp.path().join("missing"));
        let err = folder.list_available_files().unwrap_err();
        assert!(matches!(err, StoreError::DirectoryNotFound { .. }));
        assert!(err.to_string().starts_with("directory not found: "));
    }

    #[rstest]
    fn a_file_is_not_a_directory(ctx: DotFolderTestCtx) {
        let path = ctx.write("plain.dot", b"digraph {}");
        let err = DotFolder::new(path).list_available_files().unwrap_err();
        assert!(matches!(err, StoreError::DirectoryNotFound { .. }));
    }

    #[rstest]
    fn load_returns_exact_content(ctx: DotFolderTestCtx) {
        let content = "digraph G {\r\n  A -> B;\r\n}\n\n";
        ctx.write("a.dot", content.as_bytes());

        let source = ctx.folder.load(&FileName::new("a.dot").expect("name")).expect("load");
        assert_eq!(source.as_str(), content);
    }

    #[rstest]
    fn load_of_deleted_file_is_not_found(ctx: DotFolderTestCtx) {
        let path = ctx.write("gone.dot", b"digraph {}");
        let listed = ctx.folder.list_available_files().expect("list");
        fs::remove_file(path).expect("remove");

        let err = ctx.folder.load(&listed[0]).unwrap_err();
        assert!(matches!(err, StoreError::FileNotFound { .. }));
        assert!(err.path().ends_with("gone.dot"));
    }

    #[rstest]
    fn load_of_invalid_utf8_is_a_read_error(ctx: DotFolderTestCtx) {
        ctx.write("bin.dot", &[0xff, 0xfe, 0x00]);

        let err = ctx.folder.load(&FileName::new("bin.dot").expect("name")).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }
}
