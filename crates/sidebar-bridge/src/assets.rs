//! HTML fragments served to the sidebar.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::fs::Dir;
use thiserror::Error;

/// Extension tried when a requested fragment has none.
const HTML_EXTENSION: &str = "html";

/// Errors raised while reading an HTML fragment.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset directory could not be opened.
    #[error("failed to open asset directory '{path}': {source}")]
    OpenDir {
        /// Configured directory.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// The fragment is missing or lies outside the asset directory.
    #[error("failed to read asset '{name}': {source}")]
    Read {
        /// Requested file name.
        name: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Read-only view of the directory holding the sidebar's HTML fragments.
///
/// Lookups go through a capability handle, so names such as `../secret`
/// or absolute paths cannot reach files outside the directory.
#[derive(Debug)]
pub struct HtmlAssets {
    dir: Dir,
    root: Utf8PathBuf,
}

impl HtmlAssets {
    /// Opens the asset directory at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::OpenDir`] if the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> Result<Self, AssetError> {
        let dir = Dir::open_ambient_dir(root, cap_std::ambient_authority()).map_err(|source| {
            AssetError::OpenDir {
                path: root.to_owned(),
                source,
            }
        })?;
        Ok(Self {
            dir,
            root: root.to_owned(),
        })
    }

    /// Directory the fragments are read from.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns the content of `filename`.
    ///
    /// A name without an extension also matches `<name>.html`.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Read`] if no matching file can be read inside
    /// the asset directory.
    pub fn include(&self, filename: &str) -> Result<String, AssetError> {
        let requested = Utf8Path::new(filename);
        match self.dir.read_to_string(requested) {
            Err(error) if error.kind() == io::ErrorKind::NotFound && requested.extension().is_none() => {
                self.dir
                    .read_to_string(requested.with_extension(HTML_EXTENSION))
                    .map_err(|source| AssetError::Read {
                        name: filename.to_owned(),
                        source,
                    })
            }
            result => result.map_err(|source| AssetError::Read {
                name: filename.to_owned(),
                source,
            }),
        }
    }
}
