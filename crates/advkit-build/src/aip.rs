//! Project metadata reader for AIP files.
//!
//! An AIP project is an XML document with a single `DOCUMENT` root. The
//! named build configurations live in rows of the build component:
//! `COMPONENT[@cid="caphyon.advinst.msicomp.BuildComponent"]/ROW`, each
//! carrying a `BuildName` attribute. Rows without the attribute are
//! skipped, not an error.

use std::path::{Path, PathBuf};

use advkit_core::{AdvkitError, AdvkitResult, HostExecutor};

const BUILD_COMPONENT_CID: &str = "caphyon.advinst.msicomp.BuildComponent";

/// Reads a project file once and answers metadata questions from the
/// parsed result. The document is parsed exactly once per instance.
#[derive(Debug, Clone)]
pub struct AipReader {
    path: PathBuf,
    valid: bool,
    builds: Vec<String>,
}

impl AipReader {
    /// Read and parse the project file on `host`. Malformed XML or an I/O
    /// failure is a `ProjectRead` error; a parseable document that is not
    /// a recognized project is reported through [`Self::is_valid_project`].
    pub async fn load(host: &dyn HostExecutor, path: &Path) -> AdvkitResult<Self> {
        let bytes = host
            .read_file(path)
            .await
            .map_err(|e| AdvkitError::ProjectRead {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let text = String::from_utf8_lossy(&bytes);
        Self::parse(path, &text)
    }

    /// Parse project text already in memory.
    pub fn parse(path: &Path, text: &str) -> AdvkitResult<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let doc = roxmltree::Document::parse(text).map_err(|e| AdvkitError::ProjectRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let root = doc.root_element();
        let valid = root.tag_name().name() == "DOCUMENT" && root.attribute("Type").is_some();

        let builds = root
            .children()
            .filter(|node| {
                node.is_element()
                    && node.tag_name().name() == "COMPONENT"
                    && node.attribute("cid") == Some(BUILD_COMPONENT_CID)
            })
            .flat_map(|component| component.children())
            .filter(|node| node.is_element() && node.tag_name().name() == "ROW")
            .filter_map(|row| row.attribute("BuildName").map(str::to_string))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            valid,
            builds,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the document is a recognized project: a single `DOCUMENT`
    /// root carrying a `Type` attribute.
    pub const fn is_valid_project(&self) -> bool {
        self.valid
    }

    /// Build configuration names in document order.
    pub fn build_configurations(&self) -> &[String] {
        &self.builds
    }

    pub fn has_build(&self, name: &str) -> bool {
        self.builds.iter().any(|b| b == name)
    }
}
