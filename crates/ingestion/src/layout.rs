//! Output layout: where an item and its side files go, and how they link back.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use stac_common::expand_date_template;

use crate::error::{IngestionError, Result};

/// Paths of every file written for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPaths {
    /// Expanded subfolder, relative to the base folder
    pub subfolder: String,
    pub dir: PathBuf,
    pub stem: String,
    pub input_filename: String,
    pub output_filename: String,
    pub output_filepath: PathBuf,
    pub kerchunk_filename: String,
    pub kerchunk_filepath: PathBuf,
    pub thumbnail_filename: String,
    pub thumbnail_filepath: PathBuf,
}

impl ItemPaths {
    pub fn new(
        base_folder: &Path,
        subfolder_template: &str,
        input: &Path,
        datetime: &DateTime<Utc>,
    ) -> Result<Self> {
        let input_filename = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| IngestionError::InvalidPattern(format!("{} is not a file", input.display())))?;
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_filename.clone());

        let subfolder = expand_date_template(subfolder_template, datetime)?;
        let dir = base_folder.join(&subfolder);

        let output_filename = format!("{}.geojson", stem);
        let kerchunk_filename = format!("{}-kerchunk.json", stem);
        let thumbnail_filename = format!("{}.png", stem);

        Ok(Self {
            output_filepath: dir.join(&output_filename),
            kerchunk_filepath: dir.join(&kerchunk_filename),
            thumbnail_filepath: dir.join(&thumbnail_filename),
            subfolder,
            dir,
            stem,
            input_filename,
            output_filename,
            kerchunk_filename,
            thumbnail_filename,
        })
    }

    /// Relative href from the item folder back to the collection file.
    pub fn collection_href(&self, collection_filename: &str) -> String {
        collection_href(&self.subfolder, collection_filename)
    }
}

/// `../` once per non-empty segment of `subfolder`, then the collection filename.
pub fn collection_href(subfolder: &str, collection_filename: &str) -> String {
    let depth = subfolder.split('/').filter(|s| !s.is_empty() && *s != ".").count();
    format!("{}{}", "../".repeat(depth), collection_filename)
}

/// Expand shell-style patterns (`**` recurses), keeping each pattern's matches in order.
///
/// Directories are skipped. A pattern that matches nothing is not an error.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob::glob(pattern)
            .map_err(|e| IngestionError::InvalidPattern(format!("{}: {}", pattern, e)))?;
        for entry in matches {
            let path = entry.map_err(|e| IngestionError::FileRead(e.into_error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
    }
    Ok(paths)
}
