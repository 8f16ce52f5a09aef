//! Filesystem-side collaborators of a rig export.
//!
//! The core crate only names shapes by id; this crate deals with the files
//! behind those ids: the per-shape SVGs, their importer metadata, and the raw
//! tag export the core reads.

pub mod error;
pub mod meta;
pub mod resolver;
pub mod strip;
pub mod svg;

pub use error::AssetError;
pub use meta::{patch_texture_sizes, svg_texture_size, texture_size, TexturePatch};
pub use resolver::ShapeAssetResolver;
pub use strip::{is_shape_definition, strip_shape_definitions, strip_shape_definitions_file};
pub use svg::{inline_document, inline_svg_file, inline_svg_folder, inline_svg_str, InlineOutcome};

use std::fs;
use std::path::{Path, PathBuf};

/// Files directly in `dir` whose name ends with `suffix`, sorted by name.
pub(crate) fn sorted_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, AssetError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(AssetError::io(dir))? {
        let path = entry.map_err(AssetError::io(dir))?.path();
        let matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
