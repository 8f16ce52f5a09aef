//! Texture sizes in the importer's `.svg.meta` files.
//!
//! Each rasterised shape gets a texture edge of
//! `round_half_even(max(width, height) * scale)`, written over every
//! `textureSize: <n>` line of the sibling meta file.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::AssetError;
use crate::sorted_files;

const META_SUFFIX: &str = ".svg.meta";

#[derive(Clone, Debug, PartialEq)]
pub struct TexturePatch {
    pub meta: PathBuf,
    pub texture_size: u32,
    /// `textureSize` lines rewritten in the meta file.
    pub replaced: usize,
}

/// Texture edge for an SVG of the given size. Halves round to even.
pub fn texture_size(width: f64, height: f64, scale: f64) -> u32 {
    (width.max(height) * scale).round_ties_even() as u32
}

/// `"31.5px"` -> `31.5`.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
}

/// Texture edge for the SVG document in `svg`, from its root `width`/`height`.
pub fn svg_texture_size(svg: &str, scale: f64) -> Result<u32, AssetError> {
    let mut reader = Reader::from_str(svg);
    let root = loop {
        match reader.read_event()? {
            Event::Start(start) | Event::Empty(start) => break start,
            Event::Eof => return Err(AssetError::Svg("document has no root element".into())),
            _ => {}
        }
    };

    let mut width = None;
    let mut height = None;
    for attribute in root.attributes() {
        let attribute = attribute?;
        match attribute.key.as_ref() {
            b"width" => width = Some(attribute.unescape_value()?.into_owned()),
            b"height" => height = Some(attribute.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    let dimension = |attribute: &'static str, raw: Option<String>| {
        match raw.as_deref().and_then(parse_length) {
            Some(value) => Ok(value),
            None => Err(AssetError::Dimension {
                attribute,
                value: raw,
            }),
        }
    };
    let width = dimension("width", width)?;
    let height = dimension("height", height)?;
    Ok(texture_size(width, height, scale))
}

fn texture_size_line() -> Result<Regex, AssetError> {
    Ok(Regex::new(r"textureSize: [0-9]+\n")?)
}

/// Rewrite every `textureSize` line of `meta`. Returns the new text and the
/// number of lines replaced.
pub fn patch_meta_text(meta: &str, size: u32) -> Result<(String, usize), AssetError> {
    let re = texture_size_line()?;
    let replaced = re.find_iter(meta).count();
    let patched = re.replace_all(meta, format!("textureSize: {size}\n").as_str());
    Ok((patched.into_owned(), replaced))
}

/// Patch every `*.svg.meta` in `dir` (sorted by name) from its sibling SVG.
pub fn patch_texture_sizes(dir: impl AsRef<Path>, scale: f64) -> Result<Vec<TexturePatch>, AssetError> {
    let mut patches = Vec::new();
    for meta in sorted_files(dir.as_ref(), META_SUFFIX)? {
        let svg_path = meta.with_extension("");
        let svg = fs::read_to_string(&svg_path).map_err(AssetError::io(&svg_path))?;
        let size = match svg_texture_size(&svg, scale) {
            Ok(size) => size,
            Err(err) => {
                warn!("{}: {err}; meta file left unchanged", svg_path.display());
                continue;
            }
        };

        let text = fs::read_to_string(&meta).map_err(AssetError::io(&meta))?;
        let (patched, replaced) = patch_meta_text(&text, size)?;
        if replaced == 0 {
            warn!("{}: no textureSize line", meta.display());
        } else {
            fs::write(&meta, patched).map_err(AssetError::io(&meta))?;
        }
        info!("{}: textureSize {size}", meta.display());
        patches.push(TexturePatch {
            meta,
            texture_size: size,
            replaced,
        });
    }
    Ok(patches)
}
