use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "tag-streams")]
    tag_streams: HashMap<String, String>,
    svgs: HashMap<String, String>,
}

pub fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

/// Exported timeline documents (XML tag streams).
pub mod tag_streams {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.tag_streams.keys().cloned().collect()
    }

    pub fn xml(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.tag_streams, "tag stream", name)?;
        read_to_string(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.tag_streams, "tag stream", name)?;
        Ok(resolve_path(rel))
    }
}

/// Per-shape SVG exports.
pub mod svgs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.svgs.keys().cloned().collect()
    }

    pub fn text(name: &str) -> Result<String> {
        let rel = lookup(&MANIFEST.svgs, "svg", name)?;
        read_to_string(rel)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        let rel = lookup(&MANIFEST.svgs, "svg", name)?;
        Ok(resolve_path(rel))
    }
}
