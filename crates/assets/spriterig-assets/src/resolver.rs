use std::path::{Path, PathBuf};

use log::warn;
use spriterig_core::{CharacterId, ModelEntry};

/// Maps shape ids to the exported per-shape SVG files (`<dir>/<id>.svg`).
#[derive(Clone, Debug)]
pub struct ShapeAssetResolver {
    dir: PathBuf,
}

impl ShapeAssetResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, shape: &CharacterId) -> PathBuf {
        self.dir.join(format!("{shape}.svg"))
    }

    /// Shape ids referenced by `models` with no file on disk, each listed once
    /// in first-reference order.
    pub fn missing_shapes(&self, models: &[ModelEntry]) -> Vec<CharacterId> {
        let mut missing: Vec<CharacterId> = Vec::new();
        for model in models {
            for shape in model.shape_ids() {
                if missing.contains(shape) || self.path_for(shape).is_file() {
                    continue;
                }
                warn!(
                    "model '{}' references shape {shape} but {} does not exist",
                    model.name,
                    self.path_for(shape).display()
                );
                missing.push(shape.clone());
            }
        }
        missing
    }
}
