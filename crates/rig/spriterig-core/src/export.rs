//! JSON export of reconstructed models.
//!
//! A pure projection of [`ModelEntry`] values into the external schema. Raw
//! transforms are decoded here and nowhere earlier.

use std::io::Write;

use serde::Serialize;

use crate::config::RigConfig;
use crate::data::{
    Animation, AnimationFrame, ComponentMove, ComponentShapeFrame, ComponentSprite, ModelEntry,
};
use crate::matrix::{DecodedTransform, TransformDecoder};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelJson<'a> {
    pub name: &'a str,
    pub labels: &'a [String],
    pub sprite_number: &'a str,
    pub frame_number: u32,
    pub components: Vec<ComponentJson<'a>>,
    pub animations: Vec<AnimationJson<'a>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentJson<'a> {
    pub transform_matrix: DecodedTransform,
    pub sprite_number: &'a str,
    pub depth: String,
    pub shapes: Vec<ShapeJson<'a>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeJson<'a> {
    pub shape_number: &'a str,
    pub label: &'a str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationJson<'a> {
    pub name: &'a str,
    pub start_frame: u32,
    pub list_of_frames: Vec<FrameJson>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameJson {
    pub frame_number: u32,
    pub relative_frame_number: u32,
    pub list_of_components: Vec<MoveJson>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveJson {
    pub component_depth: String,
    pub transform: DecodedTransform,
}

/// Projects models into the export schema with a fixed decoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResultSerializer {
    decoder: TransformDecoder,
}

impl ResultSerializer {
    pub fn new(decoder: TransformDecoder) -> Self {
        Self { decoder }
    }

    pub fn from_config(cfg: &RigConfig) -> Self {
        Self::new(TransformDecoder::from_config(cfg))
    }

    pub fn model<'a>(&self, entry: &'a ModelEntry) -> ModelJson<'a> {
        ModelJson {
            name: &entry.name,
            labels: &entry.labels,
            sprite_number: entry.sprite_id.as_str(),
            frame_number: entry.frame_number,
            components: entry.components.iter().map(|c| self.component(c)).collect(),
            animations: entry.animations.iter().map(|a| self.animation(a)).collect(),
        }
    }

    pub fn catalog<'a>(&self, models: &'a [ModelEntry]) -> Vec<ModelJson<'a>> {
        models.iter().map(|m| self.model(m)).collect()
    }

    /// Export as `serde_json::Value` (an array with one object per model).
    pub fn to_value(&self, models: &[ModelEntry]) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.catalog(models))
    }

    pub fn to_string(&self, models: &[ModelEntry], pretty: bool) -> serde_json::Result<String> {
        let view = self.catalog(models);
        if pretty {
            serde_json::to_string_pretty(&view)
        } else {
            serde_json::to_string(&view)
        }
    }

    pub fn write<W: Write>(
        &self,
        models: &[ModelEntry],
        writer: W,
        pretty: bool,
    ) -> serde_json::Result<()> {
        let view = self.catalog(models);
        if pretty {
            serde_json::to_writer_pretty(writer, &view)
        } else {
            serde_json::to_writer(writer, &view)
        }
    }

    fn component<'a>(&self, component: &'a ComponentSprite) -> ComponentJson<'a> {
        ComponentJson {
            transform_matrix: self.decoder.decode(&component.transform),
            sprite_number: component.sprite_id.as_str(),
            depth: component.depth.to_string(),
            shapes: component.shape_frames.iter().map(shape).collect(),
        }
    }

    fn animation<'a>(&self, animation: &'a Animation) -> AnimationJson<'a> {
        AnimationJson {
            name: &animation.name,
            start_frame: animation.start_frame,
            list_of_frames: animation.frames.iter().map(|f| self.frame(f)).collect(),
        }
    }

    fn frame(&self, frame: &AnimationFrame) -> FrameJson {
        FrameJson {
            frame_number: frame.frame_number,
            relative_frame_number: frame.relative_frame_number,
            list_of_components: frame.moves.iter().map(|m| self.component_move(m)).collect(),
        }
    }

    fn component_move(&self, mv: &ComponentMove) -> MoveJson {
        MoveJson {
            component_depth: mv.depth.to_string(),
            transform: self.decoder.decode(&mv.transform),
        }
    }
}

fn shape(frame: &ComponentShapeFrame) -> ShapeJson<'_> {
    ShapeJson {
        shape_number: frame.shape_id.as_str(),
        label: &frame.label,
    }
}
