//! Spriterig core (renderer-agnostic)
//!
//! Rebuilds sprite rigs from an exported timeline tag stream: the component
//! layout placed on each model's first frame, and the named animations formed
//! by the frames after it, with per-component transform moves.
//!
//! Data flows one way: [`TagStream`] -> [`ModelCatalogBuilder`] ->
//! ([`build_shape_frames`], [`AnimationReconstructor`]) -> [`ResultSerializer`],
//! which applies the [`TransformDecoder`] on output.

pub mod catalog;
pub mod component;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod ids;
pub mod matrix;
pub mod reconstruct;
pub mod tags;

// Re-exports for consumers (CLI, asset tools)
pub use catalog::{
    build_catalog, Catalog, CatalogReport, DuplicateModel, ModelCatalogBuilder, ModelHead,
    SkippedModel,
};
pub use component::build_shape_frames;
pub use config::RigConfig;
pub use data::{
    Animation, AnimationFrame, ComponentMove, ComponentShapeFrame, ComponentSprite, ModelEntry,
};
pub use error::{FormatError, LoadError};
pub use export::{ModelJson, ResultSerializer};
pub use ids::{CharacterId, Depth, RecordId};
pub use matrix::{DecodedTransform, TransformDecoder, TransformMatrix};
pub use reconstruct::{AnimationReconstructor, ModelRig, ReconstructStats};
pub use tags::xml::{load_tag_stream, parse_tag_stream_str, read_tag_stream};
pub use tags::{TagKind, TagRecord, TagStream, TagStreamBuilder};
