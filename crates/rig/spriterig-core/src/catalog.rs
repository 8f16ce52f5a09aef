//! Model catalog: walks the master timeline and rebuilds every distinct model.
//!
//! Each master frame contributes its labels and, optionally, one placement
//! carrying the model marker name. Distinct creatures commonly reuse one model
//! sprite; only the first frame referencing a sprite produces an entry.
//! A model that fails with a [`FormatError`] is skipped and reported, the walk
//! continues with the next one.

use hashbrown::HashSet;
use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::RigConfig;
use crate::data::ModelEntry;
use crate::error::FormatError;
use crate::ids::CharacterId;
use crate::reconstruct::{AnimationReconstructor, ModelRig};
use crate::tags::{TagKind, TagRecord, TagStream};

/// A master frame that references a model, before reconstruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHead {
    pub sprite_id: CharacterId,
    pub labels: Vec<String>,
    pub frame_number: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedModel {
    pub sprite_id: CharacterId,
    pub frame_number: u32,
    pub error: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateModel {
    pub sprite_id: CharacterId,
    pub frame_number: u32,
    /// Labels of the duplicate frame (the creature that reuses the model).
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReport {
    pub master_frames: u32,
    pub skipped: Vec<SkippedModel>,
    pub duplicates: Vec<DuplicateModel>,
    pub dropped_moves: usize,
    pub excluded_overlays: usize,
    pub shapeless_components: usize,
    pub shadowed_depths: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub models: Vec<ModelEntry>,
    pub report: CatalogReport,
}

pub struct ModelCatalogBuilder<'a> {
    stream: &'a TagStream,
    config: &'a RigConfig,
}

impl<'a> ModelCatalogBuilder<'a> {
    pub fn new(stream: &'a TagStream, config: &'a RigConfig) -> Self {
        Self { stream, config }
    }

    /// Records of the master timeline, per the configured master sprite.
    pub fn master_timeline(&self) -> Result<Vec<&'a TagRecord>, FormatError> {
        match self.config.master_sprite_id.as_deref() {
            Some(id) => {
                let sprite = self.stream.sprite(id)?;
                Ok(self.stream.timeline_of(sprite).collect())
            }
            None => self.stream.top_level_timeline(),
        }
    }

    /// Walk the master timeline and collect one head per distinct model sprite.
    /// Returns the heads, the duplicate references, and the number of master frames.
    pub fn model_heads(
        &self,
    ) -> Result<(Vec<ModelHead>, Vec<DuplicateModel>, u32), FormatError> {
        let mut heads = Vec::new();
        let mut duplicates = Vec::new();
        let mut seen: HashSet<CharacterId> = HashSet::new();

        let mut labels: Vec<String> = Vec::new();
        let mut model: Option<CharacterId> = None;
        let mut frame_number = 0u32;

        for record in self.master_timeline()? {
            match record.kind() {
                TagKind::FrameLabel => match record.attr("name") {
                    Some(name) => labels.push(name.to_owned()),
                    None => warn!("master frame label {} has no name", record.id()),
                },
                TagKind::PlaceObject
                    if record.attr("name") == Some(self.config.model_placement_name.as_str()) =>
                {
                    match record.attr("characterId") {
                        Some(id) => model = Some(CharacterId::from(id)),
                        None => warn!("model placement {} has no characterId", record.id()),
                    }
                }
                TagKind::ShowFrame => {
                    frame_number += 1;
                    let labels = std::mem::take(&mut labels);
                    let Some(sprite_id) = model.take() else {
                        continue;
                    };
                    if seen.insert(sprite_id.clone()) {
                        heads.push(ModelHead {
                            sprite_id,
                            labels,
                            frame_number,
                        });
                    } else {
                        debug!(
                            "master frame {frame_number} reuses model {sprite_id} ({labels:?}); skipped"
                        );
                        duplicates.push(DuplicateModel {
                            sprite_id,
                            frame_number,
                            labels,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok((heads, duplicates, frame_number))
    }

    /// Build the full catalog. Fails only when the master timeline itself is missing.
    pub fn build(&self) -> Result<Catalog, FormatError> {
        let (heads, duplicates, master_frames) = self.model_heads()?;
        info!(
            "{} distinct models over {master_frames} master frames ({} duplicate references)",
            heads.len(),
            duplicates.len()
        );

        #[cfg(not(feature = "parallel"))]
        let results: Vec<_> = heads
            .into_iter()
            .map(|head| {
                let rig = self.reconstruct(&head.sprite_id);
                (head, rig)
            })
            .collect();
        #[cfg(feature = "parallel")]
        let results: Vec<_> = heads
            .into_par_iter()
            .map(|head| {
                let rig = self.reconstruct(&head.sprite_id);
                (head, rig)
            })
            .collect();

        let mut catalog = Catalog {
            models: Vec::with_capacity(results.len()),
            report: CatalogReport {
                master_frames,
                duplicates,
                ..CatalogReport::default()
            },
        };
        for (head, rig) in results {
            match rig {
                Ok(rig) => {
                    catalog.report.dropped_moves += rig.stats.dropped_moves;
                    catalog.report.excluded_overlays += rig.stats.excluded_overlays;
                    catalog.report.shapeless_components += rig.stats.shapeless_components;
                    catalog.report.shadowed_depths += rig.stats.shadowed_depths;
                    catalog.models.push(self.entry(head, rig));
                }
                Err(err) => {
                    warn!(
                        "model {} (master frame {}) skipped: {err}",
                        head.sprite_id, head.frame_number
                    );
                    catalog.report.skipped.push(SkippedModel {
                        sprite_id: head.sprite_id,
                        frame_number: head.frame_number,
                        error: err.to_string(),
                    });
                }
            }
        }
        Ok(catalog)
    }

    fn reconstruct(&self, sprite_id: &CharacterId) -> Result<ModelRig, FormatError> {
        AnimationReconstructor::new(self.stream, self.config).reconstruct(sprite_id)
    }

    fn entry(&self, head: ModelHead, rig: ModelRig) -> ModelEntry {
        let name = head
            .labels
            .last()
            .cloned()
            .unwrap_or_else(|| self.config.unnamed_model_name.clone());
        debug!(
            "model {} '{name}': {} components, {} animations",
            head.sprite_id,
            rig.components.len(),
            rig.animations.len()
        );
        ModelEntry {
            name,
            labels: head.labels,
            sprite_id: head.sprite_id,
            frame_number: head.frame_number,
            components: rig.components,
            animations: rig.animations,
        }
    }
}

/// Build the catalog for `stream` with `config`.
pub fn build_catalog(stream: &TagStream, config: &RigConfig) -> Result<Catalog, FormatError> {
    ModelCatalogBuilder::new(stream, config).build()
}
