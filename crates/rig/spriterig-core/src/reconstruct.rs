//! Animation reconstruction for one model sprite.
//!
//! Frame 0 of the model's sub-timeline is the layout: each placement there is a
//! component, registered by depth. Later frames are segmented into animations:
//!
//! - a label closes the open animation (if any) and opens a new one;
//! - placements with a transform become moves of the component at their depth,
//!   staged for the current frame; unknown depths are transient overlays and
//!   are dropped;
//! - at a frame boundary, a frame with no records at all ends the open
//!   animation, a frame with staged moves is appended to it, and any other
//!   frame leaves it open without recording anything;
//! - frames seen while no animation is open are ignored.
//!
//! The end of the sub-timeline closes whatever animation is still open.

use hashbrown::HashMap;
use log::{debug, trace, warn};

use crate::component::build_shape_frames;
use crate::config::RigConfig;
use crate::data::{Animation, ComponentMove, ComponentSprite};
use crate::error::FormatError;
use crate::ids::{CharacterId, Depth};
use crate::matrix::TransformMatrix;
use crate::tags::{TagKind, TagRecord, TagStream};

/// Counters gathered while reconstructing one model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    /// Frame boundaries seen, the layout frame included.
    pub frames: u32,
    /// Moves aimed at a depth with no layout component.
    pub dropped_moves: usize,
    /// Status-overlay placements left out of the layout.
    pub excluded_overlays: usize,
    /// Layout components whose character is not a sprite (plain or morph shapes).
    pub shapeless_components: usize,
    /// Layout placements at a depth already taken. Both components are kept.
    pub shadowed_depths: usize,
}

/// Layout and animations of one model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModelRig {
    pub components: Vec<ComponentSprite>,
    pub animations: Vec<Animation>,
    pub stats: ReconstructStats,
}

#[derive(Debug)]
enum Phase {
    NoAnimation,
    InAnimation(Animation),
}

/// Records collected for the frame currently being read.
#[derive(Debug)]
struct FrameAccumulator {
    number: u32,
    has_records: bool,
    staged: Vec<ComponentMove>,
}

impl FrameAccumulator {
    fn new(number: u32) -> Self {
        Self {
            number,
            has_records: false,
            staged: Vec::new(),
        }
    }
}

/// Layout components and the depth table built from frame 0.
#[derive(Debug, Default)]
struct Layout {
    components: Vec<ComponentSprite>,
    depths: HashMap<Depth, usize>,
}

pub struct AnimationReconstructor<'a> {
    stream: &'a TagStream,
    config: &'a RigConfig,
}

impl<'a> AnimationReconstructor<'a> {
    pub fn new(stream: &'a TagStream, config: &'a RigConfig) -> Self {
        Self { stream, config }
    }

    pub fn reconstruct(&self, model: &CharacterId) -> Result<ModelRig, FormatError> {
        let sprite = self.stream.sprite(model.as_str())?;

        let mut layout = Layout::default();
        let mut animations = Vec::new();
        let mut stats = ReconstructStats::default();
        let mut phase = Phase::NoAnimation;
        let mut frame = FrameAccumulator::new(0);

        for record in self.stream.timeline_of(sprite) {
            if *record.kind() == TagKind::ShowFrame {
                let next = FrameAccumulator::new(frame.number + 1);
                let closed = std::mem::replace(&mut frame, next);
                phase = close_frame(phase, closed, &mut animations);
                stats.frames += 1;
                continue;
            }

            if frame.number == 0 {
                self.read_layout_record(model, record, &mut layout, &mut stats)?;
                continue;
            }

            frame.has_records = true;
            match record.kind() {
                TagKind::FrameLabel => {
                    let name = record.require_attr("name")?;
                    if let Phase::InAnimation(done) = phase {
                        animations.push(done);
                    }
                    trace!("model {model}: animation '{name}' opens at frame {}", frame.number);
                    phase = Phase::InAnimation(Animation::new(name, frame.number));
                }
                TagKind::PlaceObject => {
                    self.stage_move(model, record, &layout, &mut frame, &mut stats)?;
                }
                _ => {}
            }
        }

        if let Phase::InAnimation(open) = phase {
            animations.push(open);
        }
        if !frame.staged.is_empty() {
            debug!(
                "model {model}: {} moves after the last frame boundary discarded",
                frame.staged.len()
            );
        }

        Ok(ModelRig {
            components: layout.components,
            animations,
            stats,
        })
    }

    fn read_layout_record(
        &self,
        model: &CharacterId,
        record: &TagRecord,
        layout: &mut Layout,
        stats: &mut ReconstructStats,
    ) -> Result<(), FormatError> {
        if *record.kind() != TagKind::PlaceObject {
            return Ok(());
        }
        let sprite_id = CharacterId::from(record.require_attr("characterId")?);
        let depth = Depth(record.int_attr("depth")?);

        if self.config.is_status_overlay(&sprite_id) {
            stats.excluded_overlays += 1;
            debug!("model {model}: status overlay {sprite_id} at depth {depth} excluded");
            return Ok(());
        }

        let transform = match self.stream.transform_of(record) {
            Some(matrix) => TransformMatrix::from_record(matrix)?,
            None => TransformMatrix::default(),
        };
        let shape_frames = match build_shape_frames(self.stream, &sprite_id) {
            Ok(frames) => frames,
            Err(FormatError::MissingSprite { .. }) => {
                stats.shapeless_components += 1;
                debug!("model {model}: component {sprite_id} at depth {depth} is not a sprite");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        if layout.depths.contains_key(&depth) {
            stats.shadowed_depths += 1;
            warn!("model {model}: depth {depth} placed twice on the layout frame (now {sprite_id})");
        }
        layout.depths.insert(depth, layout.components.len());
        layout.components.push(ComponentSprite {
            sprite_id,
            depth,
            transform,
            shape_frames,
        });
        Ok(())
    }

    fn stage_move(
        &self,
        model: &CharacterId,
        record: &TagRecord,
        layout: &Layout,
        frame: &mut FrameAccumulator,
        stats: &mut ReconstructStats,
    ) -> Result<(), FormatError> {
        // Morph-shape shadows and other bare placements carry no transform.
        let Some(matrix) = self.stream.transform_of(record) else {
            return Ok(());
        };
        let depth = Depth(record.int_attr("depth")?);
        if !layout.depths.contains_key(&depth) {
            stats.dropped_moves += 1;
            trace!(
                "model {model}: move at unknown depth {depth} on frame {} dropped",
                frame.number
            );
            return Ok(());
        }
        frame.staged.push(ComponentMove {
            depth,
            transform: TransformMatrix::from_record(matrix)?,
        });
        Ok(())
    }
}

fn close_frame(phase: Phase, frame: FrameAccumulator, finished: &mut Vec<Animation>) -> Phase {
    if frame.number == 0 {
        return phase;
    }
    match phase {
        Phase::NoAnimation => Phase::NoAnimation,
        Phase::InAnimation(animation) if !frame.has_records => {
            finished.push(animation);
            Phase::NoAnimation
        }
        Phase::InAnimation(mut animation) => {
            // A non-empty frame with nothing staged (e.g. only a label) records
            // nothing and keeps the animation open.
            if !frame.staged.is_empty() {
                animation.push_frame(frame.number, frame.staged);
            }
            Phase::InAnimation(animation)
        }
    }
}
