//! Reconstructed rig model.
//!
//! Everything here is produced in a single pass over the tag stream and is not
//! mutated afterwards. Transforms stay raw; see [`crate::export`] for decoding.

use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, Depth};
use crate::matrix::TransformMatrix;

/// One non-filler frame of a component's sub-timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentShapeFrame {
    /// Label pending when the frame closed; empty if none.
    pub label: String,
    /// Shape placed on the frame. Resolved to an asset outside the core.
    pub shape_id: CharacterId,
    /// 1-based and dense across the component's emitted frames.
    pub sequence_index: u32,
}

/// A component (limb, torso, ...) placed on a model's layout frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSprite {
    pub sprite_id: CharacterId,
    /// Unique within one model's layout; the join key for animation moves.
    pub depth: Depth,
    pub transform: TransformMatrix,
    pub shape_frames: Vec<ComponentShapeFrame>,
}

/// Transform of one component on one frame (not cumulative).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMove {
    pub depth: Depth,
    pub transform: TransformMatrix,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationFrame {
    /// Frame counter within the model sub-timeline (the layout frame is 0).
    pub frame_number: u32,
    /// `frame_number - start_frame` of the owning animation.
    pub relative_frame_number: u32,
    pub moves: Vec<ComponentMove>,
}

/// A labelled run of frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub start_frame: u32,
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    pub fn new(name: impl Into<String>, start_frame: u32) -> Self {
        Self {
            name: name.into(),
            start_frame,
            frames: Vec::new(),
        }
    }

    /// Append the moves recorded on `frame_number`.
    pub fn push_frame(&mut self, frame_number: u32, moves: Vec<ComponentMove>) {
        self.frames.push(AnimationFrame {
            frame_number,
            relative_frame_number: frame_number.saturating_sub(self.start_frame),
            moves,
        });
    }
}

/// One model: its layout components plus named animations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Last label of the master frame, or the configured unnamed sentinel.
    pub name: String,
    /// Every label of the master frame, in order.
    pub labels: Vec<String>,
    pub sprite_id: CharacterId,
    /// 1-based position in the master timeline.
    pub frame_number: u32,
    pub components: Vec<ComponentSprite>,
    pub animations: Vec<Animation>,
}

impl ModelEntry {
    /// Every shape id referenced by the model's components, in layout order.
    pub fn shape_ids(&self) -> impl Iterator<Item = &CharacterId> {
        self.components
            .iter()
            .flat_map(|c| c.shape_frames.iter().map(|f| &f.shape_id))
    }
}
