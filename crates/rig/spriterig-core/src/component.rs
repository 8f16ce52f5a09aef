//! Component sprites: the ordered shape frames of one component's sub-timeline.

use log::trace;

use crate::data::ComponentShapeFrame;
use crate::error::FormatError;
use crate::ids::CharacterId;
use crate::tags::{TagKind, TagStream};

/// Scan a component sprite and emit one [`ComponentShapeFrame`] per frame that
/// placed a shape. Frames without a placement are filler: they emit nothing,
/// consume no sequence index, and leave a pending label in place for the next
/// emitted frame.
pub fn build_shape_frames(
    stream: &TagStream,
    sprite_id: &CharacterId,
) -> Result<Vec<ComponentShapeFrame>, FormatError> {
    let sprite = stream.sprite(sprite_id.as_str())?;

    let mut frames: Vec<ComponentShapeFrame> = Vec::new();
    let mut pending_label = String::new();
    let mut pending_shape: Option<CharacterId> = None;

    for record in stream.timeline_of(sprite) {
        match record.kind() {
            TagKind::FrameLabel => {
                pending_label = record.require_attr("name")?.to_owned();
            }
            TagKind::PlaceObject => {
                // Placements without a character only move what is already there.
                if let Some(shape) = record.attr("characterId") {
                    pending_shape = Some(CharacterId::from(shape));
                }
            }
            TagKind::ShowFrame => {
                if let Some(shape_id) = pending_shape.take() {
                    frames.push(ComponentShapeFrame {
                        label: std::mem::take(&mut pending_label),
                        shape_id,
                        sequence_index: frames.len() as u32 + 1,
                    });
                }
            }
            _ => {}
        }
    }

    trace!("component {sprite_id}: {} shape frames", frames.len());
    Ok(frames)
}
