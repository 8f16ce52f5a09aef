//! Reconstruction configuration.

use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;

/// Settings shared by the decoder, the catalog builder and the asset tools.
///
/// Every field has a default matching the battle-model export, so a partial
/// JSON document is enough to override a single value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Scale applied to translations (and to imported texture sizes) to go from
    /// the source resolution to the target one.
    pub global_scale_factor: f64,
    /// Sprite placed on every model's layout frame for status UI; not part of the rig.
    pub status_overlay_sprite_id: Option<String>,
    /// Sprite whose frames list the models. `None` walks the document's top-level timeline.
    pub master_sprite_id: Option<String>,
    /// Instance name carried by the placement that references a frame's model.
    pub model_placement_name: String,
    /// Name given to a model whose master frame has no label.
    pub unnamed_model_name: String,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            global_scale_factor: 2.66,
            status_overlay_sprite_id: Some("2306".to_owned()),
            master_sprite_id: Some("5118".to_owned()),
            model_placement_name: "mdl".to_owned(),
            unnamed_model_name: "unnamed".to_owned(),
        }
    }
}

impl RigConfig {
    /// Validate basic invariants (finite, positive scale factor; non-empty marker name).
    pub fn validate(&self) -> Result<(), String> {
        if !self.global_scale_factor.is_finite() || self.global_scale_factor <= 0.0 {
            return Err(format!(
                "global_scale_factor must be a positive finite number, got {}",
                self.global_scale_factor
            ));
        }
        if self.model_placement_name.is_empty() {
            return Err("model_placement_name must not be empty".into());
        }
        Ok(())
    }

    pub fn is_status_overlay(&self, sprite: &CharacterId) -> bool {
        self.status_overlay_sprite_id.as_deref() == Some(sprite.as_str())
    }
}
