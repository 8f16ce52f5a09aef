//! Placement transforms: the raw fixed-point record and its decoding into output units.
//!
//! Raw matrices are what the rig model stores. Decoding happens only when a
//! result is exported, so a different scale factor never needs a new walk of
//! the tag stream.

use serde::{Deserialize, Serialize};

use crate::config::RigConfig;
use crate::error::FormatError;
use crate::tags::TagRecord;

/// Transform as stored on a placement: translation in twips, scale and
/// rotate/skew in 16.16 fixed point (zero when the matching flag is unset).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransformMatrix {
    pub translate_x: i32,
    pub translate_y: i32,
    pub has_scale: bool,
    pub has_rotate: bool,
    pub scale_x: i32,
    pub scale_y: i32,
    pub rotate_skew0: i32,
    pub rotate_skew1: i32,
}

impl TransformMatrix {
    /// Read a `MATRIX` record. Flags and the fields they guard are read together;
    /// a missing or misspelled flag is a format error.
    pub fn from_record(record: &TagRecord) -> Result<Self, FormatError> {
        let translate_x = record.int_attr("translateX")?;
        let translate_y = record.int_attr("translateY")?;

        let has_scale = record.flag_attr("hasScale")?;
        let (scale_x, scale_y) = if has_scale {
            (record.int_attr("scaleX")?, record.int_attr("scaleY")?)
        } else {
            (0, 0)
        };

        let has_rotate = record.flag_attr("hasRotate")?;
        let (rotate_skew0, rotate_skew1) = if has_rotate {
            (record.int_attr("rotateSkew0")?, record.int_attr("rotateSkew1")?)
        } else {
            (0, 0)
        };

        Ok(Self {
            translate_x,
            translate_y,
            has_scale,
            has_rotate,
            scale_x,
            scale_y,
            rotate_skew0,
            rotate_skew1,
        })
    }
}

/// Transform in output units. Field order is the export order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedTransform {
    pub scale_x: f64,
    pub rotate_skew0: f64,
    pub translate_x: f64,
    pub scale_y: f64,
    pub rotate_skew1: f64,
    pub translate_y: f64,
}

/// Fixed-point to output-unit conversion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformDecoder {
    global_scale_factor: f64,
}

impl TransformDecoder {
    /// 1.0 in 16.16 fixed point.
    pub const FIXED_ONE: f64 = 65536.0;
    pub const TWIPS_PER_UNIT: f64 = 20.0;

    pub fn new(global_scale_factor: f64) -> Self {
        Self {
            global_scale_factor,
        }
    }

    pub fn from_config(cfg: &RigConfig) -> Self {
        Self::new(cfg.global_scale_factor)
    }

    pub fn global_scale_factor(&self) -> f64 {
        self.global_scale_factor
    }

    /// Scale/rotate divide by 2^16; rotation is negated for the target's
    /// rotational sense. Translation goes twips -> units -> scaled, with Y
    /// flipped because the target's vertical axis points the other way.
    /// Negation is applied to the integer so a zero field never decodes to -0.0.
    pub fn decode(&self, m: &TransformMatrix) -> DecodedTransform {
        DecodedTransform {
            scale_x: f64::from(m.scale_x) / Self::FIXED_ONE,
            rotate_skew0: -i64::from(m.rotate_skew0) as f64 / Self::FIXED_ONE,
            translate_x: self.scale_translation(i64::from(m.translate_x)),
            scale_y: f64::from(m.scale_y) / Self::FIXED_ONE,
            rotate_skew1: -i64::from(m.rotate_skew1) as f64 / Self::FIXED_ONE,
            translate_y: self.scale_translation(-i64::from(m.translate_y)),
        }
    }

    fn scale_translation(&self, twips: i64) -> f64 {
        self.global_scale_factor * (1.0 / Self::TWIPS_PER_UNIT) * twips as f64
    }
}

impl Default for TransformDecoder {
    fn default() -> Self {
        Self::from_config(&RigConfig::default())
    }
}
