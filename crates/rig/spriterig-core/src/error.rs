//! Error types for tag-stream loading and rig reconstruction.

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

use crate::ids::RecordId;

/// A required record, attribute, or flag is missing or malformed.
///
/// Fatal for the record or model being processed; the catalog walk reports it
/// and carries on with the next model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("no sprite definition with spriteId {sprite_id}")]
    MissingSprite { sprite_id: String },

    #[error("tag stream has no root timeline")]
    MissingRootTimeline,

    #[error("{kind} record {record} has no '{attribute}' attribute")]
    MissingAttribute {
        record: RecordId,
        kind: String,
        attribute: String,
    },

    #[error("{kind} record {record}: '{attribute}' must be \"true\" or \"false\", found {value:?}")]
    InvalidFlag {
        record: RecordId,
        kind: String,
        attribute: String,
        value: String,
    },

    #[error("{kind} record {record}: '{attribute}' is not a valid integer: {value:?}")]
    InvalidInteger {
        record: RecordId,
        kind: String,
        attribute: String,
        value: String,
    },
}

/// Errors produced while reading an XML tag export into a [`crate::TagStream`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute error: {0}")]
    Attribute(#[from] AttrError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unbalanced tag stream: {0}")]
    Unbalanced(String),

    #[error("tag stream contains no records")]
    Empty,
}
