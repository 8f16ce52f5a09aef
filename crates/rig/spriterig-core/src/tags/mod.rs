//! Tag stream index.
//!
//! The exported timeline is a tree of string-discriminated records. It is held
//! as an arena in document order: every record knows its children by
//! [`RecordId`] and the end of its own subtree, so both "ordered children" and
//! "everything below" are plain slices. Records are immutable once built.

use std::ops::Index;
use std::str::FromStr;

use hashbrown::HashMap;

use crate::error::{FormatError, LoadError};
use crate::ids::RecordId;

pub mod xml;

/// Element name of a tag record in the export.
pub const ITEM_ELEMENT: &str = "item";
/// Element wrapping the nested records of a sprite definition.
pub const SUB_TAGS_ELEMENT: &str = "subTags";

/// Discriminant of a tag record.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Sub-timeline definition (`DefineSpriteTag`).
    DefineSprite,
    /// Object placement (`PlaceObjectTag` .. `PlaceObject4Tag`).
    PlaceObject,
    /// Frame label (`FrameLabelTag`).
    FrameLabel,
    /// Frame boundary (`ShowFrameTag`).
    ShowFrame,
    /// Transform child of a placement (`type="MATRIX"`).
    Matrix,
    Other(String),
}

impl TagKind {
    pub fn from_discriminant(value: &str) -> Self {
        match value {
            "DefineSpriteTag" => Self::DefineSprite,
            "PlaceObjectTag" | "PlaceObject2Tag" | "PlaceObject3Tag" | "PlaceObject4Tag" => {
                Self::PlaceObject
            }
            "FrameLabelTag" => Self::FrameLabel,
            "ShowFrameTag" => Self::ShowFrame,
            "MATRIX" => Self::Matrix,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::DefineSprite => "DefineSpriteTag",
            Self::PlaceObject => "PlaceObjectTag",
            Self::FrameLabel => "FrameLabelTag",
            Self::ShowFrame => "ShowFrameTag",
            Self::Matrix => "MATRIX",
            Self::Other(name) => name,
        }
    }
}

/// One node of the exported timeline tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TagRecord {
    id: RecordId,
    element: String,
    kind: TagKind,
    attributes: Vec<(String, String)>,
    parent: Option<RecordId>,
    children: Vec<RecordId>,
    subtree_end: u32,
}

impl TagRecord {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<RecordId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[RecordId] {
        &self.children
    }

    /// `true` for `<item>` records, the actual timeline tags.
    pub fn is_item(&self) -> bool {
        self.element == ITEM_ELEMENT
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn require_attr(&self, key: &str) -> Result<&str, FormatError> {
        self.attr(key).ok_or_else(|| FormatError::MissingAttribute {
            record: self.id,
            kind: self.kind.as_str().to_owned(),
            attribute: key.to_owned(),
        })
    }

    /// Required integer attribute.
    pub fn int_attr<T: FromStr>(&self, key: &str) -> Result<T, FormatError> {
        let raw = self.require_attr(key)?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| FormatError::InvalidInteger {
                record: self.id,
                kind: self.kind.as_str().to_owned(),
                attribute: key.to_owned(),
                value: raw.to_owned(),
            })
    }

    /// Required boolean attribute spelled exactly `"true"` or `"false"`.
    pub fn flag_attr(&self, key: &str) -> Result<bool, FormatError> {
        match self.require_attr(key)? {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(FormatError::InvalidFlag {
                record: self.id,
                kind: self.kind.as_str().to_owned(),
                attribute: key.to_owned(),
                value: other.to_owned(),
            }),
        }
    }
}

/// Read-only, document-ordered index over the tag records.
#[derive(Clone, Debug, Default)]
pub struct TagStream {
    records: Vec<TagRecord>,
    sprites: HashMap<String, RecordId>,
}

impl Index<RecordId> for TagStream {
    type Output = TagRecord;

    fn index(&self, id: RecordId) -> &Self::Output {
        &self.records[id.index()]
    }
}

impl TagStream {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&TagRecord> {
        self.records.get(id.index())
    }

    pub fn root(&self) -> Option<&TagRecord> {
        self.records.first()
    }

    /// All records in document order.
    pub fn iter(&self) -> impl Iterator<Item = &TagRecord> {
        self.records.iter()
    }

    /// Records matching `predicate`, in document order.
    pub fn find_all<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = &'a TagRecord> + 'a
    where
        P: FnMut(&TagRecord) -> bool + 'a,
    {
        self.records.iter().filter(move |r| predicate(*r))
    }

    /// Direct children of `record`, in document order.
    pub fn children_of<'a>(
        &'a self,
        record: &'a TagRecord,
    ) -> impl Iterator<Item = &'a TagRecord> + 'a {
        record.children.iter().map(move |&id| &self[id])
    }

    /// Every record below `record`, in document order.
    pub fn descendants_of<'a>(&'a self, record: &'a TagRecord) -> &'a [TagRecord] {
        &self.records[record.id.index() + 1..record.subtree_end as usize]
    }

    /// First sprite definition carrying `spriteId == sprite_id`.
    pub fn sprite(&self, sprite_id: &str) -> Result<&TagRecord, FormatError> {
        self.sprites
            .get(sprite_id)
            .map(|&id| &self[id])
            .ok_or_else(|| FormatError::MissingSprite {
                sprite_id: sprite_id.to_owned(),
            })
    }

    /// Ordered tag items of a sprite's sub-timeline (the items under its `subTags`).
    pub fn timeline_of<'a>(
        &'a self,
        sprite: &'a TagRecord,
    ) -> impl Iterator<Item = &'a TagRecord> + 'a {
        self.children_of(sprite)
            .flat_map(move |child| {
                let nested: &'a [RecordId] = if child.element == SUB_TAGS_ELEMENT {
                    &child.children
                } else {
                    std::slice::from_ref(&child.id)
                };
                nested.iter().map(move |&id| &self[id])
            })
            .filter(|record| record.is_item())
    }

    /// Items not nested inside another item: the document's own timeline.
    pub fn top_level_timeline(&self) -> Result<Vec<&TagRecord>, FormatError> {
        if self.records.is_empty() {
            return Err(FormatError::MissingRootTimeline);
        }
        let mut items = Vec::new();
        let mut idx = 0;
        while idx < self.records.len() {
            let record = &self.records[idx];
            if record.is_item() {
                items.push(record);
                idx = record.subtree_end as usize;
            } else {
                idx += 1;
            }
        }
        if items.is_empty() {
            return Err(FormatError::MissingRootTimeline);
        }
        Ok(items)
    }

    /// Transform child of a placement, if the placement carries one.
    pub fn transform_of<'a>(&'a self, placement: &'a TagRecord) -> Option<&'a TagRecord> {
        if placement.attr("placeFlagHasMatrix") == Some("false") {
            return None;
        }
        self.children_of(placement)
            .find(|child| child.kind == TagKind::Matrix)
    }
}

/// Incremental builder used by the XML loader and by tests.
#[derive(Debug, Default)]
pub struct TagStreamBuilder {
    records: Vec<TagRecord>,
    open: Vec<RecordId>,
    sprites: HashMap<String, RecordId>,
}

impl TagStreamBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a record as the last child of the currently open one.
    pub fn open<I, K, V>(&mut self, element: &str, attributes: I) -> RecordId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = RecordId(self.records.len() as u32);
        let mut attrs: Vec<(String, String)> = Vec::new();
        for (key, value) in attributes {
            let (key, value) = (key.into(), value.into());
            match attrs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => attrs.push((key, value)),
            }
        }
        let kind = attrs
            .iter()
            .find(|(k, _)| k == "type")
            .map(|(_, v)| TagKind::from_discriminant(v))
            .unwrap_or_else(|| TagKind::Other(element.to_owned()));
        if kind == TagKind::DefineSprite {
            if let Some((_, sprite_id)) = attrs.iter().find(|(k, _)| k == "spriteId") {
                self.sprites.entry(sprite_id.clone()).or_insert(id);
            }
        }
        let parent = self.open.last().copied();
        if let Some(parent) = parent {
            self.records[parent.index()].children.push(id);
        }
        self.records.push(TagRecord {
            id,
            element: element.to_owned(),
            kind,
            attributes: attrs,
            parent,
            children: Vec::new(),
            subtree_end: id.0 + 1,
        });
        self.open.push(id);
        id
    }

    /// Close the most recently opened record.
    pub fn close(&mut self) -> Result<RecordId, LoadError> {
        let id = self
            .open
            .pop()
            .ok_or_else(|| LoadError::Unbalanced("close without an open record".into()))?;
        self.records[id.index()].subtree_end = self.records.len() as u32;
        Ok(id)
    }

    /// Open and immediately close a childless record.
    pub fn leaf<I, K, V>(&mut self, element: &str, attributes: I) -> RecordId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = self.open(element, attributes);
        self.open.pop();
        id
    }

    pub fn finish(self) -> Result<TagStream, LoadError> {
        if let Some(&id) = self.open.last() {
            return Err(LoadError::Unbalanced(format!(
                "record {id} <{}> is never closed",
                self.records[id.index()].element
            )));
        }
        if self.records.is_empty() {
            return Err(LoadError::Empty);
        }
        Ok(TagStream {
            records: self.records,
            sprites: self.sprites,
        })
    }
}
