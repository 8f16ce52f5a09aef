#![allow(dead_code)]

use spriterig_core::{TagStream, TagStreamBuilder};

const NO_ATTRS: [(&str, &str); 0] = [];

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9
}

/// Raw `MATRIX` attributes; `None` scale/rotate means the flag is unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawMatrix {
    pub translate: (i32, i32),
    pub scale: Option<(i32, i32)>,
    pub rotate: Option<(i32, i32)>,
}

impl RawMatrix {
    pub fn translate(x: i32, y: i32) -> Self {
        Self {
            translate: (x, y),
            ..Self::default()
        }
    }

    pub fn scaled(mut self, sx: i32, sy: i32) -> Self {
        self.scale = Some((sx, sy));
        self
    }

    pub fn rotated(mut self, r0: i32, r1: i32) -> Self {
        self.rotate = Some((r0, r1));
        self
    }

    fn attributes(&self) -> Vec<(String, String)> {
        let (sx, sy) = self.scale.unwrap_or((0, 0));
        let (r0, r1) = self.rotate.unwrap_or((0, 0));
        vec![
            ("type".into(), "MATRIX".into()),
            ("hasScale".into(), self.scale.is_some().to_string()),
            ("hasRotate".into(), self.rotate.is_some().to_string()),
            ("scaleX".into(), sx.to_string()),
            ("scaleY".into(), sy.to_string()),
            ("rotateSkew0".into(), r0.to_string()),
            ("rotateSkew1".into(), r1.to_string()),
            ("translateX".into(), self.translate.0.to_string()),
            ("translateY".into(), self.translate.1.to_string()),
        ]
    }
}

/// Builds a tag stream shaped like the XML export: `swf > tags > item*`.
pub struct StreamBuilder {
    inner: TagStreamBuilder,
}

impl StreamBuilder {
    pub fn new() -> Self {
        let mut inner = TagStreamBuilder::new();
        inner.open("swf", NO_ATTRS);
        inner.open("tags", NO_ATTRS);
        Self { inner }
    }

    /// Define sprite `id`; `body` writes its sub-timeline.
    pub fn sprite(&mut self, id: &str, body: impl FnOnce(&mut Timeline<'_>)) -> &mut Self {
        self.inner
            .open("item", [("type", "DefineSpriteTag"), ("spriteId", id)]);
        self.inner.open("subTags", NO_ATTRS);
        body(&mut Timeline {
            inner: &mut self.inner,
        });
        self.inner.close().unwrap();
        self.inner.close().unwrap();
        self
    }

    /// Write items directly on the document's top-level timeline.
    pub fn top_level(&mut self, body: impl FnOnce(&mut Timeline<'_>)) -> &mut Self {
        body(&mut Timeline {
            inner: &mut self.inner,
        });
        self
    }

    pub fn finish(mut self) -> TagStream {
        self.inner.close().unwrap();
        self.inner.close().unwrap();
        self.inner.finish().unwrap()
    }
}

pub struct Timeline<'a> {
    inner: &'a mut TagStreamBuilder,
}

impl Timeline<'_> {
    pub fn label(&mut self, name: &str) -> &mut Self {
        self.inner
            .leaf("item", [("type", "FrameLabelTag"), ("name", name)]);
        self
    }

    pub fn show(&mut self) -> &mut Self {
        self.inner.leaf("item", [("type", "ShowFrameTag")]);
        self
    }

    /// Placement of `character` at `depth` (a new object when `character` is set, a move otherwise).
    pub fn place(&mut self, depth: u16, character: Option<&str>, matrix: Option<RawMatrix>) -> &mut Self {
        self.place_with(depth, character, None, matrix)
    }

    pub fn place_named(&mut self, depth: u16, character: &str, name: &str) -> &mut Self {
        self.place_with(depth, Some(character), Some(name), Some(RawMatrix::default()))
    }

    pub fn place_with(
        &mut self,
        depth: u16,
        character: Option<&str>,
        name: Option<&str>,
        matrix: Option<RawMatrix>,
    ) -> &mut Self {
        let mut attrs: Vec<(String, String)> = vec![
            ("type".into(), "PlaceObject2Tag".into()),
            ("depth".into(), depth.to_string()),
            ("placeFlagHasMatrix".into(), matrix.is_some().to_string()),
        ];
        if let Some(character) = character {
            attrs.push(("characterId".into(), character.into()));
        }
        if let Some(name) = name {
            attrs.push(("name".into(), name.into()));
        }
        self.inner.open("item", attrs);
        if let Some(matrix) = matrix {
            self.inner.leaf("matrix", matrix.attributes());
        }
        self.inner.close().unwrap();
        self
    }

    /// New object at `depth` whose matrix carries exactly `matrix` as attributes.
    pub fn place_raw(&mut self, depth: u16, character: &str, matrix: &[(&str, &str)]) -> &mut Self {
        self.inner.open(
            "item",
            [
                ("type", "PlaceObject2Tag"),
                ("depth", depth.to_string().as_str()),
                ("characterId", character),
                ("placeFlagHasMatrix", "true"),
            ],
        );
        self.inner.leaf("matrix", matrix.iter().copied());
        self.inner.close().unwrap();
        self
    }

    /// Any record that is neither a label, a placement nor a frame boundary.
    pub fn other(&mut self, kind: &str) -> &mut Self {
        self.inner.leaf("item", [("type", kind)]);
        self
    }
}
