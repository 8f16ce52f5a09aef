//! Removes vector shape definitions from a tag export.
//!
//! Shapes are consumed as separately exported SVGs, so their definitions in the
//! XML are dead weight for the reconstruction. The export is streamed through
//! unchanged except for the dropped `<item>` subtrees.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use spriterig_core::tags::ITEM_ELEMENT;

use crate::error::AssetError;

/// `true` for the discriminants of shape and morph-shape definitions.
pub fn is_shape_definition(kind: &str) -> bool {
    kind.ends_with("Tag") && (kind.starts_with("DefineShape") || kind.starts_with("DefineMorphShape"))
}

fn is_shape_item(start: &BytesStart<'_>) -> Result<bool, AssetError> {
    if start.local_name().as_ref() != ITEM_ELEMENT.as_bytes() {
        return Ok(false);
    }
    for attribute in start.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == b"type" {
            let kind = attribute.unescape_value()?;
            return Ok(is_shape_definition(&kind));
        }
    }
    Ok(false)
}

/// Copy `input` to `output`, omitting every shape definition item.
/// Returns the number of items removed.
pub fn strip_shape_definitions<R: BufRead, W: Write>(
    input: R,
    output: W,
) -> Result<usize, AssetError> {
    let mut reader = Reader::from_reader(input);
    let mut writer = Writer::new(output);
    let mut buf = Vec::new();
    let mut skipped = Vec::new();
    let mut removed = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) if is_shape_item(&start)? => {
                let end = start.to_end().into_owned();
                reader.read_to_end_into(end.name(), &mut skipped)?;
                skipped.clear();
                removed += 1;
            }
            Event::Empty(start) if is_shape_item(&start)? => removed += 1,
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
        buf.clear();
    }

    debug!("stripped {removed} shape definitions");
    Ok(removed)
}

/// File-to-file variant of [`strip_shape_definitions`].
pub fn strip_shape_definitions_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> Result<usize, AssetError> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let reader = BufReader::new(File::open(input).map_err(AssetError::io(input))?);
    let mut writer = BufWriter::new(File::create(output).map_err(AssetError::io(output))?);
    let removed = strip_shape_definitions(reader, &mut writer)?;
    writer.flush().map_err(AssetError::io(output))?;
    info!(
        "{}: {removed} shape definitions removed, written to {}",
        input.display(),
        output.display()
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_discriminants() {
        assert!(is_shape_definition("DefineShapeTag"));
        assert!(is_shape_definition("DefineShape4Tag"));
        assert!(is_shape_definition("DefineMorphShape2Tag"));
        assert!(!is_shape_definition("DefineSpriteTag"));
        assert!(!is_shape_definition("DefineShape"));
    }
}
