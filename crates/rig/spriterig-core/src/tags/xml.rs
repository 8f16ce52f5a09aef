//! Streaming reader for the XML tag export.
//!
//! One pass over the document with `quick-xml`; each element becomes a record
//! in the arena, text content is dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{TagStream, TagStreamBuilder};
use crate::error::LoadError;

/// Load a tag export from disk.
pub fn load_tag_stream(path: impl AsRef<Path>) -> Result<TagStream, LoadError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let stream = read_tag_stream(BufReader::new(file))?;
    debug!("loaded {} tag records from {}", stream.len(), path.display());
    Ok(stream)
}

/// Parse a tag export held in memory.
pub fn parse_tag_stream_str(xml: &str) -> Result<TagStream, LoadError> {
    read_tag_stream(xml.as_bytes())
}

/// Read a tag export from any buffered reader.
pub fn read_tag_stream<R: BufRead>(input: R) -> Result<TagStream, LoadError> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut builder = TagStreamBuilder::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let (name, attributes) = element_parts(&start)?;
                builder.open(&name, attributes);
            }
            Event::Empty(start) => {
                let (name, attributes) = element_parts(&start)?;
                builder.leaf(&name, attributes);
            }
            Event::End(_) => {
                builder.close()?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    builder.finish()
}

fn element_parts(start: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), LoadError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok((name, attributes))
}
