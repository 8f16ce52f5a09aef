//! Inlining of `<use>` references in per-shape SVG exports.
//!
//! Shapes exported through a sprite reference their geometry with
//! `<use xlink:href="#shapeN">` into `<defs>`, which the downstream importer
//! cannot follow. Each `use` under the document's first `g` becomes a `g`
//! (attributes kept) holding the matching shape group moved out of `<defs>`.

pub mod dom;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::AssetError;
use crate::sorted_files;
use dom::{Document, Element, Node};

/// What happened to one SVG document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InlineOutcome {
    /// `shapes` groups were moved into converted `use` elements. `uses` and
    /// `defined` are the counts found before pairing.
    Inlined {
        shapes: usize,
        uses: usize,
        defined: usize,
    },
    NoDefs,
    MultipleDefs(usize),
    NoUse,
}

impl InlineOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, InlineOutcome::Inlined { shapes, .. } if *shapes > 0)
    }
}

fn is_shape_group(el: &Element) -> bool {
    el.local_name() == "g" && el.attr("id").is_some_and(|id| id.starts_with("shape"))
}

/// Child-node indices from `el` to the first descendant matching `pred`
/// (pre-order), never entering elements for which `descend` is false.
fn find_path(
    el: &Element,
    pred: &dyn Fn(&Element) -> bool,
    descend: &dyn Fn(&Element) -> bool,
) -> Option<Vec<usize>> {
    for (idx, node) in el.children.iter().enumerate() {
        let Node::Element(child) = node else {
            continue;
        };
        if pred(child) {
            return Some(vec![idx]);
        }
        if descend(child) {
            if let Some(mut rest) = find_path(child, pred, descend) {
                rest.insert(0, idx);
                return Some(rest);
            }
        }
    }
    None
}

fn at_path<'a>(mut el: &'a Element, path: &[usize]) -> Option<&'a Element> {
    for &idx in path {
        el = match el.children.get(idx)? {
            Node::Element(child) => child,
            Node::Other(_) => return None,
        };
    }
    Some(el)
}

fn at_path_mut<'a>(mut el: &'a mut Element, path: &[usize]) -> Option<&'a mut Element> {
    for &idx in path {
        el = match el.children.get_mut(idx)? {
            Node::Element(child) => child,
            Node::Other(_) => return None,
        };
    }
    Some(el)
}

fn count_shapes(el: &Element) -> usize {
    el.elements()
        .map(|child| {
            if is_shape_group(child) {
                1
            } else {
                count_shapes(child)
            }
        })
        .sum()
}

/// Detach up to `limit` shape groups below `el`, in document order.
fn take_shapes(el: &mut Element, limit: usize, out: &mut Vec<Element>) {
    let mut idx = 0;
    while idx < el.children.len() && out.len() < limit {
        let is_shape = matches!(&el.children[idx], Node::Element(child) if is_shape_group(child));
        if is_shape {
            if let Node::Element(shape) = el.children.remove(idx) {
                out.push(shape);
            }
            continue;
        }
        if let Node::Element(child) = &mut el.children[idx] {
            take_shapes(child, limit, out);
        }
        idx += 1;
    }
}

/// Turn `use` elements below `el` into groups holding the next shape, until
/// `shapes` runs out.
fn convert_uses(el: &mut Element, shapes: &mut std::vec::IntoIter<Element>) {
    for child in el.elements_mut() {
        if shapes.len() == 0 {
            return;
        }
        if child.local_name() == "use" {
            if let Some(shape) = shapes.next() {
                child.rename("g");
                child.push_element(shape);
            }
        } else {
            convert_uses(child, shapes);
        }
    }
}

/// Inline shape definitions into their `use` sites, in place.
pub fn inline_document(doc: &mut Document) -> Result<InlineOutcome, AssetError> {
    let root = doc
        .root_mut()
        .ok_or_else(|| AssetError::Svg("document has no root element".into()))?;

    let defs_count = root
        .descendants()
        .iter()
        .filter(|el| el.local_name() == "defs")
        .count();
    match defs_count {
        0 => return Ok(InlineOutcome::NoDefs),
        1 => {}
        n => return Ok(InlineOutcome::MultipleDefs(n)),
    }
    let Some(defs_path) = find_path(root, &|el| el.local_name() == "defs", &|_| true) else {
        return Ok(InlineOutcome::NoDefs);
    };
    let Some(group_path) = find_path(
        root,
        &|el| el.local_name() == "g",
        &|el| el.local_name() != "defs",
    ) else {
        return Ok(InlineOutcome::NoUse);
    };

    let uses = at_path(root, &group_path)
        .map(|group| {
            group
                .descendants()
                .iter()
                .filter(|el| el.local_name() == "use")
                .count()
        })
        .unwrap_or(0);
    if uses == 0 {
        return Ok(InlineOutcome::NoUse);
    }
    let defined = at_path(root, &defs_path).map(count_shapes).unwrap_or(0);

    let mut shapes = Vec::new();
    if let Some(defs) = at_path_mut(root, &defs_path) {
        take_shapes(defs, uses.min(defined), &mut shapes);
    }
    let moved = shapes.len();
    if let Some(group) = at_path_mut(root, &group_path) {
        convert_uses(group, &mut shapes.into_iter());
    }

    Ok(InlineOutcome::Inlined {
        shapes: moved,
        uses,
        defined,
    })
}

/// Inline an SVG held in memory. The text is returned unchanged when nothing
/// was inlined.
pub fn inline_svg_str(text: &str) -> Result<(String, InlineOutcome), AssetError> {
    let mut doc = Document::parse(text)?;
    let outcome = inline_document(&mut doc)?;
    if outcome.changed() {
        Ok((doc.to_xml_string()?, outcome))
    } else {
        Ok((text.to_owned(), outcome))
    }
}

/// Inline one SVG file, rewriting it in place when anything changed.
pub fn inline_svg_file(path: impl AsRef<Path>) -> Result<InlineOutcome, AssetError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(AssetError::io(path))?;
    let (inlined, outcome) = inline_svg_str(&text)?;

    match outcome {
        InlineOutcome::NoDefs => warn!("{}: no <defs>, skipped", path.display()),
        InlineOutcome::MultipleDefs(n) => warn!("{}: {n} <defs> elements, skipped", path.display()),
        InlineOutcome::NoUse => warn!("{}: no <use> element, skipped", path.display()),
        InlineOutcome::Inlined {
            shapes,
            uses,
            defined,
        } => {
            if uses != defined {
                warn!(
                    "{}: {uses} <use> elements for {defined} shape definitions; pairing the first {shapes}",
                    path.display()
                );
            }
        }
    }
    if outcome.changed() {
        fs::write(path, inlined).map_err(AssetError::io(path))?;
    }
    Ok(outcome)
}

/// Inline every `*.svg` in `dir`, sorted by name.
pub fn inline_svg_folder(dir: impl AsRef<Path>) -> Result<Vec<(PathBuf, InlineOutcome)>, AssetError> {
    let dir = dir.as_ref();
    let mut results = Vec::new();
    for path in sorted_files(dir, ".svg")? {
        let outcome = inline_svg_file(&path)?;
        results.push((path, outcome));
    }
    let changed = results.iter().filter(|(_, o)| o.changed()).count();
    info!("{}: {changed} of {} SVGs inlined", dir.display(), results.len());
    Ok(results)
}
