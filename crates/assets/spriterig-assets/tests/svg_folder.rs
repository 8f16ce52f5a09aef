use std::fs;
use std::path::Path;

use spriterig_assets::{inline_svg_folder, patch_texture_sizes, InlineOutcome};
use spriterig_test_fixtures::svgs;
use tempfile::tempdir;

const META: &str = "fileFormatVersion: 2\nguid: 0f6c\nScriptedImporter:\n  svgType: 1\n  textureSize: 256\n  svgPixelsPerUnit: 100\n";

fn stage(dir: &Path, name: &str, file: &str) {
    fs::write(dir.join(file), svgs::text(name).unwrap()).unwrap();
    fs::write(dir.join(format!("{file}.meta")), META).unwrap();
}

#[test]
fn folder_inlining_rewrites_only_convertible_files() {
    let dir = tempdir().unwrap();
    stage(dir.path(), "use-reference", "101.svg");
    stage(dir.path(), "no-defs", "102.svg");
    fs::write(dir.path().join("notes.txt"), "not an svg").unwrap();
    let untouched = svgs::text("no-defs").unwrap();

    let results = inline_svg_folder(dir.path()).unwrap();
    let names: Vec<_> = results
        .iter()
        .map(|(path, _)| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["101.svg", "102.svg"]);
    assert_eq!(
        results[0].1,
        InlineOutcome::Inlined {
            shapes: 1,
            uses: 1,
            defined: 1
        }
    );
    assert_eq!(results[1].1, InlineOutcome::NoDefs);

    let inlined = fs::read_to_string(dir.path().join("101.svg")).unwrap();
    assert!(!inlined.contains("<use"));
    assert!(inlined.contains("<g ffdec:characterId=\"101\""));
    let defs_at = inlined.find("<defs>").unwrap();
    assert!(inlined.find("id=\"shape0\"").unwrap() < defs_at);
    assert_eq!(fs::read_to_string(dir.path().join("102.svg")).unwrap(), untouched);

    // a second pass finds nothing left to inline
    let again = inline_svg_folder(dir.path()).unwrap();
    assert_eq!(again[0].1, InlineOutcome::NoUse);
}

#[test]
fn texture_sizes_follow_the_svg_dimensions() {
    let dir = tempdir().unwrap();
    stage(dir.path(), "use-reference", "101.svg");
    stage(dir.path(), "no-defs", "102.svg");

    let patches = patch_texture_sizes(dir.path(), 2.66).unwrap();
    let sizes: Vec<_> = patches.iter().map(|p| (p.texture_size, p.replaced)).collect();
    assert_eq!(sizes, [(108, 1), (32, 1)]);

    let meta = fs::read_to_string(dir.path().join("101.svg.meta")).unwrap();
    assert!(meta.contains("  textureSize: 108\n"));
    assert!(meta.contains("svgPixelsPerUnit: 100\n"));

    let patches = patch_texture_sizes(dir.path(), 1.0).unwrap();
    assert_eq!(patches[0].texture_size, 40);
}

#[test]
fn unreadable_dimensions_leave_the_meta_alone() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("5.svg"), "<svg width=\"auto\" height=\"10px\"/>").unwrap();
    fs::write(dir.path().join("5.svg.meta"), META).unwrap();

    let patches = patch_texture_sizes(dir.path(), 2.66).unwrap();
    assert!(patches.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("5.svg.meta")).unwrap(), META);
}
