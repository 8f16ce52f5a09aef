mod common;

use common::StreamBuilder;
use spriterig_core::{build_shape_frames, CharacterId, FormatError};

fn frames_of(build: impl FnOnce(&mut common::Timeline<'_>)) -> Vec<(String, String, u32)> {
    let mut b = StreamBuilder::new();
    b.sprite("1", build);
    let stream = b.finish();
    build_shape_frames(&stream, &CharacterId::from("1"))
        .unwrap()
        .into_iter()
        .map(|f| (f.label, f.shape_id.0, f.sequence_index))
        .collect()
}

fn owned(expected: &[(&str, &str, u32)]) -> Vec<(String, String, u32)> {
    expected
        .iter()
        .map(|&(l, s, i)| (l.to_owned(), s.to_owned(), i))
        .collect()
}

#[test]
fn filler_frames_emit_nothing_and_keep_the_label() {
    let frames = frames_of(|t| {
        t.label("forest")
            .show()
            .show()
            .place(1, Some("11"), None)
            .show()
            .place(1, Some("12"), None)
            .show();
    });
    assert_eq!(frames, owned(&[("forest", "11", 1), ("", "12", 2)]));
}

#[test]
fn latest_label_and_shape_win_within_a_frame() {
    let frames = frames_of(|t| {
        t.label("a")
            .label("b")
            .place(1, Some("11"), None)
            .place(2, Some("12"), None)
            .show();
    });
    assert_eq!(frames, owned(&[("b", "12", 1)]));
}

#[test]
fn moves_without_a_character_do_not_emit() {
    let frames = frames_of(|t| {
        t.place(1, Some("11"), None)
            .show()
            .place(1, None, Some(Default::default()))
            .show()
            .place(1, Some("13"), None)
            .show();
    });
    assert_eq!(frames, owned(&[("", "11", 1), ("", "13", 2)]));
}

#[test]
fn sequence_indices_are_dense() {
    let frames = frames_of(|t| {
        for i in 0..20 {
            if i % 3 == 0 {
                t.show();
            } else {
                t.place(1, Some(i.to_string().as_str()), None).show();
            }
        }
    });
    let indices: Vec<u32> = frames.iter().map(|f| f.2).collect();
    let expected: Vec<u32> = (1..=frames.len() as u32).collect();
    assert_eq!(indices, expected);
    assert_eq!(frames.len(), 13);
}

#[test]
fn unknown_component_is_a_format_error() {
    let stream = StreamBuilder::new().finish();
    let err = build_shape_frames(&stream, &CharacterId::from("77")).unwrap_err();
    assert_eq!(
        err,
        FormatError::MissingSprite {
            sprite_id: "77".into()
        }
    );
}
