mod common;

use common::approx;
use serde_json::{json, Value};
use spriterig_core::{build_catalog, parse_tag_stream_str, ResultSerializer, RigConfig};
use spriterig_test_fixtures::tag_streams;

fn catalog(cfg: &RigConfig) -> Vec<spriterig_core::ModelEntry> {
    let stream = parse_tag_stream_str(&tag_streams::xml("battle-models").unwrap()).unwrap();
    build_catalog(&stream, cfg).unwrap().models
}

fn number(v: &Value) -> f64 {
    v.as_f64().expect("number")
}

#[test]
fn model_objects_use_the_import_schema() {
    let cfg = RigConfig::default();
    let models = catalog(&cfg);
    let value = ResultSerializer::from_config(&cfg).to_value(&models).unwrap();

    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 2);
    let fish = &array[0];
    let keys: Vec<_> = fish.as_object().unwrap().keys().cloned().collect();
    for key in ["name", "labels", "spriteNumber", "frameNumber", "components", "animations"] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
    assert_eq!(fish["name"], "Forest Fish");
    assert_eq!(fish["spriteNumber"], "300");
    assert_eq!(fish["frameNumber"], 1);

    let tail = &fish["components"][0];
    assert_eq!(tail["spriteNumber"], "200");
    assert_eq!(tail["depth"], "1");
    assert_eq!(
        tail["shapes"],
        json!([
            { "shapeNumber": "101", "label": "forest" },
            { "shapeNumber": "102", "label": "ice" }
        ])
    );
    let matrix = &tail["transformMatrix"];
    assert!(approx(number(&matrix["scaleX"]), 1.0));
    assert!(approx(number(&matrix["scaleY"]), 2.0));
    assert!(approx(number(&matrix["translateX"]), 13.3));
    assert!(approx(number(&matrix["translateY"]), -26.6));

    let idle = &fish["animations"][0];
    assert_eq!(idle["name"], "idle");
    assert_eq!(idle["startFrame"], 1);
    let first = &idle["listOfFrames"][0];
    assert_eq!(first["frameNumber"], 1);
    assert_eq!(first["relativeFrameNumber"], 0);
    let mv = &first["listOfComponents"][0];
    assert_eq!(mv["componentDepth"], "1");
    assert!(approx(number(&mv["transform"]["rotateSkew0"]), -0.5));
    assert!(approx(number(&mv["transform"]["rotateSkew1"]), 0.5));
    assert!(approx(number(&mv["transform"]["translateX"]), 2.66 * 2.0));
}

#[test]
fn export_scale_only_affects_translation() {
    let cfg = RigConfig::default();
    let models = catalog(&cfg);
    let base = ResultSerializer::from_config(&cfg).to_value(&models).unwrap();
    let doubled = RigConfig {
        global_scale_factor: cfg.global_scale_factor * 2.0,
        ..cfg.clone()
    };
    let scaled = ResultSerializer::from_config(&doubled).to_value(&models).unwrap();

    let a = &base[0]["components"][1]["transformMatrix"];
    let b = &scaled[0]["components"][1]["transformMatrix"];
    assert!(approx(number(&b["translateX"]), 2.0 * number(&a["translateX"])));
    assert!(approx(number(&b["translateY"]), 2.0 * number(&a["translateY"])));
    assert_eq!(a["scaleX"], b["scaleX"]);
    assert_eq!(a["rotateSkew1"], b["rotateSkew1"]);
}

#[test]
fn string_and_writer_outputs_agree() {
    let cfg = RigConfig::default();
    let models = catalog(&cfg);
    let serializer = ResultSerializer::from_config(&cfg);

    let text = serializer.to_string(&models, true).unwrap();
    let mut written = Vec::new();
    serializer.write(&models, &mut written, true).unwrap();
    assert_eq!(text.as_bytes(), written.as_slice());

    let compact = serializer.to_string(&models, false).unwrap();
    assert!(!compact.contains('\n'));
    let reparsed: Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(reparsed, serializer.to_value(&models).unwrap());
}

#[test]
fn empty_catalog_is_an_empty_array() {
    let out = ResultSerializer::default().to_string(&[], false).unwrap();
    assert_eq!(out, "[]");
}
