use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spriterig_core::{build_catalog, ResultSerializer, RigConfig, TagStream, TagStreamBuilder};

const NO_ATTRS: [(&str, &str); 0] = [];
const MODELS: usize = 200;
const COMPONENTS: usize = 12;
const FRAMES: usize = 120;

fn matrix(b: &mut TagStreamBuilder, tx: usize, ty: usize) {
    b.leaf(
        "matrix",
        [
            ("type", "MATRIX".to_string()),
            ("hasScale", "false".into()),
            ("hasRotate", "true".into()),
            ("rotateSkew0", "1024".into()),
            ("rotateSkew1", "-1024".into()),
            ("translateX", tx.to_string()),
            ("translateY", ty.to_string()),
        ],
    );
}

fn place(b: &mut TagStreamBuilder, depth: usize, character: Option<String>, name: Option<&str>, tx: usize) {
    let mut attrs = vec![
        ("type", "PlaceObject2Tag".to_string()),
        ("depth", depth.to_string()),
        ("placeFlagHasMatrix", "true".into()),
    ];
    if let Some(character) = character {
        attrs.push(("characterId", character));
    }
    if let Some(name) = name {
        attrs.push(("name", name.into()));
    }
    b.open("item", attrs);
    matrix(b, tx, depth * 7);
    b.close().unwrap();
}

fn show(b: &mut TagStreamBuilder) {
    b.leaf("item", [("type", "ShowFrameTag")]);
}

fn label(b: &mut TagStreamBuilder, name: &str) {
    b.leaf("item", [("type", "FrameLabelTag"), ("name", name)]);
}

fn sprite(b: &mut TagStreamBuilder, id: String, body: impl FnOnce(&mut TagStreamBuilder)) {
    b.open("item", [("type", "DefineSpriteTag".to_string()), ("spriteId", id)]);
    b.open("subTags", NO_ATTRS);
    body(b);
    b.close().unwrap();
    b.close().unwrap();
}

/// A master timeline of `MODELS` distinct models, each with `COMPONENTS`
/// components and `FRAMES` animated frames split across four labels.
fn synthetic_stream() -> TagStream {
    let mut b = TagStreamBuilder::new();
    b.open("swf", NO_ATTRS);
    b.open("tags", NO_ATTRS);

    for c in 0..COMPONENTS {
        sprite(&mut b, format!("c{c}"), |b| {
            for s in 0..8 {
                label(b, &format!("variant{s}"));
                place(b, 1, Some(format!("shape{c}_{s}")), None, 0);
                show(b);
            }
        });
    }
    for m in 0..MODELS {
        sprite(&mut b, format!("m{m}"), |b| {
            for c in 0..COMPONENTS {
                place(b, c + 1, Some(format!("c{c}")), None, c * 10);
            }
            show(b);
            for f in 0..FRAMES {
                if f % (FRAMES / 4) == 0 {
                    label(b, &format!("anim{}", f / (FRAMES / 4)));
                }
                for c in 0..COMPONENTS {
                    place(b, c + 1, None, None, f + c);
                }
                show(b);
            }
        });
    }
    sprite(&mut b, "5118".into(), |b| {
        for m in 0..MODELS {
            label(b, &format!("Model {m}"));
            place(b, 1, Some(format!("m{m}")), Some("mdl"), 0);
            show(b);
        }
    });

    b.close().unwrap();
    b.close().unwrap();
    b.finish().unwrap()
}

fn bench_catalog(c: &mut Criterion) {
    let stream = synthetic_stream();
    let cfg = RigConfig::default();

    c.bench_function("build_catalog", |bench| {
        bench.iter(|| build_catalog(black_box(&stream), &cfg).unwrap())
    });

    let catalog = build_catalog(&stream, &cfg).unwrap();
    let serializer = ResultSerializer::from_config(&cfg);
    c.bench_function("serialize_catalog", |bench| {
        bench.iter(|| serializer.to_string(black_box(&catalog.models), false).unwrap())
    });
}

criterion_group!(benches, bench_catalog);
criterion_main!(benches);
