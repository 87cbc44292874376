use image::{Rgba, RgbaImage};

use super::*;
use crate::assets::fonts::FontLibrary;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "gongju_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

const ALL_KINDS: &str = r##"{
  "version": "1",
  "jobs": [
    { "id": "c", "out": "clock.png", "kind": { "clock": { "time": { "hour": 3, "minute": 0, "second": 0 } } } },
    { "id": "q", "out": "qr.png", "kind": { "qr": { "text": "hi", "logo": "logo.png" } } },
    { "id": "w", "out": "wm.jpg", "kind": { "watermark": { "image": "photo.jpg", "text": "样张" } } },
    { "id": "g", "out": "grid.png", "kind": { "grid": { "images": ["a.png", "", "b.png"] } } },
    { "id": "s", "out": "tiles", "kind": { "slice": { "image": "a.png" } } },
    { "id": "t", "out": "long.png", "kind": { "stitch": { "images": ["a.png", "b.png"] } } },
    { "id": "k", "out": "card.png", "kind": { "card": { "text": "你好" } } },
    { "id": "y", "out": "glyphs", "kind": { "glyph_tiles": { "text": "国庆" } } },
    { "id": "b", "out": "banner.png", "kind": { "banner": { "text": "啊啊啊" } } }
  ]
}"##;

#[test]
fn parses_every_kind() {
    let file = JobFile::from_json_str(ALL_KINDS).unwrap();
    let kinds: Vec<_> = file.jobs.iter().map(|j| j.kind.name()).collect();
    assert_eq!(
        kinds,
        [
            "clock",
            "qr",
            "watermark",
            "grid",
            "slice",
            "stitch",
            "card",
            "glyph_tiles",
            "banner"
        ]
    );
    file.validate().unwrap();
    assert_eq!(file.jobs[3].kind.inputs(), ["a.png", "b.png"]);
    assert_eq!(file.jobs[1].kind.inputs(), ["logo.png"]);
    assert!(file.jobs[6].kind.inputs().is_empty());
}

#[test]
fn unknown_kind_is_a_serde_error() {
    let err = JobFile::from_json_str(
        r#"{ "version": "1", "jobs": [ { "id": "x", "out": "x.png", "kind": { "poster": {} } } ] }"#,
    )
    .unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));
}

fn card_job(id: &str, out: &str) -> Job {
    Job {
        id: id.to_string(),
        out: out.to_string(),
        kind: JobKind::Card(CardSpec {
            text: "hi".to_string(),
            options: Default::default(),
        }),
    }
}

#[test]
fn validate_rejects_bad_files() {
    let mut file = JobFile {
        version: "2".to_string(),
        jobs: vec![card_job("a", "a.png")],
    };
    assert!(file.validate().is_err());

    file.version = JOB_FILE_VERSION.to_string();
    file.validate().unwrap();

    file.jobs.push(card_job("a", "b.png"));
    assert!(file.validate().unwrap_err().to_string().contains("duplicate"));

    file.jobs[1] = card_job(" ", "b.png");
    assert!(file.validate().is_err());

    file.jobs[1] = card_job("b", "");
    assert!(file.validate().is_err());

    file.jobs[1] = card_job("b", "../escape.png");
    assert!(file.validate().is_err());
}

#[test]
fn validate_rejects_absolute_inputs() {
    let file = JobFile {
        version: "1".to_string(),
        jobs: vec![Job {
            id: "s".to_string(),
            out: "tiles".to_string(),
            kind: JobKind::Slice(SliceSpec {
                image: "/etc/photo.png".to_string(),
                n: 3,
            }),
        }],
    };
    assert!(file.validate().is_err());
}

#[test]
fn run_writes_outputs_and_isolates_failures() {
    let root = temp_dir("run_jobs");
    std::fs::create_dir_all(&root).unwrap();
    RgbaImage::from_pixel(30, 30, Rgba([200, 10, 10, 255]))
        .save(root.join("a.png"))
        .unwrap();

    let file = JobFile::from_json_str(
        r#"{
          "version": "1",
          "jobs": [
            { "id": "slice", "out": "out/tiles", "kind": { "slice": { "image": "a.png", "n": 2 } } },
            { "id": "missing", "out": "out/x.png", "kind": { "slice": { "image": "nope.png" } } },
            { "id": "card", "out": "out/card.png", "kind": { "card": { "text": "ok" } } }
          ]
        }"#,
    )
    .unwrap();

    let ctx = ComposeContext::new(FontLibrary::empty()).with_asset_root(&root);
    let opts = RunOptions {
        out_root: root.clone(),
        threads: Some(2),
    };
    let reports = run_jobs(&file, &ctx, &opts).unwrap();

    let ids: Vec<_> = reports.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["slice", "missing", "card"]);
    assert!(reports[0].is_ok());
    assert!(!reports[1].is_ok());
    assert!(reports[2].is_ok());

    let tiles = reports[0].result.as_ref().unwrap();
    assert_eq!(tiles.len(), 4);
    assert!(root.join("out/tiles/tile_1_1.png").exists());
    assert!(root.join("out/card.png").exists());

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn zero_threads_is_rejected() {
    let file = JobFile {
        version: "1".to_string(),
        jobs: Vec::new(),
    };
    let ctx = ComposeContext::new(FontLibrary::empty());
    let opts = RunOptions {
        out_root: PathBuf::from("."),
        threads: Some(0),
    };
    assert!(run_jobs(&file, &ctx, &opts).is_err());
}
