//! End-to-end pipeline tests: realistic input trees in, metadata files out.

use mintkit::assemble::Link;
use mintkit::pipeline::{self, RunConfig};
use mintkit::uri::BaseUri;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BASE: &str = "ipfs://QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";

fn write_png(path: &Path, w: u32, h: u32) {
    image::RgbImage::from_pixel(w, h, image::Rgb([120, 40, 200]))
        .save(path)
        .unwrap();
}

/// A small but representative collection:
///
/// ```text
/// tokens/  1.json (full), 2.json (minimal), 0.json (missing name → skipped)
/// media/   icon-1.png, image-1.png, 1.gif (bare → image), image-2.jpg,
///          asset-2.glb (never consumed), 9.xyz (warned), notes.txt (silent)
/// ```
fn fixture() -> (TempDir, RunConfig) {
    let tmp = TempDir::new().unwrap();
    let token_dir = tmp.path().join("tokens");
    let media_dir = tmp.path().join("media");
    fs::create_dir_all(&token_dir).unwrap();
    fs::create_dir_all(&media_dir).unwrap();

    fs::write(
        token_dir.join("1.json"),
        r#"{"name": "Glow #1", "description": "the first one",
            "image": "ipfs://placeholder",
            "attributes": [{"trait_type": "Background", "value": "Dusk"},
                           {"trait_type": "Level", "value": 3}]}"#,
    )
    .unwrap();
    fs::write(
        token_dir.join("2.json"),
        r#"{"name": "Glow #2", "image": "ipfs://placeholder"}"#,
    )
    .unwrap();
    fs::write(token_dir.join("0.json"), r#"{"description": "nameless"}"#).unwrap();

    write_png(&media_dir.join("icon-1.png"), 16, 16);
    write_png(&media_dir.join("image-1.png"), 64, 48);
    image::RgbaImage::from_pixel(32, 32, image::Rgba([1, 2, 3, 255]))
        .save(media_dir.join("1.gif"))
        .unwrap();
    write_png(&media_dir.join("image-2.jpg"), 20, 30);
    fs::write(media_dir.join("asset-2.glb"), b"not an image").unwrap();
    fs::write(media_dir.join("9.xyz"), b"mystery").unwrap();
    fs::write(media_dir.join("notes.txt"), "remember to pin").unwrap();

    let config = RunConfig {
        token_dir,
        media_dir,
        base_uri: BaseUri::parse(BASE).unwrap(),
        links: vec![
            Link {
                title: "Site".to_string(),
                url: "https://example.com".to_string(),
            },
            Link {
                title: "Docs".to_string(),
                url: "https://example.com/docs".to_string(),
            },
        ],
        output_root: tmp.path().join("output"),
    };
    (tmp, config)
}

fn read_record(dir: &Path, index: u32) -> serde_json::Value {
    let raw = fs::read_to_string(dir.join(format!("{index}.json"))).unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[test]
fn full_run_writes_one_record_per_valid_token() {
    let (_tmp, config) = fixture();
    let (report, warnings) = pipeline::run(&config, None).unwrap();

    // 0.json is skipped (no name), 9.xyz draws a warning
    assert_eq!(report.written, 2);
    assert!(warnings.iter().any(|w| w.contains("0.json")));
    assert!(warnings.iter().any(|w| w.contains("9.xyz")));
    assert_eq!(warnings.len(), 2);

    let entries: Vec<_> = fs::read_dir(&report.output_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains(&"1.json".to_string()));
    assert!(entries.contains(&"2.json".to_string()));
}

#[test]
fn records_carry_the_full_output_schema() {
    let (_tmp, config) = fixture();
    let (report, _) = pipeline::run(&config, None).unwrap();

    let one = read_record(&report.output_dir, 1);
    assert_eq!(one["name"], "Glow #1");
    assert_eq!(one["description"], "the first one");
    assert_eq!(one["attributes"][0]["key"], "Background");
    assert_eq!(one["attributes"][0]["value"], "Dusk");
    assert_eq!(one["attributes"][1]["value"], 3);

    // Icon: the one icon-category file for index 1
    assert_eq!(one["icon"]["width"], 16);
    assert_eq!(one["icon"]["height"], 16);
    assert_eq!(one["icon"]["hashFunction"], "sha256(bytes)");
    assert_eq!(one["icon"]["url"], format!("{BASE}/1.png"));

    // Images: both image-1.png and bare 1.gif, inside one inner array
    let outer = one["images"].as_array().unwrap();
    assert_eq!(outer.len(), 1);
    let inner = outer[0].as_array().unwrap();
    assert_eq!(inner.len(), 2);
    let urls: Vec<&str> = inner.iter().map(|d| d["url"].as_str().unwrap()).collect();
    assert!(urls.contains(&format!("{BASE}/1.gif").as_str()));
    assert!(urls.contains(&format!("{BASE}/1.png").as_str()));
    for d in inner {
        let hash = d["hash"].as_str().unwrap();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 66);
        assert!(d["width"].as_u64().unwrap() > 0);
        assert!(d["height"].as_u64().unwrap() > 0);
    }

    // Links shared identically, in entry order
    for index in [1, 2] {
        let record = read_record(&report.output_dir, index);
        let links = record["links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0]["title"], "Site");
        assert_eq!(links[1]["url"], "https://example.com/docs");
    }

    // Minimal token: no description, no attributes, no icon — absent, not null
    let two = read_record(&report.output_dir, 2);
    assert!(two.get("description").is_none());
    assert!(two.get("attributes").is_none());
    assert!(two.get("icon").is_none());
    assert_eq!(two["images"][0].as_array().unwrap().len(), 1);
    assert_eq!(two["images"][0][0]["url"], format!("{BASE}/2.jpg"));

    // The asset file must not appear anywhere in token 2's record
    let raw = fs::read_to_string(report.output_dir.join("2.json")).unwrap();
    assert!(!raw.contains("glb"));
}

#[test]
fn consecutive_runs_use_distinct_fresh_directories() {
    let (_tmp, config) = fixture();
    let (first, _) = pipeline::run(&config, None).unwrap();
    let (second, _) = pipeline::run(&config, None).unwrap();

    assert_ne!(first.output_dir, second.output_dir);
    // The earlier run's files are untouched by the later run
    assert!(first.output_dir.join("1.json").exists());
    assert!(second.output_dir.join("1.json").exists());
}

#[test]
fn one_unparsable_token_file_fails_the_whole_run() {
    let (_tmp, config) = fixture();
    fs::write(config.token_dir.join("3.json"), "{oops").unwrap();

    let err = pipeline::run(&config, None).unwrap_err();
    assert!(err.to_string().contains("3.json"));
    // Nothing was produced for the valid siblings either
    assert!(!config.output_root.exists());
}

#[test]
fn corrupt_media_aborts_assembly() {
    let (_tmp, config) = fixture();
    fs::write(config.media_dir.join("image-2.jpg"), b"no longer a jpeg").unwrap();

    let err = pipeline::run(&config, None).unwrap_err();
    assert!(err.to_string().contains("image-2.jpg"));
}
