use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "adforge_cfg_{name}_{}_{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn defaults_are_valid() {
    let cfg = PipelineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.canvas, Size::new(1080, 1080).unwrap());
    assert_eq!(cfg.platform, Platform::Instagram);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: PipelineConfig = serde_json::from_str(
        r#"{ "platform": "poster", "relight": { "shadow_opacity": 0.5 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.platform, Platform::Poster);
    assert_eq!(cfg.relight.shadow_opacity, 0.5);
    assert_eq!(cfg.relight.shadow_offset, (0, 24));
    assert_eq!(cfg.segment, SegmentConfig::default());
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(serde_json::from_str::<PipelineConfig>(r#"{ "canvass": {} }"#).is_err());
    assert!(
        serde_json::from_str::<PipelineConfig>(r#"{ "segment": { "feather": 2 } }"#).is_err()
    );
}

#[test]
fn validate_catches_bad_values() {
    let mut cfg = PipelineConfig::default();
    cfg.canvas.width = 0;
    assert!(matches!(cfg.validate(), Err(AdError::InvalidInput(_))));

    let mut cfg = PipelineConfig::default();
    cfg.upscale.scale = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.relight.shadow_opacity = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.copy_limits.cta = 2;
    assert!(cfg.validate().is_err());
}

#[test]
fn upscale_clamp_defaults_to_canvas() {
    let mut cfg = PipelineConfig::default();
    assert_eq!(cfg.effective_upscale().max_size, Some((1080, 1080)));
    cfg.upscale.max_size = Some((2000, 0));
    assert_eq!(cfg.effective_upscale().max_size, Some((2000, 0)));
}

#[test]
fn from_path_reads_and_validates() {
    let dir = temp_dir("from_path");
    let good = dir.join("good.json");
    std::fs::write(&good, r#"{ "canvas": { "width": 640, "height": 480 } }"#).unwrap();
    let cfg = PipelineConfig::from_path(&good).unwrap();
    assert_eq!(cfg.canvas, Size::new(640, 480).unwrap());

    let bad = dir.join("bad.json");
    std::fs::write(&bad, r#"{ "upscale": { "scale": 0 } }"#).unwrap();
    assert!(PipelineConfig::from_path(&bad).is_err());

    let missing = PipelineConfig::from_path(&dir.join("nope.json")).unwrap_err();
    assert!(matches!(missing, AdError::ResourceMissing(_)));
    let _ = std::fs::remove_dir_all(&dir);
}
