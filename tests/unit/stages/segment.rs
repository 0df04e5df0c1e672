use super::*;
use crate::foundation::core::{PixelRect, Rgba8};

fn product_shot() -> Canvas {
    let mut c = Canvas::filled(
        100,
        100,
        Rgba8 {
            r: 200,
            g: 200,
            b: 200,
            a: 255,
        },
    )
    .unwrap();
    for y in 40..60 {
        for x in 40..60 {
            c.put_pixel(x, y, [220, 30, 30, 255]);
        }
    }
    c
}

fn hard_edges() -> SegmentConfig {
    SegmentConfig {
        feather_radius: 0.0,
        ..SegmentConfig::default()
    }
}

#[test]
fn border_estimate_matches_uniform_background() {
    let bg = estimate_background_color(&product_shot(), 24);
    for c in bg {
        assert!((c - 200.0).abs() < 1e-9);
    }
}

#[test]
fn border_is_clamped_for_small_images() {
    let c = Canvas::filled(
        3,
        2,
        Rgba8 {
            r: 10,
            g: 20,
            b: 30,
            a: 255,
        },
    )
    .unwrap();
    assert_eq!(estimate_background_color(&c, 24), [10.0, 20.0, 30.0]);
}

#[test]
fn threshold_has_floor_of_18() {
    let dist = vec![0.0; 100];
    assert_eq!(distance_threshold(&dist, 10, 10, 0.18), 18.0);
    let far = vec![100.0; 100];
    assert!((distance_threshold(&far, 10, 10, 0.18) - 55.0).abs() < 1e-9);
}

#[test]
fn empty_center_region_uses_floor() {
    assert_eq!(distance_threshold(&[500.0], 1, 1, 0.45), 18.0);
}

#[test]
fn hard_cutout_is_cropped_to_product() {
    let seg = FallbackSegmenter::new(hard_edges()).unwrap();
    let out = seg.segment(product_shot()).unwrap();
    assert_eq!((out.width(), out.height()), (20, 20));
    assert_eq!(out.pixel(0, 0), [220, 30, 30, 255]);
    assert_eq!(out.visible_pixel_count(), 400);
}

#[test]
fn feathered_cutout_is_partially_transparent() {
    let seg = FallbackSegmenter::new(SegmentConfig::default()).unwrap();
    let out = seg.segment(product_shot()).unwrap();
    assert!(out.width() > 20 && out.width() < 100);
    let visible = out.visible_pixel_count();
    let total = (out.width() * out.height()) as usize;
    assert!(visible > 0 && visible <= total);
    assert!(out.data().chunks_exact(4).any(|px| px[3] > 0 && px[3] < 255));
}

#[test]
fn segmentation_is_deterministic() {
    let seg = FallbackSegmenter::new(SegmentConfig::default()).unwrap();
    let a = seg.segment(product_shot()).unwrap();
    let b = seg.segment(product_shot()).unwrap();
    assert_eq!(a, b);
    let ma = foreground_mask(&product_shot(), &SegmentConfig::default()).unwrap();
    assert_eq!(
        ma.bounding_box(),
        Some(PixelRect {
            x: 40,
            y: 40,
            width: 20,
            height: 20
        })
    );
}

#[test]
fn uniform_image_keeps_nothing_and_is_not_cropped() {
    let c = Canvas::filled(
        30,
        30,
        Rgba8 {
            r: 5,
            g: 5,
            b: 5,
            a: 255,
        },
    )
    .unwrap();
    let out = FallbackSegmenter::new(hard_edges())
        .unwrap()
        .segment(c)
        .unwrap();
    assert_eq!(out.width(), 30);
    assert_eq!(out.visible_pixel_count(), 0);
}

#[test]
fn model_backends_are_unsupported() {
    for backend in [SegmentBackend::BiRefNet, SegmentBackend::Sam] {
        let cfg = SegmentConfig {
            backend,
            ..SegmentConfig::default()
        };
        let err = create_segmenter(&cfg).err().unwrap();
        assert!(matches!(err, AdError::BackendUnsupported { stage: "segment", .. }));
    }
    assert!(create_segmenter(&SegmentConfig::default()).is_ok());
}

#[test]
fn negative_feather_is_rejected() {
    let cfg = SegmentConfig {
        feather_radius: -1.0,
        ..SegmentConfig::default()
    };
    assert!(FallbackSegmenter::new(cfg).is_err());
}

#[test]
fn config_accepts_partial_json() {
    let cfg: SegmentConfig = serde_json::from_str(r#"{"backend": "birefnet"}"#).unwrap();
    assert_eq!(cfg.backend, SegmentBackend::BiRefNet);
    assert_eq!(cfg.bg_sample_border, 24);
    assert!(serde_json::from_str::<SegmentConfig>(r#"{"radius": 2}"#).is_err());
}
