use super::*;
use crate::foundation::core::Rgba8;

fn sz(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

#[test]
fn unclamped_target_is_exact_multiple() {
    assert_eq!(target_size(sz(300, 200), 2, None).unwrap(), sz(600, 400));
    assert_eq!(target_size(sz(7, 3), 1, None).unwrap(), sz(7, 3));
}

#[test]
fn clamp_scales_uniformly() {
    assert_eq!(
        target_size(sz(1000, 500), 2, Some((1080, 1080))).unwrap(),
        sz(1080, 540)
    );
    assert_eq!(
        target_size(sz(500, 1000), 4, Some((1080, 1080))).unwrap(),
        sz(540, 1080)
    );
}

#[test]
fn clamp_never_scales_up() {
    assert_eq!(
        target_size(sz(100, 100), 2, Some((4000, 4000))).unwrap(),
        sz(200, 200)
    );
}

#[test]
fn zero_clamp_axis_is_unbounded() {
    assert_eq!(
        target_size(sz(100, 50), 3, Some((0, 75))).unwrap(),
        sz(150, 75)
    );
}

#[test]
fn output_never_exceeds_clamp() {
    for (w, h) in [(333, 777), (1081, 1), (1, 1081), (999, 1000), (17, 4093)] {
        for scale in 1..=4 {
            let out = target_size(sz(w, h), scale, Some((1080, 720))).unwrap();
            assert!(out.width <= 1080 && out.height <= 720, "{w}x{h}*{scale} -> {out}");
            assert!(out.width >= 1 && out.height >= 1);
        }
    }
}

#[test]
fn zero_scale_is_invalid() {
    assert!(target_size(sz(1, 1), 0, None).is_err());
    let cfg = UpscaleConfig {
        scale: 0,
        ..UpscaleConfig::default()
    };
    assert!(LanczosUpscaler::new(cfg).is_err());
}

#[test]
fn upscaler_resizes_canvas() {
    let up = LanczosUpscaler::new(UpscaleConfig {
        scale: 2,
        max_size: Some((30, 30)),
        ..UpscaleConfig::default()
    })
    .unwrap();
    let c = Canvas::filled(
        20,
        10,
        Rgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 255,
        },
    )
    .unwrap();
    let out = up.upscale(c).unwrap();
    assert_eq!(out.size(), sz(30, 15));
}

#[test]
fn model_backends_are_unsupported() {
    for backend in [UpscaleBackend::RealEsrgan, UpscaleBackend::SwinIr] {
        let err = create_upscaler(&UpscaleConfig {
            backend,
            ..UpscaleConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, AdError::BackendUnsupported { stage: "upscale", .. }));
    }
}
