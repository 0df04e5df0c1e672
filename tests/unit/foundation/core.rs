use super::*;

#[test]
fn size_rejects_zero_dimensions() {
    assert!(Size::new(0, 10).is_err());
    assert!(Size::new(10, 0).is_err());
    assert_eq!(Size::new(3, 4).unwrap().area(), 12);
}

#[test]
fn rgb_hex_parses_and_formats() {
    let c = Rgb8::from_hex("#ff4d4d").unwrap();
    assert_eq!(c, Rgb8::new(255, 77, 77));
    assert_eq!(c.to_hex(), "#FF4D4D");
    assert_eq!("00FF00".parse::<Rgb8>().unwrap(), Rgb8::new(0, 255, 0));
}

#[test]
fn rgb_hex_rejects_malformed() {
    for bad in ["", "#fff", "#12345g", "#1234567", "red"] {
        assert!(Rgb8::from_hex(bad).is_err(), "{bad}");
    }
}

#[test]
fn rgb_serde_uses_hex_string() {
    let json = serde_json::to_string(&Rgb8::WHITE).unwrap();
    assert_eq!(json, "\"#FFFFFF\"");
    let back: Rgb8 = serde_json::from_str("\"#102030\"").unwrap();
    assert_eq!(back, Rgb8::new(0x10, 0x20, 0x30));
    assert!(serde_json::from_str::<Rgb8>("\"nope\"").is_err());
}

#[test]
fn canvas_from_rgba8_validates_length() {
    assert!(Canvas::from_rgba8(2, 2, vec![0; 15]).is_err());
    let c = Canvas::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(c.pixel(1, 0), [5, 6, 7, 8]);
}

#[test]
fn canvas_alpha_roundtrip_and_count() {
    let c = Canvas::filled(
        3,
        1,
        Rgba8 {
            r: 9,
            g: 9,
            b: 9,
            a: 255,
        },
    )
    .unwrap();
    let mask = Mask::from_raw(3, 1, vec![0, 128, 255]).unwrap();
    let c = c.with_alpha(&mask).unwrap();
    assert_eq!(c.visible_pixel_count(), 2);
    assert_eq!(c.alpha_mask(), mask);
    assert_eq!(c.pixel(1, 0), [9, 9, 9, 128]);
}

#[test]
fn canvas_crop_copies_rows() {
    let mut c = Canvas::new(4, 3).unwrap();
    c.put_pixel(2, 1, [1, 2, 3, 4]);
    let out = c
        .crop(PixelRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2,
        })
        .unwrap();
    assert_eq!(out.size(), Size::new(2, 2).unwrap());
    assert_eq!(out.pixel(1, 0), [1, 2, 3, 4]);
    assert!(
        c.crop(PixelRect {
            x: 3,
            y: 0,
            width: 2,
            height: 1
        })
        .is_err()
    );
}

#[test]
fn mask_bounding_box() {
    let empty = Mask::from_raw(3, 3, vec![0; 9]).unwrap();
    assert_eq!(empty.bounding_box(), None);

    let mut data = vec![0u8; 16];
    data[5] = 10; // (1,1)
    data[10] = 1; // (2,2)
    let m = Mask::from_raw(4, 4, data).unwrap();
    assert_eq!(
        m.bounding_box(),
        Some(PixelRect {
            x: 1,
            y: 1,
            width: 2,
            height: 2
        })
    );
}

#[test]
fn canvas_image_conversion_roundtrips() {
    let c = Canvas::from_rgba8(1, 2, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    let img = c.to_image();
    assert_eq!(img.get_pixel(0, 1).0, [5, 6, 7, 8]);
    assert_eq!(Canvas::from_image(img).unwrap(), c);
}
