use super::*;

#[test]
fn png_roundtrip_keeps_straight_alpha() {
    let c = Canvas::from_rgba8(2, 1, vec![100, 50, 200, 128, 1, 2, 3, 255]).unwrap();
    let bytes = encode_png(&c).unwrap();
    let back = decode_image(&bytes).unwrap();
    assert_eq!(back, c);
}

#[test]
fn rgb_input_decodes_opaque() {
    let img = image::RgbImage::from_raw(1, 1, vec![9, 8, 7]).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    let c = decode_image(&buf).unwrap();
    assert_eq!(c.pixel(0, 0), [9, 8, 7, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_image(b"not an image").is_err());
}

#[test]
fn missing_file_is_resource_missing() {
    let err = open_image(Path::new("/definitely/not/here.png")).unwrap_err();
    assert!(matches!(err, AdError::ResourceMissing(_)));
}
