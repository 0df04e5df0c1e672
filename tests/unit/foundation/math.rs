use super::*;

#[test]
fn fnv_split_writes_match_one_write() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"adforge");
    let mut b = Fnv1a64::new_default();
    b.write_u8(b'a');
    b.write_bytes(b"dforge");
    assert_eq!(a.finish(), b.finish());
    assert_ne!(a.finish(), Fnv1a64::OFFSET_BASIS);
}

#[test]
fn fnv_str_writes_are_separated() {
    let mut a = Fnv1a64::new_default();
    a.write_str("ab");
    a.write_str("c");
    let mut b = Fnv1a64::new_default();
    b.write_str("a");
    b.write_str("bc");
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_then_unpremultiply_keeps_opaque_and_zeroes_transparent() {
    let mut px = vec![10u8, 20, 30, 255, 200, 100, 50, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
    assert_eq!(&px[4..], &[0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..4], &[10, 20, 30, 255]);
}

#[test]
fn unpremultiply_half_alpha_is_close() {
    let mut px = vec![200u8, 100, 0, 128];
    premultiply_rgba8_in_place(&mut px);
    unpremultiply_rgba8_in_place(&mut px);
    assert!((i32::from(px[0]) - 200).abs() <= 2);
    assert!((i32::from(px[1]) - 100).abs() <= 2);
    assert_eq!(px[2], 0);
    assert_eq!(px[3], 128);
}

#[test]
fn trunc_u32_behaves_like_int_cast() {
    assert_eq!(trunc_u32(648.9), 648);
    assert_eq!(trunc_u32(-3.0), 0);
    assert_eq!(trunc_u32(f64::NAN), 0);
}
