use super::*;
use crate::{
    foundation::core::Rgb8,
    plan::model::{EmphasisSpec, FontStyle},
};

fn square() -> Size {
    Size::new(1080, 1080).unwrap()
}

fn block(position: Position, font_size: FontSizeTier) -> TextBlockLayout {
    TextBlockLayout {
        position,
        font_style: FontStyle::Bold,
        font_size,
        color: Rgb8::new(10, 20, 30),
        emphasis: None,
    }
}

#[test]
fn platform_tables() {
    assert_eq!(Platform::Instagram.font_px(FontSizeTier::Xl), 96);
    assert_eq!(Platform::Poster.font_px(FontSizeTier::Xl), 140);
    assert_eq!(Platform::Banner.font_px(FontSizeTier::Sm), 32);
    assert_eq!(Platform::Poster.font_px(FontSizeTier::Md), 72);
    assert_eq!(safe_margins(Platform::Instagram, 1080), (108, 108));
    assert_eq!(safe_margins(Platform::Poster, 1000), (80, 80));
    assert_eq!(safe_margins(Platform::Banner, 1000), (150, 150));
}

#[test]
fn platform_parses() {
    assert_eq!("Poster".parse::<Platform>().unwrap(), Platform::Poster);
    assert!("tiktok".parse::<Platform>().is_err());
    assert_eq!(Platform::default(), Platform::Instagram);
}

#[test]
fn upper_positions_sit_on_top_margin() {
    let (x, y, a) = position_xy(Position::UpperCenter, square(), Platform::Instagram);
    assert_eq!((x, y), (540, 108));
    assert_eq!(a, Anchor::new(HAlign::Middle, VAlign::Top));

    let (x, _, a) = position_xy(Position::UpperLeft, square(), Platform::Instagram);
    assert_eq!(x, 86);
    assert_eq!(a.h, HAlign::Start);

    let (x, _, a) = position_xy(Position::UpperRight, square(), Platform::Instagram);
    assert_eq!(x, 993);
    assert_eq!(a.h, HAlign::End);
}

#[test]
fn lower_and_center_positions() {
    let (x, y, a) = position_xy(Position::LowerCenter, square(), Platform::Instagram);
    assert_eq!((x, y), (540, 972));
    assert_eq!(a, Anchor::new(HAlign::Middle, VAlign::Bottom));

    let (_, y, a) = position_xy(Position::LowerRight, square(), Platform::Banner);
    assert_eq!(y, 1080 - 162);
    assert_eq!(a, Anchor::new(HAlign::End, VAlign::Bottom));

    let (x, y, a) = position_xy(Position::Center, square(), Platform::Poster);
    assert_eq!((x, y), (540, 540));
    assert_eq!(a, Anchor::new(HAlign::Middle, VAlign::Middle));
}

#[test]
fn resolve_fills_color_and_emphasis() {
    let mut b = block(Position::UpperCenter, FontSizeTier::Xl);
    b.emphasis = Some(EmphasisSpec {
        text: "50%".into(),
        color: EmphasisSpec::DEFAULT_COLOR,
        scale: 1.2,
    });
    let r = resolve_text_layout(square(), &b, Platform::Instagram);
    assert_eq!(r.font_px, 96);
    assert_eq!(r.color, Rgb8::new(10, 20, 30).with_alpha(255));
    let em = r.emphasis.unwrap();
    assert_eq!(em.text, "50%");
    assert_eq!(em.font_px, 115);
    assert_eq!(em.color.a, 255);
}

#[test]
fn anchor_offsets() {
    assert_eq!(Anchor::new(HAlign::Start, VAlign::Top).x_offset(10.0), 0.0);
    assert_eq!(Anchor::new(HAlign::Middle, VAlign::Top).x_offset(10.0), -5.0);
    assert_eq!(Anchor::new(HAlign::End, VAlign::Top).x_offset(10.0), -10.0);
}
