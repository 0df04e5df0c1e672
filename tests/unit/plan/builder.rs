use super::*;
use crate::plan::safety::has_safety_tokens;

fn builder() -> PlanBuilder {
    PlanBuilder::new(CopyLimits::default()).unwrap()
}

#[test]
fn empty_product_is_invalid_input() {
    let err = builder().build(&Brief::new("   ", Tone::Casual), None).unwrap_err();
    assert!(matches!(err, AdError::InvalidInput(_)), "{err}");
}

#[test]
fn discount_headline_gets_percent_emphasis() {
    let brief = Brief::new("시그니처 라떼", Tone::Emotional).with_discount("50% 할인");
    let plan = builder().build(&brief, None).unwrap();
    assert_eq!(plan.copy.headline, "오늘만 50% 할인");
    assert_eq!(plan.copy.subcopy, "따뜻한 순간, 시그니처 라떼와 함께.");
    assert_eq!(plan.copy.cta, "지금 확인하기");
    let em = plan.layout.headline.emphasis.as_ref().unwrap();
    assert_eq!(em.text, "50%");
    assert_eq!(em.color.to_hex(), "#FF4D4D");
    assert!((em.scale - 1.2).abs() < 1e-6);
}

#[test]
fn no_discount_means_no_emphasis() {
    let plan = builder()
        .build(&Brief::new("아메리카노", Tone::Casual), None)
        .unwrap();
    assert_eq!(plan.copy.headline, "아메리카노 지금 만나보세요");
    assert!(plan.layout.headline.emphasis.is_none());
    assert_eq!(plan.layout.headline.font_size, FontSizeTier::Xl);
}

#[test]
fn blank_discount_counts_as_absent() {
    let brief = Brief::new("라떼", Tone::Casual).with_discount("  ");
    let plan = builder().build(&brief, None).unwrap();
    assert_eq!(plan.copy.headline, "라떼 지금 만나보세요");
}

#[test]
fn discount_without_number_has_no_emphasis() {
    let brief = Brief::new("라떼", Tone::Casual).with_discount("1+1 이벤트");
    let plan = builder().build(&brief, None).unwrap();
    assert!(plan.layout.headline.emphasis.is_none());
}

#[test]
fn premium_tone_uses_lg_headline_and_luxury_prompt() {
    let plan = builder()
        .build(&Brief::new("케이크", Tone::Premium), None)
        .unwrap();
    assert_eq!(plan.layout.headline.font_size, FontSizeTier::Lg);
    assert_eq!(plan.copy.cta, "지금 예약하기");
    assert!(plan.background_prompt.contains("luxury cafe mood"));
    assert!(plan.background_prompt.contains("fits well with 케이크"));
}

#[test]
fn fixed_positions() {
    let plan = builder()
        .build(&Brief::new("라떼", Tone::Casual), None)
        .unwrap();
    assert_eq!(plan.layout.headline.position, Position::UpperCenter);
    assert_eq!(plan.layout.subcopy.position, Position::LowerCenter);
    assert_eq!(plan.layout.cta.position, Position::LowerCenter);
    assert_eq!(plan.layout.subcopy.font_style, FontStyle::Regular);
}

#[test]
fn prompt_is_ordered_and_safe() {
    let brief = Brief::new("라떼", Tone::Casual).with_prompt_extra("sunny window");
    let plan = builder().build(&brief, None).unwrap();
    assert!(plan
        .background_prompt
        .starts_with("high quality background for advertisement, instagram-friendly composition"));
    assert!(plan.background_prompt.contains("no text, no logo, no watermark"));
    assert!(plan.background_prompt.ends_with("fits well with 라떼, sunny window"));
}

#[test]
fn blacklisted_hint_is_dropped() {
    let brief = Brief::new("라떼", Tone::Casual).with_prompt_extra("가게 로고 넣어줘");
    let plan = builder().build(&brief, None).unwrap();
    assert!(!plan.background_prompt.contains("가게 로고 넣어줘"));
    assert!(plan.background_prompt.ends_with("fits well with 라떼"));
    assert!(has_safety_tokens(&plan.background_prompt));
}

#[test]
fn long_copy_is_truncated_with_ellipsis() {
    let brief = Brief::new("아주아주아주아주아주긴이름의프리미엄상품", Tone::Casual);
    let plan = builder().build(&brief, None).unwrap();
    assert_eq!(plan.copy.headline.chars().count(), 19);
    assert!(plan.copy.headline.ends_with('…'));
    assert!(plan.copy.subcopy.chars().count() <= 40);
}

#[test]
fn truncate_keeps_short_strings() {
    assert_eq!(truncate_with_ellipsis("abc", 3), "abc");
    assert_eq!(truncate_with_ellipsis("abcdef", 5), "abc…");
    assert_eq!(truncate_with_ellipsis("한국어문장", 4), "한국…");
}

#[test]
fn emphasis_target_variants() {
    let b = builder();
    assert_eq!(b.emphasis_target("최대 30 % 세일").as_deref(), Some("30 %"));
    assert_eq!(b.emphasis_target("20퍼센트").as_deref(), Some("20퍼센트"));
    assert_eq!(b.emphasis_target("10 Percent off").as_deref(), Some("10 Percent"));
    assert_eq!(b.emphasis_target("no numbers"), None);
}

#[test]
fn overridden_headline_rederives_percent_emphasis() {
    let brief = Brief::new("라떼", Tone::Casual).with_discount("50% 할인");
    let b = builder();

    let ov = PlanOverride::from_json_str(r#"{ "copy": { "headline": "주말 한정 30% 세일" } }"#)
        .unwrap();
    let plan = b.build(&brief, Some(&ov)).unwrap();
    assert_eq!(plan.layout.headline.emphasis.as_ref().unwrap().text, "30%");

    let ov = PlanOverride::from_json_str(r#"{ "copy": { "headline": "주말 한정 세일" } }"#).unwrap();
    let plan = b.build(&brief, Some(&ov)).unwrap();
    assert!(plan.layout.headline.emphasis.is_none());
}

#[test]
fn overridden_headline_keeps_explicit_emphasis() {
    let brief = Brief::new("라떼", Tone::Casual).with_discount("50% 할인");
    let ov = PlanOverride::from_json_str(
        r##"{
            "copy": { "headline": "주말 한정 세일" },
            "layout": { "headline": { "emphasis": { "text": "한정", "color_hex": "#00FF00", "scale": 1.5 } } }
        }"##,
    )
    .unwrap();
    let plan = builder().build(&brief, Some(&ov)).unwrap();
    let em = plan.layout.headline.emphasis.as_ref().unwrap();
    assert_eq!(em.text, "한정");
    assert_eq!(em.color.to_hex(), "#00FF00");
}

#[test]
fn truncated_override_headline_never_keeps_a_stale_target() {
    let brief = Brief::new("라떼", Tone::Casual).with_discount("50% 할인");
    let ov = PlanOverride::from_json_str(
        r#"{ "copy": { "headline": "아주 아주 아주 아주 길고 긴 헤드라인 끝에 50%" } }"#,
    )
    .unwrap();
    let plan = builder().build(&brief, Some(&ov)).unwrap();
    assert!(plan.copy.headline.ends_with('…'));
    assert!(plan.layout.headline.emphasis.is_none());
}
