use super::*;

#[test]
fn tone_parses_korean_and_english() {
    assert_eq!("감성".parse::<Tone>().unwrap(), Tone::Emotional);
    assert_eq!("Premium".parse::<Tone>().unwrap(), Tone::Premium);
    assert_eq!(" casual ".parse::<Tone>().unwrap(), Tone::Casual);
    assert!("loud".parse::<Tone>().is_err());
}

#[test]
fn tone_serializes_as_label() {
    assert_eq!(serde_json::to_string(&Tone::Premium).unwrap(), "\"고급\"");
    let t: Tone = serde_json::from_str("\"emotional\"").unwrap();
    assert_eq!(t, Tone::Emotional);
}

#[test]
fn layout_enums_use_snake_case() {
    assert_eq!(
        serde_json::to_string(&Position::LowerRight).unwrap(),
        "\"lower_right\""
    );
    assert_eq!(serde_json::to_string(&FontSizeTier::Xl).unwrap(), "\"xl\"");
    assert!(serde_json::from_str::<FontStyle>("\"italic\"").is_err());
}

#[test]
fn block_layout_json_uses_color_hex() {
    let block = TextBlockLayout {
        position: Position::Center,
        font_style: FontStyle::Bold,
        font_size: FontSizeTier::Md,
        color: Rgb8::WHITE,
        emphasis: Some(EmphasisSpec {
            text: "50%".into(),
            color: EmphasisSpec::DEFAULT_COLOR,
            scale: 1.2,
        }),
    };
    let v = serde_json::to_value(&block).unwrap();
    assert_eq!(v["color_hex"], "#FFFFFF");
    assert_eq!(v["emphasis"]["color_hex"], "#FF4D4D");
    let back: TextBlockLayout = serde_json::from_value(v).unwrap();
    assert_eq!(back, block);
}

#[test]
fn lower_positions() {
    assert!(Position::LowerLeft.is_lower());
    assert!(!Position::Center.is_lower());
    assert!(!Position::UpperRight.is_lower());
}

#[test]
fn brief_builder_sets_optionals() {
    let b = Brief::new("라떼", Tone::Casual)
        .with_discount("10%")
        .with_prompt_extra("sunny");
    assert_eq!(b.discount.as_deref(), Some("10%"));
    assert_eq!(b.prompt_extra.as_deref(), Some("sunny"));
}

#[test]
fn model_hints_fill_per_key() {
    let plan_hints = ModelHints {
        lora_key: Some("a".into()),
        ..ModelHints::default()
    };
    let cfg_hints = ModelHints {
        lora_key: Some("b".into()),
        control_hint: Some("depth".into()),
        ip_adapter_ref: None,
    };
    let merged = plan_hints.or(&cfg_hints);
    assert_eq!(merged.lora_key.as_deref(), Some("a"));
    assert_eq!(merged.control_hint.as_deref(), Some("depth"));
    assert_eq!(merged.ip_adapter_ref, None);
}
