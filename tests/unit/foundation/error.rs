use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AdError::invalid_input("x")
            .to_string()
            .contains("invalid input:")
    );
    assert!(
        AdError::unsafe_prompt("x")
            .to_string()
            .contains("unsafe prompt:")
    );
    assert!(
        AdError::resource_missing("x")
            .to_string()
            .contains("resource missing:")
    );
    assert!(
        AdError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn backend_unsupported_names_stage_and_backend() {
    let msg = AdError::backend_unsupported("upscale", "real_esrgan").to_string();
    assert!(msg.contains("upscale"));
    assert!(msg.contains("real_esrgan"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AdError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_map_to_serde_variant() {
    let err: AdError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert!(matches!(err, AdError::Serde(_)));
}
