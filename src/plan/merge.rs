use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    foundation::{
        core::Rgb8,
        error::{AdError, AdResult},
    },
    plan::{
        model::{
            BlockKind, EmphasisSpec, FontSizeTier, FontStyle, Plan, Position, TextBlockLayout,
        },
        safety::PromptGuard,
    },
};

const DEFAULT_OVERRIDE_SCALE: f32 = 1.15;
const MAX_EMPHASIS_SCALE: f32 = 4.0;

/// What an override says about a block's emphasis.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EmphasisOverride {
    /// Absent or malformed: keep the rule-based emphasis.
    #[default]
    Keep,
    /// Explicit `null`: no emphasis.
    Clear,
    /// Replace with this emphasis.
    Set(EmphasisSpec),
}

/// Validated per-block layout override. `None` fields keep the rule-based value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockOverride {
    /// Anchor.
    pub position: Option<Position>,
    /// Face weight.
    pub font_style: Option<FontStyle>,
    /// Size tier.
    pub font_size: Option<FontSizeTier>,
    /// Text color.
    pub color: Option<Rgb8>,
    /// Emphasis.
    pub emphasis: EmphasisOverride,
}

/// Partial plan supplied by an external planner (e.g. a language model).
///
/// Built with [`PlanOverride::from_json`], which checks every field against the same enums the
/// rule-based builder uses; anything malformed is dropped so the rule value survives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanOverride {
    /// Headline, subcopy and CTA replacements.
    pub copy: [Option<String>; 3],
    /// Background prompt replacement (still forced through the safety check).
    pub background_prompt: Option<String>,
    /// Per-block layout overrides.
    pub layout: [Option<BlockOverride>; 3],
    /// `lora_key`, `control_hint`, `ip_adapter_ref`.
    pub model_hints: [Option<String>; 3],
}

fn block_key(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Headline => "headline",
        BlockKind::Subcopy => "subcopy",
        BlockKind::Cta => "cta",
    }
}

const HINT_KEYS: [&str; 3] = ["lora_key", "control_hint", "ip_adapter_ref"];

impl PlanOverride {
    /// Parse override JSON text.
    pub fn from_json_str(s: &str) -> AdResult<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }

    /// Parse an override object field by field.
    pub fn from_json(value: &Value) -> AdResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| AdError::invalid_input("plan override must be a JSON object"))?;

        let mut out = Self::default();

        if let Some(copy) = obj.get("copy").and_then(Value::as_object) {
            for (i, kind) in BlockKind::ALL.into_iter().enumerate() {
                out.copy[i] = str_field(copy, block_key(kind));
            }
        }

        out.background_prompt = str_field(obj, "background_prompt");

        if let Some(layout) = obj.get("layout").and_then(Value::as_object) {
            for (i, kind) in BlockKind::ALL.into_iter().enumerate() {
                out.layout[i] = layout
                    .get(block_key(kind))
                    .and_then(Value::as_object)
                    .map(parse_block);
            }
        }

        if let Some(hints) = obj.get("model_hints").and_then(Value::as_object) {
            for (slot, key) in out.model_hints.iter_mut().zip(HINT_KEYS) {
                *slot = str_field(hints, key);
            }
        }

        Ok(out)
    }

    /// True when the headline text is replaced but its emphasis is left to the rule-based
    /// planner.
    pub fn replaces_headline_text_only(&self) -> bool {
        self.copy[0].is_some()
            && self.layout[0]
                .as_ref()
                .is_none_or(|b| matches!(b.emphasis, EmphasisOverride::Keep))
    }

    /// Merge into `plan`. A background prompt override carrying a forbidden token fails with
    /// [`AdError::UnsafePrompt`].
    pub fn apply(&self, mut plan: Plan, guard: &PromptGuard) -> AdResult<Plan> {
        for (i, kind) in BlockKind::ALL.into_iter().enumerate() {
            if let Some(text) = &self.copy[i] {
                *plan.copy.text_mut(kind) = text.clone();
            }
            if let Some(block) = &self.layout[i] {
                apply_block(plan.layout.block_mut(kind), block);
            }
        }

        if let Some(prompt) = &self.background_prompt {
            plan.background_prompt = guard.enforce(prompt)?;
        }

        let hints = &mut plan.model_hints;
        let slots = [
            &mut hints.lora_key,
            &mut hints.control_hint,
            &mut hints.ip_adapter_ref,
        ];
        for (slot, value) in slots.into_iter().zip(&self.model_hints) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        Ok(plan)
    }
}

fn apply_block(dst: &mut TextBlockLayout, ov: &BlockOverride) {
    if let Some(p) = ov.position {
        dst.position = p;
    }
    if let Some(s) = ov.font_style {
        dst.font_style = s;
    }
    if let Some(s) = ov.font_size {
        dst.font_size = s;
    }
    if let Some(c) = ov.color {
        dst.color = c;
    }
    match &ov.emphasis {
        EmphasisOverride::Keep => {}
        EmphasisOverride::Clear => dst.emphasis = None,
        EmphasisOverride::Set(e) => dst.emphasis = Some(e.clone()),
    }
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn enum_field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let v = obj.get(key)?;
    match serde_json::from_value(v.clone()) {
        Ok(t) => Some(t),
        Err(e) => {
            tracing::debug!(key, error = %e, "ignoring invalid layout override field");
            None
        }
    }
}

fn color_field(obj: &Map<String, Value>, key: &str) -> Option<Rgb8> {
    str_field(obj, key).and_then(|s| Rgb8::from_hex(&s).ok())
}

fn parse_block(obj: &Map<String, Value>) -> BlockOverride {
    BlockOverride {
        position: enum_field(obj, "position"),
        font_style: enum_field(obj, "font_style"),
        font_size: enum_field(obj, "font_size"),
        color: color_field(obj, "color_hex"),
        emphasis: parse_emphasis(obj.get("emphasis")),
    }
}

fn parse_emphasis(v: Option<&Value>) -> EmphasisOverride {
    match v {
        None => EmphasisOverride::Keep,
        Some(Value::Null) => EmphasisOverride::Clear,
        Some(Value::Object(em)) => match str_field(em, "text") {
            Some(text) => {
                let scale = em
                    .get("scale")
                    .and_then(Value::as_f64)
                    .map(|s| s as f32)
                    .filter(|s| s.is_finite() && *s > 0.0 && *s <= MAX_EMPHASIS_SCALE)
                    .unwrap_or(DEFAULT_OVERRIDE_SCALE);
                EmphasisOverride::Set(EmphasisSpec {
                    text,
                    color: color_field(em, "color_hex").unwrap_or(EmphasisSpec::DEFAULT_COLOR),
                    scale,
                })
            }
            None => EmphasisOverride::Keep,
        },
        Some(_) => EmphasisOverride::Keep,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/merge.rs"]
mod tests;
