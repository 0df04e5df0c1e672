use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Rgb8,
    error::{AdError, AdResult},
};

/// Advertising tone. Serialized as its Korean label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Tone {
    /// `캐주얼`
    #[default]
    #[serde(rename = "캐주얼", alias = "casual")]
    Casual,
    /// `고급`
    #[serde(rename = "고급", alias = "premium")]
    Premium,
    /// `감성`
    #[serde(rename = "감성", alias = "emotional")]
    Emotional,
}

impl Tone {
    /// All tones, in declaration order.
    pub const ALL: [Tone; 3] = [Tone::Casual, Tone::Premium, Tone::Emotional];

    /// Korean label.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Casual => "캐주얼",
            Tone::Premium => "고급",
            Tone::Emotional => "감성",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tone {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "캐주얼" => Ok(Tone::Casual),
            "고급" => Ok(Tone::Premium),
            "감성" => Ok(Tone::Emotional),
            other => match other.to_ascii_lowercase().as_str() {
                "casual" => Ok(Tone::Casual),
                "premium" => Ok(Tone::Premium),
                "emotional" => Ok(Tone::Emotional),
                _ => Err(AdError::invalid_input(format!(
                    "unknown tone '{other}' (expected 캐주얼, 고급, 감성)"
                ))),
            },
        }
    }
}

/// Named text anchor on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Top edge, horizontally centered.
    UpperCenter,
    /// Top-left.
    UpperLeft,
    /// Top-right.
    UpperRight,
    /// Canvas center.
    Center,
    /// Bottom edge, horizontally centered.
    LowerCenter,
    /// Bottom-left.
    LowerLeft,
    /// Bottom-right.
    LowerRight,
}

impl Position {
    /// True for the three `lower_*` anchors.
    pub fn is_lower(self) -> bool {
        matches!(
            self,
            Position::LowerCenter | Position::LowerLeft | Position::LowerRight
        )
    }
}

/// Face weight of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    /// Regular weight.
    Regular,
    /// Bold weight.
    Bold,
}

/// Abstract font size; the platform table turns it into pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSizeTier {
    /// Small.
    Sm,
    /// Medium.
    Md,
    /// Large.
    Lg,
    /// Extra large.
    Xl,
}

/// Partial-string highlight inside a text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EmphasisSpec {
    /// Literal substring of the block text to highlight.
    pub text: String,
    /// Highlight color.
    #[serde(rename = "color_hex")]
    pub color: Rgb8,
    /// Font size multiplier for the highlighted segment.
    pub scale: f32,
}

impl EmphasisSpec {
    /// Default highlight color (`#FF4D4D`).
    pub const DEFAULT_COLOR: Rgb8 = Rgb8::new(0xFF, 0x4D, 0x4D);
}

/// Layout intent for one block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBlockLayout {
    /// Named anchor.
    pub position: Position,
    /// Face weight.
    pub font_style: FontStyle,
    /// Abstract size tier.
    pub font_size: FontSizeTier,
    /// Text color.
    #[serde(rename = "color_hex")]
    pub color: Rgb8,
    /// Optional highlight.
    pub emphasis: Option<EmphasisSpec>,
}

/// Which of the three copy blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Headline.
    Headline,
    /// Subcopy.
    Subcopy,
    /// Call to action.
    Cta,
}

impl BlockKind {
    /// Declaration order: headline, subcopy, cta.
    pub const ALL: [BlockKind; 3] = [BlockKind::Headline, BlockKind::Subcopy, BlockKind::Cta];
}

/// Layout intent for all three blocks.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutSpec {
    /// Headline block.
    pub headline: TextBlockLayout,
    /// Subcopy block.
    pub subcopy: TextBlockLayout,
    /// CTA block.
    pub cta: TextBlockLayout,
}

impl LayoutSpec {
    /// Block layout by kind.
    pub fn block(&self, kind: BlockKind) -> &TextBlockLayout {
        match kind {
            BlockKind::Headline => &self.headline,
            BlockKind::Subcopy => &self.subcopy,
            BlockKind::Cta => &self.cta,
        }
    }

    pub(crate) fn block_mut(&mut self, kind: BlockKind) -> &mut TextBlockLayout {
        match kind {
            BlockKind::Headline => &mut self.headline,
            BlockKind::Subcopy => &mut self.subcopy,
            BlockKind::Cta => &mut self.cta,
        }
    }
}

/// Ad copy strings, already truncated to display limits.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CopySpec {
    /// Headline.
    pub headline: String,
    /// Subcopy.
    pub subcopy: String,
    /// Call to action.
    pub cta: String,
}

impl CopySpec {
    /// Text by kind.
    pub fn text(&self, kind: BlockKind) -> &str {
        match kind {
            BlockKind::Headline => &self.headline,
            BlockKind::Subcopy => &self.subcopy,
            BlockKind::Cta => &self.cta,
        }
    }

    pub(crate) fn text_mut(&mut self, kind: BlockKind) -> &mut String {
        match kind {
            BlockKind::Headline => &mut self.headline,
            BlockKind::Subcopy => &mut self.subcopy,
            BlockKind::Cta => &mut self.cta,
        }
    }
}

/// Reserved keys for model-backed stages. The fallback stages never read them.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ModelHints {
    /// Style LoRA key.
    pub lora_key: Option<String>,
    /// ControlNet hint.
    pub control_hint: Option<String>,
    /// IP-Adapter reference image key.
    pub ip_adapter_ref: Option<String>,
}

impl ModelHints {
    /// Per-key `self`, else `fallback`.
    pub fn or(&self, fallback: &ModelHints) -> ModelHints {
        ModelHints {
            lora_key: self.lora_key.clone().or_else(|| fallback.lora_key.clone()),
            control_hint: self
                .control_hint
                .clone()
                .or_else(|| fallback.control_hint.clone()),
            ip_adapter_ref: self
                .ip_adapter_ref
                .clone()
                .or_else(|| fallback.ip_adapter_ref.clone()),
        }
    }
}

/// Product brief entered by the user.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Brief {
    /// Product or service name.
    pub product: String,
    /// Advertising tone.
    pub tone: Tone,
    /// Discount phrase, e.g. `50% 할인`.
    #[serde(default)]
    pub discount: Option<String>,
    /// Free-text background hint.
    #[serde(default)]
    pub prompt_extra: Option<String>,
}

impl Brief {
    /// Brief with no discount and no hint.
    pub fn new(product: impl Into<String>, tone: Tone) -> Self {
        Self {
            product: product.into(),
            tone,
            discount: None,
            prompt_extra: None,
        }
    }

    /// Set the discount phrase.
    pub fn with_discount(mut self, discount: impl Into<String>) -> Self {
        self.discount = Some(discount.into());
        self
    }

    /// Set the background hint.
    pub fn with_prompt_extra(mut self, extra: impl Into<String>) -> Self {
        self.prompt_extra = Some(extra.into());
        self
    }
}

/// Structured ad plan: copy, background prompt and layout intent.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    /// Copy strings.
    pub copy: CopySpec,
    /// Prompt for the background stage. Always carries the three safety tokens.
    pub background_prompt: String,
    /// Layout intent.
    pub layout: LayoutSpec,
    /// Reserved model hints.
    pub model_hints: ModelHints,
}

impl Plan {
    /// Pretty JSON, for `--plan-out`.
    pub fn to_json_pretty(&self) -> AdResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/model.rs"]
mod tests;
