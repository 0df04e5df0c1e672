use anyhow::Context;
use regex::Regex;

use crate::{
    foundation::{
        core::Rgb8,
        error::{AdError, AdResult},
    },
    plan::{
        merge::PlanOverride,
        model::{
            Brief, CopySpec, EmphasisSpec, FontSizeTier, FontStyle, LayoutSpec, ModelHints, Plan,
            Position, TextBlockLayout, Tone,
        },
        safety::{PromptGuard, SAFETY_TOKENS},
    },
};

/// Maximum copy lengths, in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CopyLimits {
    /// Headline limit.
    pub headline: usize,
    /// Subcopy limit.
    pub subcopy: usize,
    /// CTA limit.
    pub cta: usize,
}

impl Default for CopyLimits {
    fn default() -> Self {
        Self {
            headline: 20,
            subcopy: 40,
            cta: 20,
        }
    }
}

impl CopyLimits {
    /// Cut every string that exceeds its limit.
    pub fn apply(&self, copy: CopySpec) -> CopySpec {
        CopySpec {
            headline: truncate_with_ellipsis(&copy.headline, self.headline),
            subcopy: truncate_with_ellipsis(&copy.subcopy, self.subcopy),
            cta: truncate_with_ellipsis(&copy.cta, self.cta),
        }
    }

    /// Every limit must leave room for one character plus the ellipsis.
    pub fn validate(&self) -> AdResult<()> {
        for (name, limit) in [
            ("headline", self.headline),
            ("subcopy", self.subcopy),
            ("cta", self.cta),
        ] {
            if limit < 3 {
                return Err(AdError::invalid_input(format!(
                    "copy_limits.{name} must be >= 3, got {limit}"
                )));
            }
        }
        Ok(())
    }
}

/// Keep `s` when it fits in `limit` characters, else its first `limit - 2` characters plus `…`.
pub fn truncate_with_ellipsis(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        return s.to_string();
    }
    let mut out: String = s.chars().take(limit.saturating_sub(2)).collect();
    out.push('…');
    out
}

const BASE_PROMPT: [&str; 4] = [
    "high quality background for advertisement",
    "instagram-friendly composition",
    "soft depth of field",
    "clean scene",
];

fn tone_prompt(tone: Tone) -> [&'static str; 4] {
    match tone {
        Tone::Premium => [
            "luxury cafe mood",
            "premium interior",
            "warm but elegant lighting",
            "wood texture",
        ],
        Tone::Emotional => [
            "warm cozy cafe mood",
            "soft warm lighting",
            "wooden table",
            "gentle bokeh",
        ],
        Tone::Casual => [
            "bright friendly cafe mood",
            "natural lighting",
            "wooden table",
            "simple clean",
        ],
    }
}

/// Rule-based planner: brief in, [`Plan`] out.
#[derive(Clone, Debug)]
pub struct PlanBuilder {
    guard: PromptGuard,
    percent: Regex,
    limits: CopyLimits,
}

impl PlanBuilder {
    /// Builder with the given copy limits.
    pub fn new(limits: CopyLimits) -> AdResult<Self> {
        limits.validate()?;
        let percent = Regex::new(r"(?i)\d+\s?(?:%|퍼센트|percent)")
            .context("compile percent pattern")?;
        Ok(Self {
            guard: PromptGuard::new()?,
            percent,
            limits,
        })
    }

    /// Prompt guard shared with the override merge.
    pub fn guard(&self) -> &PromptGuard {
        &self.guard
    }

    /// Build a plan, then merge an external override on top when one is given.
    #[tracing::instrument(skip(self, plan_override), fields(tone = %brief.tone))]
    pub fn build(&self, brief: &Brief, plan_override: Option<&PlanOverride>) -> AdResult<Plan> {
        let product = brief.product.trim();
        if product.is_empty() {
            return Err(AdError::invalid_input("product must be non-empty"));
        }
        let discount = non_empty(brief.discount.as_deref());
        let extra = non_empty(brief.prompt_extra.as_deref());

        let copy = self.limits.apply(rule_copy(product, brief.tone, discount));
        let background_prompt = self.rule_prompt(product, brief.tone, extra);
        let layout = self.rule_layout(brief.tone, discount.is_some(), &copy.headline);

        let mut plan = Plan {
            copy,
            background_prompt,
            layout,
            model_hints: ModelHints::default(),
        };

        if let Some(ov) = plan_override {
            plan = ov.apply(plan, &self.guard)?;
            plan.copy = self.limits.apply(plan.copy);
            if ov.replaces_headline_text_only() {
                plan.layout.headline.emphasis =
                    self.rule_emphasis(discount.is_some(), &plan.copy.headline);
            }
        }

        tracing::debug!(headline = %plan.copy.headline, prompt = %plan.background_prompt, "plan built");
        Ok(plan)
    }

    /// First percent phrase (`50%`, `30 퍼센트`, `10 percent`) in `text`, verbatim.
    pub fn emphasis_target(&self, text: &str) -> Option<String> {
        self.percent.find(text).map(|m| m.as_str().to_string())
    }

    fn rule_prompt(&self, product: &str, tone: Tone, extra: Option<&str>) -> String {
        let mut parts: Vec<String> = BASE_PROMPT
            .iter()
            .chain(SAFETY_TOKENS.iter())
            .chain(tone_prompt(tone).iter())
            .map(|s| (*s).to_string())
            .collect();
        parts.push(format!("fits well with {product}"));
        if let Some(hint) = extra.and_then(|e| self.guard.sanitize_hint(e)) {
            parts.push(hint);
        }
        parts.join(", ")
    }

    fn rule_emphasis(&self, has_discount: bool, headline: &str) -> Option<EmphasisSpec> {
        if !has_discount {
            return None;
        }
        self.emphasis_target(headline).map(|text| EmphasisSpec {
            text,
            color: EmphasisSpec::DEFAULT_COLOR,
            scale: 1.2,
        })
    }

    fn rule_layout(&self, tone: Tone, has_discount: bool, headline: &str) -> LayoutSpec {
        let emphasis = self.rule_emphasis(has_discount, headline);

        LayoutSpec {
            headline: TextBlockLayout {
                position: Position::UpperCenter,
                font_style: FontStyle::Bold,
                font_size: if tone == Tone::Premium {
                    FontSizeTier::Lg
                } else {
                    FontSizeTier::Xl
                },
                color: Rgb8::WHITE,
                emphasis,
            },
            subcopy: TextBlockLayout {
                position: Position::LowerCenter,
                font_style: FontStyle::Regular,
                font_size: FontSizeTier::Md,
                color: Rgb8::WHITE,
                emphasis: None,
            },
            cta: TextBlockLayout {
                position: Position::LowerCenter,
                font_style: FontStyle::Bold,
                font_size: FontSizeTier::Md,
                color: Rgb8::WHITE,
                emphasis: None,
            },
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

fn rule_copy(product: &str, tone: Tone, discount: Option<&str>) -> CopySpec {
    let headline = match discount {
        Some(d) => format!("오늘만 {d}"),
        None => format!("{product} 지금 만나보세요"),
    };
    let (subcopy, cta) = match tone {
        Tone::Premium => (format!("{product}의 깊은 매력을 프리미엄 무드로."), "지금 예약하기"),
        Tone::Emotional => (format!("따뜻한 순간, {product}와 함께."), "지금 확인하기"),
        Tone::Casual => (format!("가볍게 즐기는 {product}, 오늘도 부담 없이!"), "바로 보기"),
    };
    CopySpec {
        headline,
        subcopy,
        cta: cta.to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/builder.rs"]
mod tests;
