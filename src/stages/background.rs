//! Background synthesis.

use crate::{
    foundation::{
        core::{Canvas, Rgb8, Size},
        error::{AdError, AdResult},
    },
    plan::{model::ModelHints, safety::has_safety_tokens},
};

/// Background implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundBackend {
    /// Keyword-toned vertical gradient.
    #[default]
    Fallback,
    /// Flux text-to-image (not wired).
    Flux,
    /// Stable Diffusion (not wired).
    StableDiffusion,
    /// OpenAI image API (not wired).
    #[serde(rename = "openai")]
    OpenAi,
}

impl BackgroundBackend {
    /// Config name.
    pub fn name(self) -> &'static str {
        match self {
            BackgroundBackend::Fallback => "fallback",
            BackgroundBackend::Flux => "flux",
            BackgroundBackend::StableDiffusion => "stable_diffusion",
            BackgroundBackend::OpenAi => "openai",
        }
    }
}

/// Background settings. The output size is the pipeline canvas size.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    /// Implementation to use.
    pub backend: BackgroundBackend,
    /// Hints used when the plan carries none for a key.
    pub model_hints: ModelHints,
}

/// Prompt plus size in, opaque background out.
pub trait BackgroundGenerator: Send + Sync {
    /// Render a background for `prompt`. The prompt must carry the safety tokens.
    fn generate(&self, prompt: &str, size: Size, hints: &ModelHints) -> AdResult<Canvas>;
}

/// Pick the implementation named by `cfg.backend`.
pub fn create_background_generator(
    cfg: &BackgroundConfig,
) -> AdResult<Box<dyn BackgroundGenerator>> {
    match cfg.backend {
        BackgroundBackend::Fallback => Ok(Box::new(GradientBackground)),
        other => Err(AdError::backend_unsupported("background", other.name())),
    }
}

/// Mood bucket picked from prompt keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mood {
    /// `luxury` / `premium`.
    Luxury,
    /// `warm` / `cozy`.
    Warm,
    /// Everything else.
    Neutral,
}

impl Mood {
    /// Classify by case-insensitive keyword presence; luxury wins over warm.
    pub fn classify(prompt: &str) -> Self {
        let p = prompt.to_lowercase();
        if p.contains("luxury") || p.contains("premium") {
            Mood::Luxury
        } else if p.contains("warm") || p.contains("cozy") {
            Mood::Warm
        } else {
            Mood::Neutral
        }
    }

    /// Top and bottom gradient colors.
    pub fn palette(self) -> (Rgb8, Rgb8) {
        match self {
            Mood::Luxury => (Rgb8::new(40, 30, 20), Rgb8::new(90, 70, 50)),
            Mood::Warm => (Rgb8::new(120, 80, 50), Rgb8::new(220, 180, 140)),
            Mood::Neutral => (Rgb8::new(200, 200, 200), Rgb8::new(245, 245, 245)),
        }
    }
}

/// Top-to-bottom linear gradient in the prompt's mood palette.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientBackground;

impl BackgroundGenerator for GradientBackground {
    #[tracing::instrument(skip(self, prompt, hints))]
    fn generate(&self, prompt: &str, size: Size, hints: &ModelHints) -> AdResult<Canvas> {
        if !has_safety_tokens(prompt) {
            return Err(AdError::unsafe_prompt(
                "background prompt is missing 'no text, no logo, no watermark'",
            ));
        }
        let size = Size::new(size.width, size.height)?;
        let mood = Mood::classify(prompt);
        tracing::debug!(?mood, ?hints, "gradient background");

        let (top, bottom) = mood.palette();
        let denom = f64::from(size.height.saturating_sub(1).max(1));
        let lerp = |a: u8, b: u8, t: f64| (f64::from(a) * (1.0 - t) + f64::from(b) * t) as u8;

        let row_bytes = size.width as usize * 4;
        let mut data = Vec::with_capacity(size.area() * 4);
        for y in 0..size.height {
            let t = f64::from(y) / denom;
            let px = [
                lerp(top.r, bottom.r, t),
                lerp(top.g, bottom.g, t),
                lerp(top.b, bottom.b, t),
                255,
            ];
            data.extend(px.iter().cycle().take(row_bytes));
        }
        Canvas::from_rgba8(size.width, size.height, data)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/background.rs"]
mod tests;
