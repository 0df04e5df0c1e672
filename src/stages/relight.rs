//! Foreground placement with a soft drop shadow and brightness tone matching.

use crate::{
    effects::{
        blur::gaussian_blur_mask,
        composite::{paste_over, paste_tinted_mask},
        resample::resize_lanczos,
    },
    foundation::{
        core::{Canvas, Mask, Rgb8, Size},
        error::{AdError, AdResult},
        math::trunc_u32,
    },
};

const FOREGROUND_FILL: f64 = 0.6;
const FOREGROUND_CENTER_Y: f64 = 0.55;
const MIN_BRIGHTNESS: f32 = 0.85;
const MAX_BRIGHTNESS: f32 = 1.15;

/// Relighting implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelightBackend {
    /// Shadow plus brightness scaling.
    #[default]
    Fallback,
    /// IC-Light model (not wired).
    IcLight,
}

impl RelightBackend {
    /// Config name.
    pub fn name(self) -> &'static str {
        match self {
            RelightBackend::Fallback => "fallback",
            RelightBackend::IcLight => "ic_light",
        }
    }
}

/// Relighter settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelightConfig {
    /// Implementation to use.
    pub backend: RelightBackend,
    /// Shadow alpha multiplier in `[0, 1]`.
    pub shadow_opacity: f32,
    /// Shadow Gaussian sigma in pixels.
    pub shadow_blur: f32,
    /// Shadow offset `(dx, dy)` from the foreground position.
    pub shadow_offset: (i32, i32),
    /// How strongly background luminance pulls foreground brightness.
    pub tone_match_strength: f32,
}

impl Default for RelightConfig {
    fn default() -> Self {
        Self {
            backend: RelightBackend::Fallback,
            shadow_opacity: 0.35,
            shadow_blur: 24.0,
            shadow_offset: (0, 24),
            tone_match_strength: 0.15,
        }
    }
}

impl RelightConfig {
    /// Reject values the fallback cannot use.
    pub fn validate(&self) -> AdResult<()> {
        if !(0.0..=1.0).contains(&self.shadow_opacity) {
            return Err(AdError::invalid_input(
                "relight.shadow_opacity must be in [0, 1]",
            ));
        }
        if !self.shadow_blur.is_finite() || self.shadow_blur < 0.0 {
            return Err(AdError::invalid_input(
                "relight.shadow_blur must be finite and >= 0",
            ));
        }
        if !self.tone_match_strength.is_finite() {
            return Err(AdError::invalid_input(
                "relight.tone_match_strength must be finite",
            ));
        }
        Ok(())
    }
}

/// Composes a foreground cutout onto a background.
pub trait Relighter: Send + Sync {
    /// Place `foreground` onto `background`. With no foreground, or a fully transparent one, the
    /// background is returned unchanged.
    fn relight(&self, background: Canvas, foreground: Option<Canvas>) -> AdResult<Canvas>;
}

/// Pick the implementation named by `cfg.backend`.
pub fn create_relighter(cfg: &RelightConfig) -> AdResult<Box<dyn Relighter>> {
    match cfg.backend {
        RelightBackend::Fallback => Ok(Box::new(ShadowRelighter::new(cfg.clone())?)),
        other => Err(AdError::backend_unsupported("relight", other.name())),
    }
}

/// Brightness multiplier for a background luminance in `[0, 1]`, clamped to `[0.85, 1.15]`.
pub fn brightness_factor(luminance: f32, strength: f32) -> f32 {
    let f = 1.0 + (luminance - 0.5) * strength;
    if f.is_nan() {
        return 1.0;
    }
    f.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS)
}

/// Mean of all RGB values in the central 20%×20% of `bg`, normalized to `[0, 1]`.
///
/// An empty region reads as mid-gray.
pub fn center_luminance(bg: &Canvas) -> f32 {
    let (w, h) = (f64::from(bg.width()), f64::from(bg.height()));
    let (x0, x1) = (trunc_u32(w * 0.4), trunc_u32(w * 0.6));
    let (y0, y1) = (trunc_u32(h * 0.4), trunc_u32(h * 0.6));
    if x0 >= x1 || y0 >= y1 {
        return 0.5;
    }

    let mut sum = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = bg.pixel(x, y);
            sum += u64::from(px[0]) + u64::from(px[1]) + u64::from(px[2]);
        }
    }
    let n = u64::from(x1 - x0) * u64::from(y1 - y0) * 3;
    (sum as f64 / n as f64 / 255.0) as f32
}

/// Where the scaled foreground lands: size plus top-left corner.
pub fn placement(bg: Size, fg: Size) -> (Size, i64, i64) {
    let scale = (f64::from(bg.width) / f64::from(fg.width))
        .min(f64::from(bg.height) / f64::from(fg.height))
        * FOREGROUND_FILL;
    let size = Size {
        width: trunc_u32(f64::from(fg.width) * scale).max(1),
        height: trunc_u32(f64::from(fg.height) * scale).max(1),
    };
    let x = (i64::from(bg.width) - i64::from(size.width)).div_euclid(2);
    let y = (f64::from(bg.height) * FOREGROUND_CENTER_Y - f64::from(size.height) / 2.0) as i64;
    (size, x, y)
}

/// Scale RGB by `factor`, leaving alpha untouched.
fn scale_brightness(mut fg: Canvas, factor: f32) -> Canvas {
    if (factor - 1.0).abs() < f32::EPSILON {
        return fg;
    }
    for px in fg.data_mut().chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            *c = (f32::from(*c) * factor).round().clamp(0.0, 255.0) as u8;
        }
    }
    fg
}

/// Shadow alpha: foreground alpha times `opacity`, then blurred.
fn shadow_mask(fg: &Canvas, opacity: f32, blur: f32) -> AdResult<Mask> {
    let alpha: Vec<u8> = fg
        .alpha_mask()
        .data()
        .iter()
        .map(|&a| (f32::from(a) * opacity) as u8)
        .collect();
    let mask = Mask::from_raw(fg.width(), fg.height(), alpha)?;
    if blur > 0.0 {
        gaussian_blur_mask(&mask, blur)
    } else {
        Ok(mask)
    }
}

/// Drop shadow plus tone-matched foreground.
#[derive(Clone, Debug)]
pub struct ShadowRelighter {
    cfg: RelightConfig,
}

impl ShadowRelighter {
    /// Validate `cfg` and build.
    pub fn new(cfg: RelightConfig) -> AdResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }
}

impl Relighter for ShadowRelighter {
    #[tracing::instrument(skip_all, fields(bg = %background.size()))]
    fn relight(&self, background: Canvas, foreground: Option<Canvas>) -> AdResult<Canvas> {
        let Some(fg) = foreground else {
            tracing::debug!("no foreground, passing background through");
            return Ok(background);
        };
        if fg.visible_pixel_count() == 0 {
            tracing::warn!("foreground cutout is fully transparent, passing background through");
            return Ok(background);
        }

        let (size, x, y) = placement(background.size(), fg.size());
        let fg = resize_lanczos(fg, size)?;

        let shadow = shadow_mask(&fg, self.cfg.shadow_opacity, self.cfg.shadow_blur)?;
        let lum = center_luminance(&background);
        let factor = brightness_factor(lum, self.cfg.tone_match_strength);
        tracing::debug!(%size, x, y, lum, factor, "foreground placement");

        let (dx, dy) = self.cfg.shadow_offset;
        let canvas = paste_tinted_mask(
            background,
            &shadow,
            Rgb8::new(0, 0, 0),
            x + i64::from(dx),
            y + i64::from(dy),
        )?;
        paste_over(canvas, &scale_brightness(fg, factor), x, y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/relight.rs"]
mod tests;
