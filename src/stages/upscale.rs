//! Final-resolution resampling.

use crate::{
    effects::resample::resize_lanczos,
    foundation::{
        core::{Canvas, Size},
        error::{AdError, AdResult},
        math::trunc_u32,
    },
};

/// Upscaling implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpscaleBackend {
    /// Lanczos3 resize.
    #[default]
    Fallback,
    /// Real-ESRGAN (not wired).
    #[serde(rename = "realesrgan")]
    RealEsrgan,
    /// SwinIR (not wired).
    #[serde(rename = "swinir")]
    SwinIr,
}

impl UpscaleBackend {
    /// Config name.
    pub fn name(self) -> &'static str {
        match self {
            UpscaleBackend::Fallback => "fallback",
            UpscaleBackend::RealEsrgan => "realesrgan",
            UpscaleBackend::SwinIr => "swinir",
        }
    }
}

/// Upscaler settings.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpscaleConfig {
    /// Implementation to use.
    pub backend: UpscaleBackend,
    /// Integer scale factor, at least 1.
    pub scale: u32,
    /// Optional `(max_w, max_h)` bound; a `0` component means unbounded on that axis.
    pub max_size: Option<(u32, u32)>,
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            backend: UpscaleBackend::Fallback,
            scale: 1,
            max_size: None,
        }
    }
}

impl UpscaleConfig {
    /// Reject values the fallback cannot use.
    pub fn validate(&self) -> AdResult<()> {
        if self.scale == 0 {
            return Err(AdError::invalid_input("upscale.scale must be >= 1"));
        }
        Ok(())
    }
}

/// Output size for `input` under `scale` and an optional clamp.
///
/// The clamp only ever shrinks, uniformly on both axes.
pub fn target_size(input: Size, scale: u32, max_size: Option<(u32, u32)>) -> AdResult<Size> {
    if scale == 0 {
        return Err(AdError::invalid_input("upscale scale must be >= 1"));
    }
    let overflow = || AdError::invalid_input(format!("{input} x{scale} overflows u32"));
    let w = input.width.checked_mul(scale).ok_or_else(overflow)?;
    let h = input.height.checked_mul(scale).ok_or_else(overflow)?;

    let Some((max_w, max_h)) = max_size else {
        return Size::new(w, h);
    };
    let axis = |max: u32, v: u32| {
        if max == 0 {
            1.0
        } else {
            f64::from(max) / f64::from(v)
        }
    };
    let s = axis(max_w, w).min(axis(max_h, h)).min(1.0);
    let mut out_w = trunc_u32(f64::from(w) * s).max(1);
    let mut out_h = trunc_u32(f64::from(h) * s).max(1);
    if max_w > 0 {
        out_w = out_w.min(max_w);
    }
    if max_h > 0 {
        out_h = out_h.min(max_h);
    }
    Size::new(out_w, out_h)
}

/// Resizes the composed canvas.
pub trait Upscaler: Send + Sync {
    /// Resize `image` per the configured scale and clamp.
    fn upscale(&self, image: Canvas) -> AdResult<Canvas>;
}

/// Pick the implementation named by `cfg.backend`.
pub fn create_upscaler(cfg: &UpscaleConfig) -> AdResult<Box<dyn Upscaler>> {
    match cfg.backend {
        UpscaleBackend::Fallback => Ok(Box::new(LanczosUpscaler::new(cfg.clone())?)),
        other => Err(AdError::backend_unsupported("upscale", other.name())),
    }
}

/// Lanczos3 resampler.
#[derive(Clone, Debug)]
pub struct LanczosUpscaler {
    cfg: UpscaleConfig,
}

impl LanczosUpscaler {
    /// Validate `cfg` and build.
    pub fn new(cfg: UpscaleConfig) -> AdResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }
}

impl Upscaler for LanczosUpscaler {
    #[tracing::instrument(skip_all, fields(input = %image.size(), scale = self.cfg.scale))]
    fn upscale(&self, image: Canvas) -> AdResult<Canvas> {
        let target = target_size(image.size(), self.cfg.scale, self.cfg.max_size)?;
        tracing::debug!(%target, "upscale target");
        resize_lanczos(image, target)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/upscale.rs"]
mod tests;
