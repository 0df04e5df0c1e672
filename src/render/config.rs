use std::path::Path;

use anyhow::Context;

use crate::{
    assets::fonts::FontConfig,
    foundation::{
        core::Size,
        error::{AdError, AdResult},
    },
    layout::resolver::Platform,
    plan::builder::CopyLimits,
    stages::{
        background::BackgroundConfig, relight::RelightConfig, segment::SegmentConfig,
        upscale::UpscaleConfig,
    },
};

/// Everything a [`Pipeline`](crate::Pipeline) needs besides the request itself.
///
/// Every field has a default, so a JSON file only has to name what it changes:
///
/// ```json
/// { "platform": "poster", "relight": { "shadow_opacity": 0.5 } }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Output canvas size.
    pub canvas: Size,
    /// Target platform for safe margins and font sizes.
    pub platform: Platform,
    /// Segmenter settings.
    pub segment: SegmentConfig,
    /// Background settings.
    pub background: BackgroundConfig,
    /// Relighter settings.
    pub relight: RelightConfig,
    /// Upscaler settings. Without an explicit `max_size`, output is clamped to `canvas`.
    pub upscale: UpscaleConfig,
    /// Font files.
    pub fonts: FontConfig,
    /// Copy length limits in characters.
    pub copy_limits: CopyLimits,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canvas: Size {
                width: 1080,
                height: 1080,
            },
            platform: Platform::default(),
            segment: SegmentConfig::default(),
            background: BackgroundConfig::default(),
            relight: RelightConfig::default(),
            upscale: UpscaleConfig::default(),
            fonts: FontConfig::default(),
            copy_limits: CopyLimits::default(),
        }
    }
}

impl PipelineConfig {
    /// Read and validate a JSON config file.
    #[tracing::instrument]
    pub fn from_path(path: &Path) -> AdResult<Self> {
        if !path.is_file() {
            return Err(AdError::resource_missing(format!(
                "config file '{}' does not exist",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> AdResult<()> {
        Size::new(self.canvas.width, self.canvas.height)?;
        self.segment.validate()?;
        self.relight.validate()?;
        self.upscale.validate()?;
        self.copy_limits.validate()?;
        Ok(())
    }

    /// Upscale settings with the canvas clamp filled in.
    pub fn effective_upscale(&self) -> UpscaleConfig {
        let mut up = self.upscale.clone();
        if up.max_size.is_none() {
            up.max_size = Some((self.canvas.width, self.canvas.height));
        }
        up
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/config.rs"]
mod tests;
