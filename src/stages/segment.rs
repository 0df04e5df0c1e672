//! Product cutout.
//!
//! The fallback assumes a centered product on a roughly uniform background: it estimates the
//! background color from the image border and keeps pixels that are far enough from it. This is
//! a weak heuristic for simple studio shots, not a general segmenter.

use crate::{
    effects::blur::gaussian_blur_mask,
    foundation::{
        core::{Canvas, Mask},
        error::{AdError, AdResult},
        math::trunc_u32,
    },
};

/// Segmentation implementations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentBackend {
    /// Border color-distance heuristic.
    #[default]
    Fallback,
    /// BiRefNet model (not wired).
    #[serde(rename = "birefnet")]
    BiRefNet,
    /// Segment Anything (not wired).
    Sam,
}

impl SegmentBackend {
    /// Config name.
    pub fn name(self) -> &'static str {
        match self {
            SegmentBackend::Fallback => "fallback",
            SegmentBackend::BiRefNet => "birefnet",
            SegmentBackend::Sam => "sam",
        }
    }
}

/// Segmenter settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegmentConfig {
    /// Implementation to use.
    pub backend: SegmentBackend,
    /// Gaussian sigma used to feather the binary mask; `0` keeps hard edges.
    pub feather_radius: f32,
    /// Thickness of the border band sampled for the background color (at least 4 is used).
    pub bg_sample_border: u32,
    /// Fraction cut from each side to get the center region; clamped to `[0, 0.45]`.
    pub fg_center_margin: f32,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            backend: SegmentBackend::Fallback,
            feather_radius: 6.0,
            bg_sample_border: 24,
            fg_center_margin: 0.18,
        }
    }
}

impl SegmentConfig {
    /// Reject values the fallback cannot use.
    pub fn validate(&self) -> AdResult<()> {
        if !self.feather_radius.is_finite() || self.feather_radius < 0.0 {
            return Err(AdError::invalid_input(
                "segment.feather_radius must be finite and >= 0",
            ));
        }
        if !self.fg_center_margin.is_finite() {
            return Err(AdError::invalid_input(
                "segment.fg_center_margin must be finite",
            ));
        }
        Ok(())
    }
}

/// Turns a product photo into a cutout with a transparent background.
pub trait Segmenter: Send + Sync {
    /// Cut out the foreground, cropped to its bounding box.
    fn segment(&self, image: Canvas) -> AdResult<Canvas>;
}

/// Pick the implementation named by `cfg.backend`.
pub fn create_segmenter(cfg: &SegmentConfig) -> AdResult<Box<dyn Segmenter>> {
    match cfg.backend {
        SegmentBackend::Fallback => Ok(Box::new(FallbackSegmenter::new(cfg.clone())?)),
        other => Err(AdError::backend_unsupported("segment", other.name())),
    }
}

/// Border color-distance segmenter.
#[derive(Clone, Debug)]
pub struct FallbackSegmenter {
    cfg: SegmentConfig,
}

impl FallbackSegmenter {
    /// Validate `cfg` and build.
    pub fn new(cfg: SegmentConfig) -> AdResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }
}

impl Segmenter for FallbackSegmenter {
    #[tracing::instrument(skip(self, image), fields(size = %image.size()))]
    fn segment(&self, image: Canvas) -> AdResult<Canvas> {
        let mut mask = foreground_mask(&image, &self.cfg)?;
        if self.cfg.feather_radius > 0.0 {
            mask = gaussian_blur_mask(&mask, self.cfg.feather_radius)?;
        }

        let bbox = mask.bounding_box();
        let cutout = image.with_alpha(&mask)?;
        match bbox {
            Some(rect) => cutout.crop(rect),
            None => {
                tracing::warn!("segmentation kept no pixels");
                Ok(cutout)
            }
        }
    }
}

/// Mean RGB of the four border bands, each `border` pixels thick (minimum 4).
///
/// Corner pixels belong to two bands and are counted twice.
pub fn estimate_background_color(image: &Canvas, border: u32) -> [f64; 3] {
    let (w, h) = (image.width(), image.height());
    let bh = border.max(4).min(h);
    let bw = border.max(4).min(w);

    let mut sum = [0.0f64; 3];
    let mut count = 0u64;
    let mut add_rect = |x0: u32, x1: u32, y0: u32, y1: u32| {
        for y in y0..y1 {
            for x in x0..x1 {
                let px = image.pixel(x, y);
                for c in 0..3 {
                    sum[c] += f64::from(px[c]);
                }
                count += 1;
            }
        }
    };
    add_rect(0, w, 0, bh);
    add_rect(0, w, h - bh, h);
    add_rect(0, bw, 0, h);
    add_rect(w - bw, w, 0, h);

    let n = count.max(1) as f64;
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

/// Distance threshold: `max(18, 0.55 × mean distance over the center region)`.
///
/// `dist` is row-major, `w × h`. An empty center region yields the floor.
pub fn distance_threshold(dist: &[f64], w: u32, h: u32, margin: f32) -> f64 {
    const FLOOR: f64 = 18.0;
    const CENTER_FACTOR: f64 = 0.55;

    let m = f64::from(margin).clamp(0.0, 0.45);
    let top = trunc_u32(f64::from(h) * m);
    let bottom = trunc_u32(f64::from(h) * (1.0 - m));
    let left = trunc_u32(f64::from(w) * m);
    let right = trunc_u32(f64::from(w) * (1.0 - m));
    if top >= bottom || left >= right {
        return FLOOR;
    }

    let mut sum = 0.0;
    for y in top..bottom {
        let row = &dist[y as usize * w as usize..][..w as usize];
        sum += row[left as usize..right as usize].iter().sum::<f64>();
    }
    let n = f64::from(bottom - top) * f64::from(right - left);
    FLOOR.max(sum / n * CENTER_FACTOR)
}

/// Binary (0/255) foreground mask before feathering.
pub fn foreground_mask(image: &Canvas, cfg: &SegmentConfig) -> AdResult<Mask> {
    let (w, h) = (image.width(), image.height());
    let bg = estimate_background_color(image, cfg.bg_sample_border);

    let dist: Vec<f64> = image
        .data()
        .chunks_exact(4)
        .map(|px| {
            (0..3)
                .map(|c| {
                    let d = f64::from(px[c]) - bg[c];
                    d * d
                })
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    let thr = distance_threshold(&dist, w, h, cfg.fg_center_margin);
    tracing::debug!(?bg, thr, "segment threshold");

    let data = dist.iter().map(|&d| if d > thr { 255 } else { 0 }).collect();
    Mask::from_raw(w, h, data)
}

#[cfg(test)]
#[path = "../../tests/unit/stages/segment.rs"]
mod tests;
