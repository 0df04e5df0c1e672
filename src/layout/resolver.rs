use std::{fmt, str::FromStr};

use crate::{
    foundation::{
        core::{Rgba8, Size},
        error::AdError,
        math::trunc_u32,
    },
    plan::model::{FontSizeTier, Position, TextBlockLayout},
};

/// Output platform; picks safe margins and the font size table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Square feed post.
    #[default]
    Instagram,
    /// Print poster.
    Poster,
    /// Web banner.
    Banner,
}

impl Platform {
    /// Config name.
    pub fn name(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Poster => "poster",
            Platform::Banner => "banner",
        }
    }

    /// Top and bottom safe margin as a fraction of canvas height.
    pub fn safe_margin_fraction(self) -> f64 {
        match self {
            Platform::Instagram => 0.10,
            Platform::Poster => 0.08,
            Platform::Banner => 0.15,
        }
    }

    /// Pixel size for a tier.
    pub fn font_px(self, tier: FontSizeTier) -> u32 {
        let table: [u32; 4] = match self {
            Platform::Instagram => [36, 52, 72, 96],
            Platform::Poster => [48, 72, 96, 140],
            Platform::Banner => [32, 48, 64, 88],
        };
        match tier {
            FontSizeTier::Sm => table[0],
            FontSizeTier::Md => table[1],
            FontSizeTier::Lg => table[2],
            FontSizeTier::Xl => table[3],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = AdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "poster" => Ok(Platform::Poster),
            "banner" => Ok(Platform::Banner),
            other => Err(AdError::invalid_input(format!(
                "unknown platform '{other}' (expected instagram, poster, banner)"
            ))),
        }
    }
}

/// Horizontal alignment of text relative to the anchor x.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HAlign {
    /// Text starts at x.
    Start,
    /// Text is centered on x.
    Middle,
    /// Text ends at x.
    End,
}

/// Vertical alignment of a line box relative to the anchor y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VAlign {
    /// Ascender line at y.
    Top,
    /// Line box centered on y.
    Middle,
    /// Descender line at y.
    Bottom,
}

/// Text anchor: horizontal × vertical alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Anchor {
    /// Horizontal alignment.
    pub h: HAlign,
    /// Vertical alignment.
    pub v: VAlign,
}

impl Anchor {
    /// Build an anchor.
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    /// Offset of the box's left edge from the anchor x for a box `width` wide.
    pub fn x_offset(self, width: f32) -> f32 {
        match self.h {
            HAlign::Start => 0.0,
            HAlign::Middle => -width / 2.0,
            HAlign::End => -width,
        }
    }
}

/// Emphasis after size resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedEmphasis {
    /// Literal substring to highlight.
    pub text: String,
    /// Highlight color.
    pub color: Rgba8,
    /// Highlight size: block size × scale, at least 1.
    pub font_px: u32,
}

/// Pixel-level placement of a text block.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedTextLayout {
    /// Anchor x.
    pub x: i32,
    /// Anchor y.
    pub y: i32,
    /// Font size in pixels.
    pub font_px: u32,
    /// Alignment around `(x, y)`.
    pub anchor: Anchor,
    /// Text color.
    pub color: Rgba8,
    /// Optional highlight.
    pub emphasis: Option<ResolvedEmphasis>,
}

/// Top and bottom safe margins in pixels.
pub fn safe_margins(platform: Platform, height: u32) -> (u32, u32) {
    let m = trunc_u32(f64::from(height) * platform.safe_margin_fraction());
    (m, m)
}

/// Anchor point and alignment for a named position.
pub fn position_xy(position: Position, canvas: Size, platform: Platform) -> (i32, i32, Anchor) {
    let (w, h) = (canvas.width, canvas.height);
    let (top, bottom) = safe_margins(platform, h);
    let left = trunc_u32(f64::from(w) * 0.08);
    let right = trunc_u32(f64::from(w) * 0.92);
    let mid_x = w / 2;
    let low_y = h.saturating_sub(bottom);

    let (x, y, anchor) = match position {
        Position::UpperCenter => (mid_x, top, Anchor::new(HAlign::Middle, VAlign::Top)),
        Position::UpperLeft => (left, top, Anchor::new(HAlign::Start, VAlign::Top)),
        Position::UpperRight => (right, top, Anchor::new(HAlign::End, VAlign::Top)),
        Position::Center => (mid_x, h / 2, Anchor::new(HAlign::Middle, VAlign::Middle)),
        Position::LowerCenter => (mid_x, low_y, Anchor::new(HAlign::Middle, VAlign::Bottom)),
        Position::LowerLeft => (left, low_y, Anchor::new(HAlign::Start, VAlign::Bottom)),
        Position::LowerRight => (right, low_y, Anchor::new(HAlign::End, VAlign::Bottom)),
    };
    (to_i32(x), to_i32(y), anchor)
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Resolve a block's layout intent against a canvas and platform.
pub fn resolve_text_layout(
    canvas: Size,
    block: &TextBlockLayout,
    platform: Platform,
) -> ResolvedTextLayout {
    let (x, y, anchor) = position_xy(block.position, canvas, platform);
    let font_px = platform.font_px(block.font_size);
    let emphasis = block.emphasis.as_ref().map(|e| ResolvedEmphasis {
        text: e.text.clone(),
        color: e.color.with_alpha(255),
        font_px: trunc_u32((f64::from(font_px) * f64::from(e.scale)).round()).max(1),
    });
    ResolvedTextLayout {
        x,
        y,
        font_px,
        anchor,
        color: block.color.with_alpha(255),
        emphasis,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/resolver.rs"]
mod tests;
