//! Block placement: turns resolved layouts plus measured text into positioned segments.
//!
//! Nothing here touches pixels; measurement goes through [`TextMeasure`] so placement can be
//! checked with a fake measurer.

use crate::{
    foundation::{
        core::{Rgba8, Size},
        error::AdResult,
    },
    layout::resolver::{Platform, ResolvedTextLayout, VAlign, resolve_text_layout},
    plan::model::{BlockKind, CopySpec, FontStyle, LayoutSpec, Position},
    text::emphasis::{place_segments, split_emphasis},
};

const STACK_GAP_EM: f32 = 0.25;

/// Horizontal advance and vertical extent of a single line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Advance width.
    pub width: f32,
    /// Distance from baseline up to the ascender line.
    pub ascent: f32,
    /// Distance from baseline down to the descender line.
    pub descent: f32,
}

/// Measures a single line of text.
pub trait TextMeasure {
    /// Metrics of `text` set in `style` at `font_px`.
    fn measure(&mut self, text: &str, style: FontStyle, font_px: u32) -> AdResult<LineMetrics>;
}

/// A run of text with one font and one color, positioned by its left edge and baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedSegment {
    /// Text.
    pub text: String,
    /// Face weight.
    pub style: FontStyle,
    /// Font size in pixels.
    pub font_px: u32,
    /// Fill color.
    pub color: Rgba8,
    /// Left edge.
    pub x: f32,
    /// Baseline y.
    pub baseline: f32,
}

/// One text block after placement.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    /// Which block.
    pub kind: BlockKind,
    /// Named position the block was resolved from.
    pub position: Position,
    /// Base font size.
    pub font_px: u32,
    /// Top of the line box.
    pub top: f32,
    /// Bottom of the line box.
    pub bottom: f32,
    /// Segments to draw, left to right.
    pub segments: Vec<PlacedSegment>,
}

impl PlacedBlock {
    fn shift(&mut self, dy: f32) {
        self.top += dy;
        self.bottom += dy;
        for s in &mut self.segments {
            s.baseline += dy;
        }
    }
}

/// Baseline that puts a line with these metrics at `y` under vertical alignment `v`.
pub fn baseline_for(v: VAlign, y: f32, m: &LineMetrics) -> f32 {
    match v {
        VAlign::Top => y + m.ascent,
        VAlign::Middle => y + (m.ascent - m.descent) / 2.0,
        VAlign::Bottom => y - m.descent,
    }
}

fn measure_or_zero<M: TextMeasure + ?Sized>(
    m: &mut M,
    text: &str,
    style: FontStyle,
    font_px: u32,
) -> AdResult<LineMetrics> {
    if text.is_empty() {
        return Ok(LineMetrics::default());
    }
    m.measure(text, style, font_px)
}

/// Place one block at its resolved anchor. Empty text yields `None`.
///
/// With an emphasis target that occurs in `text`, the block is split into before/target/after
/// segments, centered as a whole on the resolved x and vertically centered on the resolved y.
/// Otherwise the whole string is one segment aligned by the resolved anchor.
pub fn place_block<M: TextMeasure + ?Sized>(
    m: &mut M,
    kind: BlockKind,
    position: Position,
    text: &str,
    style: FontStyle,
    resolved: &ResolvedTextLayout,
) -> AdResult<Option<PlacedBlock>> {
    if text.is_empty() {
        return Ok(None);
    }
    let (x, y) = (resolved.x as f32, resolved.y as f32);

    let split = resolved
        .emphasis
        .as_ref()
        .and_then(|e| split_emphasis(text, &e.text).map(|parts| (e, parts)));

    let Some((em, (before, target, after))) = split else {
        if let Some(e) = &resolved.emphasis {
            tracing::warn!(emphasis = %e.text, ?kind, "emphasis target not found, drawing uniformly");
        }
        let metrics = m.measure(text, style, resolved.font_px)?;
        let baseline = baseline_for(resolved.anchor.v, y, &metrics);
        return Ok(Some(PlacedBlock {
            kind,
            position,
            font_px: resolved.font_px,
            top: baseline - metrics.ascent,
            bottom: baseline + metrics.descent,
            segments: vec![PlacedSegment {
                text: text.to_string(),
                style,
                font_px: resolved.font_px,
                color: resolved.color,
                x: x + resolved.anchor.x_offset(metrics.width),
                baseline,
            }],
        }));
    };

    let parts = [
        (before, resolved.font_px, resolved.color),
        (target, em.font_px, em.color),
        (after, resolved.font_px, resolved.color),
    ];
    let mut metrics = [LineMetrics::default(); 3];
    for (slot, (t, px, _)) in metrics.iter_mut().zip(parts) {
        *slot = measure_or_zero(m, t, style, px)?;
    }
    let xs = place_segments(metrics.map(|mm| mm.width), x);

    let mut top = f32::INFINITY;
    let mut bottom = f32::NEG_INFINITY;
    let mut segments = Vec::with_capacity(3);
    for ((t, px, color), (mm, seg_x)) in parts.into_iter().zip(metrics.iter().zip(xs)) {
        if t.is_empty() {
            continue;
        }
        let baseline = baseline_for(VAlign::Middle, y, mm);
        top = top.min(baseline - mm.ascent);
        bottom = bottom.max(baseline + mm.descent);
        segments.push(PlacedSegment {
            text: t.to_string(),
            style,
            font_px: px,
            color,
            x: seg_x,
            baseline,
        });
    }

    Ok(Some(PlacedBlock {
        kind,
        position,
        font_px: resolved.font_px,
        top,
        bottom,
        segments,
    }))
}

/// Place all three blocks, stacking blocks that share a named position.
///
/// Lower positions grow upward from the bottom margin in CTA, subcopy, headline order; upper
/// and center positions grow downward in headline, subcopy, CTA order. Adjacent line boxes are
/// separated by a quarter of the preceding block's font size.
pub fn layout_blocks<M: TextMeasure + ?Sized>(
    m: &mut M,
    canvas: Size,
    copy: &CopySpec,
    layout: &LayoutSpec,
    platform: Platform,
) -> AdResult<Vec<PlacedBlock>> {
    let mut placed = Vec::with_capacity(3);
    for kind in BlockKind::ALL {
        let block = layout.block(kind);
        let resolved = resolve_text_layout(canvas, block, platform);
        tracing::debug!(?kind, x = resolved.x, y = resolved.y, font_px = resolved.font_px, "resolved block");
        if let Some(b) = place_block(
            m,
            kind,
            block.position,
            copy.text(kind),
            block.font_style,
            &resolved,
        )? {
            placed.push(b);
        }
    }

    let mut positions: Vec<Position> = Vec::new();
    for b in &placed {
        if !positions.contains(&b.position) {
            positions.push(b.position);
        }
    }

    for pos in positions {
        let mut members: Vec<usize> = (0..placed.len())
            .filter(|&i| placed[i].position == pos)
            .collect();
        if pos.is_lower() {
            members.reverse();
        }
        for w in 1..members.len() {
            let prev = &placed[members[w - 1]];
            let gap = prev.font_px as f32 * STACK_GAP_EM;
            let (prev_top, prev_bottom) = (prev.top, prev.bottom);
            let cur = &mut placed[members[w]];
            let dy = if pos.is_lower() {
                (prev_top - gap) - cur.bottom
            } else {
                (prev_bottom + gap) - cur.top
            };
            cur.shift(dy);
        }
    }

    Ok(placed)
}

#[cfg(test)]
#[path = "../../tests/unit/text/blocks.rs"]
mod tests;
