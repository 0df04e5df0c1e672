use crate::{
    assets::fonts::FontBook,
    effects::composite::over_in_place,
    foundation::{
        core::Canvas,
        error::{AdError, AdResult},
        math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place},
    },
    layout::resolver::Platform,
    plan::model::{CopySpec, LayoutSpec},
    text::{
        blocks::{PlacedBlock, layout_blocks},
        shaping::{TextBrushRgba8, TextShaper},
    },
};

/// Burns headline, subcopy and CTA into a finished canvas.
#[derive(Clone, Debug)]
pub struct TextRenderer {
    fonts: FontBook,
}

impl TextRenderer {
    /// Renderer drawing with `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Faces in use.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Place and draw all non-empty blocks. A canvas with nothing to draw is returned as is.
    #[tracing::instrument(skip_all, fields(w = canvas.width(), h = canvas.height(), %platform))]
    pub fn render(
        &self,
        canvas: Canvas,
        copy: &CopySpec,
        layout: &LayoutSpec,
        platform: Platform,
    ) -> AdResult<Canvas> {
        let mut shaper = TextShaper::new(&self.fonts)?;
        let blocks = layout_blocks(&mut shaper, canvas.size(), copy, layout, platform)?;
        if blocks.iter().all(|b| b.segments.is_empty()) {
            return Ok(canvas);
        }

        let too_large =
            || AdError::invalid_input("text rendering supports canvases up to 65535x65535");
        let w = u16::try_from(canvas.width()).map_err(|_| too_large())?;
        let h = u16::try_from(canvas.height()).map_err(|_| too_large())?;

        let mut ctx = vello_cpu::RenderContext::new(w, h);
        for block in &blocks {
            draw_block(&mut ctx, &mut shaper, block)?;
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let mut out = canvas;
        premultiply_rgba8_in_place(out.data_mut());
        over_in_place(out.data_mut(), pixmap.data_as_u8_slice(), 1.0)?;
        unpremultiply_rgba8_in_place(out.data_mut());
        Ok(out)
    }
}

fn draw_block(
    ctx: &mut vello_cpu::RenderContext,
    shaper: &mut TextShaper,
    block: &PlacedBlock,
) -> AdResult<()> {
    for seg in &block.segments {
        let brush = TextBrushRgba8 {
            r: seg.color.r,
            g: seg.color.g,
            b: seg.color.b,
            a: seg.color.a,
        };
        let layout = shaper.shape(&seg.text, seg.style, seg.font_px, brush)?;
        let font = shaper.font(seg.style).clone();

        for line in layout.lines() {
            let dy = seg.baseline - line.metrics().baseline;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(seg.x),
                f64::from(dy),
            )));
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        tracing::trace!(kind = ?block.kind, text = %seg.text, x = seg.x, baseline = seg.baseline, "drew segment");
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/render.rs"]
mod tests;
