//! Parley-backed shaping for the two configured faces.

use std::collections::HashMap;

use crate::{
    assets::fonts::{FontBook, FontFace},
    foundation::error::{AdError, AdResult},
    plan::model::FontStyle,
    text::blocks::{LineMetrics, TextMeasure},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    /// Red channel.
    pub(crate) r: u8,
    /// Green channel.
    pub(crate) g: u8,
    /// Blue channel.
    pub(crate) b: u8,
    /// Alpha channel.
    pub(crate) a: u8,
}

/// One face registered in its own font collection, so family lookup can only resolve to it.
struct ShapingFace {
    font_ctx: parley::FontContext,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl ShapingFace {
    fn new(face: &FontFace) -> AdResult<Self> {
        let mut font_ctx = parley::FontContext {
            collection: parley::fontique::Collection::new(parley::fontique::CollectionOptions {
                shared: false,
                system_fonts: false,
            }),
            source_cache: parley::fontique::SourceCache::default(),
        };

        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.bytes().as_ref().clone()),
            None,
        );
        let family_id = families
            .iter()
            .find(|(_, fonts)| fonts.iter().any(|f| f.index() == face.index()))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                AdError::invalid_input(format!("no font families in '{}'", face.source()))
            })?;

        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| {
                AdError::invalid_input(format!("font family in '{}' has no name", face.source()))
            })?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes().as_ref().clone()),
            face.index(),
        );

        tracing::debug!(source = face.source(), %family, "registered face");
        Ok(Self {
            font_ctx,
            family,
            font,
        })
    }
}

/// Shapes single lines of text with the regular or bold face of a [`FontBook`].
///
/// Holds mutable Parley contexts, so each render call builds its own shaper.
pub(crate) struct TextShaper {
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    regular: ShapingFace,
    bold: ShapingFace,
    measured: HashMap<(String, FontStyle, u32), LineMetrics>,
}

impl TextShaper {
    pub(crate) fn new(fonts: &FontBook) -> AdResult<Self> {
        Ok(Self {
            layout_ctx: parley::LayoutContext::new(),
            regular: ShapingFace::new(fonts.face(FontStyle::Regular))?,
            bold: ShapingFace::new(fonts.face(FontStyle::Bold))?,
            measured: HashMap::new(),
        })
    }

    /// Font handle for drawing glyphs shaped with `style`.
    pub(crate) fn font(&self, style: FontStyle) -> &vello_cpu::peniko::FontData {
        match style {
            FontStyle::Regular => &self.regular.font,
            FontStyle::Bold => &self.bold.font,
        }
    }

    /// Shape `text` as one unbroken line.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        style: FontStyle,
        font_px: u32,
        brush: TextBrushRgba8,
    ) -> AdResult<parley::Layout<TextBrushRgba8>> {
        if font_px == 0 {
            return Err(AdError::invalid_input("font size must be > 0"));
        }
        let weight = match style {
            FontStyle::Regular => parley::style::FontWeight::NORMAL,
            FontStyle::Bold => parley::style::FontWeight::BOLD,
        };

        let Self {
            layout_ctx,
            regular,
            bold,
            ..
        } = self;
        let face = match style {
            FontStyle::Regular => regular,
            FontStyle::Bold => bold,
        };

        let mut builder = layout_ctx.ranged_builder(&mut face.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(weight));
        builder.push_default(parley::style::StyleProperty::FontSize(font_px as f32));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

impl TextMeasure for TextShaper {
    fn measure(&mut self, text: &str, style: FontStyle, font_px: u32) -> AdResult<LineMetrics> {
        let key = (text.to_string(), style, font_px);
        if let Some(m) = self.measured.get(&key) {
            return Ok(*m);
        }

        let layout = self.shape(text, style, font_px, TextBrushRgba8::default())?;
        let metrics = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                LineMetrics {
                    width: m.advance,
                    ascent: m.ascent,
                    descent: m.descent,
                }
            })
            .unwrap_or_default();

        self.measured.insert(key, metrics);
        Ok(metrics)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/shaping.rs"]
mod tests;
