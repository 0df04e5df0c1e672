//! Adforge assembles a single advertisement image from a short product brief.
//!
//! A request flows through a fixed chain of synchronous stages:
//!
//! - [`PlanBuilder`] turns the brief into copy, a safety-checked background prompt and layout
//!   intent (optionally merged with a [`PlanOverride`])
//! - a [`BackgroundGenerator`] paints the background
//! - a [`Segmenter`] cuts out the product photo, when one is supplied
//! - a [`Relighter`] places the cutout with a drop shadow and tone matching
//! - an [`Upscaler`] resizes to the output bound
//! - the [`TextRenderer`] burns in headline, subcopy and CTA
//!
//! [`Pipeline`] wires them together from a [`PipelineConfig`]; [`LocalFsStore`] persists the
//! result and a per-identity history.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod effects;
pub(crate) mod layout;
pub(crate) mod plan;
pub(crate) mod render;
pub(crate) mod stages;
pub(crate) mod storage;
pub(crate) mod text;

pub use crate::assets::decode::{decode_image, encode_png, open_image, save_png};
pub use crate::assets::fonts::{FontBook, FontConfig, FontFace};
pub use crate::foundation::core::{Canvas, Mask, PixelRect, Rgb8, Rgba8, Size};
pub use crate::foundation::error::{AdError, AdResult};

pub use crate::layout::resolver::{
    Anchor, HAlign, Platform, ResolvedEmphasis, ResolvedTextLayout, VAlign, position_xy,
    resolve_text_layout, safe_margins,
};
pub use crate::plan::builder::{CopyLimits, PlanBuilder, truncate_with_ellipsis};
pub use crate::plan::merge::{BlockOverride, EmphasisOverride, PlanOverride};
pub use crate::plan::model::{
    BlockKind, Brief, CopySpec, EmphasisSpec, FontSizeTier, FontStyle, LayoutSpec, ModelHints,
    Plan, Position, TextBlockLayout, Tone,
};
pub use crate::plan::safety::{PromptGuard, SAFETY_TOKENS, has_safety_tokens};
pub use crate::render::config::PipelineConfig;
pub use crate::render::pipeline::{GenerateRequest, Generation, Pipeline};
pub use crate::stages::background::{
    BackgroundBackend, BackgroundConfig, BackgroundGenerator, GradientBackground, Mood,
    create_background_generator,
};
pub use crate::stages::relight::{
    RelightBackend, RelightConfig, Relighter, ShadowRelighter, brightness_factor,
    create_relighter,
};
pub use crate::stages::segment::{
    FallbackSegmenter, SegmentBackend, SegmentConfig, Segmenter, create_segmenter,
};
pub use crate::stages::upscale::{
    LanczosUpscaler, UpscaleBackend, UpscaleConfig, Upscaler, create_upscaler, target_size,
};
pub use crate::storage::local_fs::LocalFsStore;
pub use crate::storage::record::{AdRecord, AdStore, new_image_id};
pub use crate::text::emphasis::{place_segments, split_emphasis};
pub use crate::text::render::TextRenderer;
