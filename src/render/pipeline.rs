use crate::{
    assets::fonts::FontBook,
    foundation::{core::Canvas, error::AdResult},
    plan::{
        builder::PlanBuilder,
        merge::PlanOverride,
        model::{Brief, CopySpec, LayoutSpec, Plan},
    },
    render::config::PipelineConfig,
    stages::{
        background::{BackgroundGenerator, create_background_generator},
        relight::{Relighter, create_relighter},
        segment::{Segmenter, create_segmenter},
        upscale::{Upscaler, create_upscaler},
    },
    text::render::TextRenderer,
};

/// One generation request.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    /// Product, tone, discount and free-text hint.
    pub brief: Brief,
    /// Optional product photo to cut out and place on the background.
    pub main_image: Option<Canvas>,
    /// Optional structured override merged over the rule-based plan.
    pub plan_override: Option<PlanOverride>,
}

impl GenerateRequest {
    /// Request with only a brief.
    pub fn new(brief: Brief) -> Self {
        Self {
            brief,
            main_image: None,
            plan_override: None,
        }
    }

    /// Attach a product photo.
    pub fn with_main_image(mut self, image: Canvas) -> Self {
        self.main_image = Some(image);
        self
    }

    /// Attach a plan override.
    pub fn with_override(mut self, plan_override: PlanOverride) -> Self {
        self.plan_override = Some(plan_override);
        self
    }
}

/// Result of [`Pipeline::generate`].
#[derive(Clone, Debug)]
pub struct Generation {
    /// Finished ad image, straight RGBA8.
    pub image: Canvas,
    /// The plan the image was rendered from.
    pub plan: Plan,
}

impl Generation {
    /// Copy drawn onto the image.
    pub fn copy(&self) -> &CopySpec {
        &self.plan.copy
    }

    /// Layout intent the copy was drawn with.
    pub fn layout(&self) -> &LayoutSpec {
        &self.plan.layout
    }

    /// Prompt the background was generated from.
    pub fn background_prompt(&self) -> &str {
        &self.plan.background_prompt
    }
}

/// Plan → background → (segment) → relight → upscale → text, synchronously.
///
/// All stage backends are resolved at construction, so an unsupported backend fails before any
/// request runs. A pipeline holds no per-request state and can be shared across threads.
pub struct Pipeline {
    config: PipelineConfig,
    planner: PlanBuilder,
    segmenter: Box<dyn Segmenter>,
    background: Box<dyn BackgroundGenerator>,
    relighter: Box<dyn Relighter>,
    upscaler: Box<dyn Upscaler>,
    text: TextRenderer,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("fonts", self.text.fonts())
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Validate `config`, load its fonts and resolve every stage backend.
    pub fn new(config: PipelineConfig) -> AdResult<Self> {
        let fonts = FontBook::load(&config.fonts)?;
        Self::with_fonts(config, fonts)
    }

    /// Like [`Pipeline::new`] with already-loaded fonts; `config.fonts` is ignored.
    #[tracing::instrument(skip_all, fields(canvas = %config.canvas, platform = %config.platform))]
    pub fn with_fonts(config: PipelineConfig, fonts: FontBook) -> AdResult<Self> {
        config.validate()?;
        Ok(Self {
            planner: PlanBuilder::new(config.copy_limits)?,
            segmenter: create_segmenter(&config.segment)?,
            background: create_background_generator(&config.background)?,
            relighter: create_relighter(&config.relight)?,
            upscaler: create_upscaler(&config.effective_upscale())?,
            text: TextRenderer::new(fonts),
            config,
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one request end to end. Any stage failure aborts the request.
    #[tracing::instrument(skip_all, fields(product = %req.brief.product, tone = %req.brief.tone))]
    pub fn generate(&self, req: GenerateRequest) -> AdResult<Generation> {
        let GenerateRequest {
            brief,
            main_image,
            plan_override,
        } = req;

        let plan = self.planner.build(&brief, plan_override.as_ref())?;

        let hints = plan.model_hints.or(&self.config.background.model_hints);
        let background =
            self.background
                .generate(&plan.background_prompt, self.config.canvas, &hints)?;

        let foreground = match main_image {
            Some(photo) => Some(self.segmenter.segment(photo)?),
            None => None,
        };

        let composed = self.relighter.relight(background, foreground)?;
        let upscaled = self.upscaler.upscale(composed)?;
        let image = self
            .text
            .render(upscaled, &plan.copy, &plan.layout, self.config.platform)?;

        tracing::info!(size = %image.size(), "generation finished");
        Ok(Generation { image, plan })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
