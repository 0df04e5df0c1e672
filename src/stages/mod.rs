pub(crate) mod background;
pub(crate) mod relight;
pub(crate) mod segment;
pub(crate) mod upscale;
