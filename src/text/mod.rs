pub(crate) mod blocks;
pub(crate) mod emphasis;
pub(crate) mod render;
pub(crate) mod shaping;
