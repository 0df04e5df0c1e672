pub(crate) mod builder;
pub(crate) mod merge;
pub(crate) mod model;
pub(crate) mod safety;
