pub(crate) mod resolver;
