pub(crate) mod local_fs;
pub(crate) mod record;
