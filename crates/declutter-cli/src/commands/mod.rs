pub(crate) mod organize;
pub(crate) mod preview;
