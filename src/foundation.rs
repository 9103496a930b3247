pub(crate) mod cancel;
pub(crate) mod color;
pub(crate) mod core;
pub(crate) mod error;
