pub(crate) mod decode;
pub(crate) mod preview;
pub(crate) mod raster;
