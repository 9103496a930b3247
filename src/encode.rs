//! Byte-level outputs: raster codecs and archive sinks.

pub(crate) mod archive;
pub(crate) mod raster;
