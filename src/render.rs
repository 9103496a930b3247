//! CPU rasterization on top of `vello_cpu`.
//!
//! Every composition in the crate goes through [`cpu::Painter`]: acquire a surface, draw source
//! windows, glyph runs and flat fills, then read the result back as straight RGBA.

pub(crate) mod cpu;
pub(crate) mod frame;
pub(crate) mod surface;
pub(crate) mod text;
