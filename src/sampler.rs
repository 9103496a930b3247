//! Turning time-based and paged media into still rasters.
//!
//! Decoding itself is delegated to [`source::VideoSource`] / [`source::PageSource`]
//! implementations; this module owns the sampling policy and the sequential, cancellable
//! drive loop around them.

pub(crate) mod ffmpeg;
pub(crate) mod pdf;
pub(crate) mod policy;
#[cfg(any(feature = "media-ffmpeg", feature = "media-pdf"))]
pub(crate) mod process;
pub(crate) mod source;
