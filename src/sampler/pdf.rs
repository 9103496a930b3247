use std::time::Duration;

use crate::assets::decode::AssetInput;
use crate::foundation::error::{MediaError, MediaResult};
use crate::sampler::source::{DocumentOpener, PageSource};

/// Opens PDF documents through poppler's `pdfinfo` / `pdftoppm`.
///
/// Without the `media-pdf` feature every open fails with a decode error.
#[derive(Clone, Debug, Default)]
pub struct PdftoppmOpener {
    /// Kill a single page render that runs longer than this.
    pub op_timeout: Option<Duration>,
}

impl DocumentOpener for PdftoppmOpener {
    fn open(&self, input: &AssetInput) -> MediaResult<Box<dyn PageSource>> {
        open_document(input, self.op_timeout)
    }
}

#[cfg(feature = "media-pdf")]
fn open_document(input: &AssetInput, timeout: Option<Duration>) -> MediaResult<Box<dyn PageSource>> {
    Ok(Box::new(imp::PdftoppmDocument::open(input, timeout)?))
}

#[cfg(not(feature = "media-pdf"))]
fn open_document(input: &AssetInput, _timeout: Option<Duration>) -> MediaResult<Box<dyn PageSource>> {
    Err(MediaError::decode(format!(
        "'{}': PDF inputs require the 'media-pdf' feature",
        input.name
    )))
}

/// Poppler renders at 72 DPI for scale 1.0.
#[cfg_attr(not(feature = "media-pdf"), allow(dead_code))]
pub(crate) fn scale_to_dpi(scale: f64) -> u32 {
    (72.0 * scale).round().max(1.0) as u32
}

/// Page count from `pdfinfo` output.
#[cfg_attr(not(feature = "media-pdf"), allow(dead_code))]
pub(crate) fn parse_page_count(info: &str) -> MediaResult<u32> {
    info.lines()
        .find_map(|l| l.strip_prefix("Pages:"))
        .and_then(|v| v.trim().parse::<u32>().ok())
        .ok_or_else(|| MediaError::decode("pdfinfo output has no page count"))
}

#[cfg(feature = "media-pdf")]
mod imp {
    use std::process::Command;
    use std::time::Duration;

    use super::{parse_page_count, scale_to_dpi};
    use crate::assets::decode::{AssetInput, decode_image};
    use crate::assets::raster::RasterSource;
    use crate::foundation::error::MediaResult;
    use crate::sampler::process::{StagedInput, run_captured};
    use crate::sampler::source::PageSource;

    pub(super) struct PdftoppmDocument {
        input: StagedInput,
        pages: u32,
        timeout: Option<Duration>,
    }

    impl PdftoppmDocument {
        pub(super) fn open(input: &AssetInput, timeout: Option<Duration>) -> MediaResult<Self> {
            let staged = StagedInput::new(input)?;
            let mut cmd = Command::new("pdfinfo");
            cmd.arg(staged.path());
            let info = run_captured(cmd, timeout, "pdfinfo")?;
            let pages = parse_page_count(&String::from_utf8_lossy(&info))?;
            tracing::debug!(name = %input.name, pages, "opened document");
            Ok(Self {
                input: staged,
                pages,
                timeout,
            })
        }
    }

    impl PageSource for PdftoppmDocument {
        fn page_count(&self) -> u32 {
            self.pages
        }

        fn render_page(&mut self, index: u32, scale: f64) -> MediaResult<RasterSource> {
            let page = (index + 1).to_string();
            let mut cmd = Command::new("pdftoppm");
            cmd.args([
                "-png",
                "-singlefile",
                "-f",
                &page,
                "-l",
                &page,
                "-r",
                &scale_to_dpi(scale).to_string(),
            ])
            .arg(self.input.path())
            .arg("-");
            let png = run_captured(cmd, self.timeout, "pdftoppm")?;
            decode_image(&png)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/pdf.rs"]
mod tests;
