//! Markup generation for hosted ad creatives.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static REGEX_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

static REGEX_SLASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/+").expect("Invalid regex"));

/// Hosting server for the creatives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdServer {
    /// ALDI blob storage.
    #[default]
    Aldi,
    /// S3 media host.
    S3,
}

impl AdServer {
    /// Base URL, always ending with `/`.
    pub fn base_url(self) -> &'static str {
        match self {
            Self::Aldi => "https://aldimediaeu.blob.core.windows.net/aldimediaeu/",
            Self::S3 => "https://s3media-ml-eu.surveycenter.com/",
        }
    }
}

/// Ad-link generation request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdLinkRequest {
    /// Target server.
    pub server: AdServer,
    /// Folder below the server root; whitespace is treated as a separator.
    pub folder: String,
    /// File names, one per entry; blank entries are ignored.
    pub filenames: Vec<String>,
}

/// Generated markup blocks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdLinks {
    /// Ad block, entries separated by a blank line.
    pub ads: String,
    /// Story block, one entry per line.
    pub story: String,
}

/// Normalize a folder path to `seg/seg/` form; blank input yields an empty prefix.
pub fn normalize_folder(folder: &str) -> String {
    let slashed = REGEX_WHITESPACE.replace_all(folder.trim(), "/");
    let collapsed = REGEX_SLASH_RUN.replace_all(&slashed, "/");
    let s = collapsed.strip_prefix('/').unwrap_or(&collapsed);
    let s = s.strip_suffix('/').unwrap_or(s);
    if s.is_empty() {
        String::new()
    } else {
        format!("{s}/")
    }
}

fn ad_image(url: &str) -> String {
    format!(r#"<img src="{url}" class="zoomImage" style="max-width:80%">"#)
}

fn story_image(url: &str) -> String {
    format!(r#"<img src="{url}" class="zoomImage" style="max-height:280px">"#)
}

/// Build the ad and story blocks for `req`.
///
/// `jpg`/`png` become image tags in both blocks; `mp4` is a bare URL in the ad block and its
/// `.jpg` poster in the story block; `mp3` is a bare URL and a bare file name. Other extensions
/// are skipped.
pub fn generate(req: &AdLinkRequest) -> AdLinks {
    let prefix = format!("{}{}", req.server.base_url(), normalize_folder(&req.folder));
    let mut ads = Vec::new();
    let mut story = Vec::new();

    for name in req.filenames.iter().flat_map(|l| l.split('\n')) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let ext = name.rsplit('.').next().unwrap_or(name).to_lowercase();
        let url = format!("{prefix}{name}");
        match ext.as_str() {
            "jpg" | "png" => {
                ads.push(ad_image(&url));
                story.push(story_image(&url));
            }
            "mp4" => {
                ads.push(url);
                story.push(story_image(&format!(
                    "{prefix}{}",
                    name.replacen(".mp4", ".jpg", 1)
                )));
            }
            "mp3" => {
                ads.push(url);
                story.push(name.to_string());
            }
            _ => tracing::debug!(name, "skipping unsupported ad asset"),
        }
    }

    AdLinks {
        ads: ads.join("\n\n"),
        story: story.join("\n"),
    }
}

#[cfg(test)]
#[path = "../tests/unit/adlinks.rs"]
mod tests;
