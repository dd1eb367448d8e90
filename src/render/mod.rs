//! Card renderers.
//!
//! `svg` and `layout` emit SVG markup directly, `html` emits the page the
//! browser backend screenshots. [`RenderToImage`] is the capability behind
//! `/api/stats-image`; which implementation serves it is a config choice.

pub mod error_image;
pub mod html;
pub mod layout;
pub mod svg;

#[cfg(feature = "browser")]
pub mod browser;

use crate::config::{ImageBackend, ImageConfig};
use crate::error::Result;
use crate::stats::StatsRecord;
use std::sync::Arc;

pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Encoded image plus its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn svg(markup: String) -> Self {
        Self {
            content_type: SVG_CONTENT_TYPE,
            bytes: markup.into_bytes(),
        }
    }
}

/// Input to a [`RenderToImage`] call
pub struct RenderRequest<'a> {
    pub stats: &'a StatsRecord,
    /// Address of the HTML card page, for backends that load it
    pub page_url: &'a str,
}

/// Turns a stats record into an image.
///
/// Implementations are synchronous; callers on an async runtime run them on
/// a blocking thread.
pub trait RenderToImage: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedImage>;
}

/// Serves the layout card markup as the image.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkupImage;

impl RenderToImage for MarkupImage {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedImage> {
        Ok(RenderedImage::svg(layout::stats_card(request.stats).to_svg()))
    }
}

/// Build the image backend selected by configuration.
pub fn image_renderer(config: &ImageConfig) -> Result<Arc<dyn RenderToImage>> {
    match config.backend {
        ImageBackend::Markup => Ok(Arc::new(MarkupImage)),
        #[cfg(feature = "browser")]
        ImageBackend::Browser => Ok(Arc::new(browser::BrowserCapture::new(config.clone()))),
        #[cfg(not(feature = "browser"))]
        ImageBackend::Browser => Err(crate::error::Error::Config(
            "the browser image backend is not compiled in".into(),
        )),
    }
}

/// Escape text for XML/HTML element content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Cut `s` to at most `max` characters, appending `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
