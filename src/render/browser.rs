//! Headless Chrome capture of the HTML card page (feature `browser`).
//!
//! One browser process and one tab per capture. Both are torn down by
//! [`Session`]'s `Drop`, whichever way the capture ends.

use super::{PNG_CONTENT_TYPE, RenderRequest, RenderToImage, RenderedImage};
use crate::config::ImageConfig;
use crate::error::{Error, Result};
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

struct Session {
    // Held so the Chrome process lives as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl Session {
    fn launch(config: &ImageConfig) -> Result<Self> {
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .window_size(Some((config.viewport_width, config.viewport_height)))
            .args(vec![
                OsStr::new("--disable-dev-shm-usage"),
                OsStr::new("--disable-accelerated-2d-canvas"),
                OsStr::new("--disable-gpu"),
            ])
            .build()
            .map_err(|e| Error::Browser(format!("failed to build launch options: {e}")))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::Browser(format!("failed to launch browser: {e}")))?;
        let tab = browser
            .new_tab()
            .map_err(|e| Error::Browser(format!("failed to open tab: {e}")))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            tracing::debug!(error = %e, "Tab close failed, browser teardown continues");
        }
        tracing::debug!("Browser closed");
    }
}

/// Screenshots the page served at `/`.
pub struct BrowserCapture {
    config: ImageConfig,
}

impl BrowserCapture {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }

    /// Load `url`, wait for the card element and return it as PNG. Falls back
    /// to a viewport capture when the element never shows up.
    pub fn capture_url(&self, url: &str) -> Result<Vec<u8>> {
        tracing::info!(url, "Launching browser for screenshot");
        let session = Session::launch(&self.config)?;
        let tab = &session.tab;

        tab.set_default_timeout(Duration::from_secs(self.config.navigate_timeout_secs));
        tab.navigate_to(url)
            .and_then(|t| t.wait_until_navigated())
            .map_err(|e| Error::Browser(format!("navigation to {url} failed: {e}")))?;

        let element = tab.wait_for_element_with_custom_timeout(
            &self.config.selector,
            Duration::from_secs(self.config.selector_timeout_secs),
        );

        std::thread::sleep(Duration::from_millis(self.config.settle_millis));

        let png = match element {
            Ok(element) => element
                .capture_screenshot(Page::CaptureScreenshotFormatOption::Png)
                .map_err(|e| Error::Browser(format!("element screenshot failed: {e}")))?,
            Err(e) => {
                tracing::warn!(selector = %self.config.selector, error = %e, "Card element not found, capturing whole page");
                self.capture_full_page(tab)?
            }
        };

        tracing::info!(bytes = png.len(), "Screenshot captured");
        Ok(png)
    }

    /// Grow the window to the document's full height, then capture it.
    fn capture_full_page(&self, tab: &Tab) -> Result<Vec<u8>> {
        let scroll_height = tab
            .evaluate(
                "Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)",
                false,
            )
            .map_err(|e| Error::Browser(format!("failed to measure page: {e}")))?
            .value
            .and_then(|v| v.as_f64());

        let height = full_page_height(scroll_height, self.config.viewport_height);
        tracing::debug!(height, "Resizing window for full-page capture");
        tab.set_bounds(Bounds::Normal {
            left: None,
            top: None,
            width: Some(f64::from(self.config.viewport_width)),
            height: Some(f64::from(height)),
        })
        .map_err(|e| Error::Browser(format!("failed to resize window: {e}")))?;

        tab.capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::Browser(format!("page screenshot failed: {e}")))
    }
}

/// Window height that fits the whole document, never below the viewport.
fn full_page_height(scroll_height: Option<f64>, viewport_height: u32) -> u32 {
    match scroll_height {
        Some(h) if h.is_finite() && h > f64::from(viewport_height) => h.ceil() as u32,
        _ => viewport_height,
    }
}

impl RenderToImage for BrowserCapture {
    fn name(&self) -> &'static str {
        "browser"
    }

    fn render(&self, request: &RenderRequest<'_>) -> Result<RenderedImage> {
        let url = self.config.page_url.as_deref().unwrap_or(request.page_url);
        Ok(RenderedImage {
            content_type: PNG_CONTENT_TYPE,
            bytes: self.capture_url(url)?,
        })
    }
}
