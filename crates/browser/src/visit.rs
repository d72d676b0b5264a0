use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Network;
use headless_chrome::protocol::cdp::Network::CookieParam;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::Tab;
use tracing::{info, warn};

use pagesnap_core::config::{BrowserConfig, InteractConfig};
use pagesnap_core::{CookieRecord, SnapError, Target};

use crate::session::VisitSession;

/// What a successful visit hands back to the pipeline.
pub struct VisitOutcome {
    pub screenshot: PathBuf,
    /// The tab's cookie jar after the visit, ready for write-back.
    pub live_cookies: Vec<CookieRecord>,
}

impl VisitSession {
    /// Visit one target: apply cookies, navigate, optionally click through,
    /// screenshot. The tab is closed on every exit path.
    pub async fn visit(
        &self,
        target: &Target,
        cookies: &[CookieRecord],
        browser_config: &BrowserConfig,
        interact: &InteractConfig,
        output_dir: &Path,
    ) -> Result<VisitOutcome, SnapError> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| SnapError::Browser(e.to_string()))?;

        let result = self
            .drive(&tab, target, cookies, browser_config, interact, output_dir)
            .await;

        if let Err(e) = tab.close(true) {
            warn!(url = %target.url, "tab close failed: {}", e);
        }

        result
    }

    async fn drive(
        &self,
        tab: &Arc<Tab>,
        target: &Target,
        cookies: &[CookieRecord],
        browser_config: &BrowserConfig,
        interact: &InteractConfig,
        output_dir: &Path,
    ) -> Result<VisitOutcome, SnapError> {
        tab.set_user_agent(&browser_config.user_agent, None, None)
            .map_err(|e| SnapError::Browser(e.to_string()))?;

        if !cookies.is_empty() {
            tab.set_cookies(to_cookie_params(cookies))
                .map_err(|e| SnapError::Browser(e.to_string()))?;
        }

        tab.navigate_to(target.url.as_str())
            .map_err(|e| SnapError::Browser(e.to_string()))?;
        tab.wait_until_navigated()
            .map_err(|e| SnapError::Browser(e.to_string()))?;
        self.settle(tab, browser_config.settle_wait_seconds).await;
        info!(url = %target.url, "page loaded");

        if is_interactive_app(&target.domain, &interact.host_patterns) {
            self.click_through(tab, interact)?;
        }

        let shot = tab
            .capture_screenshot(
                CaptureScreenshotFormatOption::Jpeg,
                Some(browser_config.screenshot_quality),
                None,
                true,
            )
            .map_err(|e| SnapError::Browser(e.to_string()))?;

        let screenshot = target.screenshot_path(output_dir);
        std::fs::write(&screenshot, shot)?;
        info!(path = %screenshot.display(), "screenshot saved");

        let live_cookies = tab
            .get_cookies()
            .map_err(|e| SnapError::Browser(e.to_string()))?
            .into_iter()
            .map(from_live_cookie)
            .collect();

        Ok(VisitOutcome {
            screenshot,
            live_cookies,
        })
    }

    /// Wait until the rendered content stops changing between polls, bounded
    /// by the configured budget. Pages that keep polling the network can
    /// settle early; that is accepted, not an error.
    async fn settle(&self, tab: &Arc<Tab>, budget_seconds: u64) {
        let deadline = Instant::now() + Duration::from_secs(budget_seconds);
        let mut last_len = 0usize;

        loop {
            let len = tab.get_content().map(|c| c.len()).unwrap_or(0);
            if len > 0 && len == last_len {
                return;
            }
            last_len = len;

            if Instant::now() >= deadline {
                return;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }

    /// Interactive apps park the real page behind a button. Wait for buttons
    /// to exist, scan them in document order, click the first whose text
    /// contains the configured phrase. No appearance and no match both fail
    /// the visit.
    fn click_through(&self, tab: &Arc<Tab>, interact: &InteractConfig) -> Result<(), SnapError> {
        let wait = Duration::from_secs(interact.element_wait_seconds);
        tab.wait_for_element_with_custom_timeout("button", wait)
            .map_err(|_| SnapError::ElementWait(interact.element_wait_seconds))?;

        let buttons = tab
            .find_elements("button")
            .map_err(|e| SnapError::Browser(e.to_string()))?;
        let labels: Vec<String> = buttons
            .iter()
            .map(|b| {
                b.get_inner_text()
                    .map(|t| t.trim().to_string())
                    .unwrap_or_default()
            })
            .collect();

        match first_matching_label(&labels, &interact.button_text) {
            Some(i) => {
                buttons[i]
                    .click()
                    .map_err(|e| SnapError::Browser(e.to_string()))?;
                info!(label = %labels[i], "clicked");
                Ok(())
            }
            None => Err(SnapError::MatchNotFound(interact.button_text.clone())),
        }
    }
}

pub fn is_interactive_app(domain: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| domain.contains(p.as_str()))
}

/// Index of the first label containing `phrase`, in document order.
pub fn first_matching_label(labels: &[String], phrase: &str) -> Option<usize> {
    labels.iter().position(|l| l.contains(phrase))
}

fn to_cookie_params(cookies: &[CookieRecord]) -> Vec<CookieParam> {
    cookies
        .iter()
        .map(|c| CookieParam {
            name: c.name.clone(),
            value: c.value.clone(),
            url: None,
            domain: Some(c.domain.clone()),
            path: Some(c.path.clone()),
            secure: Some(c.secure),
            http_only: Some(c.http_only),
            same_site: None,
            expires: None,
            priority: None,
            same_party: None,
            source_scheme: None,
            source_port: None,
            partition_key: None,
        })
        .collect()
}

fn from_live_cookie(cookie: Network::Cookie) -> CookieRecord {
    CookieRecord {
        name: cookie.name,
        value: cookie.value,
        domain: cookie.domain,
        path: cookie.path,
        http_only: cookie.http_only,
        secure: cookie.secure,
    }
}
