use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Site settings, read from the `folio` table of Rocket's configuration
/// (`Rocket.toml` `[default.folio]` or `ROCKET_FOLIO`). Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory or http(s) base URL holding the seven content JSON files.
    pub content_source: String,
    pub static_dir: String,
    pub resume_path: String,
    /// URL the download-CV link points at.
    pub resume_url: String,
    pub resume_download_name: String,
    pub site_title: String,
    /// Live page sessions without a connected browser are dropped after this long.
    pub session_idle_secs: u64,
    pub session_sweep_secs: u64,
    /// Page loads beyond this many live sessions are served as static pages.
    pub session_limit: usize,
    pub ui: UiConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            content_source: "website/static/db".into(),
            static_dir: "website/static".into(),
            resume_path: "website/static/resume.pdf".into(),
            resume_url: "/resume".into(),
            resume_download_name: "Resume.pdf".into(),
            site_title: "Portfolio".into(),
            session_idle_secs: 1800,
            session_sweep_secs: 60,
            session_limit: 1000,
            ui: UiConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_figment(figment: &Figment) -> Self {
        match figment.extract_inner::<SiteConfig>("folio") {
            Ok(config) => config,
            Err(e) => {
                if !e.missing() {
                    log::warn!("Invalid [folio] configuration, using defaults: {}", e);
                }
                SiteConfig::default()
            }
        }
    }
}

/// Timing and geometry constants of the page's interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Added to scrollY before matching sections (scroll-spy).
    pub scroll_offset: f64,
    /// Subtracted from a section's top when smooth-scrolling to it.
    pub anchor_offset: f64,
    /// Viewport width at and above which the sidebar is pinned closed.
    pub sidebar_breakpoint: f64,
    pub typewriter_interval_ms: u64,
    pub toast_enter_delay_ms: u64,
    pub toast_duration_ms: u64,
    pub toast_exit_ms: u64,
    pub loading_fade_ms: u64,
    /// Visible fraction of an element that counts as intersecting.
    pub reveal_threshold: f64,
    /// Pixels trimmed off the bottom of the viewport for reveal checks.
    pub reveal_bottom_margin: f64,
    pub default_subject: String,
    pub contact_toast: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            scroll_offset: 100.0,
            anchor_offset: 20.0,
            sidebar_breakpoint: 1024.0,
            typewriter_interval_ms: 50,
            toast_enter_delay_ms: 100,
            toast_duration_ms: 3000,
            toast_exit_ms: 300,
            loading_fade_ms: 500,
            reveal_threshold: 0.1,
            reveal_bottom_margin: 50.0,
            default_subject: "Contact from Portfolio".into(),
            contact_toast: "Message composed! Your email client should open.".into(),
        }
    }
}
