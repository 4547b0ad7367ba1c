use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Instant;

use crate::config::SiteConfig;
use crate::models::Content;

/// Boot instant, set once at startup via `init_uptime()`
static BOOT_INSTANT: OnceLock<Instant> = OnceLock::new();

pub fn init_uptime() {
    BOOT_INSTANT.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    BOOT_INSTANT.get().map(|b| b.elapsed().as_secs()).unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// "ok" when content loaded, "degraded" when the page renders empty.
    pub status: &'static str,
    pub uptime_secs: u64,
    pub content_source: String,
    pub sections: Vec<&'static str>,
    pub resume_available: bool,
    pub live_sessions: usize,
}

pub fn report(config: &SiteConfig, content: &Content, live_sessions: usize) -> HealthReport {
    HealthReport {
        status: if content.is_empty() { "degraded" } else { "ok" },
        uptime_secs: uptime_secs(),
        content_source: config.content_source.clone(),
        sections: content.loaded_sections(),
        resume_available: Path::new(&config.resume_path).exists(),
        live_sessions,
    }
}
