use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::SiteConfig;
use crate::content::Resource;

/// Directories created if missing
const REQUIRED_DIRS: &[&str] = &["website", "website/static", "website/static/css", "website/templates"];

/// Page layout: server cannot render `/` without it
pub const LAYOUT_TEMPLATE: &str = "website/templates/index.html.tera";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BootReport {
    pub warnings: u32,
    pub errors: u32,
}

/// Run all boot checks. Call this before Rocket launches.
/// Aborts the process if critical files are absent.
pub fn run(config: &SiteConfig) {
    info!("Folio boot check starting...");

    let report = check(config);

    if report.errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            report.errors, report.warnings
        );
        process::exit(1);
    }

    if report.warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some sections may render empty.",
            report.warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}

pub fn check(config: &SiteConfig) -> BootReport {
    let mut report = BootReport::default();

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS.iter().copied().chain([config.static_dir.as_str()]) {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    report.errors += 1;
                }
            }
        }
    }

    // ── 2. Layout template ─────────────────────────────
    if !Path::new(LAYOUT_TEMPLATE).exists() {
        error!("  MISSING layout template: {}", LAYOUT_TEMPLATE);
        report.errors += 1;
    }

    // ── 3. Content files ───────────────────────────────
    let source = config.content_source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        info!("  Content served remotely from {}", source);
    } else {
        let dir = Path::new(source);
        for resource in Resource::ALL {
            if !dir.join(resource.file_name()).exists() {
                warn!(
                    "  Missing content file: {} (the whole load will fail, page renders empty)",
                    dir.join(resource.file_name()).display()
                );
                report.warnings += 1;
            }
        }
    }

    // ── 4. Resume ──────────────────────────────────────
    if !Path::new(&config.resume_path).exists() {
        warn!("  Resume not found: {} (GET /resume will 404)", config.resume_path);
        report.warnings += 1;
    }

    // ── 5. Rocket.toml exists ──────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        report.warnings += 1;
    }

    report
}
