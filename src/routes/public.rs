use rocket::form::Form;
use rocket::fs::NamedFile;
use rocket::http::Header;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use rocket_dyn_templates::{context, Template};
use std::sync::Arc;

use crate::app;
use crate::config::SiteConfig;
use crate::health::{self, HealthReport};
use crate::interact::{self, ContactForm};
use crate::models::Content;
use crate::scripts;
use crate::session::Sessions;

// ── Homepage ───────────────────────────────────────────

/// Each load opens a live page session; when none can be opened the page is
/// served static, with the contact form posting to `/contact`.
#[get("/")]
pub fn homepage(
    content: &State<Arc<Content>>,
    config: &State<SiteConfig>,
    sessions: &State<Arc<Sessions>>,
) -> Template {
    let (title, description) = match &content.personal {
        Some(p) if !p.name.is_empty() => (format!("{} | {}", p.name, p.title), p.subtitle.clone()),
        _ => (config.site_title.clone(), String::new()),
    };

    let (body, session) = match sessions.open() {
        Ok(page) => (page.html, page.id),
        Err(e) => {
            log::warn!("Serving a static page: {}", e);
            (app::render_page(content, config), String::new())
        }
    };

    Template::render(
        "index",
        context! {
            title: title,
            description: description,
            body: body,
            session: session,
            script: scripts::bridge_script(),
        },
    )
}

// ── Contact fallback ───────────────────────────────────

/// Browsers without scripts post the form here and are sent on to the
/// composed `mailto:` target.
#[post("/contact", data = "<form>")]
pub fn contact(
    form: Form<ContactForm>,
    content: &State<Arc<Content>>,
    config: &State<SiteConfig>,
) -> Redirect {
    let recipient = content.contact_email();
    if recipient.is_empty() {
        log::warn!("Contact form posted without a recipient address");
    }
    Redirect::to(interact::compose_mailto(
        recipient,
        &form,
        &config.ui.default_subject,
    ))
}

// ── Resume ─────────────────────────────────────────────

#[derive(Responder)]
#[response(content_type = "pdf")]
pub struct Attachment {
    file: NamedFile,
    disposition: Header<'static>,
}

#[get("/resume")]
pub async fn resume(config: &State<SiteConfig>) -> Option<Attachment> {
    let file = match NamedFile::open(&config.resume_path).await {
        Ok(f) => f,
        Err(e) => {
            log::warn!("Resume unavailable at {}: {}", config.resume_path, e);
            return None;
        }
    };
    Some(Attachment {
        file,
        disposition: Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", config.resume_download_name),
        ),
    })
}

// ── Health ─────────────────────────────────────────────

#[get("/health")]
pub fn health_check(
    content: &State<Arc<Content>>,
    config: &State<SiteConfig>,
    sessions: &State<Arc<Sessions>>,
) -> Json<HealthReport> {
    Json(health::report(config, content, sessions.len()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![homepage, contact, resume, health_check]
}
