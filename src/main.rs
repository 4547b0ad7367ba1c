#[macro_use]
extern crate rocket;

use rocket::figment::Figment;
use rocket::fs::FileServer;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;
use std::sync::Arc;

mod app;
mod boot;
mod config;
mod content;
mod dom;
mod effects;
mod health;
mod interact;
mod models;
mod page;
mod render;
mod routes;
mod scripts;
mod session;
mod tasks;
mod view;


use config::SiteConfig;
use models::Content;
use session::Sessions;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assembles the server around already-loaded content.
pub(crate) fn build(figment: Figment, config: SiteConfig, content: Content) -> Rocket<Build> {
    let static_dir = config.static_dir.clone();
    let content = Arc::new(content);
    let sessions = Arc::new(Sessions::new(Arc::clone(&content), config.clone()));
    rocket::custom(figment)
        .manage(content)
        .manage(sessions)
        .manage(config)
        .attach(Template::fairing())
        .attach(tasks::SessionSweeper)
        .mount("/static", FileServer::from(static_dir))
        .mount("/", routes::public::routes())
        .mount("/api", routes::api::routes())
        .mount("/session", routes::session::routes())
        .register("/", catchers![not_found, server_error])
}

#[launch]
async fn rocket() -> _ {
    env_logger::init();

    let figment = rocket::Config::figment();
    let config = SiteConfig::from_figment(&figment);

    // Boot check: create directories, validate the layout and content files
    boot::run(&config);
    health::init_uptime();

    let content = match content::source_from(&config) {
        Ok(source) => content::acquire(source.as_ref()).await,
        Err(e) => {
            log::error!("Content source unusable, serving an empty page: {}", e);
            Content::default()
        }
    };

    build(figment, config, content)
}
