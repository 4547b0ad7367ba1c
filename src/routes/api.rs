use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

use crate::models::Content;

/// The content loaded at startup, as served to the page.
#[get("/content")]
pub fn site_content(content: &State<Arc<Content>>) -> Json<Content> {
    Json(Content::clone(content))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![site_content]
}
