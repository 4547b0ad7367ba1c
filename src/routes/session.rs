use rocket::http::Status;
use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::tokio::select;
use rocket::{Shutdown, State};
use std::sync::Arc;

use crate::session::{ClientEvent, Sessions};

// ── Events ─────────────────────────────────────────────

#[post("/<id>/event", format = "json", data = "<event>")]
pub fn post_event(id: &str, event: Json<ClientEvent>, sessions: &State<Arc<Sessions>>) -> Status {
    match sessions.get(id) {
        Some(session) => {
            session.dispatch(event.into_inner());
            Status::NoContent
        }
        None => Status::NotFound,
    }
}

// ── Patch stream ───────────────────────────────────────

/// Server-sent batches of document patches for one page. Connecting starts
/// the page's effects; the session stays alive while a browser listens.
#[get("/<id>/patches")]
pub fn patch_stream(id: &str, sessions: &State<Arc<Sessions>>, mut end: Shutdown) -> Option<EventStream![]> {
    let session = sessions.get(id)?;
    session.start();
    Some(EventStream! {
        let _attached = session.attach();
        let view = Arc::clone(session.view());
        loop {
            let changed = view.changed();
            let batch = session.take_patches();
            if !batch.is_empty() {
                yield Event::json(&batch);
            }
            select! {
                _ = changed => {},
                _ = &mut end => break,
            }
        }
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![post_event, patch_stream]
}
