//! Live page sessions. Every page load gets its own `PortfolioApp` over an
//! in-memory copy of the document. The browser bridge forwards its events
//! here and mirrors the patches the controller produces.

use log::{debug, warn};
use rocket::tokio::time::Instant;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use uuid::Uuid;

use crate::app::{BindError, Event, PortfolioApp};
use crate::config::SiteConfig;
use crate::effects::SharedView;
use crate::interact;
use crate::models::Content;
use crate::page;
use crate::view::{MemoryView, NodeId, Patch, Rect, View, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    Bind(BindError),
    /// The live-session limit was reached.
    Full(usize),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Bind(e) => write!(f, "page did not bind: {}", e),
            SessionError::Full(n) => write!(f, "{} live sessions already open", n),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<BindError> for SessionError {
    fn from(e: BindError) -> Self {
        SessionError::Bind(e)
    }
}

/// Layout box of one element as measured in the browser.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Measured {
    pub node: usize,
    pub top: f64,
    pub height: f64,
}

/// A browser event as the page bridge reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    MenuClick,
    OverlayClick,
    AnchorClick {
        node: usize,
    },
    FilterClick {
        node: usize,
    },
    Scroll {
        viewport: Viewport,
        #[serde(default)]
        rects: Vec<Measured>,
    },
    Resize {
        viewport: Viewport,
        #[serde(default)]
        rects: Vec<Measured>,
    },
    Key {
        key: String,
    },
    Submit {
        #[serde(default)]
        fields: HashMap<String, String>,
    },
    ImageError {
        node: usize,
    },
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

pub struct Session {
    app: Mutex<PortfolioApp<MemoryView>>,
    view: SharedView<MemoryView>,
    started: AtomicBool,
    streams: AtomicUsize,
    last_seen: Mutex<Instant>,
}

impl Session {
    fn touch(&self) {
        *lock(&self.last_seen) = Instant::now();
    }

    /// Starts the page effects. Only the first call does anything.
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        lock(&self.app).start_effects();
    }

    pub fn dispatch(&self, event: ClientEvent) {
        self.touch();
        let mut app = lock(&self.app);
        let event = match event {
            ClientEvent::MenuClick => Event::MenuButtonClick,
            ClientEvent::OverlayClick => Event::OverlayClick,
            ClientEvent::AnchorClick { node } => {
                let node = NodeId(node);
                if self.view.quietly(|v| interact::is_sidebar_link(&*v, node)) {
                    Event::NavLinkClick(node)
                } else {
                    Event::AnchorClick(node)
                }
            }
            ClientEvent::FilterClick { node } => Event::FilterClick(NodeId(node)),
            ClientEvent::Scroll { viewport, rects } => {
                self.measure(viewport, &rects);
                Event::Scroll
            }
            ClientEvent::Resize { viewport, rects } => {
                self.measure(viewport, &rects);
                Event::Resize
            }
            ClientEvent::Key { key } => Event::KeyDown(key),
            ClientEvent::Submit { fields } => {
                self.view.quietly(|v| match v.by_id(page::CONTACT_FORM) {
                    Some(form) => interact::fill_form(v, form, &fields),
                    None => warn!("Contact submit without a contact form"),
                });
                Event::ContactSubmit
            }
            ClientEvent::ImageError { node } => Event::ImageError(NodeId(node)),
        };
        app.handle(event);
    }

    fn measure(&self, viewport: Viewport, rects: &[Measured]) {
        self.view.quietly(|v| {
            v.set_viewport(viewport);
            for m in rects {
                v.set_rect(NodeId(m.node), Rect::new(m.top, m.height));
            }
        });
    }

    /// Patches recorded since the last call.
    pub fn take_patches(&self) -> Vec<Patch> {
        self.view.quietly(|v| v.take_patches())
    }

    pub fn view(&self) -> &SharedView<MemoryView> {
        &self.view
    }

    /// Counts a connected browser until the returned guard drops.
    pub fn attach(self: &Arc<Self>) -> Attached {
        self.streams.fetch_add(1, Ordering::SeqCst);
        self.touch();
        Attached(Arc::clone(self))
    }

    pub fn is_connected(&self) -> bool {
        self.streams.load(Ordering::SeqCst) > 0
    }

    pub fn running_tasks(&self) -> usize {
        lock(&self.app).running_tasks()
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*lock(&self.last_seen))
    }

    fn shutdown(&self) {
        lock(&self.app).shutdown();
    }
}

/// A connected browser; see `Session::attach`.
pub struct Attached(Arc<Session>);

impl Drop for Attached {
    fn drop(&mut self) {
        self.0.streams.fetch_sub(1, Ordering::SeqCst);
        self.0.touch();
    }
}

/// A freshly opened session and the markup it was rendered from.
#[derive(Debug)]
pub struct LivePage {
    pub id: String,
    pub html: String,
}

/// Every live page session, keyed by its random id.
pub struct Sessions {
    content: Arc<Content>,
    config: SiteConfig,
    live: Mutex<HashMap<String, Arc<Session>>>,
}

impl Sessions {
    pub fn new(content: Arc<Content>, config: SiteConfig) -> Self {
        Sessions {
            content,
            config,
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Renders and binds a new page. Effects wait for `Session::start`.
    pub fn open(&self) -> Result<LivePage, SessionError> {
        let limit = self.config.session_limit;
        if self.len() >= limit {
            self.sweep(self.idle_limit());
            let open = self.len();
            if open >= limit {
                return Err(SessionError::Full(open));
            }
        }

        let mut app = PortfolioApp::new(
            page::document(&self.config),
            Arc::clone(&self.content),
            self.config.clone(),
        );
        app.populate();
        app.bind()?;
        let view = Arc::clone(app.view());
        let html = view.quietly(|v| {
            let html = v.to_live_html();
            v.record();
            html
        });

        let id = Uuid::new_v4().to_string();
        let session = Session {
            app: Mutex::new(app),
            view,
            started: AtomicBool::new(false),
            streams: AtomicUsize::new(0),
            last_seen: Mutex::new(Instant::now()),
        };
        lock(&self.live).insert(id.clone(), Arc::new(session));
        debug!("Opened page session {}", id);
        Ok(LivePage { id, html })
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        lock(&self.live).get(id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.live).len()
    }

    pub fn idle_limit(&self) -> Duration {
        Duration::from_secs(self.config.session_idle_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.config.session_sweep_secs.max(1))
    }

    /// Drops every session idle for at least `idle` with no browser
    /// connected, cancelling its effects. Returns how many were dropped.
    pub fn sweep(&self, idle: Duration) -> usize {
        let now = Instant::now();
        let expired: Vec<Arc<Session>> = {
            let mut live = lock(&self.live);
            let ids: Vec<String> = live
                .iter()
                .filter(|(_, s)| !s.is_connected() && s.idle_for(now) >= idle)
                .map(|(id, _)| id.clone())
                .collect();
            ids.iter().filter_map(|id| live.remove(id)).collect()
        };
        for session in &expired {
            session.shutdown();
        }
        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::TOAST_HIDDEN_CLASS;
    use crate::interact::{NAV_LINK_CLASS, SIDEBAR_HIDDEN_CLASS};
    use crate::models::personal::PersonalInfo;
    use crate::models::project::Project;
    use crate::view::NODE_ID_ATTR;
    use rocket::tokio;

    fn content() -> Arc<Content> {
        let project = |title: &str, category: &str| Project {
            title: title.into(),
            category: category.into(),
            ..Project::default()
        };
        Arc::new(Content {
            personal: Some(PersonalInfo {
                name: "Jane Doe".into(),
                subtitle: "Builder".into(),
                email: "jane@x.com".into(),
                ..PersonalInfo::default()
            }),
            projects: Some(vec![project("Shop", "Web Design"), project("Tracker", "Mobile Apps")]),
            ..Content::default()
        })
    }

    fn sessions_with(config: SiteConfig) -> Sessions {
        Sessions::new(content(), config)
    }

    fn opened(sessions: &Sessions) -> (LivePage, Arc<Session>) {
        let page = sessions.open().expect("page opens");
        let session = sessions.get(&page.id).expect("session registered");
        (page, session)
    }

    fn find(session: &Session, pick: impl FnOnce(&MemoryView) -> Option<NodeId>) -> NodeId {
        session.view().quietly(|v| pick(&*v)).expect("node present")
    }

    fn event(json: &str) -> ClientEvent {
        serde_json::from_str(json).expect("valid client event")
    }

    #[test]
    fn test_open_renders_addressable_markup() {
        let sessions = sessions_with(SiteConfig::default());
        let (page, session) = opened(&sessions);
        assert_eq!(page.id.len(), 36);
        assert!(page.html.contains(NODE_ID_ATTR));
        assert!(page.html.contains("Jane Doe"));
        let sidebar = find(&session, |v| v.by_id(page::SIDEBAR));
        assert!(page
            .html
            .contains(&format!(r#"data-nid="{}" id="{}""#, sidebar.0, page::SIDEBAR)));
        // Rendering itself is not replayed to the browser.
        assert!(session.take_patches().is_empty());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_menu_click_patches_sidebar() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        let sidebar = find(&session, |v| v.by_id(page::SIDEBAR));

        session.dispatch(event(r#"{"type": "menu_click"}"#));
        let patches = session.take_patches();
        assert!(patches.contains(&Patch::RemoveClass {
            node: sidebar.0,
            class: SIDEBAR_HIDDEN_CLASS.into(),
        }));

        session.dispatch(event(r#"{"type": "key", "key": "Escape"}"#));
        assert!(session.take_patches().contains(&Patch::AddClass {
            node: sidebar.0,
            class: SIDEBAR_HIDDEN_CLASS.into(),
        }));
    }

    #[test]
    fn test_anchor_click_from_sidebar_closes_drawer_on_mobile() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        let (sidebar, link, about) = session.view().quietly(|v| {
            let sidebar = v.by_id(page::SIDEBAR)?;
            let link = v
                .within(sidebar, NAV_LINK_CLASS)
                .into_iter()
                .find(|l| v.attr(*l, "href").as_deref() == Some("#about"))?;
            Some((sidebar, link, v.by_id("about")?))
        })
        .expect("sidebar link to #about");

        let geometry = format!(
            r#"{{"type": "resize", "viewport": {{"width": 600, "height": 800, "scroll_y": 0}},
                "rects": [{{"node": {}, "top": 900, "height": 500}}]}}"#,
            about.0
        );
        session.dispatch(event(&geometry));
        session.dispatch(event(r#"{"type": "menu_click"}"#));
        session.take_patches();

        session.dispatch(event(&format!(r#"{{"type": "anchor_click", "node": {}}}"#, link.0)));
        let patches = session.take_patches();
        assert!(patches.contains(&Patch::AddClass {
            node: sidebar.0,
            class: SIDEBAR_HIDDEN_CLASS.into(),
        }));
        assert!(patches.contains(&Patch::Scroll { y: 880.0 }));
    }

    #[test]
    fn test_filter_click_hides_other_categories() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        let control = find(&session, |v| {
            v.by_class(crate::render::FILTER_CONTROL_CLASS)
                .into_iter()
                .find(|c| v.attr(*c, "data-filter").as_deref() == Some("mobile-apps"))
        });
        session.dispatch(event(&format!(r#"{{"type": "filter_click", "node": {}}}"#, control.0)));
        let hidden = session
            .take_patches()
            .into_iter()
            .filter(|p| matches!(p, Patch::Style { prop, value, .. } if prop == "display" && value == "none"))
            .count();
        assert_eq!(hidden, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_runs_effects_once() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        let title = find(&session, |v| v.by_id(page::HERO_TITLE));
        let loading = find(&session, |v| v.by_id(page::LOADING));

        session.start();
        session.start();
        let first = session.take_patches();
        assert!(first.contains(&Patch::Text { node: title.0, text: String::new() }));
        assert!(first.contains(&Patch::Style {
            node: loading.0,
            prop: "opacity".into(),
            value: "0".into(),
        }));
        assert_eq!(session.running_tasks(), 2);

        tokio::time::sleep(std::time::Duration::from_millis(600)).await;
        let later = session.take_patches();
        assert!(later.contains(&Patch::Text { node: title.0, text: "Builder".into() }));
        assert!(later.contains(&Patch::Style {
            node: loading.0,
            prop: "display".into(),
            value: "none".into(),
        }));
        assert_eq!(later.iter().filter(|p| matches!(p, Patch::Text { .. })).count(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_navigates_resets_and_toasts() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        session.dispatch(event(
            r#"{"type": "submit", "fields": {"name": "Ann", "email": "ann@y.org", "subject": " ", "message": "Hello"}}"#,
        ));
        let patches = session.take_patches();
        let url = patches
            .iter()
            .find_map(|p| match p {
                Patch::Navigate { url } => Some(url.clone()),
                _ => None,
            })
            .expect("mailto navigation");
        assert!(url.starts_with("mailto:jane@x.com?subject=%20&body=Name%3A%20Ann"));
        assert!(patches
            .iter()
            .any(|p| matches!(p, Patch::RemoveAttr { name, .. } if name == "value")));
        let toast = patches
            .iter()
            .find_map(|p| match p {
                Patch::Append { html, .. } => Some(html.clone()),
                _ => None,
            })
            .expect("toast appended");
        assert!(toast.contains(TOAST_HIDDEN_CLASS));
        assert!(toast.contains(NODE_ID_ATTR));
    }

    #[test]
    fn test_unknown_nodes_are_ignored() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, session) = opened(&sessions);
        session.dispatch(event(r#"{"type": "anchor_click", "node": 999999}"#));
        session.dispatch(event(r#"{"type": "image_error", "node": 999999}"#));
        session.dispatch(event(r#"{"type": "filter_click", "node": 0}"#));
        assert!(session.take_patches().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_spares_connected_and_recent_sessions() {
        let sessions = sessions_with(SiteConfig::default());
        let (_, idle) = opened(&sessions);
        let (_, watched) = opened(&sessions);
        idle.start();
        let attached = watched.attach();

        tokio::time::sleep(Duration::from_secs(120)).await;
        let (_, fresh) = opened(&sessions);
        assert_eq!(sessions.sweep(Duration::from_secs(60)), 1);
        assert_eq!(sessions.len(), 2);
        assert_eq!(idle.running_tasks(), 0);
        assert!(fresh.take_patches().is_empty());

        drop(attached);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(sessions.sweep(Duration::from_secs(60)), 2);
        assert_eq!(sessions.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_reached_after_sweep_refuses() {
        let config = SiteConfig {
            session_limit: 1,
            session_idle_secs: 60,
            ..SiteConfig::default()
        };
        let sessions = sessions_with(config);
        let (_, first) = opened(&sessions);
        let attached = first.attach();
        assert_eq!(sessions.open().map(|p| p.id), Err(SessionError::Full(1)));

        drop(attached);
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(sessions.open().is_ok());
        assert_eq!(sessions.len(), 1);
    }

    #[test]
    fn test_client_event_shapes() {
        assert_eq!(
            event(r#"{"type": "scroll", "viewport": {"width": 1280, "height": 800, "scroll_y": 40}}"#),
            ClientEvent::Scroll {
                viewport: Viewport {
                    width: 1280.0,
                    height: 800.0,
                    scroll_y: 40.0,
                },
                rects: vec![],
            }
        );
        assert!(serde_json::from_str::<ClientEvent>(r#"{"type": "explode"}"#).is_err());
    }
}
