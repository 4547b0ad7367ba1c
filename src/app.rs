//! The page controller: loads content, renders it, binds the interaction
//! handlers and owns the running effects.

use log::{debug, info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SiteConfig;
use crate::effects::{self, LazyImages, RevealObserver, SharedView, TaskGuard, ToastKind, ViewCell};
use crate::interact;
use crate::models::Content;
use crate::page;
use crate::render;
use crate::view::{MemoryView, NodeId, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    MissingElement(&'static str),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::MissingElement(id) => write!(f, "required element #{} not found", id),
        }
    }
}

impl std::error::Error for BindError {}

/// Something the user did to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    MenuButtonClick,
    OverlayClick,
    NavLinkClick(NodeId),
    AnchorClick(NodeId),
    FilterClick(NodeId),
    Scroll,
    Resize,
    KeyDown(String),
    ContactSubmit,
    ImageError(NodeId),
}

pub struct PortfolioApp<V: View + Send + 'static> {
    view: SharedView<V>,
    content: Arc<Content>,
    config: SiteConfig,
    reveal: RevealObserver,
    lazy: LazyImages,
    tasks: Vec<TaskGuard>,
    bound: bool,
}

impl<V: View + Send + 'static> PortfolioApp<V> {
    pub fn new(view: V, content: Arc<Content>, config: SiteConfig) -> Self {
        PortfolioApp {
            view: Arc::new(ViewCell::new(view)),
            content,
            config,
            reveal: RevealObserver::default(),
            lazy: LazyImages::default(),
            tasks: Vec::new(),
            bound: false,
        }
    }

    pub fn populate(&mut self) {
        let (content, config) = (&self.content, &self.config);
        effects::with_view(&self.view, |v| render::populate(v, content, config));
    }

    /// Checks the elements the handlers need. Until this succeeds events are
    /// ignored.
    pub fn bind(&mut self) -> Result<(), BindError> {
        effects::with_view(&self.view, |v| {
            for id in page::REQUIRED_INTERACTIVE {
                if v.by_id(id).is_none() {
                    return Err(BindError::MissingElement(*id));
                }
            }
            Ok(())
        })?;
        self.bound = true;
        debug!("Interaction handlers bound");
        Ok(())
    }

    pub fn start_effects(&mut self) {
        let ui = &self.config.ui;
        if let Some(task) = effects::hide_loading(self.view.clone(), ui) {
            self.tasks.push(task);
        }

        let hero = effects::with_view(&self.view, |v| {
            self.reveal = RevealObserver::observe(&*v);
            self.lazy = LazyImages::observe(&*v);
            v.by_id(page::HERO_TITLE)
        });
        if let (Some(node), Some(personal)) = (hero, &self.content.personal) {
            self.tasks.push(effects::spawn_typewriter(
                self.view.clone(),
                node,
                &personal.subtitle,
                Duration::from_millis(ui.typewriter_interval_ms),
            ));
        }
        self.check_visibility();
        info!(
            "Effects started: {} sections to reveal, {} images deferred",
            self.reveal.pending(),
            self.lazy.pending()
        );
    }

    fn check_visibility(&mut self) {
        let (reveal, lazy, ui) = (&mut self.reveal, &mut self.lazy, &self.config.ui);
        effects::with_view(&self.view, |v| {
            reveal.check(v, ui);
            lazy.check(v);
        });
    }

    pub fn handle(&mut self, event: Event) {
        if !self.bound {
            debug!("Ignoring {:?}: handlers not bound", event);
            return;
        }
        self.tasks.retain(|t| !t.is_finished());

        let ui = &self.config.ui;
        match event {
            Event::MenuButtonClick => {
                let open = effects::with_view(&self.view, |v| {
                    interact::toggle_sidebar(v);
                    interact::sidebar_open(&*v)
                });
                debug!("Sidebar {}", if open { "opened" } else { "closed" });
            }
            Event::OverlayClick => effects::with_view(&self.view, interact::close_sidebar),
            Event::NavLinkClick(link) => effects::with_view(&self.view, |v| {
                if interact::is_sidebar_link(&*v, link) {
                    interact::nav_link_clicked(v, ui);
                }
                interact::anchor_clicked(v, link, ui);
            }),
            Event::AnchorClick(anchor) => {
                effects::with_view(&self.view, |v| interact::anchor_clicked(v, anchor, ui));
            }
            Event::FilterClick(control) => {
                if let Some(key) = effects::with_view(&self.view, |v| render::apply_filter(v, control)) {
                    debug!("Portfolio filter: {}", key);
                }
            }
            Event::Scroll => {
                effects::with_view(&self.view, |v| interact::scroll_spy(v, ui));
                self.check_visibility();
            }
            Event::Resize => {
                effects::with_view(&self.view, |v| interact::resized(v, ui));
                self.check_visibility();
            }
            Event::KeyDown(key) => effects::with_view(&self.view, |v| interact::key_down(v, &key)),
            Event::ContactSubmit => {
                let recipient = self.content.contact_email();
                let sent = effects::with_view(&self.view, |v| interact::submit_contact(v, recipient, ui));
                if sent.is_some() {
                    let message = self.config.ui.contact_toast.clone();
                    self.notify(&message, ToastKind::Success);
                }
            }
            Event::ImageError(img) => {
                if effects::with_view(&self.view, |v| effects::image_failed(v, img)) {
                    warn!("Image {:?} failed to load, showing placeholder", img);
                }
            }
        }
    }

    pub fn notify(&mut self, message: &str, kind: ToastKind) -> NodeId {
        let (node, task) = effects::spawn_toast(self.view.clone(), message, kind, &self.config.ui);
        self.tasks.push(task);
        node
    }

    /// Cancels every running effect.
    pub fn shutdown(&mut self) {
        if !self.tasks.is_empty() {
            let names: Vec<&str> = self.tasks.iter().map(|t| t.name()).collect();
            debug!("Stopping effect tasks: {}", names.join(", "));
        }
        self.tasks.clear();
    }

    pub fn view(&self) -> &SharedView<V> {
        &self.view
    }

    #[cfg(test)]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[cfg(test)]
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn running_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }
}

/// Static rendering for pages served without a live session: the skeleton
/// populated with `content`, loading screen already hidden.
pub fn render_page(content: &Content, config: &SiteConfig) -> String {
    let mut view: MemoryView = page::document(config);
    render::populate(&mut view, content, config);
    if let Some(loading) = view.by_id(page::LOADING) {
        view.set_style(loading, "display", "none");
    }
    view.to_html()
}
