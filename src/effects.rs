//! Presentation effects: reveal-on-scroll, lazy images, broken-image fallback,
//! typewriter, toasts and the loading screen. Timed effects run as spawned
//! tasks owned by a `TaskGuard`; dropping the guard cancels the task.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rocket::tokio;
use rocket::tokio::sync::futures::Notified;
use rocket::tokio::sync::Notify;
use rocket::tokio::task::JoinHandle;
use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use crate::config::UiConfig;
use crate::dom::Element;
use crate::page;
use crate::view::{NodeId, Rect, View, Viewport};

/// A view shared between the controller and its effect tasks, with a change
/// signal for whoever mirrors it elsewhere.
#[derive(Debug, Default)]
pub struct ViewCell<V> {
    view: Mutex<V>,
    changed: Notify,
}

pub type SharedView<V> = Arc<ViewCell<V>>;

impl<V> ViewCell<V> {
    pub fn new(view: V) -> Self {
        ViewCell {
            view: Mutex::new(view),
            changed: Notify::new(),
        }
    }

    /// Runs `f` on the view without signalling a change.
    pub fn quietly<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        let mut guard = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut *guard)
    }

    /// Resolves after the next `with_view` call made once this was created.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }
}

pub const REVEAL_WATCH_CLASS: &str = "animate-on-scroll";
pub const REVEALED_CLASS: &str = "animate";
pub const LAZY_CLASS: &str = "lazy";
pub const TOAST_HIDDEN_CLASS: &str = "translate-x-full";
const TOAST_BASE: &str = "toast fixed top-20 right-4 z-50 p-4 rounded-lg shadow-lg transition-all duration-300 transform";

pub const PLACEHOLDER_SVG: &str = r##"<svg width="200" height="200" xmlns="http://www.w3.org/2000/svg"><rect width="100%" height="100%" fill="#ddd"/><text x="50%" y="50%" font-family="Arial, sans-serif" font-size="14" fill="#999" text-anchor="middle" dy=".3em">Image not available</text></svg>"##;

/// Runs `f` with the view locked, then wakes everyone waiting on `changed`.
/// A poisoned lock is recovered: the view holds no invariants a panicking
/// writer could break halfway.
pub fn with_view<V, R>(view: &ViewCell<V>, f: impl FnOnce(&mut V) -> R) -> R {
    let out = view.quietly(f);
    view.changed.notify_waiters();
    out
}

/// Owns a spawned effect task and aborts it on drop.
#[derive(Debug)]
pub struct TaskGuard {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskGuard {
    pub fn spawn<F>(name: &'static str, fut: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        TaskGuard {
            name,
            handle: tokio::spawn(fut),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            log::debug!("Cancelling effect task: {}", self.name);
            self.handle.abort();
        }
    }
}

// ── Intersection ───────────────────────────────────────

/// Fraction of `rect` inside the viewport with `bottom_margin` trimmed off,
/// or `None` when they do not intersect. Zero-height boxes count as fully
/// visible when their top edge is inside.
pub fn visible_ratio(rect: Rect, viewport: Viewport, bottom_margin: f64) -> Option<f64> {
    let top = viewport.scroll_y;
    let bottom = viewport.scroll_y + viewport.height - bottom_margin;
    if rect.height <= 0.0 {
        return (rect.top >= top && rect.top <= bottom).then_some(1.0);
    }
    let visible = rect.bottom().min(bottom) - rect.top.max(top);
    (visible > 0.0).then(|| visible / rect.height)
}

/// One-way reveal of `.animate-on-scroll` nodes on first intersection.
#[derive(Debug, Default)]
pub struct RevealObserver {
    watched: Vec<NodeId>,
}

impl RevealObserver {
    pub fn observe(view: &impl View) -> Self {
        RevealObserver {
            watched: view.by_class(REVEAL_WATCH_CLASS),
        }
    }

    pub fn pending(&self) -> usize {
        self.watched.len()
    }

    /// Reveals every watched node now intersecting and stops watching it.
    pub fn check(&mut self, view: &mut impl View, ui: &UiConfig) -> Vec<NodeId> {
        let viewport = view.viewport();
        let mut revealed = Vec::new();
        self.watched.retain(|node| {
            let hit = visible_ratio(view.rect(*node), viewport, ui.reveal_bottom_margin)
                .is_some_and(|r| r >= ui.reveal_threshold);
            if hit {
                revealed.push(*node);
            }
            !hit
        });
        for node in &revealed {
            view.add_class(*node, REVEALED_CLASS);
        }
        revealed
    }
}

/// Deferred images (`img[data-src]`) loaded on first intersection.
#[derive(Debug, Default)]
pub struct LazyImages {
    pending: Vec<NodeId>,
}

impl LazyImages {
    pub fn observe(view: &impl View) -> Self {
        let pending = view
            .by_tag("img")
            .into_iter()
            .filter(|img| view.attr(*img, "data-src").is_some())
            .collect();
        LazyImages { pending }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn check(&mut self, view: &mut impl View) -> Vec<NodeId> {
        let viewport = view.viewport();
        let (hit, rest): (Vec<NodeId>, Vec<NodeId>) = self
            .pending
            .iter()
            .copied()
            .partition(|img| visible_ratio(view.rect(*img), viewport, 0.0).is_some());
        self.pending = rest;
        for img in &hit {
            if let Some(src) = view.attr(*img, "data-src") {
                view.set_attr(*img, "src", &src);
            }
            view.remove_attr(*img, "data-src");
            view.remove_class(*img, LAZY_CLASS);
        }
        hit
    }
}

// ── Broken images ──────────────────────────────────────

pub fn placeholder_uri() -> &'static str {
    static URI: OnceLock<String> = OnceLock::new();
    URI.get_or_init(|| format!("data:image/svg+xml;base64,{}", STANDARD.encode(PLACEHOLDER_SVG)))
}

/// Swaps a failed image to the placeholder. An image already showing the
/// placeholder is left alone so a failing placeholder cannot loop.
pub fn image_failed(view: &mut impl View, img: NodeId) -> bool {
    if view.tag(img).as_deref() != Some("img") {
        return false;
    }
    let uri = placeholder_uri();
    if view.attr(img, "src").as_deref() == Some(uri) {
        return false;
    }
    view.set_attr(img, "src", uri);
    true
}

// ── Typewriter ─────────────────────────────────────────

/// Successive prefixes of a text, one more character each frame.
#[derive(Debug, Clone)]
pub struct Typewriter {
    chars: Vec<char>,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Self {
        Typewriter {
            chars: text.chars().collect(),
            shown: 0,
        }
    }

    pub fn next_frame(&mut self) -> Option<String> {
        if self.shown >= self.chars.len() {
            return None;
        }
        self.shown += 1;
        Some(self.chars[..self.shown].iter().collect())
    }
}

/// Clears `node` and types `text` back into it, one character per `every`.
pub fn spawn_typewriter<V>(view: SharedView<V>, node: NodeId, text: &str, every: Duration) -> TaskGuard
where
    V: View + Send + 'static,
{
    with_view(&view, |v| v.set_text(node, ""));
    let mut writer = Typewriter::new(text);
    TaskGuard::spawn("typewriter", async move {
        loop {
            tokio::time::sleep(every).await;
            match writer.next_frame() {
                Some(frame) => with_view(&view, |v| v.set_text(node, &frame)),
                None => break,
            }
        }
    })
}

// ── Toast ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    fn classes(self) -> &'static str {
        match self {
            ToastKind::Success => "bg-green-500 text-white",
            ToastKind::Error => "bg-red-500 text-white",
        }
    }
}

/// Appends a toast off-screen, slides it in after the enter delay, out at the
/// end of its duration, and removes it once the exit transition is over.
/// Concurrent toasts are independent.
pub fn spawn_toast<V>(view: SharedView<V>, message: &str, kind: ToastKind, ui: &UiConfig) -> (NodeId, TaskGuard)
where
    V: View + Send + 'static,
{
    let node = with_view(&view, |v| {
        let root = v.root();
        v.append(
            root,
            Element::new("div")
                .class(TOAST_BASE)
                .class(TOAST_HIDDEN_CLASS)
                .class(kind.classes())
                .attr("role", "status")
                .text(message),
        )
    });
    let enter = Duration::from_millis(ui.toast_enter_delay_ms);
    let shown = Duration::from_millis(ui.toast_duration_ms.saturating_sub(ui.toast_enter_delay_ms));
    let exit = Duration::from_millis(ui.toast_exit_ms);

    let task = TaskGuard::spawn("toast", async move {
        tokio::time::sleep(enter).await;
        with_view(&view, |v| v.remove_class(node, TOAST_HIDDEN_CLASS));
        tokio::time::sleep(shown).await;
        with_view(&view, |v| v.add_class(node, TOAST_HIDDEN_CLASS));
        tokio::time::sleep(exit).await;
        with_view(&view, |v| v.remove(node));
    });
    (node, task)
}

// ── Loading screen ─────────────────────────────────────

/// Fades `#loading` out and hides it once the fade is over.
pub fn hide_loading<V>(view: SharedView<V>, ui: &UiConfig) -> Option<TaskGuard>
where
    V: View + Send + 'static,
{
    let node = with_view(&view, |v| {
        let node = v.by_id(page::LOADING)?;
        v.set_style(node, "opacity", "0");
        Some(node)
    })?;
    let fade = Duration::from_millis(ui.loading_fade_ms);
    Some(TaskGuard::spawn("loading", async move {
        tokio::time::sleep(fade).await;
        with_view(&view, |v| v.set_style(node, "display", "none"));
    }))
}
