//! Interaction handlers: sidebar, smooth scroll, scroll-spy, contact mailto, resize.

use std::collections::HashMap;

use crate::config::UiConfig;
use crate::page;
use crate::view::{NodeId, View};

pub const SIDEBAR_HIDDEN_CLASS: &str = "-translate-x-full";
pub const OVERLAY_HIDDEN_CLASS: &str = "hidden";
pub const NAV_ACTIVE_CLASS: &str = "active";
pub const NAV_LINK_CLASS: &str = "nav-link";
/// Keys `key_down` reacts to; the page bridge forwards only these.
pub const HANDLED_KEYS: &[&str] = &["Escape"];

// ── Sidebar ────────────────────────────────────────────

pub fn sidebar_open(view: &impl View) -> bool {
    view.by_id(page::SIDEBAR)
        .map(|s| !view.has_class(s, SIDEBAR_HIDDEN_CLASS))
        .unwrap_or(false)
}

pub fn toggle_sidebar(view: &mut impl View) {
    if let Some(sidebar) = view.by_id(page::SIDEBAR) {
        view.toggle_class(sidebar, SIDEBAR_HIDDEN_CLASS);
    }
    if let Some(overlay) = view.by_id(page::SIDEBAR_OVERLAY) {
        view.toggle_class(overlay, OVERLAY_HIDDEN_CLASS);
    }
}

pub fn close_sidebar(view: &mut impl View) {
    if let Some(sidebar) = view.by_id(page::SIDEBAR) {
        view.add_class(sidebar, SIDEBAR_HIDDEN_CLASS);
    }
    if let Some(overlay) = view.by_id(page::SIDEBAR_OVERLAY) {
        view.add_class(overlay, OVERLAY_HIDDEN_CLASS);
    }
}

/// Whether `node` is one of the sidebar's navigation links.
pub fn is_sidebar_link(view: &impl View, node: NodeId) -> bool {
    view.by_id(page::SIDEBAR)
        .map(|s| view.within(s, NAV_LINK_CLASS).contains(&node))
        .unwrap_or(false)
}

/// Sidebar links close the drawer on narrow viewports.
pub fn nav_link_clicked(view: &mut impl View, ui: &UiConfig) {
    if view.viewport().width < ui.sidebar_breakpoint {
        close_sidebar(view);
    }
}

pub fn resized(view: &mut impl View, ui: &UiConfig) {
    if view.viewport().width >= ui.sidebar_breakpoint {
        close_sidebar(view);
    }
}

pub fn key_down(view: &mut impl View, key: &str) {
    if HANDLED_KEYS.contains(&key) {
        close_sidebar(view);
    }
}

// ── Smooth scroll ──────────────────────────────────────

/// Scrolls to the section an in-page anchor points at.
/// Returns the scroll target, or `None` when the anchor leads nowhere.
pub fn anchor_clicked(view: &mut impl View, anchor: NodeId, ui: &UiConfig) -> Option<f64> {
    let href = view.attr(anchor, "href")?;
    let id = href.strip_prefix('#').filter(|s| !s.is_empty())?;
    let target = view.by_id(id)?;
    let y = view.rect(target).top - ui.anchor_offset;
    view.scroll_to(y);
    Some(view.viewport().scroll_y)
}

// ── Scroll-spy ─────────────────────────────────────────

/// Section whose vertical span holds `scrollY + offset`; the last match wins.
pub fn current_section(view: &impl View, ui: &UiConfig) -> Option<String> {
    let position = view.viewport().scroll_y + ui.scroll_offset;
    let mut current = None;
    for section in view.by_tag("section") {
        let id = match view.attr(section, "id") {
            Some(id) => id,
            None => continue,
        };
        let rect = view.rect(section);
        if position >= rect.top && position < rect.bottom() {
            current = Some(id);
        }
    }
    current
}

/// Marks the sidebar link of the current section active, every other inactive.
pub fn scroll_spy(view: &mut impl View, ui: &UiConfig) -> Option<String> {
    let current = current_section(&*view, ui);
    let sidebar = view.by_id(page::SIDEBAR)?;
    let wanted = current.as_ref().map(|id| format!("#{}", id));
    for link in view.within(sidebar, NAV_LINK_CLASS) {
        view.remove_class(link, NAV_ACTIVE_CLASS);
        if wanted.is_some() && view.attr(link, "href") == wanted {
            view.add_class(link, NAV_ACTIVE_CLASS);
        }
    }
    current
}

// ── Contact ────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, rocket::FromForm)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[field(default = String::new())]
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let get = |k: &str| fields.get(k).cloned().unwrap_or_default();
        ContactForm {
            name: get("name"),
            email: get("email"),
            subject: get("subject"),
            message: get("message"),
        }
    }

    pub fn body(&self) -> String {
        format!(
            "Name: {}\nEmail: {}\n\nMessage:\n{}\n",
            self.name, self.email, self.message
        )
    }
}

/// Percent-encodes like `encodeURIComponent`: everything but
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` becomes `%XX` per UTF-8 byte.
pub fn encode_uri_component(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => result.push(b as char),
            _ => result.push_str(&format!("%{:02X}", b)),
        }
    }
    result
}

/// `mailto:` target for a contact submission. An empty subject falls back to
/// `default_subject`; whitespace is kept as typed.
pub fn compose_mailto(recipient: &str, form: &ContactForm, default_subject: &str) -> String {
    let subject = if form.subject.is_empty() {
        default_subject
    } else {
        form.subject.as_str()
    };
    format!(
        "mailto:{}?subject={}&body={}",
        recipient,
        encode_uri_component(subject),
        encode_uri_component(&form.body())
    )
}

/// Named fields of a form: input `value` attributes, textarea text.
pub fn form_fields(view: &impl View, form: NodeId) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for node in view.descendants(form) {
        let name = match view.attr(node, "name") {
            Some(n) => n,
            None => continue,
        };
        let value = match view.tag(node).as_deref() {
            Some("textarea") => view.text(node),
            _ => view.attr(node, "value").unwrap_or_default(),
        };
        out.insert(name, value);
    }
    out
}

/// Writes submitted values into the named fields of a form. Unknown names are
/// ignored.
pub fn fill_form(view: &mut impl View, form: NodeId, fields: &HashMap<String, String>) {
    for node in view.descendants(form) {
        let value = match view.attr(node, "name").and_then(|n| fields.get(&n)) {
            Some(v) => v.clone(),
            None => continue,
        };
        match view.tag(node).as_deref() {
            Some("textarea") => view.set_text(node, &value),
            _ => view.set_attr(node, "value", &value),
        }
    }
}

pub fn reset_form(view: &mut impl View, form: NodeId) {
    for node in view.descendants(form) {
        if view.attr(node, "name").is_none() {
            continue;
        }
        match view.tag(node).as_deref() {
            Some("textarea") => view.set_text(node, ""),
            _ => view.remove_attr(node, "value"),
        }
    }
}

/// Reads the contact form, navigates to the composed `mailto:` target and
/// clears the fields. Returns the target.
pub fn submit_contact(view: &mut impl View, recipient: &str, ui: &UiConfig) -> Option<String> {
    let form = view.by_id(page::CONTACT_FORM)?;
    let fields = ContactForm::from_fields(&form_fields(&*view, form));
    if recipient.is_empty() {
        log::warn!("Contact form submitted without a recipient address");
    }
    let target = compose_mailto(recipient, &fields, &ui.default_subject);
    view.navigate(&target);
    reset_form(view, form);
    Some(target)
}
