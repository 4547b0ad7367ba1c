//! View binding: the capability set the controller needs from a document.
//! `MemoryView` is the in-memory document behind server-side rendering, live
//! page sessions and tests.

use serde::{Deserialize, Serialize};

use crate::dom::{html_escape, open_tag, Element, Node};

/// Attribute carrying a node's id in live markup, so a browser can address
/// the element a `Patch` targets.
pub const NODE_ID_ATTR: &str = "data-nid";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Vertical layout box of a node, in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Rect { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
        }
    }
}

/// One recorded document mutation, replayed by the page bridge in the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    Text { node: usize, text: String },
    Attr { node: usize, name: String, value: String },
    RemoveAttr { node: usize, name: String },
    AddClass { node: usize, class: String },
    RemoveClass { node: usize, class: String },
    Style { node: usize, prop: String, value: String },
    Append { parent: usize, html: String },
    Remove { node: usize },
    Scroll { y: f64 },
    Navigate { url: String },
}

pub trait View {
    fn root(&self) -> NodeId;
    /// Tag name of an element node; `None` for text nodes and detached ids.
    fn tag(&self, node: NodeId) -> Option<String>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn append(&mut self, parent: NodeId, el: Element) -> NodeId;
    fn remove(&mut self, node: NodeId);
    fn text(&self, node: NodeId) -> String;
    fn set_text(&mut self, node: NodeId, text: &str);
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attr(&mut self, node: NodeId, name: &str, value: &str);
    fn remove_attr(&mut self, node: NodeId, name: &str);
    fn classes(&self, node: NodeId) -> Vec<String>;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);
    fn style(&self, node: NodeId, prop: &str) -> Option<String>;
    fn set_style(&mut self, node: NodeId, prop: &str, value: &str);
    fn rect(&self, node: NodeId) -> Rect;
    fn viewport(&self) -> Viewport;
    fn scroll_to(&mut self, y: f64);
    /// Point the browsing context at `url` (location assignment).
    fn navigate(&mut self, url: &str);

    /// Every node below `node` in document order, `node` itself excluded.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).into_iter().rev());
        }
        out
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|n| self.attr(*n, "id").as_deref() == Some(id))
    }

    fn by_class(&self, class: &str) -> Vec<NodeId> {
        self.within(self.root(), class)
    }

    fn within(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| self.has_class(*n, class))
            .collect()
    }

    fn by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|n| self.tag(*n).as_deref() == Some(tag))
            .collect()
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    /// Flips `class` on `node`; returns whether it is now present.
    fn toggle_class(&mut self, node: NodeId, class: &str) -> bool {
        if self.has_class(node, class) {
            self.remove_class(node, class);
            false
        } else {
            self.add_class(node, class);
            true
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    tag: Option<String>,
    text: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    rect: Rect,
    alive: bool,
}

impl Slot {
    fn element(tag: &str) -> Self {
        Slot {
            tag: Some(tag.to_string()),
            text: String::new(),
            attrs: Vec::new(),
            classes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
            parent: None,
            rect: Rect::default(),
            alive: true,
        }
    }

    fn text(text: &str) -> Self {
        Slot {
            tag: None,
            text: text.to_string(),
            ..Slot::element("")
        }
    }
}

/// Arena-backed document. Node ids stay valid for the lifetime of the view;
/// removed nodes are detached and ignored by every query.
///
/// Once `record` is called every mutation is also journaled as a `Patch`.
#[derive(Debug, Clone)]
pub struct MemoryView {
    slots: Vec<Slot>,
    viewport: Viewport,
    /// Every URL passed to `navigate`; only kept for inspection in tests.
    #[cfg(test)]
    navigations: Vec<String>,
    journal: Option<Vec<Patch>>,
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryView {
    pub fn new() -> Self {
        MemoryView {
            slots: vec![Slot::element("body")],
            viewport: Viewport::default(),
            #[cfg(test)]
            navigations: Vec::new(),
            journal: None,
        }
    }

    /// Starts journaling mutations.
    pub fn record(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    /// Recorded patches since the last call, oldest first.
    pub fn take_patches(&mut self) -> Vec<Patch> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn log(&mut self, patch: impl FnOnce() -> Patch) {
        if let Some(journal) = self.journal.as_mut() {
            journal.push(patch());
        }
    }

    /// Arena slots allocated so far, detached ones included.
    #[cfg(test)]
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(slot) = self.slot_mut(node) {
            slot.rect = rect;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[cfg(test)]
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.slot(node).is_some()
    }

    /// Inner markup of the document body.
    pub fn to_html(&self) -> String {
        self.body_html(false)
    }

    /// Inner markup with every element stamped with its `data-nid`.
    pub fn to_live_html(&self) -> String {
        self.body_html(true)
    }

    #[cfg(test)]
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, node, false);
        out
    }

    fn body_html(&self, ids: bool) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(&mut out, child, ids);
        }
        out
    }

    fn write_node(&self, out: &mut String, node: NodeId, ids: bool) {
        let slot = match self.slot(node) {
            Some(s) => s,
            None => return,
        };
        let tag = match &slot.tag {
            Some(t) => t,
            None => {
                out.push_str(&html_escape(&slot.text));
                return;
            }
        };
        if ids {
            let mut attrs = vec![(NODE_ID_ATTR.to_string(), node.0.to_string())];
            attrs.extend(slot.attrs.iter().cloned());
            out.push_str(&open_tag(tag, &attrs, &slot.classes, &slot.styles));
        } else {
            out.push_str(&open_tag(tag, &slot.attrs, &slot.classes, &slot.styles));
        }
        if crate::dom::VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for child in &slot.children {
            self.write_node(out, *child, ids);
        }
        out.push_str(&format!("</{}>", tag));
    }

    fn slot(&self, node: NodeId) -> Option<&Slot> {
        self.slots.get(node.0).filter(|s| s.alive)
    }

    fn slot_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.slots.get_mut(node.0).filter(|s| s.alive)
    }

    fn push(&mut self, parent: NodeId, slot: Slot) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            parent: Some(parent),
            ..slot
        });
        if let Some(p) = self.slot_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn attach(&mut self, parent: NodeId, el: Element) -> NodeId {
        let mut slot = Slot::element(&el.tag);
        slot.attrs = el.attrs;
        slot.classes = el.classes;
        slot.styles = el.styles;
        let id = self.push(parent, slot);
        for child in el.children {
            match child {
                Node::Element(e) => {
                    self.attach(id, e);
                }
                Node::Text(t) => {
                    self.push(id, Slot::text(&t));
                }
            }
        }
        id
    }

    fn kill(&mut self, node: NodeId) {
        let children = match self.slots.get_mut(node.0) {
            Some(s) => {
                s.alive = false;
                std::mem::take(&mut s.children)
            }
            None => return,
        };
        for child in children {
            self.kill(child);
        }
    }
}

impl View for MemoryView {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn tag(&self, node: NodeId) -> Option<String> {
        self.slot(node).and_then(|s| s.tag.clone())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.slot(node)
            .map(|s| s.children.clone())
            .unwrap_or_default()
    }

    fn append(&mut self, parent: NodeId, el: Element) -> NodeId {
        let id = self.attach(parent, el);
        if self.journal.is_some() && self.is_attached(parent) {
            let mut html = String::new();
            self.write_node(&mut html, id, true);
            self.log(|| Patch::Append { parent: parent.0, html });
        }
        id
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root() || !self.is_attached(node) {
            return;
        }
        let parent = self.slot(node).and_then(|s| s.parent);
        if let Some(p) = parent.and_then(|p| self.slot_mut(p)) {
            p.children.retain(|c| *c != node);
        }
        self.kill(node);
        self.log(|| Patch::Remove { node: node.0 });
    }

    fn text(&self, node: NodeId) -> String {
        match self.slot(node) {
            Some(s) if s.tag.is_none() => s.text.clone(),
            Some(_) => self
                .descendants(node)
                .into_iter()
                .filter_map(|n| self.slot(n))
                .filter(|s| s.tag.is_none())
                .map(|s| s.text.as_str())
                .collect(),
            None => String::new(),
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        let children = match self.slot(node) {
            Some(s) if s.tag.is_some() => s.children.clone(),
            _ => return,
        };
        // A lone text child is rewritten in place so repeated updates do not
        // grow the arena.
        let reusable = match children.as_slice() {
            [only] if self.tag(*only).is_none() && !text.is_empty() => Some(*only),
            _ => None,
        };
        match reusable {
            Some(child) => {
                if let Some(slot) = self.slot_mut(child) {
                    slot.text = text.to_string();
                }
            }
            None => {
                if let Some(slot) = self.slot_mut(node) {
                    slot.children.clear();
                }
                for child in children {
                    self.kill(child);
                }
                if !text.is_empty() {
                    self.push(node, Slot::text(text));
                }
            }
        }
        self.log(|| Patch::Text {
            node: node.0,
            text: text.to_string(),
        });
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.slot(node)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let slot = match self.slot_mut(node) {
            Some(s) => s,
            None => return,
        };
        match slot.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(a) => a.1 = value.to_string(),
            None => slot.attrs.push((name.to_string(), value.to_string())),
        }
        self.log(|| Patch::Attr {
            node: node.0,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn remove_attr(&mut self, node: NodeId, name: &str) {
        let slot = match self.slot_mut(node) {
            Some(s) => s,
            None => return,
        };
        let before = slot.attrs.len();
        slot.attrs.retain(|(k, _)| k != name);
        if slot.attrs.len() != before {
            self.log(|| Patch::RemoveAttr {
                node: node.0,
                name: name.to_string(),
            });
        }
    }

    fn classes(&self, node: NodeId) -> Vec<String> {
        self.slot(node).map(|s| s.classes.clone()).unwrap_or_default()
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let slot = match self.slot_mut(node) {
            Some(s) if s.tag.is_some() => s,
            _ => return,
        };
        if !slot.classes.iter().any(|c| c == class) {
            slot.classes.push(class.to_string());
            self.log(|| Patch::AddClass {
                node: node.0,
                class: class.to_string(),
            });
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let slot = match self.slot_mut(node) {
            Some(s) => s,
            None => return,
        };
        let before = slot.classes.len();
        slot.classes.retain(|c| c != class);
        if slot.classes.len() != before {
            self.log(|| Patch::RemoveClass {
                node: node.0,
                class: class.to_string(),
            });
        }
    }

    fn style(&self, node: NodeId, prop: &str) -> Option<String> {
        self.slot(node)?
            .styles
            .iter()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.clone())
    }

    fn set_style(&mut self, node: NodeId, prop: &str, value: &str) {
        let slot = match self.slot_mut(node) {
            Some(s) => s,
            None => return,
        };
        match slot.styles.iter_mut().find(|(k, _)| k == prop) {
            Some(s) => s.1 = value.to_string(),
            None => slot.styles.push((prop.to_string(), value.to_string())),
        }
        self.log(|| Patch::Style {
            node: node.0,
            prop: prop.to_string(),
            value: value.to_string(),
        });
    }

    fn rect(&self, node: NodeId) -> Rect {
        self.slot(node).map(|s| s.rect).unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_to(&mut self, y: f64) {
        let y = y.max(0.0);
        self.viewport.scroll_y = y;
        self.log(|| Patch::Scroll { y });
    }

    fn navigate(&mut self, url: &str) {
        #[cfg(test)]
        self.navigations.push(url.to_string());
        self.log(|| Patch::Navigate { url: url.to_string() });
    }
}
