//! Detached element trees built by the renderers before they are attached to a view.
//! Text and attribute values stay raw here; escaping happens once, on serialization.

/// Elements that never carry children or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &["img", "input", "br", "hr", "meta", "link", "source"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub classes: Vec<String>,
    pub styles: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            classes: Vec::new(),
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Adds every whitespace-separated class in `classes`, skipping duplicates.
    pub fn class(mut self, classes: &str) -> Self {
        for c in classes.split_whitespace() {
            if !self.classes.iter().any(|x| x == c) {
                self.classes.push(c.to_string());
            }
        }
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
        self
    }

    pub fn style(mut self, prop: &str, value: &str) -> Self {
        self.styles.push((prop.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(text.to_string()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Appends `child` only when present; keeps optional fragments inline in builder chains.
    pub fn child_opt(self, child: Option<Element>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push_str(&open_tag(&el.tag, &el.attrs, &el.classes, &el.styles));
    if el.is_void() {
        return;
    }
    for child in &el.children {
        match child {
            Node::Element(e) => write_element(out, e),
            Node::Text(t) => out.push_str(&html_escape(t)),
        }
    }
    out.push_str(&format!("</{}>", el.tag));
}

/// Opening tag with escaped attributes, class list and inline style, in that order.
pub(crate) fn open_tag(
    tag: &str,
    attrs: &[(String, String)],
    classes: &[String],
    styles: &[(String, String)],
) -> String {
    let mut s = format!("<{}", tag);
    for (k, v) in attrs {
        s.push_str(&format!(" {}=\"{}\"", k, html_escape(v)));
    }
    if !classes.is_empty() {
        s.push_str(&format!(" class=\"{}\"", html_escape(&classes.join(" "))));
    }
    if !styles.is_empty() {
        let decl: Vec<String> = styles.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
        s.push_str(&format!(" style=\"{}\"", html_escape(&decl.join(";"))));
    }
    s.push('>');
    s
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
