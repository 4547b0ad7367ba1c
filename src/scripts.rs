//! The page bridge: a small inline script that forwards browser events to the
//! page's live session and applies the document patches streamed back. All
//! page behaviour lives in the session's controller; the bridge only measures,
//! forwards and mirrors.

use crate::effects::REVEAL_WATCH_CLASS;
use crate::interact::HANDLED_KEYS;
use crate::page;
use crate::render::FILTER_CONTROL_CLASS;
use crate::view::NODE_ID_ATTR;

/// Mount point of the session routes.
pub const SESSION_ROOT: &str = "/session";

const BRIDGE_SCRIPT: &str = r##"(function () {
  var session = document.body.getAttribute("data-session");
  if (!session || !window.fetch || !window.EventSource) return;
  var base = "__SESSION_ROOT__/" + encodeURIComponent(session);
  var $ = function (id) { return document.getElementById(id); };
  var nid = function (el) { return Number(el.getAttribute("__NODE_ID__")); };
  var node = function (n) { return document.querySelector('[__NODE_ID__="' + n + '"]'); };

  function send(event) {
    return fetch(base + "/event", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(event)
    }).catch(function () {});
  }

  function measure(type) {
    var rects = [];
    document.querySelectorAll("__MEASURED__").forEach(function (el) {
      if (!el.hasAttribute("__NODE_ID__")) return;
      var top, height;
      if (el.tagName === "SECTION") {
        top = el.offsetTop;
        height = el.clientHeight;
      } else {
        var box = el.getBoundingClientRect();
        top = box.top + window.scrollY;
        height = box.height;
      }
      rects.push({ node: nid(el), top: top, height: height });
    });
    return {
      type: type,
      viewport: { width: window.innerWidth, height: window.innerHeight, scroll_y: window.scrollY },
      rects: rects
    };
  }

  function apply(p) {
    if (p.op === "scroll") { window.scrollTo({ top: p.y, behavior: "smooth" }); return; }
    if (p.op === "navigate") { window.location.href = p.url; return; }
    var el = node(p.op === "append" ? p.parent : p.node);
    if (!el) return;
    switch (p.op) {
      case "text":
        el.textContent = p.text;
        if (el.tagName === "TEXTAREA") el.value = p.text;
        break;
      case "attr":
        el.setAttribute(p.name, p.value);
        if (p.name === "value") el.value = p.value;
        break;
      case "remove_attr":
        el.removeAttribute(p.name);
        if (p.name === "value") el.value = "";
        break;
      case "add_class": el.classList.add(p.class); break;
      case "remove_class": el.classList.remove(p.class); break;
      case "style": el.style.setProperty(p.prop, p.value); break;
      case "append": el.insertAdjacentHTML("beforeend", p.html); break;
      case "remove": el.remove(); break;
    }
  }

  var menu = $("__MENU__"), overlay = $("__OVERLAY__"), form = $("__CONTACT_FORM__");
  if (menu) menu.addEventListener("click", function () { send({ type: "menu_click" }); });
  if (overlay) overlay.addEventListener("click", function () { send({ type: "overlay_click" }); });

  document.addEventListener("click", function (e) {
    var filter = e.target.closest(".__FILTER__");
    if (filter && filter.hasAttribute("__NODE_ID__")) {
      send({ type: "filter_click", node: nid(filter) });
      return;
    }
    var a = e.target.closest('a[href^="#"]');
    if (!a || !a.hasAttribute("__NODE_ID__")) return;
    var id = a.getAttribute("href").slice(1);
    if (!id || !$(id)) return;
    e.preventDefault();
    send({ type: "anchor_click", node: nid(a) });
  });

  var keys = __KEYS__;
  document.addEventListener("keydown", function (e) {
    if (keys.indexOf(e.key) >= 0) send({ type: "key", key: e.key });
  });

  var queued = {};
  function geometry(type) {
    if (queued[type]) return;
    queued[type] = true;
    window.requestAnimationFrame(function () {
      queued[type] = false;
      send(measure(type));
    });
  }
  window.addEventListener("scroll", function () { geometry("scroll"); }, { passive: true });
  window.addEventListener("resize", function () { geometry("resize"); });

  document.addEventListener("error", function (e) {
    var img = e.target;
    if (img.tagName === "IMG" && img.hasAttribute("__NODE_ID__")) send({ type: "image_error", node: nid(img) });
  }, true);

  if (form) {
    form.addEventListener("submit", function (e) {
      e.preventDefault();
      var fields = {};
      new FormData(form).forEach(function (value, name) { fields[name] = String(value); });
      send({ type: "submit", fields: fields });
    });
  }

  send(measure("resize")).then(function () {
    var stream = new EventSource(base + "/patches");
    stream.onmessage = function (m) { JSON.parse(m.data).forEach(apply); };
  });
})();"##;

/// Escapes a value for a double-quoted JS string literal inside an inline
/// `<script>`.
fn js_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            '<' => out.push_str("\\u003c"),
            c => out.push(c),
        }
    }
    out
}

fn js_array(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"{}\"", js_str(s))).collect();
    format!("[{}]", quoted.join(", "))
}

/// The bridge with element ids, classes and routes filled in.
pub fn bridge_script() -> String {
    let measured = format!("section[id], .{}, img[data-src]", REVEAL_WATCH_CLASS);
    let replacements: [(&str, String); 8] = [
        ("__SESSION_ROOT__", js_str(SESSION_ROOT)),
        ("__NODE_ID__", js_str(NODE_ID_ATTR)),
        ("__MEASURED__", js_str(&measured)),
        ("__MENU__", js_str(page::MENU_BUTTON)),
        ("__OVERLAY__", js_str(page::SIDEBAR_OVERLAY)),
        ("__CONTACT_FORM__", js_str(page::CONTACT_FORM)),
        ("__FILTER__", js_str(FILTER_CONTROL_CLASS)),
        ("__KEYS__", js_array(HANDLED_KEYS)),
    ];
    let mut script = BRIDGE_SCRIPT.to_string();
    for (token, value) in &replacements {
        script = script.replace(token, value);
    }
    script
}
