//! The page skeleton: every element id the renderers and handlers bind to.

use crate::config::SiteConfig;
use crate::dom::Element;
use crate::view::{MemoryView, View};

pub const LOADING: &str = "loading";
pub const MENU_BUTTON: &str = "mobile-menu-button";
pub const SIDEBAR: &str = "sidebar";
pub const SIDEBAR_OVERLAY: &str = "sidebar-overlay";
pub const CONTACT_FORM: &str = "contact-form";
pub const HERO_TITLE: &str = "hero-title";
pub const PORTFOLIO_FILTERS: &str = "portfolio-filters";

pub const SKILLS_CONTAINER: &str = "skills-container";
pub const SERVICES_CONTAINER: &str = "services-container";
pub const PORTFOLIO_CONTAINER: &str = "portfolio-container";
pub const TESTIMONIALS_CONTAINER: &str = "testimonials-container";
pub const EXPERIENCE_CONTAINER: &str = "experience-container";
pub const EDUCATION_CONTAINER: &str = "education-container";

/// Elements the interaction handlers cannot work without.
pub const REQUIRED_INTERACTIVE: &[&str] = &[MENU_BUTTON, SIDEBAR, SIDEBAR_OVERLAY, CONTACT_FORM];

/// (section id, nav label, icon classes)
pub const NAV_SECTIONS: &[(&str, &str, &str)] = &[
    ("home", "Home", "fas fa-home"),
    ("about", "About", "fas fa-user"),
    ("experience", "Experience", "fas fa-briefcase"),
    ("education", "Education", "fas fa-graduation-cap"),
    ("services", "Services", "fas fa-concierge-bell"),
    ("skills", "Skills", "fas fa-tools"),
    ("portfolio", "Portfolio", "fas fa-folder-open"),
    ("testimonials", "Testimonials", "fas fa-comment-dots"),
    ("contact", "Contact", "fas fa-envelope"),
];

fn icon(classes: &str) -> Element {
    Element::new("i").class(classes)
}

fn social_link(id: &str, icon_classes: &str) -> Element {
    Element::new("a")
        .id(id)
        .attr("href", "#")
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .class("social-link")
        .child(icon(icon_classes))
}

fn section(id: &str, heading: &str) -> Element {
    Element::new("section")
        .id(id)
        .class("section animate-on-scroll")
        .child(Element::new("h2").class("section-title").text(heading))
}

fn sidebar() -> Element {
    let links = NAV_SECTIONS.iter().map(|(id, label, classes)| {
        Element::new("a")
            .attr("href", &format!("#{}", id))
            .class("nav-link")
            .child(icon(classes))
            .child(Element::new("span").text(label))
    });
    Element::new("aside")
        .id(SIDEBAR)
        .class("sidebar -translate-x-full lg:translate-x-0")
        .child(
            Element::new("img")
                .id("sidebar-avatar")
                .class("sidebar-avatar")
                .attr("alt", "Avatar"),
        )
        .child(Element::new("nav").class("sidebar-nav").children(links))
        .child(
            Element::new("div")
                .class("sidebar-social")
                .child(social_link("sidebar-github", "fab fa-github"))
                .child(social_link("sidebar-linkedin", "fab fa-linkedin"))
                .child(social_link("sidebar-email", "fas fa-envelope")),
        )
}

fn hero() -> Element {
    Element::new("section")
        .id("home")
        .class("hero")
        .child(
            Element::new("img")
                .id("hero-avatar")
                .class("hero-avatar")
                .attr("alt", "Avatar"),
        )
        .child(Element::new("h1").id("hero-name").class("hero-name"))
        .child(Element::new("p").id(HERO_TITLE).class("hero-title"))
        .child(
            Element::new("div")
                .class("hero-social")
                .child(social_link("github-link", "fab fa-github"))
                .child(social_link("linkedin-link", "fab fa-linkedin"))
                .child(social_link("email-link", "fas fa-envelope")),
        )
}

fn labelled(label: &str, value: Element) -> Element {
    Element::new("li")
        .child(Element::new("strong").text(label))
        .child(value)
}

fn about(config: &SiteConfig) -> Element {
    section("about", "About Me")
        .child(Element::new("h3").id("about-subtitle"))
        .child(Element::new("div").id("about-description"))
        .child(
            Element::new("ul")
                .class("about-details")
                .child(labelled("Name: ", Element::new("span").id("about-name")))
                .child(labelled("Email: ", Element::new("a").id("about-email")))
                .child(labelled("Phone: ", Element::new("span").id("about-phone")))
                .child(labelled("Location: ", Element::new("span").id("about-location"))),
        )
        .child(
            Element::new("a")
                .id("download-cv")
                .class("btn-primary")
                .attr("href", &config.resume_url)
                .child(icon("fas fa-download"))
                .text(" Download CV"),
        )
}

fn contact_form() -> Element {
    let input = |name: &str, kind: &str, placeholder: &str, required: bool| {
        let el = Element::new("input")
            .attr("type", kind)
            .attr("name", name)
            .attr("placeholder", placeholder)
            .class("form-input");
        if required {
            el.attr("required", "required")
        } else {
            el
        }
    };
    Element::new("form")
        .id(CONTACT_FORM)
        .attr("method", "post")
        .attr("action", "/contact")
        .child(input("name", "text", "Your Name", true))
        .child(input("email", "email", "Your Email", true))
        .child(input("subject", "text", "Subject", false))
        .child(
            Element::new("textarea")
                .attr("name", "message")
                .attr("rows", "5")
                .attr("placeholder", "Your Message")
                .attr("required", "required")
                .class("form-input"),
        )
        .child(
            Element::new("button")
                .attr("type", "submit")
                .class("btn-primary")
                .text("Send Message"),
        )
}

fn contact() -> Element {
    section("contact", "Get In Touch")
        .child(
            Element::new("ul")
                .class("contact-info")
                .child(labelled("Location: ", Element::new("span").id("contact-location")))
                .child(labelled("Phone: ", Element::new("a").id("contact-phone")))
                .child(labelled("Email: ", Element::new("a").id("contact-email"))),
        )
        .child(
            Element::new("div")
                .class("contact-social")
                .child(social_link("contact-github", "fab fa-github"))
                .child(social_link("contact-linkedin", "fab fa-linkedin")),
        )
        .child(contact_form())
}

fn container(id: &str, classes: &str) -> Element {
    Element::new("div").id(id).class(classes)
}

/// Appends the full page skeleton to `view`'s root.
pub fn skeleton(view: &mut impl View, config: &SiteConfig) {
    let root = view.root();
    view.append(
        root,
        Element::new("div")
            .id(LOADING)
            .class("loading-screen")
            .child(Element::new("div").class("spinner")),
    );
    view.append(
        root,
        Element::new("button")
            .id(MENU_BUTTON)
            .attr("type", "button")
            .attr("aria-label", "Open menu")
            .class("mobile-menu-button lg:hidden")
            .child(icon("fas fa-bars")),
    );
    view.append(
        root,
        Element::new("div")
            .id(SIDEBAR_OVERLAY)
            .class("sidebar-overlay hidden"),
    );
    view.append(root, sidebar());

    let main = Element::new("main")
        .class("main-content")
        .child(hero())
        .child(about(config))
        .child(
            section("experience", "Experience")
                .child(container(EXPERIENCE_CONTAINER, "timeline")),
        )
        .child(
            section("education", "Education")
                .child(container(EDUCATION_CONTAINER, "timeline")),
        )
        .child(
            section("services", "Services")
                .child(container(SERVICES_CONTAINER, "services-grid")),
        )
        .child(
            section("skills", "Skills & Expertise")
                .child(container(SKILLS_CONTAINER, "services-grid")),
        )
        .child(
            section("portfolio", "Portfolio")
                .child(container(PORTFOLIO_FILTERS, "portfolio-filters"))
                .child(container(PORTFOLIO_CONTAINER, "portfolio-grid")),
        )
        .child(
            section("testimonials", "Testimonials")
                .child(container(TESTIMONIALS_CONTAINER, "testimonials-grid")),
        )
        .child(contact());
    view.append(root, main);

    view.append(
        root,
        Element::new("footer").class("footer").child(Element::new("p").text(&format!(
            "© {} {}",
            chrono::Utc::now().format("%Y"),
            config.site_title
        ))),
    );
}

/// Fresh in-memory document holding the skeleton.
pub fn document(config: &SiteConfig) -> MemoryView {
    let mut view = MemoryView::new();
    skeleton(&mut view, config);
    view
}
