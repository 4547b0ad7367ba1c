//! Section renderers. Each maps one content category onto its container and
//! returns without effect when the category or the container is absent.

use crate::config::SiteConfig;
use crate::dom::Element;
use crate::models::project::Project;
use crate::models::Content;
use crate::page;
use crate::view::{NodeId, View};

pub const FILTER_ALL: &str = "all";
pub const FILTER_CONTROL_CLASS: &str = "portfolio-filter";
pub const FILTER_ACTIVE_CLASSES: &[&str] = &["active", "bg-primary-600", "text-white"];
pub const FILTER_IDLE_CLASSES: &[&str] = &["bg-gray-200", "text-gray-700"];

/// Icon per known skill category key; anything else gets a star.
const SKILL_ICONS: &[(&str, &str)] = &[
    ("supply_chain_management", "fas fa-truck"),
    ("procurement_optimization", "fas fa-shopping-cart"),
    ("logistics_management", "fas fa-shipping-fast"),
    ("inventory_optimization", "fas fa-boxes"),
    ("vendor_management", "fas fa-handshake"),
    ("cost_optimization", "fas fa-chart-line"),
    ("process_improvement", "fas fa-cogs"),
    ("data_analysis", "fas fa-chart-bar"),
    ("software_tools", "fas fa-laptop-code"),
    ("certifications", "fas fa-certificate"),
    ("languages", "fas fa-language"),
    ("technical_skills", "fas fa-tools"),
];
const DEFAULT_SKILL_ICON: &str = "fas fa-star";

/// Runs every renderer in page order.
pub fn populate(view: &mut impl View, content: &Content, config: &SiteConfig) {
    personal_info(view, content, config);
    skills(view, content);
    services(view, content);
    portfolio(view, content);
    testimonials(view, content);
    experience(view, content);
    education(view, content);
}

fn set_text(view: &mut impl View, id: &str, text: &str) {
    if let Some(node) = view.by_id(id) {
        view.set_text(node, text);
    }
}

fn set_attr(view: &mut impl View, id: &str, name: &str, value: &str) {
    if let Some(node) = view.by_id(id) {
        view.set_attr(node, name, value);
    }
}

fn icon(classes: &str) -> Element {
    Element::new("i").class(classes)
}

pub fn personal_info(view: &mut impl View, content: &Content, config: &SiteConfig) {
    let p = match &content.personal {
        Some(p) => p,
        None => return,
    };
    let mailto = p.mailto();

    // Hero
    set_attr(view, "hero-avatar", "src", &p.avatar);
    set_text(view, "hero-name", &p.name);
    set_text(view, page::HERO_TITLE, &p.subtitle);
    set_attr(view, "sidebar-avatar", "src", &p.avatar);

    for (id, href) in [
        ("github-link", &p.github),
        ("linkedin-link", &p.linkedin),
        ("email-link", &mailto),
        ("sidebar-github", &p.github),
        ("sidebar-linkedin", &p.linkedin),
        ("sidebar-email", &mailto),
        ("contact-github", &p.github),
        ("contact-linkedin", &p.linkedin),
    ] {
        set_attr(view, id, "href", href);
    }

    // About
    set_text(view, "about-subtitle", &p.title);
    set_text(view, "about-name", &p.name);
    set_attr(view, "about-email", "href", &mailto);
    set_text(view, "about-email", &p.email);
    set_text(view, "about-phone", &p.phone);
    set_text(view, "about-location", &p.location);
    if let Some(desc) = view.by_id("about-description") {
        for child in view.children(desc) {
            view.remove(child);
        }
        view.append(desc, Element::new("p").text(&p.about.description));
    }

    // Contact
    set_text(view, "contact-location", &p.location);
    set_attr(view, "contact-phone", "href", &p.tel());
    set_text(view, "contact-phone", &p.phone);
    set_attr(view, "contact-email", "href", &mailto);
    set_text(view, "contact-email", &p.email);
    set_attr(view, page::CONTACT_FORM, "data-recipient", &p.email);

    set_attr(view, "download-cv", "href", &config.resume_url);
    set_attr(view, "download-cv", "download", &config.resume_download_name);
}

fn container(view: &impl View, id: &str) -> Option<NodeId> {
    let node = view.by_id(id);
    if node.is_none() {
        log::debug!("Container #{} not present, skipping", id);
    }
    node
}

pub fn skills(view: &mut impl View, content: &Content) {
    let set = match &content.skills {
        Some(s) => s,
        None => return,
    };
    let target = match container(&*view, page::SKILLS_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for category in set.iter() {
        let icon_classes = SKILL_ICONS
            .iter()
            .find(|(k, _)| *k == category.key)
            .map(|(_, v)| *v)
            .unwrap_or(DEFAULT_SKILL_ICON);
        let items = category.skills.iter().map(|skill| {
            Element::new("li")
                .class("skill-bullet-item flex items-start")
                .child(icon("fas fa-check-circle text-primary-400 mt-1 mr-3 flex-shrink-0"))
                .child(Element::new("span").class("text-dark-700").text(skill))
        });
        let card = Element::new("div")
            .class("service-card animate-on-scroll")
            .child(
                Element::new("div")
                    .class("service-icon mb-4")
                    .child(icon(&format!("{} text-primary-400", icon_classes))),
            )
            .child(
                Element::new("h3")
                    .class("text-xl font-semibold text-dark-800 mb-4 capitalize")
                    .text(&category.heading()),
            )
            .child(
                Element::new("ul")
                    .class("skill-bullet-list text-left space-y-2")
                    .children(items),
            );
        view.append(target, card);
    }
}

pub fn services(view: &mut impl View, content: &Content) {
    let list = match &content.services {
        Some(s) => s,
        None => return,
    };
    let target = match container(&*view, page::SERVICES_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for service in list {
        let classes = service.icon_classes();
        let icon_el = if classes.is_empty() {
            None
        } else {
            Some(icon(&classes))
        };
        view.append(
            target,
            Element::new("div")
                .class("service-card animate-on-scroll")
                .child(Element::new("div").class("service-icon mb-4").child_opt(icon_el))
                .child(
                    Element::new("h3")
                        .class("text-xl font-semibold text-gray-900 mb-3")
                        .text(&service.title),
                )
                .child(Element::new("p").class("text-gray-600").text(&service.description)),
        );
    }
}

const OVERLAY_BUTTON: &str = "bg-white text-primary-600 px-4 py-2 rounded-lg hover:bg-primary-50 transition-all font-semibold shadow-lg hover:shadow-xl transform hover:scale-105";

fn overlay_link(href: &str, icon_classes: &str, label: &str) -> Element {
    Element::new("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener")
        .class(OVERLAY_BUTTON)
        .child(icon(icon_classes))
        .text(label)
}

fn project_card(project: &Project) -> Element {
    let mut actions = Element::new("div").class("flex justify-center space-x-4");
    if let Some(url) = project.github_link() {
        actions = actions.child(overlay_link(url, "fab fa-github mr-2", "View Details"));
    }
    if let Some(url) = project.demo_link() {
        actions = actions.child(overlay_link(url, "fas fa-external-link-alt mr-2", "View Project"));
    }
    if project.github_link().is_none() && project.demo_link().is_none() {
        actions = actions.child(
            Element::new("button")
                .attr("type", "button")
                .class("bg-white text-primary-600 px-4 py-2 rounded-lg font-semibold shadow-lg")
                .child(icon("fas fa-info-circle mr-2"))
                .text("Learn More"),
        );
    }

    let media = Element::new("div")
        .class("relative group")
        .child(
            Element::new("img")
                .attr("src", &project.image)
                .attr("alt", &project.title)
                .class("w-full h-64 object-cover"),
        )
        .child(
            Element::new("div").class("portfolio-overlay").child(
                Element::new("div")
                    .class("text-center text-white px-4")
                    .child(
                        Element::new("h3")
                            .class("text-2xl font-bold mb-3 drop-shadow-lg")
                            .text(&project.title),
                    )
                    .child(
                        Element::new("p")
                            .class("text-base mb-4 drop-shadow-md leading-relaxed")
                            .text(&project.excerpt()),
                    )
                    .child(actions),
            ),
        );

    let chips = project.technologies.iter().map(|tech| {
        Element::new("span")
            .class("bg-gray-100 text-gray-700 px-3 py-1 rounded-full text-sm font-medium")
            .text(tech)
    });
    let results = project.results_text().map(|text| {
        Element::new("div").class("mt-3 pt-3 border-t border-gray-700").child(
            Element::new("p")
                .class("text-sm text-gray-700 italic")
                .child(icon("fas fa-check-circle mr-2 text-green-400"))
                .text(text),
        )
    });

    let body = Element::new("div")
        .class("p-6")
        .child(
            Element::new("h3")
                .class("text-xl font-bold text-gray-900 mb-3")
                .text(&project.title),
        )
        .child(
            Element::new("p")
                .class("text-gray-600 mb-4 leading-relaxed")
                .text(&project.description),
        )
        .child(Element::new("div").class("flex flex-wrap gap-2 mb-4").children(chips))
        .child(
            Element::new("div")
                .class("flex justify-between items-center text-sm text-gray-500 pt-3 border-t border-gray-700")
                .child(
                    Element::new("span")
                        .class("font-semibold")
                        .child(icon("fas fa-building mr-2 text-primary-400"))
                        .text(&project.client),
                )
                .child(
                    Element::new("span")
                        .class("font-semibold")
                        .child(icon("far fa-calendar mr-2 text-primary-400"))
                        .text(&project.date),
                ),
        )
        .child_opt(results);

    let mut card = Element::new("div").class("portfolio-item animate-on-scroll");
    let slug = project.category_slug();
    if !slug.is_empty() {
        card = card.class(&slug).attr("data-category", &slug);
    }
    card.child(media).child(body)
}

pub fn portfolio(view: &mut impl View, content: &Content) {
    let projects = match &content.projects {
        Some(p) => p,
        None => return,
    };
    let target = match container(&*view, page::PORTFOLIO_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for project in projects {
        view.append(target, project_card(project));
    }
    filter_controls(view, projects);
}

/// Fills `#portfolio-filters` with "all" plus one control per distinct category,
/// unless the page already ships its own controls.
fn filter_controls(view: &mut impl View, projects: &[Project]) {
    let bar = match view.by_id(page::PORTFOLIO_FILTERS) {
        Some(b) => b,
        None => return,
    };
    if !view.within(bar, FILTER_CONTROL_CLASS).is_empty() || projects.is_empty() {
        return;
    }

    let mut seen: Vec<(String, String)> = Vec::new();
    for project in projects {
        let slug = project.category_slug();
        if !slug.is_empty() && !seen.iter().any(|(s, _)| *s == slug) {
            seen.push((slug, project.category.clone()));
        }
    }

    let button = |filter: &str, label: &str, active: bool| {
        let state = if active {
            FILTER_ACTIVE_CLASSES
        } else {
            FILTER_IDLE_CLASSES
        };
        Element::new("button")
            .attr("type", "button")
            .attr("data-filter", filter)
            .class("portfolio-filter px-4 py-2 rounded-lg")
            .class(&state.join(" "))
            .text(label)
    };
    view.append(bar, button(FILTER_ALL, "All", true));
    for (slug, label) in &seen {
        view.append(bar, button(slug, label, false));
    }
}

pub fn testimonials(view: &mut impl View, content: &Content) {
    let list = match &content.testimonials {
        Some(t) => t,
        None => return,
    };
    let target = match container(&*view, page::TESTIMONIALS_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for t in list {
        view.append(
            target,
            Element::new("div")
                .class("testimonial-card animate-on-scroll")
                .child(
                    Element::new("div")
                        .class("flex items-center mb-4 testimonial-stars")
                        .text(&t.stars()),
                )
                .child(
                    Element::new("p")
                        .class("text-gray-600 mb-6 italic")
                        .text(&format!("\"{}\"", t.testimonial)),
                )
                .child(
                    Element::new("div")
                        .class("flex items-center")
                        .child(
                            Element::new("img")
                                .attr("src", &t.avatar)
                                .attr("alt", &t.name)
                                .class("w-12 h-12 rounded-full mr-4"),
                        )
                        .child(
                            Element::new("div")
                                .child(Element::new("h4").class("font-semibold text-gray-900").text(&t.name))
                                .child(Element::new("p").class("text-sm text-gray-500").text(&t.position)),
                        ),
                ),
        );
    }
}

fn timeline_entry(heading: &str, org: &str, place: &str, when: &str, body: &str) -> Element {
    let mut meta = Element::new("p").class("timeline-meta text-sm text-gray-500");
    let parts: Vec<&str> = [org, place, when]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    meta = meta.text(&parts.join(" · "));
    let desc = if body.is_empty() {
        None
    } else {
        Some(Element::new("p").class("timeline-description text-gray-600").text(body))
    };
    Element::new("div")
        .class("timeline-item animate-on-scroll")
        .child(Element::new("h3").class("text-xl font-semibold").text(heading))
        .child(meta)
        .child_opt(desc)
}

pub fn experience(view: &mut impl View, content: &Content) {
    let list = match &content.experience {
        Some(e) => e,
        None => return,
    };
    let target = match container(&*view, page::EXPERIENCE_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for job in list {
        let achievements = if job.achievements.is_empty() {
            None
        } else {
            Some(
                Element::new("ul")
                    .class("timeline-achievements")
                    .children(job.achievements.iter().map(|a| Element::new("li").text(a))),
            )
        };
        let entry = timeline_entry(
            &job.position,
            &job.company,
            &job.location,
            &job.duration,
            &job.description,
        )
        .child_opt(achievements);
        view.append(target, entry);
    }
}

pub fn education(view: &mut impl View, content: &Content) {
    let list = match &content.education {
        Some(e) => e,
        None => return,
    };
    let target = match container(&*view, page::EDUCATION_CONTAINER) {
        Some(t) => t,
        None => return,
    };

    for edu in list {
        view.append(
            target,
            timeline_entry(
                &edu.degree,
                &edu.institution,
                &edu.location,
                &edu.year,
                &edu.description,
            ),
        );
    }
}

/// Applies a portfolio filter: `selected` becomes the only highlighted control,
/// cards whose classes contain the filter key are shown, the rest hidden.
/// Returns the filter key, or `None` when `selected` carries none.
pub fn apply_filter(view: &mut impl View, selected: NodeId) -> Option<String> {
    let key = view.attr(selected, "data-filter")?;

    for control in view.by_class(FILTER_CONTROL_CLASS) {
        for c in FILTER_ACTIVE_CLASSES {
            view.remove_class(control, c);
        }
        for c in FILTER_IDLE_CLASSES {
            view.add_class(control, c);
        }
    }
    for c in FILTER_IDLE_CLASSES {
        view.remove_class(selected, c);
    }
    for c in FILTER_ACTIVE_CLASSES {
        view.add_class(selected, c);
    }

    for item in view.by_class("portfolio-item") {
        if key == FILTER_ALL || view.has_class(item, &key) {
            view.set_style(item, "display", "block");
            view.set_style(item, "animation", "fadeIn 0.5s ease");
        } else {
            view.set_style(item, "display", "none");
        }
    }
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::personal::{About, PersonalInfo};
    use crate::models::testimonial::Testimonial;
    use crate::view::MemoryView;

    fn doc() -> MemoryView {
        page::document(&SiteConfig::default())
    }

    fn project(title: &str, category: &str) -> Project {
        Project {
            title: title.into(),
            category: category.into(),
            description: "d".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_personal_info_fills_hero_and_contact() {
        let mut view = doc();
        let content = Content {
            personal: Some(PersonalInfo {
                name: "Jane Doe".into(),
                subtitle: "Builder".into(),
                email: "jane@x.com".into(),
                phone: "+1 555 0100".into(),
                about: About {
                    description: "Hello <b>world</b>".into(),
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        personal_info(&mut view, &content, &SiteConfig::default());

        let get = |id: &str| view.by_id(id).unwrap();
        assert_eq!(view.text(get("hero-name")), "Jane Doe");
        assert_eq!(view.text(get(page::HERO_TITLE)), "Builder");
        assert_eq!(view.attr(get("sidebar-email"), "href").unwrap(), "mailto:jane@x.com");
        assert_eq!(view.attr(get("contact-phone"), "href").unwrap(), "tel:+15550100");
        assert_eq!(view.attr(get("download-cv"), "download").unwrap(), "Resume.pdf");
        assert_eq!(
            view.outer_html(get("about-description")),
            r#"<div id="about-description"><p>Hello &lt;b&gt;world&lt;/b&gt;</p></div>"#
        );
    }

    #[test]
    fn test_personal_info_tolerates_missing_elements() {
        let mut view = MemoryView::new();
        let content = Content {
            personal: Some(PersonalInfo::default()),
            ..Default::default()
        };
        personal_info(&mut view, &content, &SiteConfig::default());
        assert_eq!(view.to_html(), "");
    }

    #[test]
    fn test_skills_use_icon_table_and_headings() {
        let mut view = doc();
        let content = Content {
            skills: Some(serde_json::from_str(r#"{"data_analysis":["SQL","Python"],"juggling":["3 balls"]}"#).unwrap()),
            ..Default::default()
        };
        skills(&mut view, &content);
        let cards = view.within(view.by_id(page::SKILLS_CONTAINER).unwrap(), "service-card");
        assert_eq!(cards.len(), 2);
        let first = view.outer_html(cards[0]);
        assert!(first.contains("fa-chart-bar"));
        assert!(first.contains(">data analysis</h3>"));
        assert_eq!(view.within(cards[0], "skill-bullet-item").len(), 2);
        assert!(view.outer_html(cards[1]).contains("fa-star"));
    }

    #[test]
    fn test_services_render_icon_classes_only() {
        let mut view = doc();
        let content: Content = serde_json::from_value(serde_json::json!({
            "services": [{"icon": "<i class=\"fas fa-code\"></i>", "title": "Dev", "description": "Code"}]
        }))
        .unwrap();
        services(&mut view, &content);
        let html = view.outer_html(view.by_id(page::SERVICES_CONTAINER).unwrap());
        assert!(html.contains(r#"<i class="fas fa-code"></i>"#));
        assert!(html.contains(">Dev</h3>"));
    }

    #[test]
    fn test_portfolio_card_classes_and_links() {
        let mut view = doc();
        let mut with_links = project("Shop", "Web Design");
        with_links.github = Some("https://github.com/x".into());
        with_links.results = Some("+20% sales".into());
        let content = Content {
            projects: Some(vec![with_links, project("App", "Mobile Apps")]),
            ..Default::default()
        };
        portfolio(&mut view, &content);

        let items = view.by_class("portfolio-item");
        assert_eq!(items.len(), 2);
        assert!(view.has_class(items[0], "web-design"));
        assert!(view.has_class(items[1], "mobile-apps"));
        let first = view.outer_html(items[0]);
        assert!(first.contains("View Details"));
        assert!(!first.contains("Learn More"));
        assert!(first.contains("+20% sales"));
        assert!(view.outer_html(items[1]).contains("Learn More"));
    }

    #[test]
    fn test_filter_controls_generated_once_per_category() {
        let mut view = doc();
        let content = Content {
            projects: Some(vec![
                project("A", "Web Design"),
                project("B", "Mobile Apps"),
                project("C", "web  design"),
            ]),
            ..Default::default()
        };
        portfolio(&mut view, &content);
        let filters: Vec<String> = view
            .by_class("portfolio-filter")
            .into_iter()
            .filter_map(|f| view.attr(f, "data-filter"))
            .collect();
        assert_eq!(filters, vec!["all", "web-design", "mobile-apps"]);
    }

    #[test]
    fn test_filter_shows_matching_and_all() {
        let mut view = doc();
        let content = Content {
            projects: Some(vec![project("A", "Web Design"), project("B", "Mobile Apps")]),
            ..Default::default()
        };
        portfolio(&mut view, &content);
        let controls = view.by_class("portfolio-filter");
        let web = controls
            .iter()
            .copied()
            .find(|c| view.attr(*c, "data-filter").as_deref() == Some("web-design"))
            .unwrap();

        assert_eq!(apply_filter(&mut view, web).as_deref(), Some("web-design"));
        let items = view.by_class("portfolio-item");
        assert_eq!(view.style(items[0], "display").as_deref(), Some("block"));
        assert_eq!(view.style(items[1], "display").as_deref(), Some("none"));
        let active: Vec<NodeId> = controls
            .iter()
            .copied()
            .filter(|c| view.has_class(*c, "active"))
            .collect();
        assert_eq!(active, vec![web]);
        assert!(!view.has_class(web, "bg-gray-200"));

        apply_filter(&mut view, controls[0]);
        for item in view.by_class("portfolio-item") {
            assert_eq!(view.style(item, "display").as_deref(), Some("block"));
        }
        assert!(!view.has_class(web, "active"));
    }

    #[test]
    fn test_testimonial_star_counts() {
        let mut view = doc();
        let content = Content {
            testimonials: Some(vec![
                Testimonial { rating: 5, ..Default::default() },
                Testimonial { rating: 0, ..Default::default() },
                Testimonial { rating: 9, ..Default::default() },
            ]),
            ..Default::default()
        };
        testimonials(&mut view, &content);
        let stars: Vec<usize> = view
            .by_class("testimonial-stars")
            .into_iter()
            .map(|s| view.text(s).matches('⭐').count())
            .collect();
        assert_eq!(stars, vec![5, 0, 5]);
    }

    #[test]
    fn test_timelines_render_entries() {
        let mut view = doc();
        let content: Content = serde_json::from_value(serde_json::json!({
            "experience": [{"title": "Lead", "company": "Acme", "period": "2020-2023", "achievements": ["Shipped"]}],
            "education": [{"degree": "BSc", "school": "Uni", "year": "2019"}]
        }))
        .unwrap();
        experience(&mut view, &content);
        education(&mut view, &content);
        let exp = view.outer_html(view.by_id(page::EXPERIENCE_CONTAINER).unwrap());
        assert!(exp.contains(">Lead</h3>"));
        assert!(exp.contains("Acme · 2020-2023"));
        assert!(exp.contains("<li>Shipped</li>"));
        let edu = view.outer_html(view.by_id(page::EDUCATION_CONTAINER).unwrap());
        assert!(edu.contains("Uni · 2019"));
    }

    #[test]
    fn test_empty_content_leaves_containers_untouched() {
        let mut view = doc();
        let before = view.to_html();
        populate(&mut view, &Content::default(), &SiteConfig::default());
        assert_eq!(view.to_html(), before);
    }

    #[test]
    fn test_missing_containers_are_skipped() {
        let mut view = MemoryView::new();
        let content: Content = serde_json::from_value(serde_json::json!({
            "skills": {"a": ["b"]},
            "services": [{"title": "x"}],
            "projects": [{"title": "p"}],
            "testimonials": [{"rating": 3}],
            "experience": [{"position": "e"}],
            "education": [{"degree": "d"}]
        }))
        .unwrap();
        populate(&mut view, &content, &SiteConfig::default());
        assert_eq!(view.to_html(), "");
    }
}
