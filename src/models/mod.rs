pub mod education;
pub mod experience;
pub mod personal;
pub mod project;
pub mod service;
pub mod skills;
pub mod testimonial;

use serde::{Deserialize, Serialize};

use education::Education;
use experience::Experience;
use personal::PersonalInfo;
use project::Project;
use service::Service;
use skills::SkillSet;
use testimonial::Testimonial;

/// Everything the page shows, loaded once per session.
/// A `None` category renders nothing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Content {
    pub personal: Option<PersonalInfo>,
    pub skills: Option<SkillSet>,
    pub projects: Option<Vec<Project>>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
    pub services: Option<Vec<Service>>,
    pub testimonials: Option<Vec<Testimonial>>,
}

impl Content {
    pub fn is_empty(&self) -> bool {
        *self == Content::default()
    }

    /// Names of the categories that carry data, in load order.
    pub fn loaded_sections(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.personal.is_some() {
            out.push("personal");
        }
        if self.skills.as_ref().is_some_and(|s| !s.is_empty()) {
            out.push("skills");
        }
        if self.projects.as_ref().is_some_and(|v| !v.is_empty()) {
            out.push("projects");
        }
        if self.experience.as_ref().is_some_and(|v| !v.is_empty()) {
            out.push("experience");
        }
        if self.education.as_ref().is_some_and(|v| !v.is_empty()) {
            out.push("education");
        }
        if self.services.as_ref().is_some_and(|v| !v.is_empty()) {
            out.push("services");
        }
        if self.testimonials.as_ref().is_some_and(|v| !v.is_empty()) {
            out.push("testimonials");
        }
        out
    }

    /// Address the contact form composes mail to.
    pub fn contact_email(&self) -> &str {
        self.personal.as_ref().map(|p| p.email.as_str()).unwrap_or("")
    }
}
