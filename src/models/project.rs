use serde::{Deserialize, Serialize};

/// Characters of the description shown on the card overlay.
pub const OVERLAY_EXCERPT_CHARS: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub client: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
}

impl Project {
    /// Filter key derived from the category: "Web Design" → "web-design".
    pub fn category_slug(&self) -> String {
        category_slug(&self.category)
    }

    pub fn excerpt(&self) -> String {
        let head: String = self.description.chars().take(OVERLAY_EXCERPT_CHARS).collect();
        format!("{}...", head)
    }

    pub fn github_link(&self) -> Option<&str> {
        self.github.as_deref().filter(|s| !s.is_empty())
    }

    pub fn demo_link(&self) -> Option<&str> {
        self.demo.as_deref().filter(|s| !s.is_empty())
    }

    pub fn results_text(&self) -> Option<&str> {
        self.results.as_deref().filter(|s| !s.is_empty())
    }
}

/// Lower-cases and joins whitespace runs with a single dash.
pub fn category_slug(category: &str) -> String {
    category
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
