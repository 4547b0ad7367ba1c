//! Content acquisition: the seven JSON resources, fetched together.

use log::{debug, error, info};
use rocket::tokio;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::PathBuf;
use url::Url;

use crate::config::SiteConfig;
use crate::models::Content;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Personal,
    Skills,
    Projects,
    Experience,
    Education,
    Services,
    Testimonials,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::Personal,
        Resource::Skills,
        Resource::Projects,
        Resource::Experience,
        Resource::Education,
        Resource::Services,
        Resource::Testimonials,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Resource::Personal => "personal.json",
            Resource::Skills => "skills.json",
            Resource::Projects => "projects.json",
            Resource::Experience => "experience.json",
            Resource::Education => "education.json",
            Resource::Services => "services.json",
            Resource::Testimonials => "testimonials.json",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Debug)]
pub enum ContentError {
    Fetch { resource: Resource, message: String },
    Parse { resource: Resource, source: serde_json::Error },
    Source(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Fetch { resource, message } => {
                write!(f, "failed to fetch {}: {}", resource, message)
            }
            ContentError::Parse { resource, source } => {
                write!(f, "failed to parse {}: {}", resource, source)
            }
            ContentError::Source(msg) => write!(f, "invalid content source: {}", msg),
        }
    }
}

impl std::error::Error for ContentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContentError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Where the content JSON lives.
#[rocket::async_trait]
pub trait ContentSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self, resource: Resource) -> Result<Vec<u8>, ContentError>;
}

/// Content files in a local directory.
pub struct FsSource {
    dir: PathBuf,
}

impl FsSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FsSource { dir: dir.into() }
    }
}

#[rocket::async_trait]
impl ContentSource for FsSource {
    fn describe(&self) -> String {
        self.dir.display().to_string()
    }

    async fn fetch(&self, resource: Resource) -> Result<Vec<u8>, ContentError> {
        let path = self.dir.join(resource.file_name());
        tokio::fs::read(&path)
            .await
            .map_err(|e| ContentError::Fetch {
                resource,
                message: format!("{}: {}", path.display(), e),
            })
    }
}

/// Content files served under a base URL.
pub struct HttpSource {
    base: Url,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self, ContentError> {
        // Without a trailing slash `join` would replace the last path segment.
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized).map_err(|e| ContentError::Source(e.to_string()))?;
        Ok(HttpSource {
            base,
            client: reqwest::Client::new(),
        })
    }

    pub fn url_for(&self, resource: Resource) -> Result<Url, ContentError> {
        self.base
            .join(resource.file_name())
            .map_err(|e| ContentError::Source(e.to_string()))
    }
}

#[rocket::async_trait]
impl ContentSource for HttpSource {
    fn describe(&self) -> String {
        self.base.to_string()
    }

    async fn fetch(&self, resource: Resource) -> Result<Vec<u8>, ContentError> {
        let url = self.url_for(resource)?;
        let fetch_err = |e: reqwest::Error| ContentError::Fetch {
            resource,
            message: e.to_string(),
        };
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let bytes = resp.bytes().await.map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

/// HTTP(S) URLs are fetched remotely, anything else is a directory.
pub fn source_from(config: &SiteConfig) -> Result<Box<dyn ContentSource>, ContentError> {
    let raw = config.content_source.trim();
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            Ok(Box::new(HttpSource::new(raw)?))
        }
        _ => Ok(Box::new(FsSource::new(raw))),
    }
}

async fn fetch_json<T: DeserializeOwned>(
    source: &dyn ContentSource,
    resource: Resource,
) -> Result<Option<T>, ContentError> {
    let bytes = source.fetch(resource).await?;
    debug!("Fetched {} ({} bytes)", resource, bytes.len());
    serde_json::from_slice(&bytes).map_err(|e| ContentError::Parse {
        resource,
        source: e,
    })
}

/// Fetches and parses all seven resources concurrently.
/// The first failure fails the whole load; nothing partial is returned.
pub async fn load(source: &dyn ContentSource) -> Result<Content, ContentError> {
    let (personal, skills, projects, experience, education, services, testimonials) = tokio::try_join!(
        fetch_json(source, Resource::Personal),
        fetch_json(source, Resource::Skills),
        fetch_json(source, Resource::Projects),
        fetch_json(source, Resource::Experience),
        fetch_json(source, Resource::Education),
        fetch_json(source, Resource::Services),
        fetch_json(source, Resource::Testimonials),
    )?;

    Ok(Content {
        personal,
        skills,
        projects,
        experience,
        education,
        services,
        testimonials,
    })
}

/// `load`, degraded: a failure is logged and yields empty content.
pub async fn acquire(source: &dyn ContentSource) -> Content {
    match load(source).await {
        Ok(content) => {
            info!(
                "Loaded content from {}: {}",
                source.describe(),
                content.loaded_sections().join(", ")
            );
            content
        }
        Err(e) => {
            error!("Error loading content from {}: {}", source.describe(), e);
            Content::default()
        }
    }
}
