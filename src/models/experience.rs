use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Experience {
    #[serde(alias = "title")]
    pub position: String,
    pub company: String,
    pub location: String,
    #[serde(alias = "period")]
    pub duration: String,
    pub description: String,
    pub achievements: Vec<String>,
}
