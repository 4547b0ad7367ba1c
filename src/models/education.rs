use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    #[serde(alias = "school")]
    pub institution: String,
    pub location: String,
    #[serde(alias = "period")]
    pub year: String,
    pub description: String,
}
