use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Service {
    /// Icon class list (`fas fa-code`) or an `<i class="...">` snippet.
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl Service {
    /// Class list of the icon, whichever form the content uses.
    /// Anything that is not a plain class attribute is dropped.
    pub fn icon_classes(&self) -> String {
        let raw = self.icon.trim();
        if !raw.starts_with('<') {
            return raw.to_string();
        }
        let start = match raw.find("class=\"") {
            Some(i) => i + "class=\"".len(),
            None => return String::new(),
        };
        raw[start..]
            .split('"')
            .next()
            .unwrap_or("")
            .to_string()
    }
}
