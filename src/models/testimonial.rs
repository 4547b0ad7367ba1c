use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MAX_STARS: u32 = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Testimonial {
    #[serde(deserialize_with = "lenient_rating")]
    pub rating: u32,
    #[serde(alias = "quote")]
    pub testimonial: String,
    pub name: String,
    pub position: String,
    pub avatar: String,
}

impl Testimonial {
    pub fn stars(&self) -> String {
        "⭐".repeat(self.rating.min(MAX_STARS) as usize)
    }
}

/// Accepts any JSON number (or numeric string) as a rating: fractions are
/// floored and the result clamped to `0..=MAX_STARS`. Anything else rates 0
/// rather than failing the whole file.
fn lenient_rating<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match raw {
        Some(r) if r.is_finite() => r.floor().clamp(0.0, MAX_STARS as f64) as u32,
        _ => 0,
    })
}
