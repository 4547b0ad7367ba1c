use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillCategory {
    pub key: String,
    pub skills: Vec<String>,
}

impl SkillCategory {
    /// Display heading: underscores become spaces ("supply_chain" → "supply chain").
    pub fn heading(&self) -> String {
        self.key.replace('_', " ")
    }
}

/// Skills grouped by category, kept in the order the source lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet(pub Vec<SkillCategory>);

impl SkillSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SkillCategory> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillSetVisitor;

        impl<'de> Visitor<'de> for SkillSetVisitor {
            type Value = SkillSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SkillSet, A::Error> {
                let mut out = Vec::new();
                while let Some((key, skills)) = map.next_entry::<String, Vec<String>>()? {
                    out.push(SkillCategory { key, skills });
                }
                Ok(SkillSet(out))
            }
        }

        deserializer.deserialize_map(SkillSetVisitor)
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for cat in &self.0 {
            map.serialize_entry(&cat.key, &cat.skills)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_source_order() {
        let set: SkillSet = serde_json::from_str(
            r#"{"zeta_tools":["b","a"],"alpha":["x"],"middle_ground":[]}"#,
        )
        .unwrap();
        let keys: Vec<&str> = set.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta_tools", "alpha", "middle_ground"]);
        assert_eq!(set.0[0].skills, vec!["b", "a"]);
        assert_eq!(set.0[0].heading(), "zeta tools");
    }

    #[test]
    fn test_serializes_back_to_object() {
        let set: SkillSet = serde_json::from_str(r#"{"b":["1"],"a":["2"]}"#).unwrap();
        let out = serde_json::to_string(&set).unwrap();
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<SkillSet>("[1,2]").is_err());
    }
}
