use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const UNTITLED_PROJECT: &str = "Untitled";
const NO_DESCRIPTION: &str = "No description yet.";

/// A project record as published by either data source.
///
/// Covers the hand-curated shape (`title`, `github`, `tags`, `updated`), the
/// repository-hosting shape (`name`, `html_url`, `homepage`, `pushed_at`)
/// and the canonical [`ProjectRecord`] shape itself. Text fields holding
/// anything other than a string read as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawProject {
    #[serde(deserialize_with = "text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "text")]
    pub github: Option<String>,
    #[serde(deserialize_with = "text")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "text")]
    pub repo: Option<String>,
    #[serde(deserialize_with = "text")]
    pub demo: Option<String>,
    #[serde(deserialize_with = "text")]
    pub homepage: Option<String>,
    #[serde(deserialize_with = "text")]
    pub language: Option<String>,
    #[serde(deserialize_with = "text")]
    pub updated: Option<String>,
    #[serde(deserialize_with = "text")]
    pub pushed_at: Option<String>,
    pub topics: Option<Value>,
    pub tags: Option<Value>,
    #[serde(deserialize_with = "text")]
    pub status: Option<String>,
    pub featured: Option<Value>,
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Canonical project card data. Empty strings mean "absent".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectRecord {
    pub title: String,
    pub description: String,
    pub repo: String,
    pub demo: String,
    pub language: String,
    pub updated: String,
    pub topics: Vec<String>,
    pub status: String,
    pub featured: bool,
}

impl From<RawProject> for ProjectRecord {
    fn from(raw: RawProject) -> Self {
        normalize_project(raw)
    }
}

pub fn normalize_project(raw: RawProject) -> ProjectRecord {
    let topics = match raw.topics {
        Some(Value::Array(values)) => string_values(values),
        _ => match raw.tags {
            Some(Value::Array(values)) => string_values(values),
            _ => Vec::new(),
        },
    };

    ProjectRecord {
        title: first_present([raw.title, raw.name]).unwrap_or_else(|| UNTITLED_PROJECT.to_string()),
        description: first_present([raw.description]).unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        repo: first_present([raw.github, raw.html_url, raw.repo]).unwrap_or_default(),
        demo: first_present([raw.demo, raw.homepage]).unwrap_or_default(),
        language: first_present([raw.language]).unwrap_or_default(),
        updated: first_present([raw.updated, raw.pushed_at]).unwrap_or_default(),
        topics,
        status: first_present([raw.status]).unwrap_or_default(),
        featured: raw.featured.as_ref().is_some_and(is_truthy),
    }
}

/// Normalizes one element of a source array; `None` for non-object elements.
///
/// Mistyped fields are treated as missing rather than rejecting the record.
pub fn normalize_value(value: Value) -> Option<ProjectRecord> {
    if !value.is_object() {
        return None;
    }
    match serde_json::from_value::<RawProject>(value) {
        Ok(raw) => Some(normalize_project(raw)),
        Err(error) => {
            tracing::debug!("skipping malformed project record: {error}");
            None
        }
    }
}

fn first_present<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

fn string_values(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize_json(value: Value) -> ProjectRecord {
        normalize_value(value).expect("object should normalize")
    }

    #[test]
    fn normalizes_repository_hosting_shape() {
        let record = normalize_json(json!({
            "name": "X",
            "html_url": "https://a",
            "pushed_at": "2024-02-01",
            "tags": ["go"]
        }));

        assert_eq!(
            record,
            ProjectRecord {
                title: "X".to_string(),
                description: "No description yet.".to_string(),
                repo: "https://a".to_string(),
                demo: String::new(),
                language: String::new(),
                updated: "2024-02-01".to_string(),
                topics: vec!["go".to_string()],
                status: String::new(),
                featured: false,
            }
        );
    }

    #[test]
    fn primary_fields_win_over_alternates() {
        let record = normalize_json(json!({
            "title": "Curated",
            "name": "repo-name",
            "github": "https://github.com/me/curated",
            "html_url": "https://github.com/me/repo-name",
            "demo": "https://demo",
            "homepage": "https://home",
            "updated": "2026-01-01",
            "pushed_at": "2025-01-01",
            "topics": ["rust"],
            "tags": ["ignored"],
            "featured": true
        }));

        assert_eq!(record.title, "Curated");
        assert_eq!(record.repo, "https://github.com/me/curated");
        assert_eq!(record.demo, "https://demo");
        assert_eq!(record.updated, "2026-01-01");
        assert_eq!(record.topics, vec!["rust".to_string()]);
        assert!(record.featured);
    }

    #[test]
    fn empty_and_null_fields_count_as_absent() {
        let record = normalize_json(json!({
            "title": "",
            "name": "fallback-name",
            "description": null,
            "homepage": null,
            "language": null,
            "topics": null,
            "tags": "not-an-array"
        }));

        assert_eq!(record.title, "fallback-name");
        assert_eq!(record.description, "No description yet.");
        assert_eq!(record.demo, "");
        assert!(record.topics.is_empty());
    }

    #[test]
    fn featured_uses_truthiness() {
        let featured = |value: Value| normalize_json(json!({ "featured": value })).featured;

        assert!(featured(json!(true)));
        assert!(featured(json!(1)));
        assert!(featured(json!("yes")));
        assert!(!featured(json!(false)));
        assert!(!featured(json!(0)));
        assert!(!featured(json!("")));
        assert!(!featured(Value::Null));
        assert!(!normalize_json(json!({})).featured);
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            json!({"name": "X", "html_url": "https://a", "pushed_at": "2024-02-01", "tags": ["go"]}),
            json!({"title": "Y", "github": "https://b", "homepage": "https://c", "featured": 1, "status": "wip"}),
            json!({}),
        ];
        for input in inputs {
            let once = normalize_json(input);
            let twice = normalize_json(serde_json::to_value(&once).expect("record serializes"));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn non_object_records_are_skipped() {
        assert_eq!(normalize_value(json!(42)), None);
        assert_eq!(normalize_value(json!("name")), None);
        assert_eq!(normalize_value(json!(null)), None);
    }

    #[test]
    fn mistyped_fields_read_as_absent() {
        let record = normalize_json(json!({
            "title": 5,
            "name": "x",
            "description": ["not", "text"],
            "language": {"name": "Rust"},
            "updated": 20240201,
            "status": true
        }));

        assert_eq!(record.title, "x");
        assert_eq!(record.description, "No description yet.");
        assert_eq!(record.language, "");
        assert_eq!(record.updated, "");
        assert_eq!(record.status, "");
        assert_eq!(normalize_json(json!({"title": 5})).title, "Untitled");
    }
}
