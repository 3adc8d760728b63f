use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Questionnaire answers keyed by signal key.
///
/// Tracks which keys were submitted separately from which are truthy so that evaluators can
/// tell "answered no" apart from "never asked".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSet {
    answers: BTreeMap<String, bool>,
}

impl AnswerSet {
    /// Build from an arbitrary JSON value. Anything other than an object yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        let answers = match value {
            Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), truthy(value)))
                .collect(),
            _ => BTreeMap::new(),
        };
        Self { answers }
    }

    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self {
            answers: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: bool) -> Self {
        self.answers.insert(key.into(), value);
        self
    }

    /// True when the key was submitted and is truthy.
    pub fn has(&self, key: &str) -> bool {
        self.answers.get(key).copied().unwrap_or(false)
    }

    /// True when the key was submitted at all, whatever its value.
    pub fn seen(&self, key: &str) -> bool {
        self.answers.contains_key(key)
    }

    pub fn submitted_keys(&self) -> BTreeSet<&str> {
        self.answers.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Boolean coercion used for questionnaire answers.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1" | "on"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Numeric coercion for carbon figures: numbers and numeric strings, nothing else.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Optional carbon-reporting figures as submitted. Every field is independently optional.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CarbonFigures {
    pub baseline_year: Option<f64>,
    pub baseline_tco2e: Option<f64>,
    pub current_year: Option<f64>,
    pub current_tco2e: Option<f64>,
    pub target_year: Option<f64>,
}

impl CarbonFigures {
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(numeric);
        Self {
            baseline_year: field("baseline_year"),
            baseline_tco2e: field("baseline_tco2e"),
            current_year: field("current_year"),
            current_tco2e: field("current_tco2e"),
            target_year: field("target_year"),
        }
    }
}

/// Normalized scoring request. Construction never fails; malformed parts become "unset".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreRequest {
    pub website: Option<String>,
    pub answers: AnswerSet,
    pub carbon: CarbonFigures,
    pub meta: Option<Value>,
}

impl ScoreRequest {
    pub fn from_value(value: &Value) -> Self {
        let website = value
            .get("website")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|site| !site.is_empty())
            .map(str::to_string);

        let answers = value
            .get("answers")
            .map(AnswerSet::from_value)
            .unwrap_or_default();

        let carbon = value
            .get("carbon")
            .map(CarbonFigures::from_value)
            .unwrap_or_default();

        let meta = value.get("meta").filter(|meta| meta.is_object()).cloned();

        Self {
            website,
            answers,
            carbon,
            meta,
        }
    }

    /// Parse a raw request body. Bodies that are not JSON are treated as an empty request.
    pub fn from_slice(body: &[u8]) -> Self {
        serde_json::from_slice::<Value>(body)
            .map(|value| Self::from_value(&value))
            .unwrap_or_default()
    }

    /// Website URL when it carries an http(s) scheme; anything else is not scanned.
    pub fn scannable_website(&self) -> Option<&str> {
        self.website.as_deref().filter(|site| has_http_scheme(site))
    }
}

pub(crate) fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// RAG severity. Declaration order is priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Red,
    Amber,
    Green,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Amber => "Amber",
            Self::Green => "Green",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    Compliance,
    Website,
}

/// One unmet signal with its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub label: String,
    pub severity: Severity,
    pub source: IssueSource,
}
