use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Keys that older questionnaire builds submitted under a different name.
const LEGACY_KEY_ALIASES: &[(&str, &str)] = &[("1099_filed", "filed_1099")];

/// A stored answer. Unanswered questions have no entry at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Flag(bool),
}

/// Result of looking a key up, keeping "not answered" distinct from "No" and from blank text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer<'a> {
    Unanswered,
    Text(&'a str),
    Flag(bool),
}

impl<'a> Answer<'a> {
    /// Interprets yes/no style answers. Anything else is `None`.
    pub fn as_yes_no(&self) -> Option<bool> {
        match self {
            Answer::Flag(value) => Some(*value),
            Answer::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" => Some(true),
                "no" | "n" | "false" => Some(false),
                _ => None,
            },
            Answer::Unanswered => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Answer::Unanswered => true,
            Answer::Text(text) => text.trim().is_empty(),
            Answer::Flag(_) => false,
        }
    }

    pub fn text(&self) -> Option<&'a str> {
        match self {
            Answer::Text(text) => Some(*text),
            _ => None,
        }
    }
}

/// Flat answer set from one questionnaire submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an answer set from submitted JSON values. `null` entries are treated as unanswered,
    /// numbers become text, and nested values are ignored.
    pub fn from_json_map(map: serde_json::Map<String, Value>) -> Self {
        let mut answers = Self::new();
        for (key, value) in map {
            match value {
                Value::String(text) => answers.insert(key, AnswerValue::Text(text)),
                Value::Bool(flag) => answers.insert(key, AnswerValue::Flag(flag)),
                Value::Number(number) => {
                    answers.insert(key, AnswerValue::Text(number.to_string()))
                }
                Value::Null | Value::Array(_) | Value::Object(_) => {}
            }
        }
        answers
    }

    pub fn insert(&mut self, key: impl Into<String>, value: AnswerValue) {
        let key = canonical_key(key.into());
        self.values.insert(key, value);
    }

    pub fn with_text(mut self, key: &str, value: &str) -> Self {
        self.insert(key, AnswerValue::Text(value.to_string()));
        self
    }

    pub fn with_flag(mut self, key: &str, value: bool) -> Self {
        self.insert(key, AnswerValue::Flag(value));
        self
    }

    pub fn answer(&self, key: &str) -> Answer<'_> {
        match self.values.get(key) {
            Some(AnswerValue::Text(text)) => Answer::Text(text),
            Some(AnswerValue::Flag(flag)) => Answer::Flag(*flag),
            None => Answer::Unanswered,
        }
    }

    pub fn is_yes(&self, key: &str) -> bool {
        self.answer(key).as_yes_no() == Some(true)
    }

    pub fn is_no(&self, key: &str) -> bool {
        self.answer(key).as_yes_no() == Some(false)
    }

    /// Case-insensitive comparison against a categorical answer.
    pub fn equals(&self, key: &str, expected: &str) -> bool {
        self.answer(key)
            .text()
            .map(|text| text.trim().eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }

    pub fn is_blank(&self, key: &str) -> bool {
        self.answer(key).is_blank()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<'de> Deserialize<'de> for AnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_json_map(map))
    }
}

fn canonical_key(key: String) -> String {
    LEGACY_KEY_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_keys_are_unanswered_not_no() {
        let answers = AnswerSet::new().with_text("w9_collected", "No");
        assert_eq!(answers.answer("w9_collected").as_yes_no(), Some(false));
        assert_eq!(answers.answer("filed_1099"), Answer::Unanswered);
        assert!(!answers.is_no("filed_1099"));
    }

    #[test]
    fn json_nulls_and_nested_values_are_skipped() {
        let answers: AnswerSet = serde_json::from_value(json!({
            "legal_name": "Acme Consulting",
            "income_w2": true,
            "gross_receipts": 125000,
            "dba": null,
            "owners": ["a", "b"],
        }))
        .expect("answers deserialize");

        assert_eq!(answers.len(), 3);
        assert_eq!(answers.answer("income_w2"), Answer::Flag(true));
        assert_eq!(answers.answer("gross_receipts"), Answer::Text("125000"));
        assert_eq!(answers.answer("dba"), Answer::Unanswered);
    }

    #[test]
    fn legacy_keys_are_rewritten_to_canonical_names() {
        let answers = AnswerSet::new().with_text("1099_filed", "No");
        assert!(answers.is_no("filed_1099"));
        assert_eq!(answers.answer("1099_filed"), Answer::Unanswered);
    }

    #[test]
    fn yes_no_matching_ignores_case() {
        let answers = AnswerSet::new()
            .with_text("moved2025", "yes")
            .with_text("audits", " YES ");
        assert!(answers.is_yes("moved2025"));
        assert!(answers.is_yes("audits"));
        assert!(answers.equals("moved2025", "Yes"));
    }
}
