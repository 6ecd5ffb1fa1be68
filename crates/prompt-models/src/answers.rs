//! Application answers collected during the application phase.
//!
//! Answers travel inside `prevData` as a JSON array of tagged objects and are
//! split into their concrete kinds by [`read_application_answers`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextAnswer {
    #[serde(rename = "order_num", default)]
    pub order_num: i32,
    pub key: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiSelectAnswer {
    #[serde(rename = "order_num", default)]
    pub order_num: i32,
    pub key: String,
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ApplicationAnswer {
    #[serde(rename = "text")]
    Text(TextAnswer),
    #[serde(rename = "multiselect")]
    MultiSelect(MultiSelectAnswer),
}

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("application answers must be a JSON array")]
    NotAnArray,

    #[error("invalid application answer at index {index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Splits a raw answer list into text and multi-select answers, preserving
/// the input order within each kind.
///
/// `null` yields two empty lists. An unknown `type` tag fails the whole read.
pub fn read_application_answers(
    raw: &Value,
) -> Result<(Vec<TextAnswer>, Vec<MultiSelectAnswer>), AnswerError> {
    let items = match raw {
        Value::Null => return Ok((Vec::new(), Vec::new())),
        Value::Array(items) => items,
        _ => return Err(AnswerError::NotAnArray),
    };

    let mut text = Vec::new();
    let mut multi = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let answer = ApplicationAnswer::deserialize(item)
            .map_err(|source| AnswerError::Invalid { index, source })?;
        match answer {
            ApplicationAnswer::Text(a) => text.push(a),
            ApplicationAnswer::MultiSelect(a) => multi.push(a),
        }
    }

    Ok((text, multi))
}
