//! Reference answers for evaluation.

use crate::error::{RagChatError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Questions mapped to their acceptable answers.
///
/// Questions iterate in sorted order, which also decides ties when two questions
/// match a logged query equally well.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct GroundTruth {
    entries: BTreeMap<String, Vec<String>>,
}

impl GroundTruth {
    /// Load a JSON object of `question -> [answer, ...]`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RagChatError::Evaluation(format!(
                "Failed to read ground truth {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Parse ground truth from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let ground_truth: GroundTruth = serde_json::from_str(json)?;
        ground_truth.validate()?;
        Ok(ground_truth)
    }

    /// Build ground truth from `(question, answers)` pairs.
    pub fn from_entries<I, Q, A>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Q, Vec<A>)>,
        Q: Into<String>,
        A: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(q, answers)| (q.into(), answers.into_iter().map(Into::into).collect()))
            .collect();
        let ground_truth = Self { entries };
        ground_truth.validate()?;
        Ok(ground_truth)
    }

    fn validate(&self) -> Result<()> {
        if let Some((question, _)) = self.entries.iter().find(|(_, answers)| answers.is_empty()) {
            return Err(RagChatError::InvalidInput(format!(
                "Ground truth question has no answers: {}",
                question
            )));
        }
        Ok(())
    }

    /// All questions, in iteration order.
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Acceptable answers for `question`.
    pub fn answers(&self, question: &str) -> Option<&[String]> {
        self.entries.get(question).map(Vec::as_slice)
    }

    /// The primary (first listed) answer for `question`.
    pub fn primary_answer(&self, question: &str) -> Option<&str> {
        self.answers(question)
            .and_then(|answers| answers.first())
            .map(String::as_str)
    }

    /// `(question, answers)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(q, answers)| (q.as_str(), answers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
