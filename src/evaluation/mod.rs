//! Offline evaluation of logged replies and of the query pipeline.
//!
//! Response quality matches each logged query to a ground-truth question and
//! scores the logged reply with BLEU and ROUGE-L. Retrieval accuracy runs every
//! ground-truth question through the pipeline and compares reply embeddings to
//! the acceptable answers.
//!
//! Retrieval accuracy scores the generated reply rather than the retrieved
//! chunks, so it measures retrieval and generation together.

mod fuzzy;
mod ground_truth;
mod metrics;

pub use fuzzy::{find_closest_query, similarity, DEFAULT_MATCH_THRESHOLD};
pub use ground_truth::GroundTruth;
pub use metrics::{bleu, mean, rouge_l};

use crate::chat_log::{ChatLog, LogRecord};
use crate::config::Settings;
use crate::error::Result;
use crate::rag::QueryPipeline;
use crate::vector_store::cosine_similarity;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Default cosine similarity a reply must exceed to count as correct.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.8;

/// Scores for one matched log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResponse {
    pub query: String,
    pub matched_question: String,
    pub bleu: f64,
    pub rouge_l: f64,
}

/// Aggregate response quality over the chat log.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseReport {
    /// Mean BLEU over scored records.
    pub bleu: f64,
    /// Mean ROUGE-L F-measure over scored records.
    pub rouge_l: f64,
    /// Records that matched a ground-truth question.
    pub scored: usize,
    /// Records with no ground-truth question above the match threshold.
    pub excluded: usize,
    pub samples: Vec<ScoredResponse>,
}

/// Fraction of ground-truth questions answered acceptably.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RetrievalReport {
    pub accuracy: f64,
    pub correct: usize,
    pub total: usize,
}

/// Scores replies against ground truth.
pub struct Evaluator {
    ground_truth: GroundTruth,
    match_threshold: f64,
    similarity_threshold: f32,
}

impl Evaluator {
    /// Create an evaluator with the default thresholds.
    pub fn new(ground_truth: GroundTruth) -> Self {
        Self {
            ground_truth,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Load the ground truth and thresholds named in settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let ground_truth = GroundTruth::load(&settings.ground_truth_path())?;
        info!(
            "Loaded {} ground-truth questions from {:?}",
            ground_truth.len(),
            settings.ground_truth_path()
        );

        Ok(Self::new(ground_truth)
            .with_match_threshold(settings.evaluation.match_threshold)
            .with_similarity_threshold(settings.evaluation.similarity_threshold))
    }

    /// Set the fuzzy match score (0-100) a query must exceed.
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Set the cosine similarity a reply must exceed.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn ground_truth(&self) -> &GroundTruth {
        &self.ground_truth
    }

    /// Score logged replies against the first answer of their matched question.
    pub fn evaluate_responses(&self, records: &[LogRecord]) -> ResponseReport {
        let mut samples = Vec::new();
        let mut excluded = 0;

        for record in records {
            let Some(question) =
                find_closest_query(&record.query, &self.ground_truth, self.match_threshold)
            else {
                debug!(query = %record.query, "no ground-truth match, excluding");
                excluded += 1;
                continue;
            };
            let Some(reference) = self.ground_truth.primary_answer(question) else {
                excluded += 1;
                continue;
            };

            samples.push(ScoredResponse {
                query: record.query.clone(),
                matched_question: question.to_string(),
                bleu: bleu(reference, &record.response),
                rouge_l: rouge_l(reference, &record.response),
            });
        }

        let bleu_scores: Vec<f64> = samples.iter().map(|s| s.bleu).collect();
        let rouge_scores: Vec<f64> = samples.iter().map(|s| s.rouge_l).collect();

        ResponseReport {
            bleu: mean(&bleu_scores),
            rouge_l: mean(&rouge_scores),
            scored: samples.len(),
            excluded,
            samples,
        }
    }

    /// Score every record in the chat log.
    #[instrument(skip_all)]
    pub fn evaluate_chat_log(&self, chat_log: &ChatLog) -> Result<ResponseReport> {
        let records = chat_log.fetch_all()?;
        info!("Evaluating {} logged responses", records.len());
        Ok(self.evaluate_responses(&records))
    }

    /// Run each ground-truth question through the pipeline and compare reply
    /// embeddings with the acceptable answers.
    #[instrument(skip_all)]
    pub async fn evaluate_retrieval(&self, pipeline: &QueryPipeline) -> Result<RetrievalReport> {
        let embedder = pipeline.embedder();
        let mut correct = 0;

        for (question, answers) in self.ground_truth.iter() {
            let response = pipeline.run(question).await?;
            let reply_embedding = embedder.embed(&response.answer).await?;
            let answer_embeddings = embedder.embed_batch(answers).await?;

            let best = answer_embeddings
                .iter()
                .map(|answer| cosine_similarity(&reply_embedding, answer))
                .fold(f32::MIN, f32::max);

            debug!(question, best, "retrieval similarity");
            if best > self.similarity_threshold {
                correct += 1;
            }
        }

        let total = self.ground_truth.len();
        let accuracy = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        };

        Ok(RetrievalReport {
            accuracy,
            correct,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{KeywordEmbedder, RecordingGenerator};
    use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
    use chrono::Utc;
    use std::sync::Arc;

    fn record(id: i64, query: &str, response: &str) -> LogRecord {
        LogRecord {
            id,
            timestamp: Utc::now(),
            query: query.to_string(),
            response: response.to_string(),
        }
    }

    fn ai_ground_truth() -> GroundTruth {
        GroundTruth::from_entries([("What is AI?", vec!["Artificial Intelligence is..."])]).unwrap()
    }

    #[test]
    fn test_empty_history_scores_zero() {
        let report = Evaluator::new(ai_ground_truth()).evaluate_responses(&[]);
        assert_eq!(report.bleu, 0.0);
        assert_eq!(report.rouge_l, 0.0);
        assert_eq!(report.scored, 0);
        assert_eq!(report.excluded, 0);
    }

    #[test]
    fn test_single_match_mean_equals_sample_score() {
        let evaluator = Evaluator::new(ai_ground_truth());
        let response = "Artificial Intelligence is a field...";
        let report = evaluator.evaluate_responses(&[record(1, "what's ai?", response)]);

        assert_eq!(report.scored, 1);
        assert_eq!(report.excluded, 0);
        assert_eq!(report.samples[0].matched_question, "What is AI?");

        let expected_bleu = bleu("Artificial Intelligence is...", response);
        let expected_rouge = rouge_l("Artificial Intelligence is...", response);
        assert!(expected_bleu > 0.0);
        assert!(expected_rouge > 0.0);
        assert!((report.bleu - expected_bleu).abs() < 1e-12);
        assert!((report.rouge_l - expected_rouge).abs() < 1e-12);
    }

    #[test]
    fn test_unmatched_records_are_excluded() {
        let evaluator = Evaluator::new(ai_ground_truth());
        let report = evaluator.evaluate_responses(&[
            record(1, "What is AI?", "Artificial Intelligence is..."),
            record(2, "How do volcanoes erupt?", "Magma pressure."),
        ]);

        assert_eq!(report.scored, 1);
        assert_eq!(report.excluded, 1);
        assert!((report.rouge_l - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_chat_log() {
        let dir = tempfile::tempdir().unwrap();
        let log = ChatLog::open(&dir.path().join("chat.db")).unwrap();
        log.append("what's ai?", "Artificial Intelligence is...").unwrap();

        let report = Evaluator::new(ai_ground_truth())
            .evaluate_chat_log(&log)
            .unwrap();
        assert_eq!(report.scored, 1);
        let reference = "Artificial Intelligence is...";
        let expected = bleu(reference, reference);
        // three tokens have no 4-gram overlap, so identical text smooths below 1
        assert!(expected < 1.0);
        assert!((report.bleu - expected).abs() < 1e-12);
        assert!((report.rouge_l - 1.0).abs() < 1e-9);
    }

    async fn pipeline(generator: RecordingGenerator) -> QueryPipeline {
        let embedder = Arc::new(KeywordEmbedder::new());
        let store = Arc::new(MemoryVectorStore::new());
        let text = "Autism is a neurodevelopmental condition";
        store
            .upsert_batch(&[Document::new(
                "autism.txt".into(),
                text.into(),
                embedder.vector(text),
                0,
            )])
            .await
            .unwrap();
        QueryPipeline::new(store, embedder, Arc::new(generator))
    }

    #[tokio::test]
    async fn test_retrieval_accuracy_counts_close_replies() {
        let ground_truth = GroundTruth::from_entries([
            (
                "What is autism?",
                vec!["Something else entirely", "Autism is a neurodevelopmental condition"],
            ),
            ("Who invented the computer?", vec!["Charles Babbage"]),
        ])
        .unwrap();

        // the generator echoes the retrieved chunk for every question
        let pipeline = pipeline(RecordingGenerator::new()).await;
        let report = Evaluator::new(ground_truth)
            .evaluate_retrieval(&pipeline)
            .await
            .unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.correct, 1);
        assert!((report.accuracy - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_retrieval_propagates_generation_failure() {
        let pipeline = pipeline(RecordingGenerator::failing()).await;
        let result = Evaluator::new(ai_ground_truth())
            .evaluate_retrieval(&pipeline)
            .await;
        assert!(result.is_err());
    }
}
