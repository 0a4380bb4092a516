// Public API
// Typed entry point over the analysis, comparison, humanization and batch
// subsystems. Input validation happens here, before any processing.

use std::sync::Arc;
use tracing::debug;

use crate::error::HumanizerError;
use crate::models::{
    ActiveBatches, AnalysisReport, BatchReport, BatchStatusReport, ComparisonReport, Mode,
    TransformResult,
};
use crate::services::batch::BatchProcessor;
use crate::services::humanize::HumanizePipeline;
use crate::services::remote::RemoteServices;
use crate::services::{analytics, comparison};

pub struct Humanizer {
    pipeline: Arc<HumanizePipeline>,
    batch: BatchProcessor,
}

impl Humanizer {
    /// Collaborators configured from environment credentials.
    pub fn new() -> Self {
        Self::with_services(RemoteServices::from_env())
    }

    /// Purely local engine, no external collaborators.
    pub fn local() -> Self {
        Self::with_services(RemoteServices::disabled())
    }

    pub fn with_services(services: RemoteServices) -> Self {
        let pipeline = Arc::new(HumanizePipeline::new(services));
        let batch = BatchProcessor::new(Arc::clone(&pipeline));
        Self { pipeline, batch }
    }

    pub fn analyze(&self, text: &str) -> Result<AnalysisReport, HumanizerError> {
        let text = non_empty(text)?;
        debug!(chars = text.len(), "analyzing text");
        Ok(analytics::analyze(text))
    }

    pub fn compare(
        &self,
        original: &str,
        humanized: &str,
    ) -> Result<ComparisonReport, HumanizerError> {
        let original = non_empty(original)?;
        let humanized = non_empty(humanized)?;
        debug!(original_chars = original.len(), humanized_chars = humanized.len(), "comparing texts");
        Ok(comparison::compare(original, humanized))
    }

    pub async fn humanize(&self, text: &str, mode: Mode) -> Result<TransformResult, HumanizerError> {
        let text = non_empty(text)?;
        Ok(self.pipeline.humanize(text, mode).await)
    }

    pub async fn process_batch(
        &self,
        texts: Vec<String>,
        mode: Mode,
        batch_id: Option<String>,
    ) -> Result<BatchReport, HumanizerError> {
        self.batch.process_batch(texts, mode, batch_id).await
    }

    pub async fn batch_status(&self, batch_id: &str) -> Result<BatchStatusReport, HumanizerError> {
        self.batch.batch_status(batch_id).await
    }

    pub async fn cleanup_old_batches(&self, max_age_hours: i64) -> usize {
        self.batch.cleanup_old_batches(max_age_hours).await
    }

    pub async fn active_batches(&self) -> ActiveBatches {
        self.batch.active_batches().await
    }
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(text: &str) -> Result<&str, HumanizerError> {
    if text.trim().is_empty() {
        return Err(HumanizerError::EmptyText);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;
    use crate::services::remote::{GrammarOutcome, GrammarService};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct UnreachableGrammar;

    #[async_trait]
    impl GrammarService for UnreachableGrammar {
        async fn enhance(&self, _text: &str) -> Result<GrammarOutcome, RemoteError> {
            Err(RemoteError::Api { status: 502, message: "bad gateway".to_string() })
        }
    }

    #[test]
    fn test_analyze_rejects_blank_input() {
        let h = Humanizer::local();
        assert!(matches!(h.analyze("   \n\t"), Err(HumanizerError::EmptyText)));
        assert!(h.analyze("A perfectly fine sentence.").is_ok());
    }

    #[test]
    fn test_compare_validates_both_sides() {
        let h = Humanizer::local();
        assert!(matches!(h.compare("", "something"), Err(HumanizerError::EmptyText)));
        assert!(matches!(h.compare("something", "  "), Err(HumanizerError::EmptyText)));
        let report = h.compare("The cat sat.", "The cat sat down.").unwrap();
        assert!(report.similarity_metrics.overall_similarity > 0.5);
    }

    #[tokio::test]
    async fn test_humanize_round_trips_through_pipeline() {
        let h = Humanizer::local();
        assert!(matches!(h.humanize("", Mode::Fast).await, Err(HumanizerError::EmptyText)));
        let result = h
            .humanize("This is a reasonably long input. It spans two sentences.", Mode::Fast)
            .await
            .unwrap();
        assert!(!result.humanized_text.trim().is_empty());
        assert_eq!(result.mode, Mode::Fast);
    }

    #[tokio::test]
    async fn test_collaborator_failure_never_surfaces_as_an_error() {
        let services = RemoteServices {
            grammar: Some(Arc::new(UnreachableGrammar)),
            ..RemoteServices::disabled()
        };
        let h = Humanizer::with_services(services);
        let result = h
            .humanize("The text survives a broken collaborator. It still comes back.", Mode::Fast)
            .await
            .unwrap();
        assert!(!result.service_results.grammar.applied);
        assert!(result.service_results.grammar.error.as_deref().unwrap().contains("502"));
    }

    #[tokio::test]
    async fn test_batch_delegation() {
        let h = Humanizer::local();
        let report = h
            .process_batch(
                vec!["First item to rewrite.".to_string(), "Second item to rewrite.".to_string()],
                Mode::Fast,
                Some("api-test".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(report.successful, 2);

        let status = h.batch_status("api-test").await.unwrap();
        assert_eq!(status.completed, 2);
        assert_eq!(h.active_batches().await.active_batch_count, 1);
        assert_eq!(h.cleanup_old_batches(0).await, 1);
    }
}
