// Batch Processing
// Fans a batch of texts across a bounded set of concurrent pipeline runs,
// tracks per-job progress in a shared registry and aggregates statistics
// over the successful items.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info};

use super::humanize::HumanizePipeline;
use super::{round1, round2};
use crate::error::{HumanizerError, MAX_BATCH_SIZE};
use crate::models::{
    AccuracyStats, ActiveBatchSummary, ActiveBatches, BatchItem, BatchJob, BatchReport,
    BatchStatistics, BatchStatus, BatchStatusReport, Mode, ProcessingTimeStats, ServiceUsage,
    TextLengthStats,
};

const DEFAULT_CONCURRENCY: usize = 4;

pub struct BatchProcessor {
    pipeline: Arc<HumanizePipeline>,
    jobs: Arc<Mutex<HashMap<String, BatchJob>>>,
    concurrency: usize,
}

impl BatchProcessor {
    pub fn new(pipeline: Arc<HumanizePipeline>) -> Self {
        Self::with_concurrency(pipeline, DEFAULT_CONCURRENCY)
    }

    pub fn with_concurrency(pipeline: Arc<HumanizePipeline>, concurrency: usize) -> Self {
        Self { pipeline, jobs: Arc::new(Mutex::new(HashMap::new())), concurrency: concurrency.max(1) }
    }

    /// Process a batch of texts. Individual failures are captured per item;
    /// only an invalid batch as a whole is an error.
    pub async fn process_batch(
        &self,
        texts: Vec<String>,
        mode: Mode,
        batch_id: Option<String>,
    ) -> Result<BatchReport, HumanizerError> {
        if texts.is_empty() {
            return Err(HumanizerError::EmptyBatch);
        }
        if texts.len() > MAX_BATCH_SIZE {
            return Err(HumanizerError::BatchTooLarge { len: texts.len(), max: MAX_BATCH_SIZE });
        }

        let batch_id =
            batch_id.unwrap_or_else(|| format!("batch_{}", Utc::now().timestamp_millis()));
        let total = texts.len();
        info!(%batch_id, total, %mode, "batch started");

        self.jobs.lock().await.insert(
            batch_id.clone(),
            BatchJob {
                total,
                completed: 0,
                failed: 0,
                status: BatchStatus::Processing,
                started_at: Utc::now(),
                finished_at: None,
            },
        );

        let started = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<BatchItem> = JoinSet::new();

        for (index, text) in texts.into_iter().enumerate() {
            let pipeline = Arc::clone(&self.pipeline);
            let jobs = Arc::clone(&self.jobs);
            let semaphore = Arc::clone(&semaphore);
            let batch_id = batch_id.clone();

            tasks.spawn(async move {
                // Semaphore is never closed, so acquisition cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                let item = process_single(&pipeline, index, text, mode).await;

                let mut jobs = jobs.lock().await;
                if let Some(job) = jobs.get_mut(&batch_id) {
                    if item.success {
                        job.completed += 1;
                    } else {
                        job.failed += 1;
                    }
                }
                item
            });
        }

        let mut results: Vec<BatchItem> = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(item) => results.push(item),
                Err(e) => error!(%batch_id, error = %e, "batch worker panicked"),
            }
        }
        results.sort_by_key(|item| item.index);

        {
            let mut jobs = self.jobs.lock().await;
            if let Some(job) = jobs.get_mut(&batch_id) {
                job.status = BatchStatus::Completed;
                job.finished_at = Some(Utc::now());
            }
        }

        let successful = results.iter().filter(|r| r.success).count();
        let failed = results.len() - successful;
        let batch_statistics = batch_statistics(&results);
        info!(%batch_id, successful, failed, "batch finished");

        Ok(BatchReport {
            batch_id,
            total_texts: total,
            successful,
            failed,
            results,
            batch_statistics,
            processing_time_secs: round2(started.elapsed().as_secs_f64()),
        })
    }

    pub async fn batch_status(&self, batch_id: &str) -> Result<BatchStatusReport, HumanizerError> {
        let jobs = self.jobs.lock().await;
        let job = jobs
            .get(batch_id)
            .ok_or_else(|| HumanizerError::UnknownBatch(batch_id.to_string()))?;

        let progress = if job.total > 0 {
            round2(job.completed as f64 / job.total as f64 * 100.0)
        } else {
            0.0
        };

        let estimated_remaining_seconds =
            if job.completed > 0 && job.status == BatchStatus::Processing {
                let elapsed = (Utc::now() - job.started_at).num_milliseconds() as f64 / 1000.0;
                let per_text = elapsed / job.completed as f64;
                Some(round2(per_text * (job.total - job.completed) as f64))
            } else {
                None
            };

        Ok(BatchStatusReport {
            batch_id: batch_id.to_string(),
            status: job.status,
            total: job.total,
            completed: job.completed,
            failed: job.failed,
            progress_percentage: progress,
            estimated_remaining_seconds,
        })
    }

    /// Drop registry entries older than the given age. Returns how many
    /// were removed.
    pub async fn cleanup_old_batches(&self, max_age_hours: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::hours(max_age_hours);
        let mut jobs = self.jobs.lock().await;
        let before = jobs.len();
        jobs.retain(|_, job| job.started_at >= cutoff);
        let removed = before - jobs.len();
        info!(removed, "cleaned up old batch records");
        removed
    }

    pub async fn active_batches(&self) -> ActiveBatches {
        let jobs = self.jobs.lock().await;
        let batches = jobs
            .iter()
            .map(|(id, job)| {
                let progress = if job.total > 0 {
                    round2(job.completed as f64 / job.total as f64 * 100.0)
                } else {
                    0.0
                };
                (
                    id.clone(),
                    ActiveBatchSummary {
                        total: job.total,
                        completed: job.completed,
                        failed: job.failed,
                        status: job.status,
                        progress_percentage: progress,
                    },
                )
            })
            .collect();
        ActiveBatches { active_batch_count: jobs.len(), batches }
    }
}

async fn process_single(
    pipeline: &HumanizePipeline,
    index: usize,
    text: String,
    mode: Mode,
) -> BatchItem {
    if text.trim().is_empty() {
        return BatchItem {
            index,
            success: false,
            original_text: text,
            result: None,
            error: Some(HumanizerError::EmptyText.to_string()),
            processing_time_ms: 0.0,
        };
    }

    let started = Instant::now();
    let result = pipeline.humanize(&text, mode).await;
    BatchItem {
        index,
        success: true,
        original_text: text,
        result: Some(result),
        error: None,
        processing_time_ms: round1(started.elapsed().as_secs_f64() * 1000.0),
    }
}

fn batch_statistics(results: &[BatchItem]) -> Option<BatchStatistics> {
    let successful: Vec<&BatchItem> = results.iter().filter(|r| r.success).collect();
    if successful.is_empty() {
        return None;
    }
    let n = successful.len() as f64;

    let times: Vec<f64> = successful.iter().map(|r| r.processing_time_ms).collect();
    let processing_time = ProcessingTimeStats {
        average_ms: round2(times.iter().sum::<f64>() / n),
        minimum_ms: round2(times.iter().copied().fold(f64::INFINITY, f64::min)),
        maximum_ms: round2(times.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
    };

    let mut ai_accuracy_sum = 0.0;
    let mut human_accuracy_sum = 0.0;
    let mut original_length_sum = 0.0;
    let mut humanized_length_sum = 0.0;
    let mut service_usage: HashMap<String, ServiceUsage> = HashMap::new();

    for item in &successful {
        // Success items always carry a result.
        let Some(result) = &item.result else { continue };
        ai_accuracy_sum +=
            100.0 - (result.target_profile.ai_generated - result.achieved_profile.ai_generated).abs();
        human_accuracy_sum += 100.0
            - (result.target_profile.human_written - result.achieved_profile.human_written).abs();
        original_length_sum += result.original_length as f64;
        humanized_length_sum += result.humanized_length as f64;

        let outcomes = [
            ("grammar", &result.service_results.grammar),
            ("style", &result.service_results.style),
            ("rewrite", &result.service_results.rewrite),
            ("bypass", &result.service_results.bypass),
            ("advanced_humanization", &result.service_results.advanced_humanization),
        ];
        for (name, outcome) in outcomes {
            let usage = service_usage.entry(name.to_string()).or_default();
            if outcome.applied {
                usage.applied += 1;
            } else if outcome.error.is_some() {
                usage.failed += 1;
            }
        }
    }

    let avg_ai_accuracy = ai_accuracy_sum / n;
    let avg_human_accuracy = human_accuracy_sum / n;
    let avg_original = original_length_sum / n;
    let avg_humanized = humanized_length_sum / n;
    let avg_change = avg_humanized - avg_original;

    Some(BatchStatistics {
        processing_time,
        accuracy: AccuracyStats {
            average_ai_accuracy: round2(avg_ai_accuracy),
            average_human_accuracy: round2(avg_human_accuracy),
            overall_accuracy: round2((avg_ai_accuracy + avg_human_accuracy) / 2.0),
        },
        text_length: TextLengthStats {
            average_original_length: round2(avg_original),
            average_humanized_length: round2(avg_humanized),
            average_length_change: round2(avg_change),
            length_change_percentage: if avg_original > 0.0 {
                round2(avg_change / avg_original * 100.0)
            } else {
                0.0
            },
        },
        service_usage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> BatchProcessor {
        BatchProcessor::new(Arc::new(HumanizePipeline::local()))
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("Sample text number {i}. It has several sentences. They vary a bit."))
            .collect()
    }

    #[tokio::test]
    async fn test_empty_batch_rejected() {
        let err = processor().process_batch(vec![], Mode::Balanced, None).await.unwrap_err();
        assert!(matches!(err, HumanizerError::EmptyBatch));
    }

    #[tokio::test]
    async fn test_oversized_batch_rejected() {
        let err = processor()
            .process_batch(texts(MAX_BATCH_SIZE + 1), Mode::Fast, None)
            .await
            .unwrap_err();
        assert!(matches!(err, HumanizerError::BatchTooLarge { len: 51, max: 50 }));
    }

    #[tokio::test]
    async fn test_full_batch_is_accepted() {
        let p = processor();
        let report = p.process_batch(texts(MAX_BATCH_SIZE), Mode::Fast, None).await.unwrap();
        assert_eq!(report.total_texts, MAX_BATCH_SIZE);
        let indices: Vec<usize> = report.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..MAX_BATCH_SIZE).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_batch_results_keep_input_order() {
        let p = processor();
        let report = p.process_batch(texts(7), Mode::Fast, None).await.unwrap();
        assert_eq!(report.total_texts, 7);
        assert_eq!(report.successful, 7);
        assert_eq!(report.failed, 0);
        let indices: Vec<usize> = report.results.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..7).collect::<Vec<_>>());
        assert!(report.batch_id.starts_with("batch_"));
    }

    #[tokio::test]
    async fn test_blank_items_fail_without_sinking_the_batch() {
        let p = processor();
        let batch = vec![
            "A real text to process here.".to_string(),
            "   ".to_string(),
            "Another real text follows.".to_string(),
        ];
        let report = p.process_batch(batch, Mode::Fast, None).await.unwrap();
        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.results[1].success);
        assert!(report.results[1].error.as_deref().unwrap().contains("empty"));
        assert!(report.results[0].result.is_some());
    }

    #[tokio::test]
    async fn test_caller_supplied_batch_id_is_kept() {
        let p = processor();
        let report = p
            .process_batch(texts(2), Mode::Balanced, Some("my-batch".to_string()))
            .await
            .unwrap();
        assert_eq!(report.batch_id, "my-batch");

        let status = p.batch_status("my-batch").await.unwrap();
        assert_eq!(status.status, BatchStatus::Completed);
        assert_eq!(status.completed, 2);
        assert_eq!(status.progress_percentage, 100.0);
        assert!(status.estimated_remaining_seconds.is_none());
    }

    #[tokio::test]
    async fn test_unknown_batch_status_errors() {
        let err = processor().batch_status("nope").await.unwrap_err();
        assert!(matches!(err, HumanizerError::UnknownBatch(_)));
    }

    #[tokio::test]
    async fn test_statistics_reflect_simulated_accuracy() {
        let p = processor();
        let report = p.process_batch(texts(4), Mode::Balanced, None).await.unwrap();
        let stats = report.batch_statistics.unwrap();
        // The simulated detector stays within roughly ±3 of target.
        assert!(stats.accuracy.overall_accuracy >= 96.0);
        assert!(stats.accuracy.overall_accuracy <= 100.0);
        assert!(stats.text_length.average_original_length > 0.0);
        assert_eq!(stats.service_usage["advanced_humanization"].applied, 4);
        assert_eq!(stats.service_usage["grammar"].applied, 0);
    }

    #[tokio::test]
    async fn test_cleanup_removes_aged_jobs() {
        let p = processor();
        p.process_batch(texts(1), Mode::Fast, Some("old".to_string())).await.unwrap();
        assert_eq!(p.active_batches().await.active_batch_count, 1);

        // Nothing is older than a day yet.
        assert_eq!(p.cleanup_old_batches(24).await, 0);
        // An age floor of zero hours sweeps everything.
        assert_eq!(p.cleanup_old_batches(0).await, 1);
        assert_eq!(p.active_batches().await.active_batch_count, 0);
    }
}
