// Humanforge Data Models
// Report and job types shared across the service layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::HumanizerError;

// ============ Mode & Profiles ============

/// Humanization mode. Drives the pass intensity, the target detector
/// profile and which external collaborators and advanced passes engage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Fast,
    Balanced,
    Aggressive,
}

impl Mode {
    /// Scalar in [0,1] controlling how aggressively transform passes fire.
    pub fn intensity(self) -> f64 {
        match self {
            Mode::Fast => 0.4,
            Mode::Balanced => 0.7,
            Mode::Aggressive => 1.0,
        }
    }

    /// Target AI/human split the mode aims for. Always sums to 100.
    pub fn target_profile(self) -> TargetProfile {
        match self {
            Mode::Fast => TargetProfile { ai_generated: 75.0, human_written: 25.0 },
            Mode::Balanced => TargetProfile { ai_generated: 50.0, human_written: 50.0 },
            Mode::Aggressive => TargetProfile { ai_generated: 0.0, human_written: 100.0 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Fast => "fast",
            Mode::Balanced => "balanced",
            Mode::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = HumanizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fast" => Ok(Mode::Fast),
            "balanced" => Ok(Mode::Balanced),
            "aggressive" => Ok(Mode::Aggressive),
            other => Err(HumanizerError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProfile {
    pub ai_generated: f64,
    pub human_written: f64,
}

/// Simulated detector outcome. No real detector is queried: values are the
/// target profile plus a small random perturbation, renormalized to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievedProfile {
    pub ai_generated: f64,
    pub human_written: f64,
}

// ============ Analysis Report ============

/// A metric group that either computed or had too little text to work with.
/// Callers must match on the status instead of observing an absent key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Computed(T),
    Insufficient { reason: String },
}

impl<T> Section<T> {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        Section::Insufficient { reason: reason.into() }
    }

    pub fn computed(&self) -> Option<&T> {
        match self {
            Section::Computed(v) => Some(v),
            Section::Insufficient { .. } => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Section::Computed(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub basic_stats: BasicStats,
    pub readability: Section<Readability>,
    pub complexity: Complexity,
    pub sentiment: Sentiment,
    pub ai_indicators: AiIndicators,
    pub burstiness: Section<Burstiness>,
    pub perplexity: Section<Perplexity>,
    pub overall_score: OverallScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub word_count: usize,
    pub unique_word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_sentence: f64,
    pub avg_characters_per_word: f64,
    pub vocabulary_diversity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readability {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub average_grade_level: f64,
    pub readability_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complexity {
    pub complex_word_ratio: f64,
    pub average_sentence_length: f64,
    pub sentence_length_variance: f64,
    pub formal_word_ratio: f64,
    pub punctuation_density: f64,
    pub complexity_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub positive_word_count: usize,
    pub negative_word_count: usize,
    pub sentiment_score: f64,
    pub sentiment_label: String,
    pub sentiment_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiIndicators {
    pub formal_language_ratio: f64,
    pub repetition_score: f64,
    pub sentence_uniformity: f64,
    pub transition_word_ratio: f64,
    pub ai_likelihood_score: f64,
    pub ai_likelihood_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Burstiness {
    pub sentence_count: usize,
    pub mean_sentence_length: f64,
    pub length_variance: f64,
    pub length_standard_deviation: f64,
    pub coefficient_of_variation: f64,
    pub complexity_variance: f64,
    pub burstiness_score: f64,
    pub burstiness_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Perplexity {
    pub estimated_perplexity: f64,
    pub entropy: f64,
    pub vocabulary_richness: f64,
    pub unique_word_ratio: f64,
    pub perplexity_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub overall_humanness_score: f64,
    pub humanness_level: String,
    pub component_scores: ComponentScores,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    pub readability: f64,
    pub complexity: f64,
    pub anti_ai: f64,
    pub burstiness: f64,
}

// ============ Comparison Report ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    pub basic_comparison: BasicComparison,
    pub word_changes: WordChanges,
    pub sentence_changes: SentenceChanges,
    pub structural_changes: StructuralChanges,
    pub readability_comparison: Section<ReadabilityComparison>,
    pub similarity_metrics: SimilarityMetrics,
    pub change_summary: ChangeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicComparison {
    pub original: TextStats,
    pub humanized: TextStats,
    pub changes: BasicChanges,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicChanges {
    pub character_change: i64,
    pub word_change: i64,
    pub sentence_change: i64,
    pub character_change_percent: f64,
    pub word_change_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordChanges {
    pub added_words: Vec<String>,
    pub removed_words: Vec<String>,
    pub added_count: usize,
    pub removed_count: usize,
    pub common_words_count: usize,
    pub frequency_changes: HashMap<String, FrequencyChange>,
    pub vocabulary_complexity: VocabularyComplexity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyChange {
    pub original_count: usize,
    pub humanized_count: usize,
    pub change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyComplexity {
    pub original_complex_words: usize,
    pub humanized_complex_words: usize,
    pub complexity_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceChanges {
    pub sentence_count_change: i64,
    pub average_length_change: f64,
    pub original_structures: StructureCounts,
    pub humanized_structures: StructureCounts,
    pub sentence_matches: Vec<SentenceMatch>,
    pub length_distribution: LengthDistributionPair,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureCounts {
    pub simple: usize,
    pub compound: usize,
    pub complex: usize,
    pub compound_complex: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceMatch {
    pub original_index: usize,
    pub original_sentence: String,
    pub matched_sentence: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthDistributionPair {
    pub original: LengthDistribution,
    pub humanized: LengthDistribution,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthDistribution {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralChanges {
    pub punctuation_changes: HashMap<String, PunctuationChange>,
    pub transition_words: TransitionChanges,
    pub paragraph_structure: ParagraphStructure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctuationChange {
    pub original: usize,
    pub humanized: usize,
    pub change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionChanges {
    pub original: HashMap<String, usize>,
    pub humanized: HashMap<String, usize>,
    pub total_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphStructure {
    pub original_paragraphs: usize,
    pub humanized_paragraphs: usize,
    pub paragraph_change: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityComparison {
    pub original: Readability,
    pub humanized: Readability,
    pub improvements: ReadabilityImprovements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityImprovements {
    pub flesch_ease_change: f64,
    pub grade_level_change: f64,
    pub readability_improved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityMetrics {
    pub character_similarity: f64,
    pub word_similarity: f64,
    pub sentence_similarity: f64,
    pub jaccard_similarity: f64,
    pub overall_similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeLevel {
    Minimal,
    Moderate,
    Substantial,
    Extensive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    pub change_level: ChangeLevel,
    pub change_types: Vec<String>,
    pub total_word_changes: usize,
    pub sentence_modifications: usize,
    pub structural_modifications: usize,
    /// 100 minus the raw change counts. Deliberately unclamped: very
    /// divergent texts go negative.
    pub preservation_score: f64,
}

// ============ Transform Result ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub original_text: String,
    pub humanized_text: String,
    pub mode: Mode,
    pub target_profile: TargetProfile,
    pub achieved_profile: AchievedProfile,
    pub pass_effects: Vec<PassEffect>,
    pub service_results: ServiceResults,
    pub original_length: usize,
    pub humanized_length: usize,
}

/// One internal rewriting pass and how many edits it made on this run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassEffect {
    pub pass: String,
    pub edits: usize,
}

/// Per-collaborator outcome of the pre-pipeline augmentation step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOutcome {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ServiceOutcome {
    pub fn applied(detail: Option<serde_json::Value>) -> Self {
        Self { applied: true, error: None, detail }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { applied: false, error: Some(error.into()), detail: None }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResults {
    pub grammar: ServiceOutcome,
    pub style: ServiceOutcome,
    pub rewrite: ServiceOutcome,
    pub bypass: ServiceOutcome,
    pub advanced_humanization: ServiceOutcome,
}

// ============ Batch Types ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Processing,
    Completed,
    Failed,
}

/// Job ledger entry. Owned and mutated exclusively by the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchJob {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub status: BatchStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem {
    pub index: usize,
    pub success: bool,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TransformResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub processing_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch_id: String,
    pub total_texts: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<BatchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_statistics: Option<BatchStatistics>,
    pub processing_time_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    pub processing_time: ProcessingTimeStats,
    pub accuracy: AccuracyStats,
    pub text_length: TextLengthStats,
    pub service_usage: HashMap<String, ServiceUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingTimeStats {
    pub average_ms: f64,
    pub minimum_ms: f64,
    pub maximum_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccuracyStats {
    pub average_ai_accuracy: f64,
    pub average_human_accuracy: f64,
    pub overall_accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLengthStats {
    pub average_original_length: f64,
    pub average_humanized_length: f64,
    pub average_length_change: f64,
    pub length_change_percentage: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceUsage {
    pub applied: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusReport {
    pub batch_id: String,
    pub status: BatchStatus,
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub progress_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_remaining_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub status: BatchStatus,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBatches {
    pub active_batch_count: usize,
    pub batches: HashMap<String, ActiveBatchSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_profiles_sum_to_100() {
        for mode in [Mode::Fast, Mode::Balanced, Mode::Aggressive] {
            let t = mode.target_profile();
            assert_eq!(t.ai_generated + t.human_written, 100.0, "mode {mode}");
        }
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Aggressive".parse::<Mode>().unwrap(), Mode::Aggressive);
        assert_eq!(" fast ".parse::<Mode>().unwrap(), Mode::Fast);
        assert!("turbo".parse::<Mode>().is_err());
    }

    #[test]
    fn intensity_rises_with_mode() {
        assert!(Mode::Fast.intensity() < Mode::Balanced.intensity());
        assert!(Mode::Balanced.intensity() < Mode::Aggressive.intensity());
    }

    #[test]
    fn section_serializes_with_status_tag() {
        let s: Section<BasicChanges> = Section::insufficient("too short");
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["status"], "insufficient");
        assert_eq!(json["data"]["reason"], "too short");
    }
}
