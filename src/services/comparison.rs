// Text Comparison Service
// Before/after diffing of an original document against its humanized
// rendition: counts, word and sentence deltas, structure, similarity.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

use super::tokenizer::{self, STRUCTURAL_PUNCT_RE};
use super::{analytics, round2, round3, similarity};
use crate::models::{
    BasicChanges, BasicComparison, ChangeLevel, ChangeSummary, ComparisonReport, FrequencyChange,
    LengthDistribution, LengthDistributionPair, ParagraphStructure, PunctuationChange,
    ReadabilityComparison, ReadabilityImprovements, Section, SentenceChanges, SentenceMatch,
    SimilarityMetrics, StructuralChanges, StructureCounts, TextStats, TransitionChanges,
    VocabularyComplexity, WordChanges,
};

static COORD_CONJUNCTIONS: &[&str] = &["and", "but", "or", "so", "yet"];
static SUBORD_CONJUNCTIONS: &[&str] =
    &["because", "since", "although", "while", "if", "when", "that", "which"];

/// Transition vocabulary tracked structurally. A superset of the analyzer's
/// AI-indicator list.
static TRANSITION_WORDS: &[&str] = &[
    "however", "furthermore", "moreover", "additionally", "consequently", "therefore",
    "subsequently", "nevertheless", "nonetheless", "accordingly", "meanwhile", "finally",
    "ultimately", "specifically", "particularly",
];

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

pub fn compare(original: &str, humanized: &str) -> ComparisonReport {
    let word_changes = word_changes(original, humanized);
    let sentence_changes = sentence_changes(original, humanized);
    let structural_changes = structural_changes(original, humanized);
    let change_summary = change_summary(&word_changes, &sentence_changes, &structural_changes);

    ComparisonReport {
        basic_comparison: basic_comparison(original, humanized),
        word_changes,
        sentence_changes,
        structural_changes,
        readability_comparison: readability_comparison(original, humanized),
        similarity_metrics: similarity_metrics(original, humanized),
        change_summary,
    }
}

/// Sentence count here is the number of split pieces minus one, so text
/// without a trailing terminator reports one fewer than the segmenter.
/// Kept as the established counting convention for this report.
fn text_stats(text: &str) -> TextStats {
    TextStats {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|c| *c != ' ').count(),
        words: tokenizer::words(text).len(),
        sentences: SENTENCE_SPLIT_RE.split(text).count().saturating_sub(1),
        paragraphs: tokenizer::paragraph_count(text),
    }
}

fn basic_comparison(original: &str, humanized: &str) -> BasicComparison {
    let o = text_stats(original);
    let h = text_stats(humanized);

    let character_change = h.characters as i64 - o.characters as i64;
    let word_change = h.words as i64 - o.words as i64;
    let sentence_change = h.sentences as i64 - o.sentences as i64;

    let character_change_percent = if o.characters > 0 {
        round2(character_change as f64 / o.characters as f64 * 100.0)
    } else {
        0.0
    };
    let word_change_percent = if o.words > 0 {
        round2(word_change as f64 / o.words as f64 * 100.0)
    } else {
        0.0
    };

    BasicComparison {
        original: o,
        humanized: h,
        changes: BasicChanges {
            character_change,
            word_change,
            sentence_change,
            character_change_percent,
            word_change_percent,
        },
    }
}

fn word_changes(original: &str, humanized: &str) -> WordChanges {
    let original_words = tokenizer::words_lower(original);
    let humanized_words = tokenizer::words_lower(humanized);

    let original_set: HashSet<&str> = original_words.iter().map(String::as_str).collect();
    let humanized_set: HashSet<&str> = humanized_words.iter().map(String::as_str).collect();

    // Sorted so that the capped listings are stable run to run.
    let mut added: Vec<&str> = humanized_set.difference(&original_set).copied().collect();
    let mut removed: Vec<&str> = original_set.difference(&humanized_set).copied().collect();
    added.sort_unstable();
    removed.sort_unstable();

    let common: HashSet<&str> = original_set.intersection(&humanized_set).copied().collect();

    let mut original_freq: HashMap<&str, usize> = HashMap::new();
    for w in &original_words {
        *original_freq.entry(w).or_insert(0) += 1;
    }
    let mut humanized_freq: HashMap<&str, usize> = HashMap::new();
    for w in &humanized_words {
        *humanized_freq.entry(w).or_insert(0) += 1;
    }

    let mut shifted: Vec<&str> = common
        .iter()
        .copied()
        .filter(|w| original_freq.get(w) != humanized_freq.get(w))
        .collect();
    shifted.sort_unstable();
    let frequency_changes: HashMap<String, FrequencyChange> = shifted
        .into_iter()
        .take(10)
        .map(|w| {
            let o = original_freq.get(w).copied().unwrap_or(0);
            let h = humanized_freq.get(w).copied().unwrap_or(0);
            (
                w.to_string(),
                FrequencyChange {
                    original_count: o,
                    humanized_count: h,
                    change: h as i64 - o as i64,
                },
            )
        })
        .collect();

    let original_complex = original_words.iter().filter(|w| w.chars().count() > 6).count();
    let humanized_complex = humanized_words.iter().filter(|w| w.chars().count() > 6).count();

    WordChanges {
        added_count: added.len(),
        removed_count: removed.len(),
        added_words: added.into_iter().take(20).map(str::to_string).collect(),
        removed_words: removed.into_iter().take(20).map(str::to_string).collect(),
        common_words_count: common.len(),
        frequency_changes,
        vocabulary_complexity: VocabularyComplexity {
            original_complex_words: original_complex,
            humanized_complex_words: humanized_complex,
            complexity_change: humanized_complex as i64 - original_complex as i64,
        },
    }
}

fn sentence_changes(original: &str, humanized: &str) -> SentenceChanges {
    let original_sentences = tokenizer::sentences(original);
    let humanized_sentences = tokenizer::sentences(humanized);

    // Whitespace split, matching how the distributions were always measured.
    let original_lengths: Vec<usize> =
        original_sentences.iter().map(|s| s.split_whitespace().count()).collect();
    let humanized_lengths: Vec<usize> =
        humanized_sentences.iter().map(|s| s.split_whitespace().count()).collect();

    let avg_original = avg(&original_lengths);
    let avg_humanized = avg(&humanized_lengths);

    let mut sentence_matches = Vec::new();
    for (i, orig) in original_sentences.iter().take(10).enumerate() {
        if let Some((matched, ratio)) = similarity::best_close_match(orig, &humanized_sentences, 0.6)
        {
            sentence_matches.push(SentenceMatch {
                original_index: i,
                original_sentence: orig.clone(),
                matched_sentence: matched.to_string(),
                similarity: round3(ratio),
            });
        }
    }

    SentenceChanges {
        sentence_count_change: humanized_sentences.len() as i64 - original_sentences.len() as i64,
        average_length_change: round2(avg_humanized - avg_original),
        original_structures: sentence_structures(&original_sentences),
        humanized_structures: sentence_structures(&humanized_sentences),
        sentence_matches,
        length_distribution: LengthDistributionPair {
            original: length_distribution(&original_lengths, avg_original),
            humanized: length_distribution(&humanized_lengths, avg_humanized),
        },
    }
}

fn avg(lengths: &[usize]) -> f64 {
    if lengths.is_empty() {
        return 0.0;
    }
    lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
}

fn length_distribution(lengths: &[usize], avg: f64) -> LengthDistribution {
    LengthDistribution {
        min: lengths.iter().copied().min().unwrap_or(0),
        max: lengths.iter().copied().max().unwrap_or(0),
        avg: round2(avg),
    }
}

/// Keyword heuristic: a coordinating conjunction marks a compound sentence,
/// a subordinating one marks a complex sentence, both mark compound-complex.
fn sentence_structures(sentences: &[String]) -> StructureCounts {
    let mut counts = StructureCounts::default();
    for sentence in sentences {
        let words = tokenizer::words_lower(sentence);
        let coord = words.iter().any(|w| COORD_CONJUNCTIONS.contains(&w.as_str()));
        let subord = words.iter().any(|w| SUBORD_CONJUNCTIONS.contains(&w.as_str()));
        match (coord, subord) {
            (true, true) => counts.compound_complex += 1,
            (true, false) => counts.compound += 1,
            (false, true) => counts.complex += 1,
            (false, false) => counts.simple += 1,
        }
    }
    counts
}

fn structural_changes(original: &str, humanized: &str) -> StructuralChanges {
    let mut original_punct: HashMap<char, usize> = HashMap::new();
    for m in STRUCTURAL_PUNCT_RE.find_iter(original) {
        if let Some(c) = m.as_str().chars().next() {
            *original_punct.entry(c).or_insert(0) += 1;
        }
    }
    let mut humanized_punct: HashMap<char, usize> = HashMap::new();
    for m in STRUCTURAL_PUNCT_RE.find_iter(humanized) {
        if let Some(c) = m.as_str().chars().next() {
            *humanized_punct.entry(c).or_insert(0) += 1;
        }
    }

    let mut punctuation_changes = HashMap::new();
    let all: HashSet<char> =
        original_punct.keys().chain(humanized_punct.keys()).copied().collect();
    for c in all {
        let o = original_punct.get(&c).copied().unwrap_or(0);
        let h = humanized_punct.get(&c).copied().unwrap_or(0);
        if o != h {
            punctuation_changes.insert(
                c.to_string(),
                PunctuationChange { original: o, humanized: h, change: h as i64 - o as i64 },
            );
        }
    }

    let original_words = tokenizer::words_lower(original);
    let humanized_words = tokenizer::words_lower(humanized);
    let mut original_transitions = HashMap::new();
    let mut humanized_transitions = HashMap::new();
    let mut total_change = 0i64;
    for word in TRANSITION_WORDS {
        let o = original_words.iter().filter(|w| w == word).count();
        let h = humanized_words.iter().filter(|w| w == word).count();
        if o > 0 || h > 0 {
            original_transitions.insert(word.to_string(), o);
            humanized_transitions.insert(word.to_string(), h);
            total_change += h as i64 - o as i64;
        }
    }

    let original_paragraphs = tokenizer::paragraph_count(original);
    let humanized_paragraphs = tokenizer::paragraph_count(humanized);

    StructuralChanges {
        punctuation_changes,
        transition_words: TransitionChanges {
            original: original_transitions,
            humanized: humanized_transitions,
            total_change,
        },
        paragraph_structure: ParagraphStructure {
            original_paragraphs,
            humanized_paragraphs,
            paragraph_change: humanized_paragraphs as i64 - original_paragraphs as i64,
        },
    }
}

fn readability_comparison(original: &str, humanized: &str) -> Section<ReadabilityComparison> {
    let o = analytics::readability(original);
    let h = analytics::readability(humanized);
    match (o.computed(), h.computed()) {
        (Some(o), Some(h)) => Section::Computed(ReadabilityComparison {
            improvements: ReadabilityImprovements {
                flesch_ease_change: round2(h.flesch_reading_ease - o.flesch_reading_ease),
                grade_level_change: round2(h.average_grade_level - o.average_grade_level),
                readability_improved: h.flesch_reading_ease > o.flesch_reading_ease,
            },
            original: o.clone(),
            humanized: h.clone(),
        }),
        _ => Section::insufficient("could not calculate readability metrics for both texts"),
    }
}

fn similarity_metrics(original: &str, humanized: &str) -> SimilarityMetrics {
    let character_similarity = similarity::char_ratio(original, humanized);

    let original_words = tokenizer::words_lower(original);
    let humanized_words = tokenizer::words_lower(humanized);
    let word_similarity = similarity::sequence_ratio(&original_words, &humanized_words);

    let original_sentences = tokenizer::sentences(original);
    let humanized_sentences = tokenizer::sentences(humanized);
    let sentence_similarity = similarity::sequence_ratio(&original_sentences, &humanized_sentences);

    let original_set: HashSet<&str> = original_words.iter().map(String::as_str).collect();
    let humanized_set: HashSet<&str> = humanized_words.iter().map(String::as_str).collect();
    let union = original_set.union(&humanized_set).count();
    let jaccard_similarity = if union > 0 {
        original_set.intersection(&humanized_set).count() as f64 / union as f64
    } else {
        0.0
    };

    SimilarityMetrics {
        character_similarity: round3(character_similarity),
        word_similarity: round3(word_similarity),
        sentence_similarity: round3(sentence_similarity),
        jaccard_similarity: round3(jaccard_similarity),
        overall_similarity: round3(
            (character_similarity + word_similarity + sentence_similarity + jaccard_similarity)
                / 4.0,
        ),
    }
}

fn change_summary(
    word_changes: &WordChanges,
    sentence_changes: &SentenceChanges,
    structural_changes: &StructuralChanges,
) -> ChangeSummary {
    let total_word_changes = word_changes.added_count + word_changes.removed_count;
    let sentence_modifications = sentence_changes.sentence_count_change.unsigned_abs() as usize;
    let structural_modifications = structural_changes.punctuation_changes.len();

    let change_level = if total_word_changes < 5 && sentence_modifications < 2 && structural_modifications < 3
    {
        ChangeLevel::Minimal
    } else if total_word_changes < 15 && sentence_modifications < 5 && structural_modifications < 8
    {
        ChangeLevel::Moderate
    } else if total_word_changes < 30
        && sentence_modifications < 10
        && structural_modifications < 15
    {
        ChangeLevel::Substantial
    } else {
        ChangeLevel::Extensive
    };

    let mut change_types = Vec::new();
    if word_changes.added_count > 5 {
        change_types.push("vocabulary_expansion".to_string());
    }
    if word_changes.removed_count > 5 {
        change_types.push("vocabulary_simplification".to_string());
    }
    if sentence_changes.sentence_count_change > 2 {
        change_types.push("sentence_restructuring".to_string());
    }
    if sentence_changes.average_length_change.abs() > 2.0 {
        change_types.push("sentence_length_modification".to_string());
    }
    if structural_changes.transition_words.total_change > 3 {
        change_types.push("transition_enhancement".to_string());
    }
    if structural_modifications > 5 {
        change_types.push("punctuation_modification".to_string());
    }

    ChangeSummary {
        change_level,
        change_types,
        total_word_changes,
        sentence_modifications,
        structural_modifications,
        preservation_score: round2(
            100.0 - (total_word_changes + sentence_modifications + structural_modifications) as f64,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "The quick brown fox jumps over the lazy dog. However, the dog \
                          did not care. It slept all afternoon because the sun was warm.";

    #[test]
    fn test_identical_texts_show_no_change() {
        let report = compare(SAMPLE, SAMPLE);
        assert_eq!(report.basic_comparison.changes.word_change, 0);
        assert_eq!(report.word_changes.added_count, 0);
        assert_eq!(report.word_changes.removed_count, 0);
        assert!(report.word_changes.frequency_changes.is_empty());
        assert!(report.structural_changes.punctuation_changes.is_empty());
        assert_eq!(report.similarity_metrics.character_similarity, 1.0);
        assert_eq!(report.similarity_metrics.word_similarity, 1.0);
        assert_eq!(report.similarity_metrics.sentence_similarity, 1.0);
        assert_eq!(report.similarity_metrics.jaccard_similarity, 1.0);
        assert_eq!(report.similarity_metrics.overall_similarity, 1.0);
        assert_eq!(report.change_summary.change_level, ChangeLevel::Minimal);
        assert_eq!(report.change_summary.preservation_score, 100.0);
    }

    #[test]
    fn test_stats_sentence_count_is_split_pieces_minus_one() {
        // Two terminator runs produce three pieces.
        assert_eq!(text_stats("One. Two.").sentences, 2);
        // No terminator at all reports zero.
        assert_eq!(text_stats("no terminator here").sentences, 0);
    }

    #[test]
    fn test_word_additions_and_removals() {
        let report = compare("The cat sat on the mat.", "The cat rested on the rug.");
        assert!(report.word_changes.added_words.contains(&"rested".to_string()));
        assert!(report.word_changes.added_words.contains(&"rug".to_string()));
        assert!(report.word_changes.removed_words.contains(&"sat".to_string()));
        assert!(report.word_changes.removed_words.contains(&"mat".to_string()));
        assert_eq!(report.word_changes.added_count, 2);
        assert_eq!(report.word_changes.removed_count, 2);
    }

    #[test]
    fn test_frequency_changes_track_count_shifts() {
        let report = compare("the cat and the dog.", "the cat.");
        let the = &report.word_changes.frequency_changes["the"];
        assert_eq!(the.original_count, 2);
        assert_eq!(the.humanized_count, 1);
        assert_eq!(the.change, -1);
    }

    #[test]
    fn test_sentence_structure_classification() {
        let sentences = vec![
            "The cat sat".to_string(),
            "The cat sat and the dog ran".to_string(),
            "The cat sat because it was tired".to_string(),
            "The cat sat and purred because it was warm".to_string(),
        ];
        let counts = sentence_structures(&sentences);
        assert_eq!(counts.simple, 1);
        assert_eq!(counts.compound, 1);
        assert_eq!(counts.complex, 1);
        assert_eq!(counts.compound_complex, 1);
    }

    #[test]
    fn test_sentence_matches_respect_cutoff() {
        let report = compare(
            "The quick brown fox jumps over the lazy dog.",
            "The quick brown fox leaps over the lazy dog.",
        );
        assert_eq!(report.sentence_changes.sentence_matches.len(), 1);
        let m = &report.sentence_changes.sentence_matches[0];
        assert_eq!(m.original_index, 0);
        assert!(m.similarity > 0.8);
    }

    #[test]
    fn test_punctuation_changes_record_deltas() {
        let report = compare("Plain words here.", "Plain, words; here.");
        assert_eq!(report.structural_changes.punctuation_changes[","].change, 1);
        assert_eq!(report.structural_changes.punctuation_changes[";"].change, 1);
        assert!(!report.structural_changes.punctuation_changes.contains_key("."));
    }

    #[test]
    fn test_transition_word_totals() {
        let report = compare(
            "The plan worked. The team moved on.",
            "The plan worked. However, the team moved on. Ultimately, it paid off.",
        );
        assert_eq!(report.structural_changes.transition_words.total_change, 2);
        assert_eq!(report.structural_changes.transition_words.humanized["however"], 1);
        assert_eq!(report.structural_changes.transition_words.original["however"], 0);
    }

    #[test]
    fn test_preservation_score_can_go_negative() {
        let original: String = (0..40).map(|i| format!("alpha{i}. ")).collect();
        let humanized: String = (0..70).map(|i| format!("beta{i} ")).collect();
        let report = compare(&original, &humanized);
        assert_eq!(report.change_summary.change_level, ChangeLevel::Extensive);
        assert!(report.change_summary.preservation_score < 0.0);
    }
}
