// Text Analytics Service
// Readability, complexity, sentiment, AI-indicator, burstiness and
// perplexity metrics over a single document.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

use super::tokenizer::{self, COMPLEX_PUNCT_RE};
use super::{round2, round3};
use crate::models::{
    AiIndicators, AnalysisReport, BasicStats, Burstiness, Complexity, ComponentScores,
    OverallScore, Perplexity, Readability, Section, Sentiment,
};

static COMMON_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "be", "to", "of", "and", "a", "in", "that", "have", "i", "it", "for", "not", "on",
        "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
        "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
        "what", "so", "up", "out", "if", "about", "who", "get", "which", "go",
    ]
    .into_iter()
    .collect()
});

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "good", "great", "excellent", "amazing", "wonderful", "fantastic", "outstanding",
        "superb", "brilliant", "perfect", "awesome", "incredible", "remarkable", "exceptional",
        "magnificent", "marvelous", "splendid", "terrific", "fabulous", "phenomenal",
        "impressive", "effective", "successful", "beneficial", "valuable", "useful", "helpful",
        "positive",
    ]
    .into_iter()
    .collect()
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "bad", "terrible", "awful", "horrible", "dreadful", "poor", "worst", "disappointing",
        "inadequate", "insufficient", "problematic", "difficult", "challenging", "complex",
        "complicated", "confusing", "unclear", "negative", "harmful", "dangerous", "risky",
        "ineffective", "useless",
    ]
    .into_iter()
    .collect()
});

/// Academic register words treated as an AI-authorship signal.
static FORMAL_INDICATORS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "utilize", "implement", "facilitate", "demonstrate", "comprehensive", "significant",
        "substantial", "considerable", "numerous", "various", "furthermore", "moreover",
        "additionally", "consequently", "therefore", "subsequently", "nevertheless", "however",
        "nonetheless", "accordingly",
    ]
    .into_iter()
    .collect()
});

static TRANSITION_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "however", "furthermore", "moreover", "additionally", "consequently", "therefore",
        "subsequently", "nevertheless", "nonetheless", "accordingly",
    ]
    .into_iter()
    .collect()
});

/// Sample mean; 0 for an empty slice.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance (n−1 denominator); 0 with fewer than two values.
fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Full analysis over one document. Input validation (empty text) happens at
/// the api boundary; this function assumes it has something to chew on.
pub fn analyze(text: &str) -> AnalysisReport {
    let basic_stats = basic_stats(text);
    let readability = readability(text);
    let complexity = complexity(text);
    let sentiment = sentiment(text);
    let ai_indicators = ai_indicators(text);
    let burstiness = burstiness(text);
    let perplexity = perplexity(text);
    let overall_score = overall_score(&readability, &complexity, &ai_indicators, &burstiness);

    AnalysisReport {
        basic_stats,
        readability,
        complexity,
        sentiment,
        ai_indicators,
        burstiness,
        perplexity,
        overall_score,
    }
}

fn basic_stats(text: &str) -> BasicStats {
    let sentences = tokenizer::sentences(text);
    let words = tokenizer::words(text);

    let char_count = text.chars().count();
    let char_count_no_spaces = text.chars().filter(|c| *c != ' ').count();

    let word_count = words.len();
    let unique_words: HashSet<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let sentence_count = sentences.len();

    let avg_words_per_sentence = if sentence_count > 0 {
        word_count as f64 / sentence_count as f64
    } else {
        0.0
    };
    let avg_chars_per_word = if word_count > 0 {
        char_count_no_spaces as f64 / word_count as f64
    } else {
        0.0
    };
    let vocabulary_diversity = if word_count > 0 {
        unique_words.len() as f64 / word_count as f64
    } else {
        0.0
    };

    BasicStats {
        character_count: char_count,
        character_count_no_spaces: char_count_no_spaces,
        word_count,
        unique_word_count: unique_words.len(),
        sentence_count,
        paragraph_count: tokenizer::paragraph_count(text),
        avg_words_per_sentence: round2(avg_words_per_sentence),
        avg_characters_per_word: round2(avg_chars_per_word),
        vocabulary_diversity: round3(vocabulary_diversity),
    }
}

pub(crate) fn readability(text: &str) -> Section<Readability> {
    let sentences = tokenizer::sentences(text);
    let words = tokenizer::words(text);
    let sentence_count = sentences.len();
    let word_count = words.len();

    if sentence_count == 0 || word_count == 0 {
        return Section::insufficient("Insufficient text for readability analysis");
    }

    let syllables: usize = words.iter().map(|w| tokenizer::count_syllables(w)).sum();
    let wc = word_count as f64;
    let sc = sentence_count as f64;
    let syl = syllables as f64;

    let flesch_ease =
        (206.835 - 1.015 * (wc / sc) - 84.6 * (syl / wc)).clamp(0.0, 100.0);
    let flesch_kincaid = (0.39 * (wc / sc) + 11.8 * (syl / wc) - 15.59).max(0.0);

    let characters: usize = words.iter().map(|w| w.chars().count()).sum();
    let ch = characters as f64;
    let ari = (4.71 * (ch / wc) + 0.5 * (wc / sc) - 21.43).max(0.0);

    let l = (ch / wc) * 100.0;
    let s = (sc / wc) * 100.0;
    let coleman_liau = (0.0588 * l - 0.296 * s - 15.8).max(0.0);

    let avg_grade = (flesch_kincaid + ari + coleman_liau) / 3.0;

    Section::Computed(Readability {
        flesch_reading_ease: round2(flesch_ease),
        flesch_kincaid_grade: round2(flesch_kincaid),
        automated_readability_index: round2(ari),
        coleman_liau_index: round2(coleman_liau),
        average_grade_level: round2(avg_grade),
        readability_level: readability_level(flesch_ease).to_string(),
    })
}

fn complexity(text: &str) -> Complexity {
    let words = tokenizer::words(text);
    let sentences = tokenizer::sentences(text);

    let complex_words = words.iter().filter(|w| w.chars().count() > 6).count();
    let complex_ratio = if words.is_empty() {
        0.0
    } else {
        complex_words as f64 / words.len() as f64
    };

    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| tokenizer::words(s).len() as f64)
        .collect();
    let avg_sentence_length = mean(&sentence_lengths);
    let sentence_length_variance = variance(&sentence_lengths);

    let formal_count = words
        .iter()
        .filter(|w| FORMAL_INDICATORS.contains(w.to_lowercase().as_str()))
        .count();
    let formal_ratio = if words.is_empty() {
        0.0
    } else {
        formal_count as f64 / words.len() as f64
    };

    let punctuation_marks = COMPLEX_PUNCT_RE.find_iter(text).count();
    let punctuation_density = if words.is_empty() {
        0.0
    } else {
        punctuation_marks as f64 / words.len() as f64
    };

    Complexity {
        complex_word_ratio: round3(complex_ratio),
        average_sentence_length: round2(avg_sentence_length),
        sentence_length_variance: round2(sentence_length_variance),
        formal_word_ratio: round3(formal_ratio),
        punctuation_density: round3(punctuation_density),
        complexity_score: round2((complex_ratio + formal_ratio + punctuation_density) * 100.0),
    }
}

fn sentiment(text: &str) -> Sentiment {
    let words = tokenizer::words_lower(text);

    let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(w.as_str())).count();
    let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(w.as_str())).count();
    let total_sentiment = positive + negative;

    let (score, label) = if total_sentiment == 0 {
        (0.0, "neutral")
    } else {
        let score = (positive as f64 - negative as f64) / total_sentiment as f64;
        let label = if score > 0.1 {
            "positive"
        } else if score < -0.1 {
            "negative"
        } else {
            "neutral"
        };
        (score, label)
    };

    let ratio = if words.is_empty() {
        0.0
    } else {
        total_sentiment as f64 / words.len() as f64
    };

    Sentiment {
        positive_word_count: positive,
        negative_word_count: negative,
        sentiment_score: round3(score),
        sentiment_label: label.to_string(),
        sentiment_ratio: round3(ratio),
    }
}

fn ai_indicators(text: &str) -> AiIndicators {
    let words = tokenizer::words_lower(text);
    let sentences = tokenizer::sentences(text);

    let formal_count = words.iter().filter(|w| FORMAL_INDICATORS.contains(w.as_str())).count();
    let formal_ratio = if words.is_empty() {
        0.0
    } else {
        formal_count as f64 / words.len() as f64
    };

    // Repetition of non-common content words.
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in &words {
        if !COMMON_WORDS.contains(word.as_str()) && word.chars().count() > 3 {
            *frequency.entry(word.as_str()).or_insert(0) += 1;
        }
    }
    let repeated = frequency.values().filter(|&&c| c > 2).count();
    let repetition_score = if frequency.is_empty() {
        0.0
    } else {
        repeated as f64 / frequency.len() as f64
    };

    // 1 when sentence lengths have no variance, i.e. suspiciously uniform.
    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| tokenizer::words(s).len() as f64)
        .collect();
    let length_variance = variance(&sentence_lengths);
    let uniformity_score = if length_variance > 0.0 {
        1.0 / (1.0 + length_variance)
    } else {
        1.0
    };

    let transition_count = words.iter().filter(|w| TRANSITION_WORDS.contains(w.as_str())).count();
    let transition_ratio = if sentences.is_empty() {
        0.0
    } else {
        transition_count as f64 / sentences.len() as f64
    };

    let ai_score = (formal_ratio * 0.3
        + repetition_score * 0.2
        + uniformity_score * 0.3
        + transition_ratio.min(1.0) * 0.2)
        * 100.0;

    AiIndicators {
        formal_language_ratio: round3(formal_ratio),
        repetition_score: round3(repetition_score),
        sentence_uniformity: round3(uniformity_score),
        transition_word_ratio: round3(transition_ratio),
        ai_likelihood_score: round2(ai_score),
        ai_likelihood_level: five_level(ai_score).to_string(),
    }
}

fn burstiness(text: &str) -> Section<Burstiness> {
    let sentences = tokenizer::sentences(text);
    let sentence_lengths: Vec<f64> = sentences
        .iter()
        .map(|s| tokenizer::words(s).len() as f64)
        .collect();

    if sentence_lengths.len() < 2 {
        return Section::insufficient("Insufficient sentences for burstiness analysis");
    }

    let mean_length = mean(&sentence_lengths);
    let length_variance = variance(&sentence_lengths);
    let length_std = length_variance.sqrt();
    let coefficient_of_variation = if mean_length > 0.0 {
        length_std / mean_length
    } else {
        0.0
    };

    // Per-sentence complexity proxy: long words plus punctuation marks,
    // normalized by sentence word count.
    let complexity_scores: Vec<f64> = sentences
        .iter()
        .map(|s| {
            let words = tokenizer::words(s);
            if words.is_empty() {
                return 0.0;
            }
            let complex = words.iter().filter(|w| w.chars().count() > 6).count();
            let punct = COMPLEX_PUNCT_RE.find_iter(s).count();
            (complex + punct) as f64 / words.len() as f64
        })
        .collect();
    let complexity_variance = variance(&complexity_scores);

    let burstiness_score = ((coefficient_of_variation + complexity_variance) * 50.0).min(100.0);

    Section::Computed(Burstiness {
        sentence_count: sentences.len(),
        mean_sentence_length: round2(mean_length),
        length_variance: round2(length_variance),
        length_standard_deviation: round2(length_std),
        coefficient_of_variation: round3(coefficient_of_variation),
        complexity_variance: round3(complexity_variance),
        burstiness_score: round2(burstiness_score),
        burstiness_level: five_level(burstiness_score).to_string(),
    })
}

fn perplexity(text: &str) -> Section<Perplexity> {
    let words = tokenizer::words_lower(text);

    if words.len() < 2 {
        return Section::insufficient("Insufficient text for perplexity estimation");
    }

    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in &words {
        *frequency.entry(word.as_str()).or_insert(0) += 1;
    }

    // Shannon entropy over the per-token empirical distribution.
    let total = words.len() as f64;
    let entropy: f64 = -words
        .iter()
        .map(|w| frequency[w.as_str()] as f64 / total)
        .filter(|p| *p > 0.0)
        .map(|p| p * p.log2())
        .sum::<f64>();

    let perplexity = 2f64.powf(entropy);
    let unique = frequency.len() as f64;

    Section::Computed(Perplexity {
        estimated_perplexity: round2(perplexity),
        entropy: round3(entropy),
        vocabulary_richness: round3(unique / total),
        unique_word_ratio: round3(unique / total),
        perplexity_level: perplexity_level(perplexity).to_string(),
    })
}

/// Weighted blend of the sub-scores. A section that reported insufficient
/// data contributes a neutral 50 instead of failing the whole report.
fn overall_score(
    readability: &Section<Readability>,
    complexity: &Complexity,
    ai_indicators: &AiIndicators,
    burstiness: &Section<Burstiness>,
) -> OverallScore {
    let readability_score = readability
        .computed()
        .map(|r| r.flesch_reading_ease)
        .unwrap_or(50.0)
        .clamp(0.0, 100.0);
    let complexity_score = complexity.complexity_score.min(100.0);
    let anti_ai = 100.0 - ai_indicators.ai_likelihood_score;
    let burstiness_score = burstiness
        .computed()
        .map(|b| b.burstiness_score)
        .unwrap_or(50.0);

    let overall = readability_score * 0.25
        + complexity_score * 0.25
        + anti_ai * 0.3
        + burstiness_score * 0.2;

    OverallScore {
        overall_humanness_score: round2(overall),
        humanness_level: humanness_level(overall).to_string(),
        component_scores: ComponentScores {
            readability: round2(readability_score),
            complexity: round2(complexity_score),
            anti_ai: round2(anti_ai),
            burstiness: round2(burstiness_score),
        },
    }
}

fn readability_level(flesch: f64) -> &'static str {
    if flesch >= 90.0 {
        "very_easy"
    } else if flesch >= 80.0 {
        "easy"
    } else if flesch >= 70.0 {
        "fairly_easy"
    } else if flesch >= 60.0 {
        "standard"
    } else if flesch >= 50.0 {
        "fairly_difficult"
    } else if flesch >= 30.0 {
        "difficult"
    } else {
        "very_difficult"
    }
}

/// Shared bucketing for the 0-100 likelihood/burstiness scales.
fn five_level(score: f64) -> &'static str {
    if score >= 80.0 {
        "very_high"
    } else if score >= 60.0 {
        "high"
    } else if score >= 40.0 {
        "moderate"
    } else if score >= 20.0 {
        "low"
    } else {
        "very_low"
    }
}

fn perplexity_level(perplexity: f64) -> &'static str {
    if perplexity >= 100.0 {
        "very_high"
    } else if perplexity >= 50.0 {
        "high"
    } else if perplexity >= 20.0 {
        "moderate"
    } else if perplexity >= 10.0 {
        "low"
    } else {
        "very_low"
    }
}

fn humanness_level(score: f64) -> &'static str {
    if score >= 85.0 {
        "very_human"
    } else if score >= 70.0 {
        "mostly_human"
    } else if score >= 55.0 {
        "somewhat_human"
    } else if score >= 40.0 {
        "mixed"
    } else if score >= 25.0 {
        "somewhat_ai"
    } else {
        "likely_ai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_small_document() {
        let report = analyze("The cat sat. It was happy.");
        assert_eq!(report.basic_stats.word_count, 6);
        assert_eq!(report.basic_stats.sentence_count, 2);
        assert!(report.readability.is_computed());
        assert!(report.burstiness.is_computed());
        assert!(report.perplexity.is_computed());
    }

    #[test]
    fn test_flesch_ease_stays_in_range() {
        for text in [
            "Go. Run. Hide.",
            "The multidimensional organizational infrastructure demonstrates considerable \
             sophistication, notwithstanding institutional considerations.",
            "The cat sat. It was happy. Dogs bark loudly at night sometimes.",
        ] {
            let r = analyze(text);
            let flesch = r.readability.computed().unwrap().flesch_reading_ease;
            assert!((0.0..=100.0).contains(&flesch), "{flesch} out of range for {text:?}");
            assert!(r.readability.computed().unwrap().flesch_kincaid_grade >= 0.0);
            assert!(r.readability.computed().unwrap().automated_readability_index >= 0.0);
            assert!(r.readability.computed().unwrap().coleman_liau_index >= 0.0);
        }
    }

    #[test]
    fn test_single_sentence_burstiness_is_insufficient() {
        let report = analyze("Just one sentence here.");
        assert!(!report.burstiness.is_computed());
        // Overall still computes, using the neutral default for burstiness.
        assert_eq!(report.overall_score.component_scores.burstiness, 50.0);
    }

    #[test]
    fn test_single_word_perplexity_is_insufficient() {
        let report = analyze("Hello.");
        assert!(!report.perplexity.is_computed());
    }

    #[test]
    fn test_sentiment_labels() {
        let pos = analyze("This is a great and wonderful excellent thing.");
        assert_eq!(pos.sentiment.sentiment_label, "positive");

        let neg = analyze("This is a terrible awful horrible thing.");
        assert_eq!(neg.sentiment.sentiment_label, "negative");

        let neutral = analyze("The table has four legs.");
        assert_eq!(neutral.sentiment.sentiment_label, "neutral");
        assert_eq!(neutral.sentiment.sentiment_score, 0.0);
    }

    #[test]
    fn test_uniform_sentences_score_as_uniform() {
        // Identical sentence lengths leave zero variance.
        let report = analyze("The cat sat here. The dog ran there. The cow ate grass.");
        assert_eq!(report.ai_indicators.sentence_uniformity, 1.0);
    }

    #[test]
    fn test_formal_text_raises_ai_likelihood() {
        let formal = analyze(
            "Furthermore, we utilize comprehensive methods. Moreover, we implement \
             significant systems. Consequently, we facilitate numerous processes.",
        );
        let casual = analyze(
            "I grabbed a coffee and wandered out, no plan at all. The rain came down hard, \
             soaking my one good jacket before I found shelter.",
        );
        assert!(
            formal.ai_indicators.ai_likelihood_score > casual.ai_indicators.ai_likelihood_score
        );
    }

    #[test]
    fn test_perplexity_matches_entropy() {
        let report = analyze("alpha beta gamma delta");
        let p = report.perplexity.computed().unwrap();
        // Four distinct words: entropy = 2 bits, perplexity = 4.
        assert_eq!(p.entropy, 2.0);
        assert_eq!(p.estimated_perplexity, 4.0);
        assert_eq!(p.vocabulary_richness, 1.0);
    }

    #[test]
    fn test_sample_variance() {
        assert_eq!(variance(&[4.0, 4.0, 4.0]), 0.0);
        // statistics.variance([2, 4]) == 2.0 (n-1 denominator)
        assert_eq!(variance(&[2.0, 4.0]), 2.0);
        assert_eq!(variance(&[1.0]), 0.0);
    }
}
