// Advanced Humanization
// Mode-gated linguistic techniques layered on after the core passes: the
// fast tier adds discourse markers and hedges, balanced adds complexity
// variation and subjectivity, aggressive adds rhetorical devices and
// restructuring on top.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use std::collections::HashMap;

use super::lexicon;
use super::passes::py_capitalize;
use crate::models::Mode;
use crate::services::tokenizer::SENTENCE_SPLIT_RE;

static WORD_BOUNDARY_CACHE: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    lexicon::METAPHORS
        .iter()
        .map(|(literal, _)| (*literal, Regex::new(&format!(r"(?i)\b{literal}\b")).unwrap()))
        .collect()
});

/// Outcome of the advanced stage, recorded in the service results.
#[derive(Debug, Clone)]
pub struct AdvancedOutcome {
    pub text: String,
    pub techniques: Vec<&'static str>,
    pub original_length: usize,
    pub humanized_length: usize,
}

pub fn apply(text: &str, intensity: f64, mode: Mode, rng: &mut impl Rng) -> AdvancedOutcome {
    let original_length = text.chars().count();
    let (humanized, techniques) = match mode {
        Mode::Fast => (light(text, intensity, rng), vec!["discourse_markers", "hedging"]),
        Mode::Balanced => (
            moderate(text, intensity, rng),
            vec!["discourse_markers", "hedging", "complexity_variation", "subjective_markers"],
        ),
        Mode::Aggressive => (intensive(text, intensity, rng), vec!["all_techniques"]),
    };
    AdvancedOutcome {
        humanized_length: humanized.chars().count(),
        text: humanized,
        techniques,
        original_length,
    }
}

fn light(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let text = add_discourse_markers(text, intensity * 0.3, rng);
    let text = add_hedging(&text, intensity * 0.2, rng);
    apply_colloquial(&text, intensity * 0.2, rng)
}

fn moderate(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let text = light(text, intensity, rng);
    let text = vary_complexity(&text, intensity * 0.4, rng);
    let text = add_subjective_markers(&text, intensity * 0.3, rng);
    add_intensifiers(&text, intensity * 0.3, rng)
}

fn intensive(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let text = moderate(text, intensity, rng);
    let text = add_rhetorical_devices(&text, intensity * 0.5, rng);
    let text = restructure_sentences(&text, intensity * 0.6, rng);
    add_emotional_language(&text, intensity * 0.4, rng)
}

fn choose<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn add_discourse_markers(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for (i, raw) in SENTENCE_SPLIT_RE.split(text).enumerate() {
        let mut sentence = raw.trim().to_string();
        if sentence.is_empty() {
            continue;
        }
        if rng.gen::<f64>() < intensity && i > 0 {
            let lower = sentence.to_lowercase();
            let marker = if lower.contains("result") || lower.contains("effect") {
                *choose(rng, markers_for("cause_effect"))
            } else if lower.contains("example") || lower.contains("instance") {
                *choose(rng, markers_for("example"))
            } else if lower.contains("but") || lower.contains("however") {
                *choose(rng, markers_for("contrast"))
            } else {
                let (_, category) = *choose(rng, lexicon::DISCOURSE_MARKERS);
                *choose(rng, category)
            };
            sentence = format!("{}, {lower}", py_capitalize(marker));
        }
        out.push(sentence);
    }
    format!("{}.", out.join(". "))
}

fn markers_for(category: &str) -> &'static [&'static str] {
    lexicon::DISCOURSE_MARKERS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, markers)| *markers)
        .unwrap_or(&[])
}

/// Soften definitive statements. The definitiveness check is a substring
/// match, so it triggers generously.
fn add_hedging(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for piece in text.split(". ") {
        let mut sentence = piece.to_string();
        if rng.gen::<f64>() < intensity {
            let lower = sentence.to_lowercase();
            let definitive =
                ["is", "are", "will", "must", "always", "never"].iter().any(|w| lower.contains(w));
            if definitive {
                let hedge = *choose(rng, lexicon::HEDGING_EXPRESSIONS);
                let demonstrative = ["this", "that", "these", "those", "the"]
                    .iter()
                    .any(|p| lower.starts_with(p));
                if demonstrative {
                    sentence = format!("{}, {lower}", py_capitalize(hedge));
                } else {
                    let mut words: Vec<String> =
                        sentence.split_whitespace().map(str::to_string).collect();
                    if words.len() > 3 {
                        let pos = rng.gen_range(1..=3.min(words.len() - 1));
                        words.insert(pos, hedge.to_string());
                        sentence = words.join(" ");
                    }
                }
            }
        }
        out.push(sentence);
    }
    out.join(". ")
}

fn apply_colloquial(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut text = text.to_string();
    for (formal, replacements) in lexicon::COLLOQUIAL_REPLACEMENTS {
        if text.to_lowercase().contains(formal) && rng.gen::<f64>() < intensity {
            let replacement = *choose(rng, replacements);
            let re = Regex::new(&format!("(?i){}", regex::escape(formal))).unwrap();
            text = re.replace_all(&text, replacement).into_owned();
        }
    }
    text
}

/// Complicate short sentences and break apart long ones so lengths spread.
fn vary_complexity(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for raw in SENTENCE_SPLIT_RE.split(text) {
        let mut sentence = raw.trim().to_string();
        if sentence.is_empty() {
            continue;
        }
        let word_count = sentence.split_whitespace().count();
        if rng.gen::<f64>() < intensity {
            if word_count < 8 {
                sentence = if rng.gen::<f64>() < 0.5 {
                    add_relative_clause(&sentence, rng)
                } else {
                    add_participial_phrase(&sentence, rng)
                };
            } else if word_count > 20 {
                sentence = split_compound(&sentence);
            }
        }
        out.push(sentence);
    }
    format!("{}.", out.join(". "))
}

fn add_relative_clause(sentence: &str, rng: &mut impl Rng) -> String {
    let mut words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
    if words.len() > 4 {
        for i in 0..words.len() {
            if matches!(
                words[i].to_lowercase().as_str(),
                "system" | "method" | "process" | "technology" | "approach"
            ) {
                let clause = *choose(rng, lexicon::RELATIVE_CLAUSES);
                words.insert(i + 1, format!(", {clause},"));
                break;
            }
        }
    }
    words.join(" ")
}

fn add_participial_phrase(sentence: &str, rng: &mut impl Rng) -> String {
    if rng.gen::<f64>() < 0.5 {
        let phrase = *choose(rng, lexicon::PARTICIPIAL_PHRASES);
        return format!("{phrase}, {}", sentence.to_lowercase());
    }
    sentence.to_string()
}

fn split_compound(sentence: &str) -> String {
    for conj in ["and", "but", "or", "so", "yet"] {
        let needle = format!(" {conj} ");
        if let Some(pos) = sentence.find(&needle) {
            let first = sentence[..pos].trim();
            let second = sentence[pos + needle.len()..].trim();
            return format!("{first}. {}", py_capitalize(second));
        }
    }
    sentence.to_string()
}

fn add_subjective_markers(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for (i, piece) in text.split(". ").enumerate() {
        let mut sentence = piece.to_string();
        if rng.gen::<f64>() < intensity && i > 0 {
            let marker = *choose(rng, lexicon::SUBJECTIVE_MARKERS);
            sentence = format!("{marker}, {}", sentence.to_lowercase());
        }
        out.push(sentence);
    }
    out.join(". ")
}

fn add_intensifiers(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let gradable = matches!(
            word.to_lowercase().as_str(),
            "good" | "bad" | "big" | "small" | "fast" | "slow" | "important" | "significant"
        );
        if gradable && rng.gen::<f64>() < intensity {
            let modifier = if rng.gen::<f64>() < 0.5 {
                *choose(rng, lexicon::INTENSIFIERS)
            } else {
                *choose(rng, lexicon::DOWNTONERS)
            };
            out.push(modifier.to_string());
        }
        out.push(word.to_string());
    }
    out.join(" ")
}

fn add_rhetorical_devices(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut text = text.to_string();
    if rng.gen::<f64>() < intensity * 0.3 {
        text = add_metaphors(&text, rng);
    }
    if rng.gen::<f64>() < intensity * 0.2 {
        text = add_emphasis_repetition(&text);
    }
    text
}

fn add_metaphors(text: &str, rng: &mut impl Rng) -> String {
    let mut text = text.to_string();
    for (literal, metaphor) in lexicon::METAPHORS {
        if text.to_lowercase().contains(literal) && rng.gen::<f64>() < 0.3 {
            text = WORD_BOUNDARY_CACHE[literal].replace_all(&text, *metaphor).into_owned();
        }
    }
    text
}

fn add_emphasis_repetition(text: &str) -> String {
    if text.split(". ").count() > 2 {
        for term in lexicon::EMPHASIS_TERMS {
            if text.to_lowercase().contains(term) {
                return text.replace(term, &format!("{term}, truly {term}"));
            }
        }
    }
    text.to_string()
}

fn restructure_sentences(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for raw in SENTENCE_SPLIT_RE.split(text) {
        let mut sentence = raw.trim().to_string();
        if sentence.is_empty() {
            continue;
        }
        if rng.gen::<f64>() < intensity {
            if rng.gen::<f64>() < 0.3 {
                sentence = front_prepositional(&sentence);
            } else if rng.gen::<f64>() < 0.3 {
                sentence = cleft(&sentence);
            } else if rng.gen::<f64>() < 0.3 {
                sentence = invert(&sentence);
            }
        }
        out.push(sentence);
    }
    format!("{}.", out.join(". "))
}

fn front_prepositional(sentence: &str) -> String {
    let words: Vec<&str> = sentence.split_whitespace().collect();
    if words.len() > 6 {
        for i in 0..words.len() {
            let prep = matches!(
                words[i].to_lowercase().as_str(),
                "in" | "on" | "at" | "by" | "with" | "through"
            );
            if prep && i + 2 < words.len() {
                let fronted = words[i..i + 3].join(" ");
                let remaining = [&words[..i], &words[i + 3..]].concat().join(" ");
                return format!("{}, {}", py_capitalize(&fronted), remaining.to_lowercase());
            }
        }
    }
    sentence.to_string()
}

fn cleft(sentence: &str) -> String {
    if sentence.to_lowercase().starts_with("the") {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() > 4 {
            return format!(
                "What {} is {}",
                words[1..].join(" ").to_lowercase(),
                words[0].to_lowercase()
            );
        }
    }
    sentence.to_string()
}

fn invert(sentence: &str) -> String {
    let lower = sentence.to_lowercase();
    if lower.contains("never") || lower.contains("rarely") {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        for i in 0..words.len() {
            if matches!(words[i].to_lowercase().as_str(), "never" | "rarely" | "seldom")
                && i + 2 < words.len()
            {
                return format!(
                    "{} {} {} {}",
                    py_capitalize(words[i]),
                    words[i + 2],
                    words[i + 1],
                    words[i + 3..].join(" ")
                );
            }
        }
    }
    sentence.to_string()
}

fn add_emotional_language(text: &str, intensity: f64, rng: &mut impl Rng) -> String {
    let mut out: Vec<String> = Vec::new();
    for piece in text.split(". ") {
        let mut sentence = piece.to_string();
        if rng.gen::<f64>() < intensity * 0.3 {
            let mut words: Vec<String> = sentence.split_whitespace().map(str::to_string).collect();
            if words.len() > 3 {
                let adjective = *choose(rng, lexicon::EMOTIONAL_ADJECTIVES);
                let pos = rng.gen_range(1..=3.min(words.len() - 1));
                words.insert(pos, adjective.to_string());
                sentence = words.join(" ");
            }
        }
        out.push(sentence);
    }
    out.join(". ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_zero_intensity_preserves_sentence_content() {
        let text = "The system works well. The team never stops improving it.";
        for seed in 0..5 {
            let out = apply(text, 0.0, Mode::Aggressive, &mut rng(seed));
            // Sentence joins rewrite terminators but insert nothing.
            assert_eq!(out.text, text);
            assert_eq!(out.techniques, vec!["all_techniques"]);
        }
    }

    #[test]
    fn test_mode_reports_its_technique_set() {
        let out = apply("Some text here.", 0.5, Mode::Fast, &mut rng(7));
        assert_eq!(out.techniques, vec!["discourse_markers", "hedging"]);
        let out = apply("Some text here.", 0.5, Mode::Balanced, &mut rng(7));
        assert_eq!(out.techniques.len(), 4);
    }

    #[test]
    fn test_split_compound_breaks_on_first_conjunction() {
        assert_eq!(
            split_compound("the cat sat and the dog ran"),
            "the cat sat. The dog ran"
        );
        assert_eq!(split_compound("no conjunction here"), "no conjunction here");
    }

    #[test]
    fn test_cleft_requires_the_prefix() {
        assert_eq!(
            cleft("The approach delivers strong results"),
            "What approach delivers strong results is the"
        );
        assert_eq!(cleft("Our approach works"), "Our approach works");
    }

    #[test]
    fn test_invert_swaps_after_negative_adverb() {
        assert_eq!(
            invert("We never saw it coming at all"),
            "Never it saw coming at all"
        );
        assert_eq!(invert("Nothing to invert"), "Nothing to invert");
    }

    #[test]
    fn test_front_prepositional_moves_phrase() {
        let out = front_prepositional("The team met in the office every single day");
        assert!(out.starts_with("In the office, "), "{out}");
        assert!(out.contains("the team met every single day"), "{out}");
    }

    #[test]
    fn test_colloquial_replacement_fires_at_full_intensity() {
        for seed in 0..20 {
            let out = apply_colloquial("The results were very good overall.", 1.0, &mut rng(seed));
            assert!(!out.contains("very good"), "seed {seed}: {out}");
        }
    }

    #[test]
    fn test_emphasis_repetition_needs_three_sentences() {
        let short = "This is important. Very much so.";
        assert_eq!(add_emphasis_repetition(short), short);
        let long = "This is important. Very much so. Everyone agrees.";
        assert_eq!(
            add_emphasis_repetition(long),
            "This is important, truly important. Very much so. Everyone agrees."
        );
    }
}
