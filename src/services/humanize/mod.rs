// Humanization Pipeline
// Runs the optional remote collaborators first, then the local rewriting
// passes, the mode-gated advanced stage and a final cleanup. Collaborator
// failures are recorded per service and never abort the run.

pub mod advanced;
pub mod lexicon;
pub mod passes;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::{debug, info};

use crate::models::{
    AchievedProfile, Mode, PassEffect, ServiceOutcome, ServiceResults, TargetProfile,
    TransformResult,
};
use crate::services::remote::RemoteServices;

pub struct HumanizePipeline {
    services: RemoteServices,
}

impl HumanizePipeline {
    pub fn new(services: RemoteServices) -> Self {
        Self { services }
    }

    /// Local-only pipeline, no collaborators.
    pub fn local() -> Self {
        Self::new(RemoteServices::disabled())
    }

    pub async fn humanize(&self, text: &str, mode: Mode) -> TransformResult {
        let mut rng = StdRng::from_entropy();
        self.humanize_with_rng(text, mode, &mut rng).await
    }

    /// Full pipeline with a caller-supplied RNG, so a seeded run reproduces
    /// every probabilistic decision.
    pub async fn humanize_with_rng(
        &self,
        text: &str,
        mode: Mode,
        rng: &mut (impl Rng + Send),
    ) -> TransformResult {
        let intensity = mode.intensity();
        let target_profile = mode.target_profile();

        let (mut humanized, mut service_results) = self.augment_with_remotes(text, mode).await;

        let mut pass_effects = Vec::new();
        let run =
            |name: &str, result: (String, usize), effects: &mut Vec<PassEffect>| -> String {
                debug!(pass = name, edits = result.1, "pass complete");
                effects.push(PassEffect { pass: name.to_string(), edits: result.1 });
                result.0
            };

        humanized = run(
            "contractions",
            passes::apply_contractions(&humanized, intensity, rng),
            &mut pass_effects,
        );
        humanized = run(
            "vocabulary",
            passes::replace_vocabulary(&humanized, intensity, rng),
            &mut pass_effects,
        );
        humanized = run(
            "sentence_flow",
            passes::improve_sentence_flow(&humanized, intensity, rng),
            &mut pass_effects,
        );
        humanized = run(
            "structure_variation",
            passes::vary_sentence_structure(&humanized, intensity, rng),
            &mut pass_effects,
        );
        humanized = run(
            "human_expressions",
            passes::add_human_expressions(&humanized, intensity, rng),
            &mut pass_effects,
        );
        humanized = run(
            "formality",
            passes::adjust_formality(&humanized, intensity, rng),
            &mut pass_effects,
        );

        let advanced = advanced::apply(&humanized, intensity, mode, rng);
        service_results.advanced_humanization = ServiceOutcome::applied(Some(json!({
            "techniques": advanced.techniques,
            "originalLength": advanced.original_length,
            "humanizedLength": advanced.humanized_length,
        })));
        humanized = advanced.text;

        humanized = run(
            "personal_touches",
            passes::add_personal_touches(&humanized, intensity, rng),
            &mut pass_effects,
        );

        let humanized = passes::normalize(&humanized);
        let achieved_profile = simulate_achieved(target_profile, rng);

        info!(
            mode = %mode,
            original_chars = text.chars().count(),
            humanized_chars = humanized.chars().count(),
            "humanization complete"
        );

        TransformResult {
            original_length: text.chars().count(),
            humanized_length: humanized.chars().count(),
            original_text: text.to_string(),
            humanized_text: humanized,
            mode,
            target_profile,
            achieved_profile,
            pass_effects,
            service_results,
        }
    }

    /// Run the configured collaborators in order. The grammar checker runs
    /// in every mode; style and rewrite join at balanced; bypass runs last
    /// and only for aggressive. Only aggressive adopts style, rewrite and
    /// bypass output wholesale.
    async fn augment_with_remotes(&self, text: &str, mode: Mode) -> (String, ServiceResults) {
        let mut enhanced = text.to_string();
        let mut results = ServiceResults::default();
        let escalated = matches!(mode, Mode::Balanced | Mode::Aggressive);

        if let Some(grammar) = &self.services.grammar {
            match grammar.enhance(&enhanced).await {
                Ok(outcome) => {
                    enhanced = outcome.enhanced_text;
                    results.grammar = ServiceOutcome::applied(Some(json!({
                        "statistics": outcome.statistics,
                    })));
                }
                Err(e) => results.grammar = ServiceOutcome::failed(e.to_string()),
            }
        }

        if escalated {
            if let Some(style) = &self.services.style {
                match style.analyze(&enhanced, mode == Mode::Aggressive).await {
                    Ok(outcome) => {
                        if mode == Mode::Aggressive {
                            enhanced = outcome.enhanced_text;
                        }
                        results.style = ServiceOutcome::applied(Some(json!({
                            "scores": outcome.scores,
                        })));
                    }
                    Err(e) => results.style = ServiceOutcome::failed(e.to_string()),
                }
            }

            if let Some(rewrite) = &self.services.rewrite {
                match rewrite.rewrite(&enhanced).await {
                    Ok(outcome) => {
                        if mode == Mode::Aggressive {
                            enhanced = outcome.humanized_text;
                        }
                        results.rewrite = ServiceOutcome::applied(Some(json!({
                            "originalLength": outcome.original_length,
                            "humanizedLength": outcome.humanized_length,
                        })));
                    }
                    Err(e) => results.rewrite = ServiceOutcome::failed(e.to_string()),
                }
            }
        }

        if mode == Mode::Aggressive {
            if let Some(bypass) = &self.services.bypass {
                match bypass.humanize(&enhanced, mode).await {
                    Ok(outcome) => {
                        enhanced = outcome.humanized_text;
                        results.bypass = ServiceOutcome::applied(Some(json!({
                            "detectionResult": outcome.detection_result,
                            "detectionScore": outcome.detection_score,
                            "mode": outcome.mode,
                        })));
                    }
                    Err(e) => results.bypass = ServiceOutcome::failed(e.to_string()),
                }
            }
        }

        (enhanced, results)
    }
}

/// No real detector is queried. The achieved profile is the target plus a
/// uniform ±3 point perturbation, clamped and renormalized to sum 100.
fn simulate_achieved(target: TargetProfile, rng: &mut impl Rng) -> AchievedProfile {
    let variation = rng.gen_range(-3.0..3.0);
    let mut ai = (target.ai_generated + variation).clamp(0.0, 100.0);
    let mut human = (target.human_written - variation).clamp(0.0, 100.0);

    let total = ai + human;
    if total > 0.0 {
        ai = ai / total * 100.0;
        human = human / total * 100.0;
    }

    AchievedProfile {
        ai_generated: crate::services::round1(ai),
        human_written: crate::services::round1(human),
    }
}
