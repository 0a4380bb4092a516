// Remote Collaborators
// Clients for the four optional external services: a grammar checker, an
// async style analyzer, a rewrite service and a detector-bypass service.
// Every client is behind a trait so the pipeline can be exercised without
// the network.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::models::Mode;

const GRAMMAR_DEFAULT_URL: &str = "https://api.languagetool.org/v2/check";
const STYLE_DEFAULT_URL: &str = "https://api.prowritingaid.com";
const REWRITE_DEFAULT_URL: &str = "https://ai-text-humanizer.com/api.php";
const BYPASS_DEFAULT_URL: &str = "https://bypass.hix.ai/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_DELAY: Duration = Duration::from_secs(2);
const BYPASS_POLL_ATTEMPTS: u32 = 5;
const STYLE_POLL_ATTEMPTS: u32 = 10;

fn http_client() -> Client {
    Client::builder().timeout(REQUEST_TIMEOUT).build().unwrap_or_default()
}

// ============ Grammar (LanguageTool-shaped) ============

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStats {
    pub total_issues: usize,
    pub grammar_issues: usize,
    pub spelling_issues: usize,
    pub style_issues: usize,
    pub punctuation_issues: usize,
    pub other_issues: usize,
}

#[derive(Debug, Clone)]
pub struct GrammarOutcome {
    pub enhanced_text: String,
    pub statistics: IssueStats,
}

#[derive(Debug, Clone, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<GrammarMatch>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GrammarMatch {
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    length: usize,
    #[serde(default)]
    replacements: Vec<Replacement>,
    #[serde(default)]
    rule: Option<MatchRule>,
}

#[derive(Debug, Clone, Deserialize)]
struct Replacement {
    #[serde(default)]
    value: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MatchRule {
    #[serde(default)]
    category: Option<MatchCategory>,
}

#[derive(Debug, Clone, Deserialize)]
struct MatchCategory {
    #[serde(default)]
    id: String,
}

#[async_trait]
pub trait GrammarService: Send + Sync {
    async fn enhance(&self, text: &str) -> Result<GrammarOutcome, RemoteError>;
}

pub struct GrammarClient {
    client: Client,
    api_url: String,
}

impl GrammarClient {
    pub fn new(api_url: String) -> Self {
        Self { client: http_client(), api_url }
    }

    pub fn from_env() -> Self {
        Self::new(env::var("GRAMMAR_API_URL").unwrap_or_else(|_| GRAMMAR_DEFAULT_URL.to_string()))
    }
}

#[async_trait]
impl GrammarService for GrammarClient {
    async fn enhance(&self, text: &str) -> Result<GrammarOutcome, RemoteError> {
        let params = [
            ("text", text),
            ("language", "en-US"),
            ("level", "picky"),
            ("enabledOnly", "false"),
        ];
        let response = self.client.post(&self.api_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let check: CheckResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;

        debug!(matches = check.matches.len(), "grammar check complete");
        let statistics = issue_statistics(&check.matches);
        let enhanced_text = apply_grammar_corrections(text, &check.matches);
        Ok(GrammarOutcome { enhanced_text, statistics })
    }
}

const SKIP_CATEGORIES: &[&str] = &["STYLE", "REDUNDANCY", "COLLOQUIALISMS"];

/// Apply the checker's suggestions conservatively: skip matches without a
/// replacement, voice-altering categories, and matches with more than three
/// candidates. Matches are applied back to front so offsets stay valid.
fn apply_grammar_corrections(text: &str, matches: &[GrammarMatch]) -> String {
    let mut sorted: Vec<&GrammarMatch> = matches.iter().collect();
    sorted.sort_by(|a, b| b.offset.cmp(&a.offset));

    let mut chars: Vec<char> = text.chars().collect();
    for m in sorted {
        if m.replacements.is_empty() || m.replacements.len() > 3 {
            continue;
        }
        let category = m
            .rule
            .as_ref()
            .and_then(|r| r.category.as_ref())
            .map(|c| c.id.as_str())
            .unwrap_or("");
        if SKIP_CATEGORIES.contains(&category) {
            continue;
        }
        let replacement = &m.replacements[0].value;
        if replacement.is_empty() || m.offset + m.length > chars.len() {
            continue;
        }
        chars.splice(m.offset..m.offset + m.length, replacement.chars());
    }
    chars.into_iter().collect()
}

fn issue_statistics(matches: &[GrammarMatch]) -> IssueStats {
    let mut stats = IssueStats { total_issues: matches.len(), ..Default::default() };
    for m in matches {
        let category = m
            .rule
            .as_ref()
            .and_then(|r| r.category.as_ref())
            .map(|c| c.id.to_uppercase())
            .unwrap_or_default();
        if category.contains("GRAMMAR") {
            stats.grammar_issues += 1;
        } else if category.contains("TYPOS") || category.contains("SPELLING") {
            stats.spelling_issues += 1;
        } else if category.contains("STYLE") {
            stats.style_issues += 1;
        } else if category.contains("PUNCTUATION") {
            stats.punctuation_issues += 1;
        } else {
            stats.other_issues += 1;
        }
    }
    stats
}

// ============ Style (ProWritingAid-shaped) ============

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleScores {
    pub overall_score: f64,
    pub grammar_score: f64,
    pub style_score: f64,
    pub readability_score: f64,
    pub issues_found: usize,
}

#[derive(Debug, Clone)]
pub struct StyleOutcome {
    pub enhanced_text: String,
    pub scores: StyleScores,
}

#[derive(Debug, Clone, Serialize)]
struct StyleSubmitRequest<'a> {
    text: &'a str,
    reports: &'a [&'a str],
    language: &'a str,
    style: &'a str,
    suggestions: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StyleSubmitResponse {
    task_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleResultResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    result: Option<StyleResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleResult {
    #[serde(rename = "Tags", default)]
    tags: Vec<StyleTag>,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleTag {
    #[serde(default)]
    start_pos: usize,
    #[serde(default)]
    end_pos: usize,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    category: String,
}

#[async_trait]
pub trait StyleService: Send + Sync {
    async fn analyze(&self, text: &str, apply_corrections: bool)
        -> Result<StyleOutcome, RemoteError>;
}

pub struct StyleClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StyleClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self { client: http_client(), base_url, api_key }
    }

    pub fn from_env() -> Option<Self> {
        let api_key = env::var("STYLE_API_KEY").ok()?;
        let base_url =
            env::var("STYLE_API_URL").unwrap_or_else(|_| STYLE_DEFAULT_URL.to_string());
        Some(Self::new(base_url, api_key))
    }
}

#[async_trait]
impl StyleService for StyleClient {
    async fn analyze(
        &self,
        text: &str,
        apply_corrections: bool,
    ) -> Result<StyleOutcome, RemoteError> {
        let request = StyleSubmitRequest {
            text,
            reports: &["grammar", "style", "overused", "readability", "sticky"],
            language: "en",
            style: "General",
            suggestions: true,
        };
        let response = self
            .client
            .post(format!("{}/api/async/text", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let submit: StyleSubmitResponse = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
        let task_id = submit
            .task_id
            .ok_or_else(|| RemoteError::MalformedResponse("missing task id".to_string()))?;

        let result = self.poll_result(&task_id).await?;
        let scores = style_scores(&result);
        let enhanced_text = if apply_corrections {
            apply_style_suggestions(text, &result.tags)
        } else {
            text.to_string()
        };
        Ok(StyleOutcome { enhanced_text, scores })
    }
}

impl StyleClient {
    async fn poll_result(&self, task_id: &str) -> Result<StyleResult, RemoteError> {
        for attempt in 0..STYLE_POLL_ATTEMPTS {
            let response = self
                .client
                .get(format!("{}/api/async/text/result/{task_id}", self.base_url))
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }
            let body: StyleResultResponse = response
                .json()
                .await
                .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
            match body.status.as_str() {
                "Done" => {
                    return body.result.ok_or_else(|| {
                        RemoteError::MalformedResponse("done without result".to_string())
                    });
                }
                "Error" | "Failed" => {
                    return Err(RemoteError::TaskFailed(
                        body.message.unwrap_or_else(|| "unknown error".to_string()),
                    ));
                }
                _ => {
                    debug!(task_id, attempt, "style analysis still running");
                    tokio::time::sleep(POLL_DELAY).await;
                }
            }
        }
        Err(RemoteError::TaskTimedOut { attempts: STYLE_POLL_ATTEMPTS })
    }
}

/// Apply only mechanics suggestions (grammar, spelling, punctuation) so the
/// analyzer never rewrites the author's style wholesale.
fn apply_style_suggestions(text: &str, tags: &[StyleTag]) -> String {
    let mut sorted: Vec<&StyleTag> = tags.iter().collect();
    sorted.sort_by(|a, b| b.start_pos.cmp(&a.start_pos));

    let mut chars: Vec<char> = text.chars().collect();
    for tag in sorted {
        if tag.suggestions.is_empty() {
            continue;
        }
        if !matches!(tag.category.to_lowercase().as_str(), "grammar" | "spelling" | "punctuation")
        {
            continue;
        }
        if tag.start_pos > tag.end_pos || tag.end_pos > chars.len() {
            continue;
        }
        chars.splice(tag.start_pos..tag.end_pos, tag.suggestions[0].chars());
    }
    chars.into_iter().collect()
}

fn style_scores(result: &StyleResult) -> StyleScores {
    let mut grammar_issues = 0usize;
    let mut style_issues = 0usize;
    for tag in &result.tags {
        match tag.category.to_lowercase().as_str() {
            "grammar" | "spelling" | "punctuation" => grammar_issues += 1,
            "style" | "readability" | "overused" => style_issues += 1,
            _ => {}
        }
    }

    let mut scores = StyleScores { issues_found: result.tags.len(), ..Default::default() };
    if !result.text.is_empty() {
        scores.grammar_score = (100.0 - grammar_issues as f64 * 10.0).max(0.0);
        scores.style_score = (100.0 - style_issues as f64 * 5.0).max(0.0);
        scores.overall_score = (scores.grammar_score + scores.style_score) / 2.0;
    }
    scores
}

// ============ Rewrite (AI-Text-Humanizer-shaped) ============

#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub humanized_text: String,
    pub original_length: usize,
    pub humanized_length: usize,
}

#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, text: &str) -> Result<RewriteOutcome, RemoteError>;
}

pub struct RewriteClient {
    client: Client,
    api_url: String,
    email: String,
    password: String,
}

impl RewriteClient {
    pub fn new(api_url: String, email: String, password: String) -> Self {
        Self { client: http_client(), api_url, email, password }
    }

    pub fn from_env() -> Option<Self> {
        let email = env::var("REWRITE_API_EMAIL").ok()?;
        let password = env::var("REWRITE_API_PASSWORD").ok()?;
        let api_url =
            env::var("REWRITE_API_URL").unwrap_or_else(|_| REWRITE_DEFAULT_URL.to_string());
        Some(Self::new(api_url, email, password))
    }
}

#[async_trait]
impl RewriteService for RewriteClient {
    async fn rewrite(&self, text: &str) -> Result<RewriteOutcome, RemoteError> {
        let params = [("email", self.email.as_str()), ("pw", self.password.as_str()), ("text", text)];
        let response = self.client.post(&self.api_url).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RemoteError::Api { status: status.as_u16(), message: body });
        }
        let humanized = body.trim().to_string();
        if humanized.is_empty() || humanized.to_lowercase().starts_with("error") {
            return Err(RemoteError::TaskFailed(humanized));
        }
        Ok(RewriteOutcome {
            original_length: text.chars().count(),
            humanized_length: humanized.chars().count(),
            humanized_text: humanized,
        })
    }
}

// ============ Bypass (HIX-shaped) ============

#[derive(Debug, Clone)]
pub struct BypassOutcome {
    pub humanized_text: String,
    pub detection_result: String,
    pub detection_score: f64,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize)]
struct BypassSubmitRequest<'a> {
    input: &'a str,
    mode: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct BypassEnvelope<T> {
    #[serde(default)]
    err_code: i64,
    #[serde(default)]
    err_msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
struct BypassSubmitData {
    task_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct BypassTaskData {
    #[serde(default)]
    task_status: bool,
    #[serde(default)]
    subtask_status: String,
    output: Option<String>,
    input: Option<String>,
    #[serde(default)]
    detection_result: Option<String>,
    #[serde(default)]
    detection_score: Option<f64>,
    #[serde(default)]
    mode: Option<String>,
}

#[async_trait]
pub trait BypassApi: Send + Sync {
    async fn humanize(&self, text: &str, mode: Mode) -> Result<BypassOutcome, RemoteError>;
}

pub struct BypassClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BypassClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self { client: http_client(), base_url, api_key }
    }

    pub fn from_env() -> Option<Self> {
        let api_key = env::var("BYPASS_API_KEY").ok()?;
        let base_url =
            env::var("BYPASS_API_URL").unwrap_or_else(|_| BYPASS_DEFAULT_URL.to_string());
        Some(Self::new(base_url, api_key))
    }

    fn mode_label(mode: Mode) -> &'static str {
        match mode {
            Mode::Fast => "Fast",
            Mode::Balanced => "Balanced",
            Mode::Aggressive => "Aggressive",
        }
    }

    async fn submit(&self, text: &str, mode: Mode) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .header("api-key", &self.api_key)
            .json(&BypassSubmitRequest { input: text, mode: Self::mode_label(mode) })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        let envelope: BypassEnvelope<BypassSubmitData> = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
        if envelope.err_code != 0 {
            return Err(RemoteError::TaskFailed(
                envelope.err_msg.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        envelope
            .data
            .and_then(|d| d.task_id)
            .ok_or_else(|| RemoteError::MalformedResponse("missing task id".to_string()))
    }

    async fn obtain(&self, task_id: &str) -> Result<BypassOutcome, RemoteError> {
        for attempt in 0..BYPASS_POLL_ATTEMPTS {
            let response = self
                .client
                .get(format!("{}/obtain", self.base_url))
                .header("api-key", &self.api_key)
                .query(&[("task_id", task_id)])
                .send()
                .await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Api {
                    status: status.as_u16(),
                    message: response.text().await.unwrap_or_default(),
                });
            }
            let envelope: BypassEnvelope<BypassTaskData> = response
                .json()
                .await
                .map_err(|e| RemoteError::MalformedResponse(e.to_string()))?;
            if envelope.err_code != 0 {
                return Err(RemoteError::TaskFailed(
                    envelope.err_msg.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }
            let data = envelope
                .data
                .ok_or_else(|| RemoteError::MalformedResponse("missing task data".to_string()))?;

            if data.task_status && data.subtask_status == "completed" {
                let fallback = data.input.clone().unwrap_or_default();
                return Ok(BypassOutcome {
                    humanized_text: data.output.unwrap_or(fallback),
                    detection_result: data
                        .detection_result
                        .unwrap_or_else(|| "unknown".to_string()),
                    detection_score: data.detection_score.unwrap_or(0.0),
                    mode: data.mode.unwrap_or_else(|| "Fast".to_string()),
                });
            }
            if matches!(data.subtask_status.as_str(), "processing" | "pending") {
                warn!(task_id, attempt, "bypass task still running");
                tokio::time::sleep(POLL_DELAY).await;
                continue;
            }
            return Err(RemoteError::TaskFailed(data.subtask_status));
        }
        Err(RemoteError::TaskTimedOut { attempts: BYPASS_POLL_ATTEMPTS })
    }
}

#[async_trait]
impl BypassApi for BypassClient {
    async fn humanize(&self, text: &str, mode: Mode) -> Result<BypassOutcome, RemoteError> {
        let task_id = self.submit(text, mode).await?;
        self.obtain(&task_id).await
    }
}

// ============ Registry ============

/// The set of configured collaborators. Anything unset is skipped during
/// augmentation and recorded as not applied.
#[derive(Default, Clone)]
pub struct RemoteServices {
    pub grammar: Option<Arc<dyn GrammarService>>,
    pub style: Option<Arc<dyn StyleService>>,
    pub rewrite: Option<Arc<dyn RewriteService>>,
    pub bypass: Option<Arc<dyn BypassApi>>,
}

impl RemoteServices {
    /// Build from environment credentials. The grammar checker needs no key
    /// and is always configured; the rest require their credentials.
    pub fn from_env() -> Self {
        Self {
            grammar: Some(Arc::new(GrammarClient::from_env())),
            style: StyleClient::from_env().map(|c| Arc::new(c) as Arc<dyn StyleService>),
            rewrite: RewriteClient::from_env().map(|c| Arc::new(c) as Arc<dyn RewriteService>),
            bypass: BypassClient::from_env().map(|c| Arc::new(c) as Arc<dyn BypassApi>),
        }
    }

    /// No collaborators at all. The pipeline then runs purely locally.
    pub fn disabled() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grammar_match(offset: usize, length: usize, value: &str, category: &str) -> GrammarMatch {
        GrammarMatch {
            offset,
            length,
            replacements: vec![Replacement { value: value.to_string() }],
            rule: Some(MatchRule {
                category: Some(MatchCategory { id: category.to_string() }),
            }),
        }
    }

    #[test]
    fn test_corrections_applied_back_to_front() {
        let text = "Teh cat sat on teh mat";
        let matches = vec![
            grammar_match(0, 3, "The", "TYPOS"),
            grammar_match(15, 3, "the", "TYPOS"),
        ];
        assert_eq!(apply_grammar_corrections(text, &matches), "The cat sat on the mat");
    }

    #[test]
    fn test_corrections_skip_style_categories() {
        let text = "basically it works";
        let matches = vec![grammar_match(0, 9, "", "STYLE")];
        assert_eq!(apply_grammar_corrections(text, &matches), text);
    }

    #[test]
    fn test_corrections_skip_uncertain_matches() {
        let mut m = grammar_match(0, 3, "The", "TYPOS");
        m.replacements = vec![
            Replacement { value: "The".into() },
            Replacement { value: "Ten".into() },
            Replacement { value: "Tea".into() },
            Replacement { value: "Tech".into() },
        ];
        assert_eq!(apply_grammar_corrections("Teh cat", &[m]), "Teh cat");
    }

    #[test]
    fn test_corrections_ignore_out_of_range_offsets() {
        let matches = vec![grammar_match(90, 5, "nope", "TYPOS")];
        assert_eq!(apply_grammar_corrections("short", &matches), "short");
    }

    #[test]
    fn test_issue_statistics_buckets() {
        let matches = vec![
            grammar_match(0, 1, "a", "GRAMMAR"),
            grammar_match(0, 1, "a", "TYPOS"),
            grammar_match(0, 1, "a", "STYLE"),
            grammar_match(0, 1, "a", "PUNCTUATION"),
            grammar_match(0, 1, "a", "CASING"),
        ];
        let stats = issue_statistics(&matches);
        assert_eq!(stats.total_issues, 5);
        assert_eq!(stats.grammar_issues, 1);
        assert_eq!(stats.spelling_issues, 1);
        assert_eq!(stats.style_issues, 1);
        assert_eq!(stats.punctuation_issues, 1);
        assert_eq!(stats.other_issues, 1);
    }

    #[test]
    fn test_style_suggestions_apply_mechanics_only() {
        let tags = vec![
            StyleTag {
                start_pos: 0,
                end_pos: 3,
                suggestions: vec!["The".to_string()],
                category: "grammar".to_string(),
            },
            StyleTag {
                start_pos: 4,
                end_pos: 7,
                suggestions: vec!["feline".to_string()],
                category: "style".to_string(),
            },
        ];
        assert_eq!(apply_style_suggestions("Teh cat sat", &tags), "The cat sat");
    }

    #[test]
    fn test_style_scores_penalize_issues() {
        let result = StyleResult {
            tags: vec![
                StyleTag {
                    start_pos: 0,
                    end_pos: 0,
                    suggestions: vec![],
                    category: "grammar".to_string(),
                },
                StyleTag {
                    start_pos: 0,
                    end_pos: 0,
                    suggestions: vec![],
                    category: "style".to_string(),
                },
            ],
            text: "some text".to_string(),
        };
        let scores = style_scores(&result);
        assert_eq!(scores.grammar_score, 90.0);
        assert_eq!(scores.style_score, 95.0);
        assert_eq!(scores.overall_score, 92.5);
        assert_eq!(scores.issues_found, 2);
    }

    #[test]
    fn test_style_scores_zero_for_empty_text() {
        let result = StyleResult { tags: vec![], text: String::new() };
        let scores = style_scores(&result);
        assert_eq!(scores.overall_score, 0.0);
    }
}
