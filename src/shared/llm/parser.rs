use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    /// Opening code fence with optional language tag
    static ref FENCE_OPEN_RE: Regex = Regex::new(r"^```[a-zA-Z]*\s*").unwrap();

    /// Closing code fence
    static ref FENCE_CLOSE_RE: Regex = Regex::new(r"\s*```$").unwrap();

    /// Largest {...} span, greedy across newlines
    static ref BRACE_SPAN_RE: Regex = Regex::new(r"(?s)\{.*\}").unwrap();

    /// Regex for trailing commas before } or ] (common LLM mistake)
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// Quoted value of a classification key, case-insensitive
    static ref CLASSIFICATION_RE: Regex =
        Regex::new(r#"(?i)"?classification"?\s*:\s*"([^"]+)""#).unwrap();

    /// Quoted value of a reasoning key, allowing embedded newlines
    static ref REASONING_RE: Regex = Regex::new(r#"(?is)"?reasoning"?\s*:\s*"(.*?)""#).unwrap();

    static ref WHITESPACE_RUN_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Structured pair pulled out of a raw model reply.
///
/// Both fields are optional: the extractor reports what it found rather than
/// failing on malformed input. Absent classification is later normalized to
/// the irrelevant sentinel by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ModelReply {
    pub classification: Option<String>,
    pub reasoning: Option<String>,
}

impl ModelReply {
    pub fn is_empty(&self) -> bool {
        self.classification.is_none() && self.reasoning.is_none()
    }
}

/// Strip a wrapping fenced code block, if present.
fn strip_code_fence(text: &str) -> String {
    let s = text.trim();
    if !s.starts_with("```") {
        return s.to_string();
    }
    let s = FENCE_OPEN_RE.replace(s, "");
    let s = FENCE_CLOSE_RE.replace(&s, "");
    s.trim().to_string()
}

/// Fix trailing commas in JSON
///
/// Example: `{"name": "John",}` -> `{"name": "John"}`
fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

/// Extract a (classification, reasoning) pair from noisy model text.
///
/// Ordered chain of attempts, each tried only when the previous produced
/// nothing:
/// 1. strip a markdown code fence and parse the whole text as JSON
///    (retrying once with trailing commas removed);
/// 2. parse the largest `{...}` span embedded in surrounding prose;
/// 3. regex out the individual field values, collapsing whitespace runs in
///    the reasoning text.
///
/// Never fails: unusable input yields an empty reply.
pub fn extract_reply(text: &str) -> ModelReply {
    let stripped = strip_code_fence(text);

    // Try 1: whole string as JSON
    if let Ok(reply) = serde_json::from_str::<ModelReply>(&stripped) {
        return reply;
    }
    if let Ok(reply) = serde_json::from_str::<ModelReply>(&fix_trailing_commas(&stripped)) {
        tracing::debug!("Model reply parsed after trailing-comma fix");
        return reply;
    }

    // Try 2: largest embedded {...} block
    if let Some(m) = BRACE_SPAN_RE.find(&stripped) {
        if let Ok(reply) = serde_json::from_str::<ModelReply>(m.as_str()) {
            tracing::debug!("Model reply parsed from embedded JSON block");
            return reply;
        }
    }

    // Try 3: last-ditch per-field regexes
    let mut reply = ModelReply::default();
    if let Some(caps) = CLASSIFICATION_RE.captures(&stripped) {
        reply.classification = Some(caps[1].to_string());
    }
    if let Some(caps) = REASONING_RE.captures(&stripped) {
        let collapsed = WHITESPACE_RUN_RE.replace_all(&caps[1], " ");
        reply.reasoning = Some(collapsed.trim().to_string());
    }

    if reply.is_empty() {
        tracing::warn!(
            "Model reply yielded no usable fields (first 200 chars): {}",
            text.chars().take(200).collect::<String>()
        );
    }
    reply
}
