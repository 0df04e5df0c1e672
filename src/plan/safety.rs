use anyhow::Context;
use regex::Regex;

use crate::foundation::error::{AdError, AdResult};

/// Phrases every background prompt must carry.
pub const SAFETY_TOKENS: [&str; 3] = ["no text", "no logo", "no watermark"];

/// Tokens that mark a prompt fragment as asking for rendered text.
pub const BLACKLIST: [&str; 7] = ["text", "logo", "watermark", "문구", "글자", "텍스트", "로고"];

/// Blacklist matcher for background prompt fragments.
///
/// Every token matches anywhere in the fragment, so `watermarked` or `logotype` count as hits.
/// Latin tokens match case-insensitively.
#[derive(Clone, Debug)]
pub struct PromptGuard {
    latin: Regex,
    safety: Regex,
}

impl PromptGuard {
    /// Compile the matchers.
    pub fn new() -> AdResult<Self> {
        let latin = Regex::new(r"(?i)text|logo|watermark")
            .context("compile blacklist pattern")?;
        let safety = Regex::new(r"(?i)\bno\s+(?:text|logo|watermark)\b")
            .context("compile safety token pattern")?;
        Ok(Self { latin, safety })
    }

    /// First blacklisted token found in `s`.
    pub fn find_blacklisted(&self, s: &str) -> Option<String> {
        if let Some(m) = self.latin.find(s) {
            return Some(m.as_str().to_string());
        }
        BLACKLIST
            .iter()
            .filter(|t| !t.is_ascii())
            .find(|t| s.contains(**t))
            .map(|t| (*t).to_string())
    }

    /// Trimmed hint, or `None` when it is empty or carries a blacklisted token.
    pub fn sanitize_hint(&self, hint: &str) -> Option<String> {
        let hint = hint.trim();
        if hint.is_empty() {
            return None;
        }
        if let Some(token) = self.find_blacklisted(hint) {
            tracing::warn!(%token, "dropping background hint with blacklisted token");
            return None;
        }
        Some(hint.to_string())
    }

    /// Validate an externally supplied prompt and append any missing safety tokens.
    ///
    /// The safety phrases themselves are ignored when scanning for blacklisted tokens.
    pub fn enforce(&self, prompt: &str) -> AdResult<String> {
        let prompt = prompt.trim();
        let scrubbed = self.safety.replace_all(prompt, " ");
        if let Some(token) = self.find_blacklisted(&scrubbed) {
            return Err(AdError::unsafe_prompt(format!(
                "background prompt contains forbidden token '{token}'"
            )));
        }

        let lower = prompt.to_lowercase();
        let mut parts = vec![prompt.to_string()];
        parts.extend(
            SAFETY_TOKENS
                .iter()
                .filter(|t| !lower.contains(**t))
                .map(|t| (*t).to_string()),
        );
        Ok(parts.join(", "))
    }
}

/// True when `prompt` carries all three safety tokens, case-insensitively.
pub fn has_safety_tokens(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    SAFETY_TOKENS.iter().all(|t| lower.contains(t))
}

#[cfg(test)]
#[path = "../../tests/unit/plan/safety.rs"]
mod tests;
