use serde::{Deserialize, Serialize};

use openai_ox_common::TokenUsage;

/// Token usage reported by chat completions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(flatten)]
    pub tokens: TokenUsage,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_tokens_details: Option<PromptTokensDetails>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_tokens_details: Option<CompletionTokensDetails>,
}

/// Breakdown of prompt tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptTokensDetails {
    /// Tokens served from the prompt cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
}

/// Breakdown of completion tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionTokensDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_tokens: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tokens: Option<u64>,
}

impl Usage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            tokens: TokenUsage::with_prompt_completion(prompt_tokens, completion_tokens),
            ..Self::default()
        }
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.tokens.prompt_tokens()
    }

    pub fn completion_tokens(&self) -> u64 {
        self.tokens.completion_tokens()
    }

    pub fn total_tokens(&self) -> u64 {
        self.tokens.total_tokens()
    }

    /// Prompt tokens served from the cache
    pub fn cached_tokens(&self) -> u64 {
        self.prompt_tokens_details
            .as_ref()
            .and_then(|details| details.cached_tokens)
            .unwrap_or(0)
    }
}

impl std::ops::Add for Usage {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl std::ops::AddAssign for Usage {
    // Per-request breakdowns do not sum meaningfully; only totals are kept.
    fn add_assign(&mut self, other: Self) {
        self.tokens += other.tokens;
        self.prompt_tokens_details = None;
        self.completion_tokens_details = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_flat_counts_with_details() {
        let usage: Usage = serde_json::from_value(json!({
            "prompt_tokens": 10,
            "completion_tokens": 4,
            "total_tokens": 14,
            "prompt_tokens_details": {"cached_tokens": 8}
        }))
        .unwrap();

        assert_eq!(usage.prompt_tokens(), 10);
        assert_eq!(usage.total_tokens(), 14);
        assert_eq!(usage.cached_tokens(), 8);
    }

    #[test]
    fn sums_totals() {
        let total = Usage::new(3, 1) + Usage::new(2, 2);
        assert_eq!(total.prompt_tokens(), 5);
        assert_eq!(total.completion_tokens(), 3);
        assert_eq!(total.total_tokens(), 8);
    }
}
