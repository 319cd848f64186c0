use serde::{Deserialize, Serialize};

/// Token counts reported by completion and embedding endpoints.
///
/// Embedding responses omit `completion_tokens`, so every count is optional.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<u64>,
}

impl TokenUsage {
    #[must_use]
    pub fn with_prompt_completion(prompt: u64, completion: u64) -> Self {
        Self {
            prompt_tokens: Some(prompt),
            completion_tokens: Some(completion),
            total_tokens: Some(prompt + completion),
        }
    }

    #[must_use]
    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens.unwrap_or(0)
    }

    #[must_use]
    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens.unwrap_or(0)
    }

    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
            .unwrap_or_else(|| self.prompt_tokens() + self.completion_tokens())
    }
}

fn add_option(lhs: Option<u64>, rhs: Option<u64>) -> Option<u64> {
    match (lhs, rhs) {
        (Some(a), Some(b)) => Some(a + b),
        (a, None) => a,
        (None, b) => b,
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, rhs: Self) {
        self.prompt_tokens = add_option(self.prompt_tokens, rhs.prompt_tokens);
        self.completion_tokens = add_option(self.completion_tokens, rhs.completion_tokens);
        self.total_tokens = add_option(self.total_tokens, rhs.total_tokens);
    }
}

impl std::ops::Add for TokenUsage {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::TokenUsage;

    #[test]
    fn total_falls_back_to_sum() {
        let usage = TokenUsage {
            prompt_tokens: Some(7),
            completion_tokens: Some(3),
            total_tokens: None,
        };
        assert_eq!(usage.total_tokens(), 10);
    }

    #[test]
    fn addition_keeps_missing_counts_missing() {
        let embedding = TokenUsage {
            prompt_tokens: Some(5),
            completion_tokens: None,
            total_tokens: Some(5),
        };
        let sum = embedding + embedding;
        assert_eq!(sum.prompt_tokens, Some(10));
        assert_eq!(sum.completion_tokens, None);
        assert_eq!(sum.total_tokens, Some(10));
    }
}
