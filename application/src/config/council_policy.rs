//! Council policy: run-level tuning of the pipeline.
//!
//! [`CouncilPolicy`] groups the parameters the council use case needs
//! beyond the lineup itself: call budgets, backup pools, the title model
//! and the answer language. The fallback *rules* live in the domain
//! ([`FallbackPolicy`](council_domain::FallbackPolicy)); this type only
//! supplies the pools those rules draw from.

use council_domain::Model;
use std::time::Duration;

/// Budget for a single model call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Budget for the title call.
pub const DEFAULT_TITLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on chairman backups tried after the chairman itself.
pub const MAX_CHAIRMAN_BACKUPS: usize = 7;

/// Stage 1 backup pool, in dispatch order.
pub const DISPATCH_BACKUPS: &[&str] = &[
    "google/gemma-3-12b-it:free",
    "google/gemma-3-4b-it:free",
    "mistralai/mistral-small-3.1-24b-instruct:free",
    "microsoft/phi-4-reasoning-plus:free",
    "nvidia/llama-3.1-nemotron-70b-instruct:free",
    "deepseek/deepseek-r1-0528:free",
    "qwen/qwen3-235b-a22b-thinking-2507",
];

/// Stage 3 backup pool, in dispatch order.
pub const CHAIRMAN_BACKUPS: &[&str] = &[
    "deepseek/deepseek-r1-0528:free",
    "qwen/qwen3-235b-a22b-thinking-2507",
    "mistralai/mistral-small-3.1-24b-instruct:free",
    "google/gemma-3-27b-it:free",
    "meta-llama/llama-3.3-70b-instruct:free",
    "nvidia/llama-3.1-nemotron-70b-instruct:free",
    "microsoft/phi-4-reasoning-plus:free",
    "google/gemma-3-12b-it:free",
];

/// Default title model.
pub const DEFAULT_TITLE_MODEL: &str = "google/gemini-2.5-flash";

/// Run-level parameters of the council pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct CouncilPolicy {
    /// Budget for every competitor, evaluator and chairman call.
    pub call_timeout: Duration,
    /// Stage 1 backup pool.
    pub dispatch_backups: Vec<Model>,
    /// Stage 3 backup pool.
    pub chairman_backups: Vec<Model>,
    /// Model used for conversation titles.
    pub title_model: Model,
    /// Budget for the title call.
    pub title_timeout: Duration,
    /// Language every answer must be written in, if any.
    pub response_language: Option<String>,
    /// Undelivered progress events buffered before the run waits.
    pub event_buffer: usize,
}

impl Default for CouncilPolicy {
    fn default() -> Self {
        Self {
            call_timeout: DEFAULT_CALL_TIMEOUT,
            dispatch_backups: DISPATCH_BACKUPS.iter().copied().map(Model::from_static).collect(),
            chairman_backups: CHAIRMAN_BACKUPS.iter().copied().map(Model::from_static).collect(),
            title_model: Model::from_static(DEFAULT_TITLE_MODEL),
            title_timeout: DEFAULT_TITLE_TIMEOUT,
            response_language: None,
            event_buffer: 32,
        }
    }
}

impl CouncilPolicy {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_title_model(mut self, model: Model) -> Self {
        self.title_model = model;
        self
    }

    pub fn with_title_timeout(mut self, timeout: Duration) -> Self {
        self.title_timeout = timeout;
        self
    }

    pub fn with_response_language(mut self, language: Option<String>) -> Self {
        self.response_language = language.filter(|l| !l.trim().is_empty());
        self
    }

    // ==================== Derived Pools ====================

    /// Stage 1 backups for a council, skipping models already competing.
    pub fn dispatch_backups_for(&self, competitors: &[Model]) -> Vec<Model> {
        self.dispatch_backups
            .iter()
            .filter(|m| !competitors.contains(m))
            .cloned()
            .collect()
    }

    /// Stage 3 backups for a chairman: the pool without the chairman,
    /// capped at [`MAX_CHAIRMAN_BACKUPS`].
    pub fn chairman_backups_for(&self, chairman: &Model) -> Vec<Model> {
        self.chairman_backups
            .iter()
            .filter(|m| *m != chairman)
            .take(MAX_CHAIRMAN_BACKUPS)
            .cloned()
            .collect()
    }

    pub fn language(&self) -> Option<&str> {
        self.response_language.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let policy = CouncilPolicy::default();
        assert_eq!(policy.call_timeout, Duration::from_secs(120));
        assert_eq!(policy.title_timeout, Duration::from_secs(30));
        assert_eq!(policy.dispatch_backups.len(), 7);
        assert_eq!(policy.title_model.as_str(), "google/gemini-2.5-flash");
        assert!(policy.language().is_none());
    }

    #[test]
    fn test_chairman_backups_exclude_chairman_and_cap_at_seven() {
        let policy = CouncilPolicy::default();

        let chairman = Model::new("deepseek/deepseek-r1-0528:free").unwrap();
        let backups = policy.chairman_backups_for(&chairman);
        assert_eq!(backups.len(), MAX_CHAIRMAN_BACKUPS);
        assert!(!backups.contains(&chairman));

        let outsider = Model::new("someone/else").unwrap();
        let backups = policy.chairman_backups_for(&outsider);
        assert_eq!(backups.len(), MAX_CHAIRMAN_BACKUPS);
        assert_eq!(backups[0].as_str(), CHAIRMAN_BACKUPS[0]);
    }

    #[test]
    fn test_dispatch_backups_skip_competitors() {
        let policy = CouncilPolicy::default();
        let competitors = vec![
            Model::new("google/gemma-3-12b-it:free").unwrap(),
            Model::new("x/y").unwrap(),
        ];
        let backups = policy.dispatch_backups_for(&competitors);
        assert_eq!(backups.len(), 6);
        assert_eq!(backups[0].as_str(), "google/gemma-3-4b-it:free");
    }

    #[test]
    fn test_blank_language_is_ignored() {
        let policy = CouncilPolicy::default().with_response_language(Some("  ".into()));
        assert!(policy.language().is_none());
        let policy = CouncilPolicy::default().with_response_language(Some("German".into()));
        assert_eq!(policy.language(), Some("German"));
    }
}
