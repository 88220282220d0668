//! CLI command definitions

use clap::Parser;
use council_domain::OutputFormat;
use std::path::PathBuf;

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(author, version, about = "LLM Council - free models answer, rank each other, and a chairman decides")]
#[command(long_about = r#"
LLM Council puts one question to several models and returns a single verdict.

The process has three stages:
1. Dispatch: every competitor answers independently. Failed models are
   retried once, then backup models stand in until two answers are in
2. Cross-ranking: the answers are anonymized (Response A, B, ...) and
   every answering model ranks them
3. Synthesis: the chairman writes the final verdict from the answers
   and the rankings, falling back to backup chairmen if it fails

Configuration files are loaded from (in priority order):
1. --config <path>                          Explicit config file
2. ./council.toml or ./.council.toml        Project-level config
3. ~/.config/llm-council/config.toml        Global config

Environment variables prefixed with LLM_COUNCIL_ override every file,
e.g. LLM_COUNCIL_POLICY__TIMEOUT_SECONDS=60.

The OpenRouter API key is read from OPENROUTER_API_KEY.

Example:
  llm-council "Is Rust's borrow checker worth the learning curve?"
  llm-council -m deepseek/deepseek-r1-0528:free -m z-ai/glm-4.5-air:free "Tabs or spaces?"
  llm-council -o events "What is the capital of Australia?"
"#)]
pub struct Cli {
    /// The question to ask the council
    pub question: Option<String>,

    /// Competitors to include in the council (2-6, can be specified multiple times)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Vec<String>,

    /// Model that synthesizes the final verdict
    #[arg(long, value_name = "MODEL")]
    pub chairman: Option<String>,

    /// Conversation identifier (a fresh one is generated when omitted)
    #[arg(long, value_name = "ID")]
    pub conversation: Option<String>,

    /// Generate a short conversation title alongside the run
    #[arg(long)]
    pub title: bool,

    /// Output format: verdict, full, json or events
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Append every progress event to <DIR>/<conversation>.conversation.jsonl
    #[arg(long, value_name = "DIR")]
    pub transcript: Option<PathBuf>,

    /// List the zero-cost models offered by the provider and exit
    #[arg(long)]
    pub list_free_models: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_models_and_output() {
        let cli = Cli::try_parse_from([
            "llm-council",
            "-m",
            "a/one:free",
            "--model",
            "b/two:free",
            "--chairman",
            "c/three:free",
            "-o",
            "events",
            "-vv",
            "What is 2+2?",
        ])
        .unwrap();

        assert_eq!(cli.model, vec!["a/one:free", "b/two:free"]);
        assert_eq!(cli.chairman.as_deref(), Some("c/three:free"));
        assert_eq!(cli.output, Some(OutputFormat::Events));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.question.as_deref(), Some("What is 2+2?"));
        assert!(!cli.title);
    }

    #[test]
    fn test_rejects_unknown_output_format() {
        let result = Cli::try_parse_from(["llm-council", "-o", "yaml", "question"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_question_optional_for_listing() {
        let cli = Cli::try_parse_from(["llm-council", "--list-free-models"]).unwrap();
        assert!(cli.list_free_models);
        assert!(cli.question.is_none());
    }
}
