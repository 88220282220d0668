//! Prompt templates for the council flow

use crate::council::anonymization::Label;
use crate::council::evaluation::Evaluation;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// A system + user message pair sent to one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }

    pub fn user_only(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    /// Append a response-language directive to the system message.
    pub fn with_language(mut self, language: Option<&str>) -> Self {
        let Some(language) = language.map(str::trim).filter(|l| !l.is_empty()) else {
            return self;
        };
        let directive = format!(
            "IMPORTANT: Always answer in {language}. Your entire response must be written in {language}."
        );
        self.system = Some(match self.system.take() {
            Some(system) => format!("{system}\n\n{directive}"),
            None => directive,
        });
        self
    }
}

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the Stage 1 answer
    pub fn answer_system() -> &'static str {
        r#"You are a knowledgeable expert competing with other experts to give the best answer.
Provide a thoughtful, accurate and well-structured response to the question.
Be concise but complete."#
    }

    /// Stage 1 prompt
    pub fn answer(question: &str) -> Prompt {
        Prompt::new(Self::answer_system(), question)
    }

    /// System prompt for Stage 2 cross-evaluation
    pub fn ranking_system() -> &'static str {
        r#"You are an impartial judge comparing anonymized answers to the same question.
Judge only the content of each answer. Follow the requested output format exactly."#
    }

    /// Stage 2 prompt embedding every anonymized response exactly once.
    pub fn ranking(question: &str, responses: &[(Label, &str)]) -> Prompt {
        let responses_text = responses
            .iter()
            .map(|(label, text)| format!("{}:\n{}", label.display_name(), text))
            .collect::<Vec<_>>()
            .join("\n\n");

        let user = format!(
            r#"You are evaluating different responses to the following question:

Question: {question}

Here are the responses from different models (anonymized):

{responses_text}

Your task:
1. First, evaluate each response individually. For each one, explain what it does well and what it does poorly.
2. Then, at the very end of your response, provide a final ranking of ALL responses.

IMPORTANT: Your final ranking MUST be formatted EXACTLY as follows:
- Start with the line "FINAL RANKING:" (all caps, with a colon)
- Then list the responses from best to worst as a numbered list
- Each line should be: number, period, space, then ONLY the response label (e.g., "1. Response A")
- Do not add any other text or explanations in the ranking section

Example of the correct format for your ENTIRE response:

Response A provides good detail on X but misses Y...
Response B is accurate but lacks depth on Z...
Response C offers the most comprehensive answer...

FINAL RANKING:
1. Response C
2. Response A
3. Response B

Now provide your evaluation and ranking:"#
        );

        Prompt::new(Self::ranking_system(), user)
    }

    /// System prompt for the Stage 3 verdict
    pub fn verdict_system() -> &'static str {
        r#"You are the Chairman of a council of language models.
Be brief and direct: at most 3-4 paragraphs."#
    }

    /// Stage 3 prompt built from all answers, the rankings and their aggregate.
    ///
    /// Answers carry their anonymized label next to the model name so the
    /// evaluators' `Response X` references can be read back.
    pub fn verdict(question: &str, responses: &[(&Model, &str)], evaluation: &Evaluation) -> Prompt {
        let map = &evaluation.label_to_model;
        let named = |model: &Model| match map.label_for(model) {
            Some(label) => format!("{} ({model})", label.display_name()),
            None => format!("Model: {model}"),
        };

        let stage1_text = responses
            .iter()
            .map(|(model, text)| format!("{}\nResponse: {text}", named(model)))
            .collect::<Vec<_>>()
            .join("\n\n");

        let stage2_text = if evaluation.rankings.is_empty() {
            "(no rankings were returned)".to_string()
        } else {
            evaluation
                .rankings
                .iter()
                .map(|r| {
                    let order = r
                        .parsed_labels
                        .iter()
                        .map(|label| match map.model_for(label) {
                            Some(model) => format!("{} ({model})", label.display_name()),
                            None => label.display_name(),
                        })
                        .collect::<Vec<_>>();
                    let order = if order.is_empty() {
                        "(could not be parsed)".to_string()
                    } else {
                        order.join(" > ")
                    };
                    format!(
                        "Evaluator: {}\nRanking: {}\nParsed order: {order}",
                        r.model, r.raw_text
                    )
                })
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let aggregate_text = if evaluation.aggregate.is_empty() {
            "(no aggregate ranking)".to_string()
        } else {
            evaluation
                .aggregate
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    format!(
                        "{}. {} - average rank {:.2} across {} ranking(s)",
                        i + 1,
                        named(&entry.model),
                        entry.average_rank,
                        entry.rankings_count
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };

        let user = format!(
            r#"Several models answered a user's question and then ranked each other's answers.

Original Question: {question}

STAGE 1 - Individual Responses:
{stage1_text}

STAGE 2 - Peer Rankings:
{stage2_text}

STAGE 2 - Aggregate Ranking (lower average rank is better):
{aggregate_text}

STRICT INSTRUCTIONS:
- Your answer MUST be SHORT and CONCISE: at most 3-4 paragraphs.
- Go straight to the point. Do not repeat or summarize each individual response.
- Do not include lengthy analysis of each model or of the rankings.
- Synthesize the best possible answer to the original question, drawing on the highest-ranked responses.
- Write as if answering the user directly, not as an academic report."#
        );

        Prompt::new(Self::verdict_system(), user)
    }

    /// Prompt asking for a short conversation title
    pub fn title(question: &str) -> Prompt {
        Prompt::user_only(format!(
            r#"Generate a very short title (3-5 words maximum) that summarizes the following question.
The title should be concise and descriptive. Do not use quotes or punctuation in the title.

Question: {question}

Title:"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::council::anonymization::AnonymizationMap;
    use crate::council::ranking::Ranking;

    #[test]
    fn test_answer_prompt_carries_question() {
        let prompt = PromptTemplate::answer("What is Rust?");
        assert_eq!(prompt.user, "What is Rust?");
        assert!(prompt.system.is_some());
    }

    #[test]
    fn test_ranking_prompt_embeds_each_response_once() {
        let responses = vec![
            (Label::for_index(0), "Rust is a systems programming language."),
            (Label::for_index(1), "Rust focuses on safety and performance."),
        ];
        let prompt = PromptTemplate::ranking("What is Rust?", &responses);
        assert_eq!(prompt.user.matches("Response A:\n").count(), 1);
        assert_eq!(prompt.user.matches("Response B:\n").count(), 1);
        assert_eq!(prompt.user.matches("systems programming").count(), 1);
        assert!(prompt.user.contains("FINAL RANKING:"));
    }

    fn evaluation() -> (Model, Model, Evaluation) {
        let first = Model::new("gpt-x").unwrap();
        let second = Model::new("llama-y").unwrap();
        let map = AnonymizationMap::from_models([first.clone(), second.clone()]);
        let rankings = vec![
            Ranking::parse(first.clone(), "FINAL RANKING:\n1. Response B\n2. Response A", &map),
            Ranking::parse(second.clone(), "FINAL RANKING:\n1. Response B", &map),
        ];
        (first, second, Evaluation::new(map, rankings))
    }

    #[test]
    fn test_verdict_prompt_labels_answers() {
        let (first, second, evaluation) = evaluation();
        let prompt = PromptTemplate::verdict(
            "What is Rust?",
            &[(&first, "A language."), (&second, "A crab.")],
            &evaluation,
        );
        assert!(prompt.user.contains("Response A (gpt-x)\nResponse: A language."));
        assert!(prompt.user.contains("Response B (llama-y)\nResponse: A crab."));
        assert!(prompt.user.contains("Evaluator: gpt-x\nRanking: FINAL RANKING:"));
        assert!(
            prompt
                .user
                .contains("Parsed order: Response B (llama-y) > Response A (gpt-x)")
        );
        assert!(prompt.user.contains("3-4 paragraphs"));
    }

    #[test]
    fn test_verdict_prompt_includes_aggregate() {
        let (first, second, evaluation) = evaluation();
        let prompt = PromptTemplate::verdict(
            "What is Rust?",
            &[(&first, "A language."), (&second, "A crab.")],
            &evaluation,
        );
        assert!(prompt.user.contains("Aggregate Ranking"));
        assert!(
            prompt
                .user
                .contains("1. Response B (llama-y) - average rank 1.00 across 2 ranking(s)")
        );
        assert!(
            prompt
                .user
                .contains("2. Response A (gpt-x) - average rank 2.00 across 1 ranking(s)")
        );
    }

    #[test]
    fn test_verdict_without_rankings() {
        let model = Model::new("gpt-x").unwrap();
        let map = AnonymizationMap::from_models([model.clone()]);
        let prompt =
            PromptTemplate::verdict("Q?", &[(&model, "A.")], &Evaluation::new(map, Vec::new()));
        assert!(prompt.user.contains("(no rankings were returned)"));
        assert!(prompt.user.contains("(no aggregate ranking)"));
        assert!(prompt.user.contains("Response A (gpt-x)"));
    }

    #[test]
    fn test_language_directive() {
        let prompt = PromptTemplate::answer("Q?").with_language(Some("Spanish"));
        let system = prompt.system.unwrap();
        assert!(system.starts_with("You are a knowledgeable expert"));
        assert!(system.contains("Always answer in Spanish"));

        let title = PromptTemplate::title("Q?").with_language(Some(" "));
        assert!(title.system.is_none());
    }
}
