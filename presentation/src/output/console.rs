//! Console output formatter for council reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_application::{CouncilReport, RunCouncilError};
use council_domain::{AttemptOutcome, ChairmanAttempt, ModelOutcome, ResponseSet, SequencedEvent};

/// Formats council reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &CouncilReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("LLM Council Results"));
        output.push('\n');

        if let Some(title) = &report.title {
            output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), title));
        }
        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            report.question.content()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Competitors:".cyan().bold(),
            Self::join(report.lineup.competitors())
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Chairman:".cyan().bold(),
            report.lineup.chairman()
        ));

        // Stage 1: Responses
        output.push_str(&Self::section_header("Stage 1: Responses"));
        output.push_str(&Self::responses(&report.stage1));

        // Stage 2: Rankings
        let evaluation = &report.stage2;
        output.push_str(&Self::section_header("Stage 2: Cross-Ranking"));
        for (label, model) in evaluation.label_to_model.iter() {
            output.push_str(&format!("  {} = {}\n", label.display_name().bold(), model));
        }
        for ranking in &evaluation.rankings {
            let order = if ranking.parsed_labels.is_empty() {
                "(no ranking found)".dimmed().to_string()
            } else {
                ranking
                    .parsed_labels
                    .iter()
                    .map(|l| l.as_str())
                    .collect::<Vec<_>>()
                    .join(" > ")
            };
            output.push_str(&format!("\n{} {}\n", format!("{}:", ranking.model).yellow(), order));
        }

        if !evaluation.aggregate.is_empty() {
            output.push_str(&format!("\n{}\n", "Aggregate Ranking:".cyan().bold()));
            for (position, entry) in evaluation.aggregate.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} (average rank {:.2}, {} vote{})\n",
                    position + 1,
                    entry.model,
                    entry.average_rank,
                    entry.rankings_count,
                    if entry.rankings_count == 1 { "" } else { "s" }
                ));
            }
        }

        // Stage 3: Verdict
        output.push_str(&Self::section_header("Stage 3: Verdict"));
        match &report.stage3 {
            Some(result) => {
                if result.attempts.len() > 1 {
                    output.push_str(&Self::attempts(&result.attempts));
                    output.push('\n');
                }
                output.push_str(&format!(
                    "\n{}\n\n{}\n",
                    format!("Chairman: {}", result.model).yellow().bold(),
                    result.verdict_text
                ));
            }
            None => output.push_str(&format!("\n{}\n", "No verdict".red())),
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &CouncilReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the verdict only (concise output)
    pub fn format_verdict_only(report: &CouncilReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== LLM Council Verdict ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), report.question.content()));

        let answered: Vec<String> = report
            .stage1
            .successes()
            .map(|(model, _)| model.to_string())
            .collect();
        output.push_str(&format!(
            "{} {}\n",
            "Models consulted:".dimmed(),
            answered.join(", ")
        ));

        if let Some(result) = &report.stage3 {
            if result.used_backup(report.lineup.chairman()) {
                output.push_str(&format!(
                    "{} {} (standing in for {})\n",
                    "Verdict by:".dimmed(),
                    result.model,
                    report.lineup.chairman()
                ));
            } else {
                output.push_str(&format!("{} {}\n", "Verdict by:".dimmed(), result.model));
            }
            output.push('\n');
            output.push_str(&result.verdict_text);
            output.push('\n');
        }

        output
    }

    /// One progress event as a single JSON line
    pub fn format_event(event: &SequencedEvent) -> String {
        serde_json::to_string(event).unwrap_or_else(|_| {
            format!(
                r#"{{"sequence":{},"type":"{}"}}"#,
                event.sequence,
                event.event.kind()
            )
        })
    }

    /// Explain a failed run, including what every model reported
    pub fn format_error(error: &RunCouncilError) -> String {
        let mut output = format!("{} {}\n", "Error:".red().bold(), error);

        match error {
            RunCouncilError::QuorumNotReached { responses, .. } => {
                output.push_str(&Self::responses(responses));
            }
            RunCouncilError::NoVerdict { attempts, .. } => {
                output.push_str(&Self::attempts(attempts));
            }
            _ => {}
        }

        output
    }

    fn responses(responses: &ResponseSet) -> String {
        let mut output = String::new();
        for entry in responses.entries() {
            let retried = if entry.attempts > 1 { " (retried)" } else { "" };
            match &entry.outcome {
                ModelOutcome::Success { text } => output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {}{} ──", entry.model, retried).yellow().bold(),
                    text
                )),
                ModelOutcome::Failure { kind, message } => output.push_str(&format!(
                    "\n{}\nError [{}]: {}\n",
                    format!("── {}{} ──", entry.model, retried).red().bold(),
                    kind,
                    message
                )),
            }
        }
        output
    }

    fn attempts(attempts: &[ChairmanAttempt]) -> String {
        let mut output = format!("\n{}\n", "Chairman attempts:".cyan().bold());
        for attempt in attempts {
            let status = match &attempt.outcome {
                AttemptOutcome::Success => "ok".green().to_string(),
                AttemptOutcome::Failure { kind, message } => {
                    format!("{} {}", kind.as_str().red(), message)
                }
            };
            output.push_str(&format!(
                "  #{} {}: {}\n",
                attempt.attempt_index + 1,
                attempt.model,
                status
            ));
        }
        output
    }

    fn join(models: &[council_domain::Model]) -> String {
        models
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &CouncilReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &CouncilReport) -> String {
        Self::format_json(report)
    }

    fn format_verdict_only(&self, report: &CouncilReport) -> String {
        Self::format_verdict_only(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{
        AnonymizationMap, ChairmanResult, Evaluation, FailureKind, Lineup, Model, ProgressEvent,
        Question, Ranking,
    };

    fn model(id: &str) -> Model {
        Model::new(id).unwrap()
    }

    fn report() -> CouncilReport {
        let mut stage1 = ResponseSet::new();
        stage1.record(model("m1"), ModelOutcome::success("Paris is the capital."));
        stage1.record(
            model("m2"),
            ModelOutcome::failure(FailureKind::Timeout, "Timeout (120s)"),
        );
        stage1.record(model("m3"), ModelOutcome::success("It is Paris."));

        let map = AnonymizationMap::from_responses(&stage1);
        let rankings = vec![
            Ranking::parse(model("m1"), "FINAL RANKING:\n1. Response B\n2. Response A", &map),
            Ranking::parse(model("m3"), "no idea", &map),
        ];
        let stage2 = Evaluation::new(map, rankings);

        CouncilReport {
            conversation_id: "conv-1".into(),
            run_id: "run-1".into(),
            question: Question::try_new("What is the capital of France?").unwrap(),
            lineup: Lineup::new(vec![model("m1"), model("m2"), model("m3")], model("chair"))
                .unwrap(),
            stage1,
            stage2,
            stage3: Some(ChairmanResult {
                model: model("backup-chair"),
                verdict_text: "The council agrees: Paris.".into(),
                attempts: vec![
                    ChairmanAttempt {
                        model: model("chair"),
                        outcome: AttemptOutcome::Failure {
                            kind: FailureKind::RateLimit,
                            message: "HTTP 429: slow down".into(),
                        },
                        attempt_index: 0,
                    },
                    ChairmanAttempt {
                        model: model("backup-chair"),
                        outcome: AttemptOutcome::Success,
                        attempt_index: 1,
                    },
                ],
            }),
            title: Some("Capital of France".into()),
        }
    }

    #[test]
    fn test_full_format_covers_every_stage() {
        let output = ConsoleFormatter::format(&report());
        assert!(output.contains("What is the capital of France?"));
        assert!(output.contains("Paris is the capital."));
        assert!(output.contains("Timeout (120s)"));
        assert!(output.contains("B > A"));
        assert!(output.contains("(no ranking found)"));
        assert!(output.contains("average rank 1.00, 1 vote)"));
        assert!(output.contains("HTTP 429: slow down"));
        assert!(output.contains("The council agrees: Paris."));
    }

    #[test]
    fn test_verdict_only_names_backup() {
        let output = ConsoleFormatter::format_verdict_only(&report());
        assert!(output.contains("m1, m3"));
        assert!(output.contains("backup-chair (standing in for chair)"));
        assert!(output.ends_with("The council agrees: Paris.\n"));
    }

    #[test]
    fn test_json_is_the_report() {
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&report())).unwrap();
        assert_eq!(json["conversation_id"], "conv-1");
        assert_eq!(json["stage3"]["model"], "backup-chair");
        assert_eq!(json["stage1"][1]["error_kind"], "timeout");
    }

    #[test]
    fn test_event_is_one_line() {
        let event = SequencedEvent {
            sequence: 3,
            event: ProgressEvent::TitleComplete {
                title: Some("Capital".into()),
            },
        };
        let line = ConsoleFormatter::format_event(&event);
        assert!(!line.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["sequence"], 3);
        assert_eq!(json["type"], "title_complete");
        assert_eq!(json["data"]["title"], "Capital");
    }

    #[test]
    fn test_error_lists_chairman_attempts() {
        let report = report();
        let attempts = report.stage3.clone().unwrap().attempts;
        let error = RunCouncilError::NoVerdict {
            attempts,
            partial: Box::new(report),
        };
        let output = ConsoleFormatter::format_error(&error);
        assert!(output.contains("No chairman produced a verdict after 2 attempts"));
        assert!(output.contains("HTTP 429: slow down"));
    }
}
