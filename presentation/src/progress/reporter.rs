//! Progress reporting for council runs
//!
//! Both presenters consume the run's [`SequencedEvent`] stream in order.
//! [`ProgressReporter`] draws one spinner per stage; [`SimpleProgress`]
//! writes plain lines for terminals that cannot redraw.

use colored::Colorize;
use council_domain::{
    AttemptOutcome, ChairmanAttempt, Model, PipelineError, ProgressEvent, SequencedEvent,
    Stage1Retry,
};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Something that shows a run's progress to the user
pub trait ProgressPresenter {
    fn on_event(&mut self, event: &SequencedEvent);
}

/// Reports progress during a council run with spinners
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            stage_bar: None,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_stage(&mut self, name: &'static str, message: &'static str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(name);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.stage_bar = Some(pb);
    }

    fn update(&self, message: String) {
        if let Some(pb) = &self.stage_bar {
            pb.set_message(message);
        }
    }

    fn finish_stage(&mut self, message: String) {
        if let Some(pb) = self.stage_bar.take() {
            pb.finish_with_message(message);
        }
    }

    fn fail_stage(&mut self, error: &PipelineError) {
        let message = format!("{} {}", "failed:".red().bold(), error.reason);
        match self.stage_bar.take() {
            Some(pb) => pb.abandon_with_message(message),
            None => {
                let _ = self.multi.println(message);
            }
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressPresenter for ProgressReporter {
    fn on_event(&mut self, event: &SequencedEvent) {
        match &event.event {
            ProgressEvent::Stage1Start {} => {
                self.start_stage("Stage 1: Responses", "waiting for competitors...")
            }
            ProgressEvent::Stage1Retry(retry) => self.update(describe_retry(retry)),
            ProgressEvent::Stage1Complete { responses } => self.finish_stage(format!(
                "{} {}/{} answered",
                "v".green(),
                responses.success_count(),
                responses.len()
            )),
            ProgressEvent::Stage2Start {} => {
                self.start_stage("Stage 2: Cross-Ranking", "models are ranking the answers...")
            }
            ProgressEvent::Stage2Complete(evaluation) => {
                let leader = evaluation
                    .aggregate
                    .first()
                    .map(|entry| format!(", leader {}", entry.model))
                    .unwrap_or_default();
                self.finish_stage(format!(
                    "{} {} rankings{}",
                    "v".green(),
                    evaluation.rankings.len(),
                    leader
                ))
            }
            ProgressEvent::Stage3Start {} => {
                self.start_stage("Stage 3: Verdict", "chairman is deliberating...")
            }
            ProgressEvent::Stage3Retry { attempts } => self.update(describe_chairman_retry(attempts)),
            ProgressEvent::Stage3Complete(result) => {
                self.finish_stage(format!("{} verdict by {}", "v".green(), result.model))
            }
            ProgressEvent::TitleComplete { title: Some(title) } => {
                let _ = self
                    .multi
                    .println(format!("{} {}", "Title:".cyan().bold(), title));
            }
            ProgressEvent::TitleComplete { title: None } | ProgressEvent::Complete {} => {}
            ProgressEvent::Error(error) => self.fail_stage(error),
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl SimpleProgress {
    /// The line printed for `event`, if any.
    pub fn describe(event: &ProgressEvent) -> Option<String> {
        let line = match event {
            ProgressEvent::Stage1Start {} => format!("{} {}", "->".cyan(), "Stage 1: Responses".bold()),
            ProgressEvent::Stage1Retry(retry) => format!("  {}", describe_retry(retry)),
            ProgressEvent::Stage1Complete { responses } => {
                let mut lines = Vec::new();
                for entry in responses.entries() {
                    match entry.outcome.failure_kind() {
                        None => lines.push(format!("  {} {}", "v".green(), entry.model)),
                        Some(kind) => {
                            lines.push(format!("  {} {} ({})", "x".red(), entry.model, kind))
                        }
                    }
                }
                lines.join("\n")
            }
            ProgressEvent::Stage2Start {} => {
                format!("{} {}", "->".cyan(), "Stage 2: Cross-Ranking".bold())
            }
            ProgressEvent::Stage2Complete(evaluation) => {
                let mut lines = Vec::new();
                for (position, entry) in evaluation.aggregate.iter().enumerate() {
                    lines.push(format!(
                        "  {}. {} ({:.2})",
                        position + 1,
                        entry.model,
                        entry.average_rank
                    ));
                }
                if lines.is_empty() {
                    lines.push(format!("  {}", "no usable rankings".dimmed()));
                }
                lines.join("\n")
            }
            ProgressEvent::Stage3Start {} => format!("{} {}", "->".cyan(), "Stage 3: Verdict".bold()),
            ProgressEvent::Stage3Retry { attempts } => {
                format!("  {}", describe_chairman_retry(attempts))
            }
            ProgressEvent::Stage3Complete(result) => {
                format!("  {} verdict by {}", "v".green(), result.model)
            }
            ProgressEvent::TitleComplete { title: Some(title) } => {
                format!("{} {}", "Title:".cyan().bold(), title)
            }
            ProgressEvent::TitleComplete { title: None } | ProgressEvent::Complete {} => {
                return None;
            }
            ProgressEvent::Error(error) => {
                format!("{} {}", "x".red(), error.reason)
            }
        };
        Some(line)
    }
}

impl ProgressPresenter for SimpleProgress {
    fn on_event(&mut self, event: &SequencedEvent) {
        if let Some(line) = Self::describe(&event.event) {
            eprintln!("{}", line);
        }
    }
}

fn describe_retry(retry: &Stage1Retry) -> String {
    let models = join(&retry.retrying);
    if retry.backup {
        format!("{} answered, trying backups: {}", retry.successful, models)
    } else {
        format!("{} answered, retrying: {}", retry.successful, models)
    }
}

fn describe_chairman_retry(attempts: &[ChairmanAttempt]) -> String {
    match attempts.last() {
        Some(ChairmanAttempt {
            model,
            outcome: AttemptOutcome::Failure { kind, .. },
            ..
        }) => format!(
            "{} failed ({}), attempt {} next",
            model,
            kind,
            attempts.len() + 1
        ),
        _ => format!("attempt {} next", attempts.len() + 1),
    }
}

fn join(models: &[Model]) -> String {
    models
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
