//! Retry/fallback decision policy shared by Stage 1 and Stage 3.
//!
//! The policy is a pure function of the current tally. The caller performs
//! the invocations, records the outcomes, and asks for the next step until
//! it receives [`FallbackStep::Satisfied`] or [`FallbackStep::Exhausted`].
//!
//! ```text
//! Initial ──(short of quorum)──► Retry(failed) ──► Retried
//!    │                                              │
//!    └──────────(no retry configured)───────────────┤
//!                                                   ▼
//!                         Backup(batch) ◄──── short of quorum, backups left
//!                              │
//!                              └──► Exhausted when no backups remain
//! ```

use crate::core::model::Model;

/// How backup models are brought in once the retry has not reached quorum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupBatching {
    /// Try as many backups at once as there are missing successes.
    Parallel,
    /// Try backups one at a time.
    Sequential,
}

/// Where the caller is in the retry/fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPhase {
    /// Only the first parallel pass has run.
    Initial,
    /// The failed targets have been retried once.
    Retried,
    /// At least one backup batch has run.
    Backups,
}

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackStep {
    /// Quorum reached, stop.
    Satisfied,
    /// Re-invoke these (previously failed) targets once.
    Retry(Vec<Model>),
    /// Invoke these backups next; remove them from the remaining list.
    Backup(Vec<Model>),
    /// Quorum unreachable: terminal failure for the stage.
    Exhausted,
}

/// Retry/fallback parameters for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackPolicy {
    /// Minimum number of successes the stage needs.
    pub quorum: usize,
    /// Whether failed targets get one retry before backups.
    pub retry_failed: bool,
    pub batching: BackupBatching,
}

impl FallbackPolicy {
    /// Stage 1: two answers needed, backups fanned out to cover the shortfall.
    pub const fn dispatch() -> Self {
        Self {
            quorum: 2,
            retry_failed: true,
            batching: BackupBatching::Parallel,
        }
    }

    /// Stage 3: one verdict needed, backups tried strictly one at a time.
    pub const fn chairman() -> Self {
        Self {
            quorum: 1,
            retry_failed: true,
            batching: BackupBatching::Sequential,
        }
    }

    /// Number of successes still missing.
    pub fn shortfall(&self, successes: usize) -> usize {
        self.quorum.saturating_sub(successes)
    }

    /// Decide the next step.
    ///
    /// `failed` lists the targets whose latest outcome is a failure and
    /// `remaining_backups` the untried backups in priority order.
    pub fn next_step(
        &self,
        successes: usize,
        phase: FallbackPhase,
        failed: &[Model],
        remaining_backups: &[Model],
    ) -> FallbackStep {
        let shortfall = self.shortfall(successes);
        if shortfall == 0 {
            return FallbackStep::Satisfied;
        }

        if phase == FallbackPhase::Initial && self.retry_failed && !failed.is_empty() {
            return FallbackStep::Retry(failed.to_vec());
        }

        if remaining_backups.is_empty() {
            return FallbackStep::Exhausted;
        }

        let batch = match self.batching {
            BackupBatching::Parallel => shortfall,
            BackupBatching::Sequential => 1,
        };
        FallbackStep::Backup(remaining_backups.iter().take(batch).cloned().collect())
    }
}
