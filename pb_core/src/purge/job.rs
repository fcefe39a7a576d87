use super::progress::{Progress, ProgressSnapshot};
use crate::format::{format_eta, progress_bar};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use itertools::Itertools;
use parking_lot::Mutex;
use poise::serenity_prelude::{GuildId, UserId};
use std::fmt;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Admitted, task not started yet.
    Pending,
    Running,
    Completed,
    Cancelled,
    /// Another purge held the guild when this one tried to start.
    Denied,
    /// The user had no messages.
    Empty,
}

impl JobState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobState::Pending | JobState::Running)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Completed => "completed",
            JobState::Cancelled => "cancelled",
            JobState::Denied => "denied",
            JobState::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Successful deletions per channel, in the order channels were first hit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChannelTally {
    counts: IndexMap<String, usize>,
}

impl ChannelTally {
    pub fn record(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_owned(), 1);
            }
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(l, c)| (l.as_str(), *c))
    }

    /// One `label: count` line per channel.
    #[must_use]
    pub fn breakdown(&self) -> String {
        if self.counts.is_empty() {
            return "None".to_owned();
        }
        self.counts
            .iter()
            .map(|(label, count)| format!("{label}: {count}"))
            .join("\n")
    }
}

/// One purge of one user in one guild.
pub struct PurgeJob {
    id: u64,
    guild_id: GuildId,
    user_id: UserId,
    initiated_by: Option<String>,
    started_at: DateTime<Utc>,
    state: watch::Sender<JobState>,
    pub(super) progress: Progress,
    pub(super) tally: Mutex<ChannelTally>,
    pub(super) cancel: CancellationToken,
}

impl PurgeJob {
    pub(super) fn new(
        id: u64,
        guild_id: GuildId,
        user_id: UserId,
        initiated_by: Option<String>,
    ) -> Self {
        PurgeJob {
            id,
            guild_id,
            user_id,
            initiated_by,
            started_at: Utc::now(),
            state: watch::Sender::new(JobState::Pending),
            progress: Progress::default(),
            tally: Mutex::new(ChannelTally::default()),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// None when the purge was started automatically.
    #[must_use]
    pub fn initiated_by(&self) -> Option<&str> {
        self.initiated_by.as_deref()
    }

    #[must_use]
    pub fn initiator_label(&self) -> &str {
        self.initiated_by().unwrap_or("Auto (Member Left)")
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    pub(super) fn set_state(&self, state: JobState) {
        self.state.send_replace(state);
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    #[must_use]
    pub fn tally(&self) -> ChannelTally {
        self.tally.lock().clone()
    }

    /// Asks the deletion loop to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Resolves with the terminal state once the job has finished.
    pub async fn wait(&self) -> JobState {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|s| s.is_terminal()).await {
            Ok(state) => *state,
            // the sender lives in self, so it can't be dropped while we borrow it.
            Err(_) => self.state(),
        }
    }

    /// Progress text for status queries.
    ///
    /// `/status` only ever sees live jobs; the terminal line is for callers
    /// still holding the job after [`PurgeJob::wait`] returns.
    #[must_use]
    pub fn render_status(&self, bar_length: usize) -> String {
        let snapshot = self.progress();
        match self.state() {
            JobState::Pending => format!("⏳ Purge for User ID {} is queued.", self.user_id),
            JobState::Running if snapshot.total == 0 => format!(
                "🔎 Collecting messages for User ID {} (started <t:{}:R>)...",
                self.user_id,
                self.started_at.timestamp()
            ),
            JobState::Running => render_progress("🧹 Purge Status", &snapshot, bar_length),
            state => format!("✅ Purge for User ID {} is {state}.", self.user_id),
        }
    }
}

/// Header, bar, counts and ETA, one per line.
pub(super) fn render_progress(
    header: &str,
    snapshot: &ProgressSnapshot,
    bar_length: usize,
) -> String {
    format!(
        "{header}\n{}\nDeleted: {} | Remaining: {}\nETA: {}",
        progress_bar(snapshot.percent(), bar_length),
        snapshot.deleted,
        snapshot.remaining(),
        format_eta(snapshot.eta_seconds()),
    )
}
