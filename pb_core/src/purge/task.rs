use super::collector::{TargetMessage, collect};
use super::job::{JobState, PurgeJob, render_progress};
use super::PurgeService;
use poise::serenity_prelude::ChannelId;
use std::sync::Arc;
use tracing::{debug, info, warn};

impl PurgeService {
    /// Body of a spawned purge: lock, collect, delete, report, clean up.
    pub(super) async fn run(self: Arc<Self>, job: Arc<PurgeJob>) {
        let guild_id = job.guild_id();
        let user_id = job.user_id();
        let log_channel = self.settings.log_channel(guild_id);

        // the registry should already keep a second job out, this catches stragglers.
        let Some(guard) = self.locks.try_acquire(guild_id) else {
            warn!("guild is still locked by another purge");
            if let Some(channel) = log_channel {
                self.send_log(
                    channel,
                    &format!(
                        "⚠️ Purge request denied for User ID {user_id} - another purge is running."
                    ),
                )
                .await;
            }
            self.finish(&job, JobState::Denied);
            return;
        };

        job.set_state(JobState::Running);
        info!("collecting messages");
        let messages = collect(self.host.as_ref(), guild_id, user_id).await;

        let state = if messages.is_empty() {
            if let Some(channel) = log_channel {
                self.send_log(channel, &format!("No messages found for user ID {user_id}."))
                    .await;
            }
            JobState::Empty
        } else {
            let state = self.delete_all(&job, &messages, log_channel).await;
            if let Some(channel) = log_channel {
                let notice = match state {
                    JobState::Cancelled => format!("❌ Purge cancelled for User ID {user_id}."),
                    _ => summary(&job),
                };
                self.send_log(channel, &notice).await;
            }
            state
        };

        drop(guard);
        self.finish(&job, state);
    }

    async fn delete_all(
        &self,
        job: &PurgeJob,
        messages: &[TargetMessage],
        log_channel: Option<ChannelId>,
    ) -> JobState {
        let total = messages.len();
        let user_id = job.user_id();
        let every = self.config.progress_every.max(1);
        job.progress.begin(total);
        info!(total, "deleting messages");

        let progress_message = match log_channel {
            Some(channel) => self
                .send_log(
                    channel,
                    &format!("🧹 Starting purge for User ID {user_id}\nTotal messages: {total}"),
                )
                .await
                .map(|id| (channel, id)),
            None => None,
        };

        for message in messages {
            if job.cancel.is_cancelled() {
                return JobState::Cancelled;
            }

            match self.host.delete_message(message.channel_id, message.id).await {
                Ok(()) => {
                    job.tally.lock().record(&message.channel_label);
                }
                Err(why) => {
                    debug!(message_id = %message.id, error = %why, "delete failed, skipping");
                }
            }

            let deleted = job.progress.advance();

            if let Some((channel, id)) = progress_message {
                if deleted % every == 0 || deleted == total {
                    let text = render_progress(
                        &format!("🧹 Purging User ID {user_id}"),
                        &job.progress(),
                        self.config.bar_length,
                    );
                    self.edit_log(channel, id, &text).await;
                }
            }

            if deleted < total {
                tokio::select! {
                    biased;
                    () = job.cancel.cancelled() => return JobState::Cancelled,
                    () = tokio::time::sleep(self.config.throttle) => {}
                }
            }
        }

        JobState::Completed
    }

    fn finish(&self, job: &PurgeJob, state: JobState) {
        self.deregister(job);
        job.set_state(state);

        let snapshot = job.progress();
        info!(
            %state,
            processed = snapshot.deleted,
            removed = job.tally().total(),
            "purge finished"
        );
    }
}

fn summary(job: &PurgeJob) -> String {
    format!(
        "✅ Purge Complete\nUser ID: {}\nDeleted: {}\nInitiated by: {}\n\n📊 Channel \
         Breakdown:\n{}",
        job.user_id(),
        job.progress().deleted,
        job.initiator_label(),
        job.tally().breakdown()
    )
}
