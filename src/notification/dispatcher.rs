use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use super::notification_models::{Notification, NotificationKind};
use super::notification_repository::NotificationRepository;
use crate::error::Result;

/// One unit of asynchronous notification work: signal `user_id` that
/// `task_id` was assigned to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationJob {
    pub task_id: Uuid,
    pub user_id: Uuid,
}

/// Sending half of the notification queue.
///
/// `enqueue` never blocks and never returns an error to the caller: the
/// channel is unbounded, and a closed channel (worker gone) is logged
/// and the job dropped. Callers must not rely on delivery ordering
/// relative to their own HTTP response.
#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::UnboundedSender<NotificationJob>,
}

impl NotificationDispatcher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NotificationJob>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, task_id: Uuid, user_id: Uuid) {
        let job = NotificationJob { task_id, user_id };
        if self.tx.send(job).is_err() {
            tracing::warn!(
                "Notification worker is gone; dropping job for task {}",
                job.task_id
            );
        }
    }
}

/// Where the worker records a received job.
pub trait NotificationSink: Send + Sync {
    fn record(
        &self,
        job: NotificationJob,
    ) -> impl std::future::Future<Output = Result<Notification>> + Send;
}

impl NotificationSink for NotificationRepository {
    async fn record(&self, job: NotificationJob) -> Result<Notification> {
        let message = format!("Task {} assigned to user {}", job.task_id, job.user_id);
        self.create(job.user_id, Some(job.task_id), NotificationKind::Info, &message)
            .await
    }
}

/// Receiving loop of the notification queue. Runs until every sender is
/// dropped. A failed record is logged and the loop continues; the job
/// is not retried.
pub async fn run_notification_worker<S: NotificationSink>(
    mut rx: mpsc::UnboundedReceiver<NotificationJob>,
    sink: S,
    broadcast_tx: broadcast::Sender<String>,
) {
    while let Some(job) = rx.recv().await {
        match sink.record(job).await {
            Ok(notification) => {
                let _ = broadcast_tx.send(format!(
                    "{}:{}",
                    notification.user_id, notification.message
                ));
                tracing::info!(
                    "Notification sent for task {} to user {}",
                    job.task_id,
                    job.user_id
                );
            }
            Err(e) => {
                tracing::error!(
                    "Failed to record notification for task {}: {:?}",
                    job.task_id,
                    e
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingSink {
        jobs: Arc<Mutex<Vec<NotificationJob>>>,
        fail: bool,
    }

    impl NotificationSink for RecordingSink {
        async fn record(&self, job: NotificationJob) -> Result<Notification> {
            if self.fail {
                return Err(crate::error::AppError::InternalError);
            }
            self.jobs.lock().unwrap().push(job);
            Ok(Notification {
                id: Uuid::new_v4(),
                user_id: job.user_id,
                task_id: Some(job.task_id),
                kind: NotificationKind::Info.to_string(),
                message: format!("Task {} assigned to user {}", job.task_id, job.user_id),
                is_read: false,
                created_at: Utc::now(),
            })
        }
    }

    #[tokio::test]
    async fn worker_records_jobs_in_order_and_broadcasts() {
        let (dispatcher, rx) = NotificationDispatcher::channel();
        let (broadcast_tx, mut broadcast_rx) = broadcast::channel(16);
        let sink = RecordingSink::default();

        let worker = tokio::spawn(run_notification_worker(rx, sink.clone(), broadcast_tx));

        let task_a = Uuid::new_v4();
        let task_b = Uuid::new_v4();
        let user = Uuid::new_v4();
        dispatcher.enqueue(task_a, user);
        dispatcher.enqueue(task_b, user);

        drop(dispatcher);
        worker.await.unwrap();

        let jobs = sink.jobs.lock().unwrap().clone();
        assert_eq!(
            jobs,
            vec![
                NotificationJob { task_id: task_a, user_id: user },
                NotificationJob { task_id: task_b, user_id: user },
            ]
        );

        let first = broadcast_rx.recv().await.unwrap();
        assert!(first.starts_with(&user.to_string()));
        assert!(first.contains(&task_a.to_string()));
    }

    #[tokio::test]
    async fn worker_continues_after_a_failed_record() {
        let (dispatcher, rx) = NotificationDispatcher::channel();
        let (broadcast_tx, _) = broadcast::channel(16);
        let sink = RecordingSink { fail: true, ..Default::default() };

        let worker = tokio::spawn(run_notification_worker(rx, sink.clone(), broadcast_tx));

        dispatcher.enqueue(Uuid::new_v4(), Uuid::new_v4());
        dispatcher.enqueue(Uuid::new_v4(), Uuid::new_v4());

        drop(dispatcher);
        // Worker must drain both jobs and exit cleanly despite errors.
        worker.await.unwrap();
        assert!(sink.jobs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn enqueue_after_worker_shutdown_does_not_fail_the_caller() {
        let (dispatcher, rx) = NotificationDispatcher::channel();
        drop(rx);

        // Log-and-continue: nothing to assert beyond "does not panic".
        dispatcher.enqueue(Uuid::new_v4(), Uuid::new_v4());
    }
}
