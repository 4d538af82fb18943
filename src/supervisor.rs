//! One independently supervised worker per bot identity.
//!
//! Each worker runs inside its own spawned task, so an error or a panic in
//! one identity (bad credentials, a bug in a handler) is logged with its label
//! and never touches the siblings.

use std::future::Future;

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::tokens::BotIdentity;

/// How a worker ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerExit {
    Stopped,
    Failed(String),
    Panicked,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub identity: String,
    pub exit: WorkerExit,
}

/// Start `worker` once per identity and wait until every worker has ended
pub async fn supervise<F, Fut>(identities: Vec<BotIdentity>, worker: F) -> Vec<WorkerReport>
where
    F: Fn(BotIdentity) -> Fut,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    let mut workers = JoinSet::new();

    for identity in identities {
        let label = identity.label();
        info!(identity = %label, "Starting bot worker");
        let task = tokio::spawn(worker(identity));

        workers.spawn(async move {
            let exit = match task.await {
                Ok(Ok(())) => {
                    info!(identity = %label, "Bot worker stopped");
                    WorkerExit::Stopped
                }
                Ok(Err(e)) => {
                    error!(identity = %label, error = ?e, "Bot worker failed");
                    WorkerExit::Failed(format!("{e:#}"))
                }
                Err(e) if e.is_panic() => {
                    error!(identity = %label, "Bot worker panicked");
                    WorkerExit::Panicked
                }
                Err(_) => {
                    error!(identity = %label, "Bot worker was cancelled");
                    WorkerExit::Cancelled
                }
            };
            WorkerReport {
                identity: label,
                exit,
            }
        });
    }

    let mut reports = Vec::new();
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(report) => reports.push(report),
            Err(e) => error!(error = %e, "Supervisor task ended abnormally"),
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let identities = vec![
            BotIdentity::new("1:ok"),
            BotIdentity::new("2:bad"),
            BotIdentity::new("3:panic"),
            BotIdentity::new("4:ok"),
        ];
        let completed = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&completed);
        let mut reports = supervise(identities, move |identity| {
            let counter = Arc::clone(&counter);
            async move {
                match identity.token() {
                    "2:bad" => anyhow::bail!("unauthorized"),
                    "3:panic" => panic!("handler bug"),
                    _ => {
                        tokio::task::yield_now().await;
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }
            }
        })
        .await;
        reports.sort_by(|a, b| a.identity.cmp(&b.identity));

        assert_eq!(completed.load(Ordering::SeqCst), 2);
        assert_eq!(
            reports,
            vec![
                WorkerReport { identity: "bot1".into(), exit: WorkerExit::Stopped },
                WorkerReport { identity: "bot2".into(), exit: WorkerExit::Failed("unauthorized".into()) },
                WorkerReport { identity: "bot3".into(), exit: WorkerExit::Panicked },
                WorkerReport { identity: "bot4".into(), exit: WorkerExit::Stopped },
            ]
        );
    }

    #[tokio::test]
    async fn test_no_identities() {
        let reports = supervise(Vec::new(), |_| async { Ok::<(), anyhow::Error>(()) }).await;
        assert!(reports.is_empty());
    }
}
