//! Single-flight run queue.
//!
//! One processor task drains the queue, so at most one styles build is
//! active at a time. The channel holds a single pending request: a trigger
//! that finds the slot taken coalesces into the pending run instead of
//! queueing another one.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use stylewright_build::{RunReport, StyleBuild};

use crate::error::WatchError;

pub(crate) struct RunRequest {
    compile_all: Option<bool>,
    source: &'static str,
    respond_to: Option<oneshot::Sender<Result<RunReport, WatchError>>>,
}

/// What happened to a fire-and-forget trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A new run was queued.
    Queued,
    /// A run was already pending; it will pick up this change.
    Coalesced,
    /// The processor is gone.
    Closed,
}

/// Sending half of the run queue. Cheap to clone.
#[derive(Clone)]
pub struct RunQueue {
    tx: mpsc::Sender<RunRequest>,
}

pub(crate) fn run_queue() -> (RunQueue, mpsc::Receiver<RunRequest>) {
    let (tx, rx) = mpsc::channel(1);
    (RunQueue { tx }, rx)
}

impl RunQueue {
    /// Queue a run and wait for its result.
    ///
    /// Waits for the pending slot if it is taken, so the run is never
    /// coalesced away.
    pub async fn submit(
        &self,
        compile_all: Option<bool>,
        source: &'static str,
    ) -> Result<RunReport, WatchError> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(RunRequest {
                compile_all,
                source,
                respond_to: Some(tx),
            })
            .await
            .map_err(|_| WatchError::ChannelClosed("run queue"))?;

        rx.await
            .map_err(|_| WatchError::ChannelClosed("run response"))?
    }

    /// Request a run with default options without waiting for it.
    pub fn trigger(&self, source: &'static str) -> Trigger {
        let request = RunRequest {
            compile_all: None,
            source,
            respond_to: None,
        };
        match self.tx.try_send(request) {
            Ok(()) => Trigger::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => Trigger::Coalesced,
            Err(mpsc::error::TrySendError::Closed(_)) => Trigger::Closed,
        }
    }
}

/// Drain the queue, running one build at a time on the blocking pool.
///
/// Failures of fire-and-forget runs are logged, including a build that
/// panicked; the processor keeps going. Only a waiting `submit` caller gets
/// the error back.
pub(crate) async fn processor_task(
    build: Arc<StyleBuild>,
    mut rx: mpsc::Receiver<RunRequest>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), WatchError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            maybe_request = rx.recv() => {
                let Some(request) = maybe_request else { break };
                let build = build.clone();
                let compile_all = request.compile_all;
                let task = tokio::task::spawn_blocking(move || build.run(compile_all));
                let result = match task.await {
                    Ok(outcome) => outcome.map_err(WatchError::from),
                    Err(err) => Err(WatchError::Runtime(format!("build task join error: {err}"))),
                };

                match request.respond_to {
                    Some(respond_to) => {
                        let _ = respond_to.send(result);
                    }
                    None => {
                        if let Err(err) = result {
                            tracing::error!(source = request.source, error = %err, "styles build failed");
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use stylewright_build::{BuildError, ExtensionPass, ExtensionPassConfig};
    use stylewright_core::{EntryPointRegistry, ExtensionStyleMap, ProjectLayout};
    use tempfile::TempDir;

    use super::*;

    /// Records `compile_all`; fails runs whose `compile_all` is `Some(false)`.
    struct RecordingPass {
        seen: Arc<Mutex<Vec<Option<bool>>>>,
    }

    impl ExtensionPass for RecordingPass {
        fn run(&self, config: &ExtensionPassConfig, _: &ExtensionStyleMap) -> Result<(), BuildError> {
            self.seen.lock().unwrap().push(config.compile_all);
            if config.compile_all == Some(false) {
                return Err(BuildError::ExtensionPass("refused".into()));
            }
            Ok(())
        }
    }

    /// Panics while `armed` is set, then disarms itself.
    struct PanickingPass {
        armed: Arc<AtomicBool>,
    }

    impl ExtensionPass for PanickingPass {
        fn run(&self, _: &ExtensionPassConfig, _: &ExtensionStyleMap) -> Result<(), BuildError> {
            if self.armed.swap(false, Ordering::SeqCst) {
                panic!("extension pass blew up");
            }
            Ok(())
        }
    }

    fn build_with(root: &TempDir, pass: Box<dyn ExtensionPass>) -> Arc<StyleBuild> {
        let build = StyleBuild::builder(ProjectLayout::new(root.path()))
            .entries(EntryPointRegistry::new(vec![]).expect("registry"))
            .extension_source(Arc::new(ExtensionStyleMap::new()))
            .extension_pass(pass)
            .build();
        Arc::new(build)
    }

    fn recording_build(root: &TempDir) -> (Arc<StyleBuild>, Arc<Mutex<Vec<Option<bool>>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let build = build_with(root, Box::new(RecordingPass { seen: seen.clone() }));
        (build, seen)
    }

    #[tokio::test]
    async fn triggers_coalesce_while_a_run_is_pending() {
        let (queue, mut rx) = run_queue();

        assert_eq!(queue.trigger("test"), Trigger::Queued);
        assert_eq!(queue.trigger("test"), Trigger::Coalesced);
        assert_eq!(queue.trigger("test"), Trigger::Coalesced);

        assert!(rx.try_recv().is_ok(), "exactly one pending run");
        assert!(rx.try_recv().is_err());
        assert_eq!(queue.trigger("test"), Trigger::Queued);
    }

    #[tokio::test]
    async fn trigger_reports_closed_processor() {
        let (queue, rx) = run_queue();
        drop(rx);
        assert_eq!(queue.trigger("test"), Trigger::Closed);
    }

    #[tokio::test]
    async fn triggered_runs_never_force_compile_all() {
        let root = TempDir::new().expect("root");
        let (build, seen) = recording_build(&root);
        let (queue, rx) = run_queue();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let processor = tokio::spawn(processor_task(build, rx, shutdown_rx));

        queue.submit(Some(true), "initial").await.expect("initial run");
        assert_eq!(queue.trigger("watcher"), Trigger::Queued);
        // FIFO: once this returns, the triggered run has completed.
        queue.submit(None, "barrier").await.expect("barrier run");

        assert_eq!(*seen.lock().unwrap(), vec![Some(true), None, None]);

        let _ = shutdown_tx.send(());
        processor.await.expect("join").expect("processor");
    }

    #[tokio::test]
    async fn failed_run_does_not_stop_the_processor() {
        let root = TempDir::new().expect("root");
        let (build, seen) = recording_build(&root);
        let (queue, rx) = run_queue();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let processor = tokio::spawn(processor_task(build, rx, shutdown_rx));

        let err = queue.submit(Some(false), "initial").await.unwrap_err();
        assert!(matches!(err, WatchError::Build(BuildError::ExtensionPass(_))), "got: {err}");

        let report = queue.submit(None, "retry").await.expect("processor still alive");
        assert_eq!(report.compile_all, None);
        assert_eq!(seen.lock().unwrap().len(), 2);

        let _ = shutdown_tx.send(());
        processor.await.expect("join").expect("processor");
    }

    #[tokio::test]
    async fn panicking_triggered_run_is_logged_and_skipped() {
        let root = TempDir::new().expect("root");
        let armed = Arc::new(AtomicBool::new(true));
        let build = build_with(&root, Box::new(PanickingPass { armed: armed.clone() }));
        let (queue, rx) = run_queue();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let processor = tokio::spawn(processor_task(build, rx, shutdown_rx));

        assert_eq!(queue.trigger("watcher"), Trigger::Queued);
        let report = queue.submit(None, "after").await.expect("processor still alive");
        assert_eq!(report.compile_all, None);
        assert!(!armed.load(Ordering::SeqCst), "triggered run ran first");

        let _ = shutdown_tx.send(());
        processor.await.expect("join").expect("processor");
    }

    #[tokio::test]
    async fn panicking_submitted_run_returns_runtime_error() {
        let root = TempDir::new().expect("root");
        let build = build_with(
            &root,
            Box::new(PanickingPass {
                armed: Arc::new(AtomicBool::new(true)),
            }),
        );
        let (queue, rx) = run_queue();
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let processor = tokio::spawn(processor_task(build, rx, shutdown_rx));

        let err = queue.submit(Some(true), "initial").await.unwrap_err();
        assert!(matches!(err, WatchError::Runtime(_)), "got: {err}");
        queue.submit(None, "retry").await.expect("processor still alive");

        let _ = shutdown_tx.send(());
        processor.await.expect("join").expect("processor");
    }

    #[tokio::test]
    async fn processor_stops_when_queue_is_dropped() {
        let root = TempDir::new().expect("root");
        let (build, _seen) = recording_build(&root);
        let (queue, rx) = run_queue();
        let (_shutdown_tx, shutdown_rx) = broadcast::channel(1);
        drop(queue);
        processor_task(build, rx, shutdown_rx)
            .await
            .expect("clean exit");
    }
}
