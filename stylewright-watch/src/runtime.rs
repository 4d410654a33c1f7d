use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{broadcast, mpsc};

use stylewright_build::{RunReport, StyleBuild};
use stylewright_core::BuildOptions;

use crate::error::{io_err, WatchError};
use crate::queue::{processor_task, run_queue, RunQueue, Trigger};

/// Build the styles once (and keep watching when `options.watch` is set),
/// blocking the current thread until done.
pub fn start_blocking(
    build: Arc<StyleBuild>,
    options: BuildOptions,
) -> Result<RunReport, WatchError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(compile_all_styles(build, options))
}

/// Run the styles build; in watch mode keep recompiling on source changes
/// until ctrl-c.
///
/// Returns the report of the initial run.
pub async fn compile_all_styles(
    build: Arc<StyleBuild>,
    options: BuildOptions,
) -> Result<RunReport, WatchError> {
    run_until(build, options, async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("received ctrl-c, stopping watcher"),
            Err(err) => tracing::error!(error = %err, "ctrl-c handler failed"),
        }
    })
    .await
}

/// Like [`compile_all_styles`], but watch mode ends when `shutdown`
/// resolves instead of on ctrl-c.
pub async fn run_until<F>(
    build: Arc<StyleBuild>,
    options: BuildOptions,
    shutdown: F,
) -> Result<RunReport, WatchError>
where
    F: Future<Output = ()>,
{
    let (queue, run_rx) = run_queue();
    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(4);

    // The subscription is live before the initial run starts, so edits made
    // during that run are not lost.
    let watcher_handle = if options.watch {
        let source_dir = build.layout().source_dir();
        let (watcher, event_rx, source_dir) = watch_sources(&source_dir)?;
        let queue = queue.clone();
        let shutdown = shutdown_tx.clone();
        let task_shutdown_rx = shutdown.subscribe();
        Some(tokio::spawn(async move {
            let result = watcher_task(watcher, event_rx, source_dir, queue, task_shutdown_rx).await;
            let _ = shutdown.send(());
            result
        }))
    } else {
        None
    };

    let processor_handle = {
        let shutdown = shutdown_tx.clone();
        let task_shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let result = processor_task(build, run_rx, task_shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let initial = queue.submit(options.compile_all, "initial").await;

    if initial.is_ok() && watcher_handle.is_some() {
        tracing::info!("watching stylesheets for changes");
        tokio::select! {
            _ = shutdown => {}
            _ = shutdown_rx.recv() => {}
        }
    }

    let _ = shutdown_tx.send(());
    drop(queue);
    if let Some(handle) = watcher_handle {
        handle_join("watcher", handle.await)?;
    }
    handle_join("run_processor", processor_handle.await)?;
    initial
}

type EventReceiver = mpsc::UnboundedReceiver<notify::Result<Event>>;

/// Subscribe recursively to the stylesheet source tree.
fn watch_sources(
    source_dir: &Path,
) -> Result<(RecommendedWatcher, EventReceiver, PathBuf), WatchError> {
    // Events arrive with real paths (e.g. /private/var/... on macOS).
    let source_dir = std::fs::canonicalize(source_dir).map_err(|e| io_err(source_dir, e))?;

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let mut watcher = recommended_watcher(move |event| {
        let _ = event_tx.send(event);
    })?;
    watcher.watch(&source_dir, RecursiveMode::Recursive)?;
    tracing::debug!(path = %source_dir.display(), "watching stylesheet sources");

    Ok((watcher, event_rx, source_dir))
}

async fn watcher_task(
    _watcher: RecommendedWatcher,
    mut event_rx: EventReceiver,
    source_dir: PathBuf,
    queue: RunQueue,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), WatchError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            event = event_rx.recv() => {
                let Some(event) = event else { break };
                let event = match event {
                    Ok(event) => event,
                    Err(err) => {
                        tracing::warn!(error = %err, "watcher event error");
                        continue;
                    }
                };
                if !is_relevant_event_kind(&event.kind) {
                    continue;
                }
                let Some(path) = event.paths.iter().find(|p| is_stylesheet(p, &source_dir)) else {
                    continue;
                };

                match queue.trigger("watcher") {
                    Trigger::Queued => {
                        tracing::debug!(path = %path.display(), "stylesheet changed, run queued");
                    }
                    Trigger::Coalesced => {
                        tracing::debug!(path = %path.display(), "stylesheet changed, joined pending run");
                    }
                    Trigger::Closed => break,
                }
            }
        }
    }

    Ok(())
}

fn is_relevant_event_kind(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// `css/**/*.css`
fn is_stylesheet(path: &Path, source_dir: &Path) -> bool {
    path.starts_with(source_dir)
        && path.extension().and_then(|ext| ext.to_str()) == Some("css")
}

fn handle_join(
    task: &str,
    result: Result<Result<(), WatchError>, tokio::task::JoinError>,
) -> Result<(), WatchError> {
    match result {
        Ok(inner) => inner,
        Err(err) => Err(WatchError::Runtime(format!("{task} task join failure: {err}"))),
    }
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides the
/// default `info` level. Later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
