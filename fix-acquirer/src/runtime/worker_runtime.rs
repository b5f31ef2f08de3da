//! Runtime helper for spawning the dispatch loop on its own thread.

use crate::observability::events;
use std::future::Future;
use std::io;
use std::thread;
use tokio::runtime::Builder;
use tracing::{debug, warn};

pub(crate) const DISPATCH_RUNTIME_THREAD_NAME: &str = "fix-acquirer-dispatch-runtime";

const COMPONENT: &str = "worker_runtime";

/// Join handle for a dispatch loop thread.
#[derive(Debug)]
pub(crate) struct DispatchLoopHandle {
    thread_name: String,
    join_handle: thread::JoinHandle<()>,
}

impl DispatchLoopHandle {
    pub(crate) fn thread_name(&self) -> &str {
        &self.thread_name
    }

    /// Blocks until the loop thread exits. A panicked loop is logged.
    pub(crate) fn join(self) {
        if self.join_handle.join().is_err() {
            warn!(
                event = events::RUNTIME_JOIN_FAILED,
                component = COMPONENT,
                worker_thread = self.thread_name.as_str(),
                "dispatch loop thread panicked"
            );
        }
    }
}

/// Builds a current-thread runtime and drives `run_loop` to completion on a
/// dedicated named thread.
pub(crate) fn spawn_dispatch_loop<F, Fut>(
    thread_name: Option<&str>,
    run_loop: F,
) -> io::Result<DispatchLoopHandle>
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + 'static,
{
    let thread_name = thread_name
        .unwrap_or(DISPATCH_RUNTIME_THREAD_NAME)
        .to_string();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .inspect_err(|err| {
            warn!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                worker_thread = thread_name.as_str(),
                err = %err,
                "unable to build dispatch runtime"
            )
        })?;

    let join_handle = thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            runtime.block_on(run_loop());
        })
        .inspect_err(|err| {
            warn!(
                event = events::RUNTIME_SPAWN_FAILED,
                component = COMPONENT,
                worker_thread = thread_name.as_str(),
                err = %err,
                "unable to spawn dispatch runtime thread"
            )
        })?;

    debug!(
        event = events::RUNTIME_SPAWN_OK,
        component = COMPONENT,
        worker_thread = thread_name.as_str(),
        "spawned dispatch runtime thread"
    );

    Ok(DispatchLoopHandle {
        thread_name,
        join_handle,
    })
}
