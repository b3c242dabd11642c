//! Hand-off of host reads onto the host's main context.
//!
//! The host's state-access API may only be called from its single main
//! thread. [`MainContext`] is the capability the engine uses to get there:
//! [`MainContext::invoke`] posts a job and awaits its result through a
//! oneshot channel, so the calling cycle is suspended until the read is done.
//!
//! Three ways to get one:
//! - [`main_context`] returns a queue-backed handle plus a
//!   [`MainContextRunner`] that the host drives from its own thread.
//! - [`MainContext::inline`] does the same but spawns that thread itself and
//!   moves the host onto it (the CLI).
//! - [`MainContext::direct`] wraps a thread-safe host and runs jobs on the
//!   caller, for hosts without thread affinity (tests).

use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};
use wikisync_core::errors::{Result, SyncError, SyncErrorKind};
use wikisync_core::host::HostState;

type Job = Box<dyn FnOnce(&dyn HostState) + Send>;

#[derive(Clone)]
enum Dispatch {
    Queue(mpsc::UnboundedSender<Job>),
    Direct(Arc<Mutex<dyn HostState + Send>>),
}

/// Cloneable handle for running reads on the host's main context.
#[derive(Clone)]
pub struct MainContext {
    dispatch: Dispatch,
}

impl std::fmt::Debug for MainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flavour = match self.dispatch {
            Dispatch::Queue(_) => "queue",
            Dispatch::Direct(_) => "direct",
        };
        f.debug_struct("MainContext")
            .field("dispatch", &flavour)
            .finish()
    }
}

/// Queue-backed main context: jobs run when the host calls the runner.
pub fn main_context<H: HostState>(host: H) -> (MainContext, MainContextRunner<H>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MainContext {
            dispatch: Dispatch::Queue(tx),
        },
        MainContextRunner { host, rx },
    )
}

const HOST_THREAD_NAME: &str = "wikisync-host";

impl MainContext {
    /// Queue-backed main context whose jobs run on a dedicated OS thread.
    ///
    /// The host is moved onto that thread and every read happens there. The
    /// thread exits once the last handle is dropped.
    ///
    /// # Errors
    ///
    /// `Io` if the thread cannot be spawned.
    pub fn inline<H: HostState + Send + 'static>(host: H) -> Result<Self> {
        let (context, runner) = main_context(host);
        std::thread::Builder::new()
            .name(HOST_THREAD_NAME.to_string())
            .spawn(move || {
                runner.run_until_closed();
            })
            .map_err(|e| {
                SyncError::new(SyncErrorKind::Io)
                    .with_op("main_context_spawn")
                    .with_message(format!("cannot start host thread: {}", e))
            })?;
        Ok(context)
    }

    /// Main context for a host whose reads are safe from any thread.
    pub fn direct<H: HostState + Send + 'static>(host: H) -> Self {
        let host: Arc<Mutex<dyn HostState + Send>> = Arc::new(Mutex::new(host));
        Self {
            dispatch: Dispatch::Direct(host),
        }
    }

    /// Run `job` against the host on the main context and await its result.
    ///
    /// # Errors
    ///
    /// `HostUnavailable` when the runner has been dropped (host shut down)
    /// or the job panicked.
    pub async fn invoke<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&dyn HostState) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |host| {
            // The waiting side may have given up; nothing to do then.
            let _ = reply_tx.send(job(host));
        });

        match &self.dispatch {
            Dispatch::Queue(tx) => tx
                .send(job)
                .map_err(|_| host_unavailable("main context is closed"))?,
            Dispatch::Direct(host) => {
                let guard = host
                    .lock()
                    .map_err(|_| host_unavailable("host state lock is poisoned"))?;
                job(&*guard);
            }
        }

        reply_rx
            .await
            .map_err(|_| host_unavailable("main context dropped the job before replying"))
    }

    /// True once a queue-backed context's runner is gone.
    pub fn is_closed(&self) -> bool {
        match &self.dispatch {
            Dispatch::Queue(tx) => tx.is_closed(),
            Dispatch::Direct(_) => false,
        }
    }
}

fn host_unavailable(message: &str) -> SyncError {
    SyncError::new(SyncErrorKind::HostUnavailable)
        .with_op("main_context_invoke")
        .with_message(message)
}

/// Host-side end of a queue-backed main context.
///
/// Owned by the host's main thread; the host state never leaves it.
pub struct MainContextRunner<H> {
    host: H,
    rx: mpsc::UnboundedReceiver<Job>,
}

impl<H: HostState> MainContextRunner<H> {
    /// Run every job queued so far on the calling thread; returns how many ran.
    ///
    /// Meant to be called from the host's own frame/tick callback.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(&self.host);
            ran += 1;
        }
        ran
    }

    /// Block the calling thread running jobs until every handle is dropped.
    ///
    /// Must not be called from inside an async runtime.
    pub fn run_until_closed(mut self) -> H {
        while let Some(job) = self.rx.blocking_recv() {
            job(&self.host);
        }
        self.host
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access between jobs, e.g. for the host to update its own state.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}
