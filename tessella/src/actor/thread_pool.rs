use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, trace};

use crate::actor::mailbox::Mailbox;
use crate::actor::scheduler::Scheduler;

/// Configuration for the shared worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadPoolConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Name prefix the worker threads carry, visible in thread listings and
    /// log lines.
    pub thread_name: String,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            thread_name: "tessella-worker".to_string(),
        }
    }
}

lazy_static! {
    static ref SHARED_POOL: Arc<ThreadPool> = ThreadPool::with_config(ThreadPoolConfig::default());
}

/// Scheduler backed by a fixed set of worker threads.
///
/// Workers pull ready mailboxes from one shared queue and drain each one
/// completely before going back for the next, which keeps a single hot
/// mailbox from pinning more than one thread while preserving its FIFO
/// order. Mailboxes whose owner is gone by pickup time are skipped.
///
/// Dropping the pool wakes every idle worker and terminates without running
/// whatever is still queued; in-flight messages finish, everything behind
/// them is dropped with the queue.
pub struct ThreadPool {
    sender: flume::Sender<Weak<Mailbox>>,
    runtime: Option<Runtime>,
    shutting_down: Arc<AtomicBool>,
    workers: usize,
}

impl ThreadPool {
    pub fn new(workers: usize) -> Arc<Self> {
        Self::with_config(ThreadPoolConfig {
            workers,
            ..ThreadPoolConfig::default()
        })
    }

    pub fn with_config(config: ThreadPoolConfig) -> Arc<Self> {
        let workers = config.workers.max(1);
        let runtime = Builder::new_multi_thread()
            .worker_threads(workers)
            .thread_name(config.thread_name.clone())
            .build()
            .expect("failed to build worker pool runtime");

        let (sender, receiver) = flume::unbounded::<Weak<Mailbox>>();
        let shutting_down = Arc::new(AtomicBool::new(false));

        for worker_id in 0..workers {
            let receiver = receiver.clone();
            let shutting_down = shutting_down.clone();
            runtime.spawn(async move {
                trace!(worker_id, "pool worker started");
                // A disconnected queue is the shutdown wake-up.
                while let Ok(mailbox) = receiver.recv_async().await {
                    if shutting_down.load(Ordering::Acquire) {
                        break;
                    }
                    if let Some(mailbox) = mailbox.upgrade() {
                        mailbox.receive();
                    }
                }
                trace!(worker_id, "pool worker stopped");
            });
        }

        debug!(workers, "worker pool started");
        Arc::new(Self {
            sender,
            runtime: Some(runtime),
            shutting_down,
            workers,
        })
    }

    /// Process-wide pool sized to the machine, for embedders that do not
    /// manage their own.
    pub fn shared() -> Arc<ThreadPool> {
        SHARED_POOL.clone()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Scheduler for ThreadPool {
    fn schedule(&self, mailbox: Weak<Mailbox>) {
        // A disconnected channel means the pool is shutting down; dropping
        // the wake-up matches best-effort delivery.
        let _ = self.sender.send(mailbox);
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shutting_down.store(true, Ordering::Release);
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
