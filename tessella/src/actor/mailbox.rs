use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

use crate::actor::scheduler::Scheduler;

/// A queued unit of work: one bound method invocation with its arguments
/// captured by value at enqueue time.
pub type Message = Box<dyn FnOnce() + Send + 'static>;

struct QueueState {
    queue: VecDeque<Message>,
    closed: bool,
}

/// Ordered, thread-safe message queue bound to exactly one receiver.
///
/// The owning [`Actor`](crate::actor::Actor) holds the only strong reference
/// that keeps the receiver alive; everything else (`ActorRef`s, scheduler
/// queues) holds `Weak<Mailbox>`. Closing is terminal: queued tasks are
/// dropped and later pushes are silent no-ops. That silence is the
/// cancellation primitive of the whole pipeline, so it is deliberate, not an
/// error.
///
/// # Thread Safety
/// - `push`, `close` and `receive` may race freely; queue state sits under
///   one mutex that is never held while a task runs.
/// - A second mutex serializes `receive`, so two pool workers handed the
///   same mailbox cannot interleave its messages. FIFO order per mailbox is
///   absolute; order across mailboxes is unspecified.
pub struct Mailbox {
    state: Mutex<QueueState>,
    receiving: Mutex<()>,
    scheduler: Weak<dyn Scheduler>,
    weak_self: Weak<Mailbox>,
}

impl Mailbox {
    pub fn new(scheduler: &Arc<dyn Scheduler>) -> Arc<Self> {
        Arc::new_cyclic(|weak_self| Self {
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                closed: false,
            }),
            receiving: Mutex::new(()),
            scheduler: Arc::downgrade(scheduler),
            weak_self: weak_self.clone(),
        })
    }

    /// Append `message` if the mailbox is open, waking the scheduler on the
    /// empty to non-empty transition. A closed mailbox drops the message.
    pub fn push(&self, message: Message) {
        let was_empty = {
            let mut state = self.state.lock().unwrap();
            if state.closed {
                return;
            }
            let was_empty = state.queue.is_empty();
            state.queue.push_back(message);
            was_empty
        };

        if was_empty {
            if let Some(scheduler) = self.scheduler.upgrade() {
                scheduler.schedule(self.weak_self.clone());
            }
        }
    }

    /// Close the mailbox and drop everything still queued. Idempotent, and
    /// safe against concurrent `push` and `receive`.
    pub fn close(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.closed {
            trace!(dropped = state.queue.len(), "mailbox closed");
        }
        state.closed = true;
        state.queue.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }

    /// Drain and run every message currently queued, in FIFO order. Returns
    /// when the queue is empty or the mailbox closes mid-drain.
    pub fn receive(&self) {
        let _guard = self.receiving.lock().unwrap();
        loop {
            let message = {
                let mut state = self.state.lock().unwrap();
                if state.closed {
                    return;
                }
                match state.queue.pop_front() {
                    Some(message) => message,
                    None => return,
                }
            };
            message();
        }
    }
}
