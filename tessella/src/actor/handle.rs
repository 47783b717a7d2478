use std::sync::{Arc, Mutex, Weak};

use crate::actor::mailbox::Mailbox;
use crate::actor::scheduler::Scheduler;

/// Owner of a receiver object and its mailbox.
///
/// The actor is the sole source of valid mutable access to the object: other
/// threads reach it only by enqueueing invocations through an [`ActorRef`],
/// and the mailbox's serialized drain guarantees no two threads ever run the
/// object's operations concurrently. Dropping the actor closes the mailbox,
/// which turns every queued and future invocation into a no-op.
pub struct Actor<O: Send + 'static> {
    object: Arc<Mutex<O>>,
    mailbox: Arc<Mailbox>,
}

impl<O: Send + 'static> Actor<O> {
    pub fn new(scheduler: &Arc<dyn Scheduler>, object: O) -> Self {
        Self {
            object: Arc::new(Mutex::new(object)),
            mailbox: Mailbox::new(scheduler),
        }
    }

    /// Build the object with its own [`ActorRef`] already in hand, for
    /// receivers that pass a reciprocal reference to collaborators they
    /// construct.
    pub fn new_cyclic(
        scheduler: &Arc<dyn Scheduler>,
        build: impl FnOnce(ActorRef<O>) -> O,
    ) -> Self {
        let mailbox = Mailbox::new(scheduler);
        let object = Arc::new_cyclic(|weak: &Weak<Mutex<O>>| {
            let self_ref = ActorRef {
                object: weak.clone(),
                mailbox: Arc::downgrade(&mailbox),
            };
            Mutex::new(build(self_ref))
        });
        Self { object, mailbox }
    }

    /// Enqueue `operation` onto the mailbox. Arguments are captured by value
    /// in the closure; nothing borrowed crosses the thread boundary.
    pub fn invoke(&self, operation: impl FnOnce(&mut O) + Send + 'static) {
        let object = Arc::downgrade(&self.object);
        self.mailbox.push(Box::new(move || {
            if let Some(object) = object.upgrade() {
                operation(&mut object.lock().unwrap());
            }
        }));
    }

    /// Non-owning capability for other threads to enqueue invocations.
    pub fn actor_ref(&self) -> ActorRef<O> {
        ActorRef {
            object: Arc::downgrade(&self.object),
            mailbox: Arc::downgrade(&self.mailbox),
        }
    }

    /// Owner-side synchronous access to the object. Blocks only for the
    /// duration of an in-flight message on the same receiver.
    pub fn with<R>(&self, f: impl FnOnce(&mut O) -> R) -> R {
        f(&mut self.object.lock().unwrap())
    }

    /// Stop accepting messages early. Queued and future invocations become
    /// no-ops; dropping the actor does the same implicitly.
    pub fn close(&self) {
        self.mailbox.close();
    }
}

impl<O: Send + 'static> Drop for Actor<O> {
    fn drop(&mut self) {
        self.mailbox.close();
    }
}

/// Capability to enqueue invocations on an actor without owning it.
///
/// Holds weak references to both the receiver and its mailbox; once the
/// owning [`Actor`] is gone, `invoke` reports non-delivery and does nothing.
/// That silent inertness is what lets a tile cancel in-flight work by simply
/// being destroyed.
pub struct ActorRef<O> {
    object: Weak<Mutex<O>>,
    mailbox: Weak<Mailbox>,
}

impl<O> Clone for ActorRef<O> {
    fn clone(&self) -> Self {
        Self {
            object: self.object.clone(),
            mailbox: self.mailbox.clone(),
        }
    }
}

impl<O: Send + 'static> ActorRef<O> {
    /// Enqueue `operation`, returning whether it was delivered. Callers that
    /// treat the receiver as best-effort ignore the result.
    pub fn invoke(&self, operation: impl FnOnce(&mut O) + Send + 'static) -> bool {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return false;
        };
        if mailbox.is_closed() {
            return false;
        }
        let object = self.object.clone();
        mailbox.push(Box::new(move || {
            if let Some(object) = object.upgrade() {
                operation(&mut object.lock().unwrap());
            }
        }));
        true
    }
}
