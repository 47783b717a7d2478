//! Actor/mailbox runtime.
//!
//! A [`Mailbox`] is an ordered queue of type-erased tasks bound to exactly
//! one receiver; a [`Scheduler`] drains mailboxes that have pending work on
//! some execution context; [`ThreadPool`] is the scheduler used in
//! production. [`Actor`] ties a receiver object to its mailbox; [`ActorRef`]
//! is the capability other threads use to enqueue invocations on it.

pub mod handle;
pub mod mailbox;
pub mod scheduler;
pub mod thread_pool;

pub use handle::{Actor, ActorRef};
pub use mailbox::{Mailbox, Message};
pub use scheduler::Scheduler;
pub use thread_pool::{ThreadPool, ThreadPoolConfig};
