use std::sync::Weak;

use crate::actor::mailbox::Mailbox;

/// Accepts mailboxes that just became non-empty and guarantees they are
/// eventually drained on some execution context.
///
/// # Contract
/// - `schedule` is called on every empty to non-empty transition of a
///   mailbox, never while the mailbox's queue lock is held.
/// - Calls for the same mailbox may be coalesced: one drain pass empties the
///   whole queue, so a second wake-up for work that pass already consumed is
///   redundant but harmless.
/// - The reference is weak; a scheduler must skip mailboxes whose owner is
///   gone instead of failing.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, mailbox: Weak<Mailbox>);
}
