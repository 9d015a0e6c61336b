//! Change notifications for a rendering loop.
//!
//! The form records what changed in a set shared with the receiver and
//! pokes a one-slot signal channel. A loop that falls behind never loses a
//! change: the set keeps accumulating until it is taken, and any number of
//! pokes collapse into one wakeup.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use tokio::sync::mpsc;

use crate::lock;

/// What a render notification was about.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Wakeup {
    /// A single field's value, status or errors changed, or the field was
    /// added or removed.
    Field(String),
    /// Form-level state changed (submission).
    Form,
}

type Pending = Arc<RwLock<BTreeSet<Wakeup>>>;

/// Sender half, installed into a form with [`Form::install_wakeup`](crate::Form::install_wakeup).
#[derive(Clone, Debug)]
pub struct WakeupSender {
    tx: mpsc::Sender<()>,
    pending: Pending,
}

impl WakeupSender {
    /// Record `change` and wake the receiver.
    ///
    /// Never blocks. If a wakeup is already queued the change simply joins
    /// the set it will deliver.
    pub fn send(&self, change: Wakeup) {
        lock::write(&self.pending).insert(change);
        let _ = self.tx.try_send(());
    }
}

/// Receiver half.
#[derive(Debug)]
pub struct WakeupReceiver {
    rx: mpsc::Receiver<()>,
    pending: Pending,
}

impl WakeupReceiver {
    /// Wait until something changed and take everything recorded so far.
    ///
    /// Returns `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<BTreeSet<Wakeup>> {
        loop {
            self.rx.recv().await?;
            let changes = self.take();
            if !changes.is_empty() {
                return Some(changes);
            }
        }
    }

    /// Take everything recorded so far without waiting. Empty if nothing changed.
    pub fn drain(&mut self) -> BTreeSet<Wakeup> {
        while self.rx.try_recv().is_ok() {}
        self.take()
    }

    fn take(&self) -> BTreeSet<Wakeup> {
        std::mem::take(&mut *lock::write(&self.pending))
    }
}

/// Create a new wakeup channel pair.
pub fn channel() -> (WakeupSender, WakeupReceiver) {
    let (tx, rx) = mpsc::channel(1);
    let pending = Pending::default();
    (
        WakeupSender {
            tx,
            pending: pending.clone(),
        },
        WakeupReceiver { rx, pending },
    )
}

/// The form's slot for an optional sender.
#[derive(Debug, Default)]
pub(crate) struct WakeupSlot {
    sender: RwLock<Option<WakeupSender>>,
}

impl WakeupSlot {
    pub(crate) fn install(&self, sender: WakeupSender) {
        *lock::write(&self.sender) = Some(sender);
    }

    pub(crate) fn notify(&self, change: Wakeup) {
        if let Some(sender) = lock::read(&self.sender).as_ref() {
            sender.send(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str) -> Wakeup {
        Wakeup::Field(name.to_string())
    }

    #[test]
    fn test_changes_accumulate_until_taken() {
        let (tx, mut rx) = channel();
        let slot = WakeupSlot::default();
        slot.notify(field("ignored"));
        assert!(rx.drain().is_empty());

        slot.install(tx);
        slot.notify(field("foo"));
        slot.notify(field("bar"));
        slot.notify(field("foo"));
        slot.notify(Wakeup::Form);

        let changes = rx.drain();
        assert_eq!(
            changes.into_iter().collect::<Vec<_>>(),
            vec![field("bar"), field("foo"), Wakeup::Form]
        );
        assert!(rx.drain().is_empty());
    }

    #[tokio::test]
    async fn test_recv_waits_for_changes() {
        let (tx, mut rx) = channel();
        tx.send(field("foo"));
        assert_eq!(rx.drain().len(), 1);

        tx.send(field("bar"));
        let changes = rx.recv().await.unwrap();
        assert_eq!(changes.into_iter().collect::<Vec<_>>(), vec![field("bar")]);

        drop(tx);
        assert_eq!(rx.recv().await, None);
    }
}
