use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::timer::types::{TimerSlot, TimerType, SLOT_COUNT};
use crate::transaction::{InternalTransactionCommand, TransactionKey};

/// Armed timers of one transaction.
///
/// A timer is a sleeping task that posts `Timer { timer, epoch }` to the
/// transaction's command channel. Arming or cancelling a slot aborts the
/// previous task and bumps the slot's epoch, so a firing that was already
/// queued when the timer was replaced is recognised as stale.
#[derive(Debug, Default)]
pub(crate) struct TimerHandles {
    handles: [Option<JoinHandle<()>>; SLOT_COUNT],
    epochs: [u64; SLOT_COUNT],
}

impl TimerHandles {
    pub fn start(
        &mut self,
        key: &TransactionKey,
        timer: TimerType,
        delay: Duration,
        cmd_tx: &mpsc::Sender<InternalTransactionCommand>,
    ) {
        let slot = timer.slot() as usize;
        self.cancel_slot(slot);
        let epoch = self.epochs[slot];
        trace!(id = %key, %timer, ?delay, epoch, "Arming timer");

        let tx = cmd_tx.clone();
        self.handles[slot] = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(InternalTransactionCommand::Timer { timer, epoch }).await;
        }));
    }

    pub fn cancel(&mut self, slot: TimerSlot) {
        self.cancel_slot(slot as usize);
    }

    pub fn cancel_all(&mut self) {
        for slot in 0..SLOT_COUNT {
            self.cancel_slot(slot);
        }
    }

    /// True when `epoch` belongs to the timer currently armed for `timer`'s slot
    pub fn is_current(&self, timer: TimerType, epoch: u64) -> bool {
        let slot = timer.slot() as usize;
        self.handles[slot].is_some() && self.epochs[slot] == epoch
    }

    /// Marks the slot's timer as consumed once its firing has been accepted
    pub fn fired(&mut self, timer: TimerType) {
        self.handles[timer.slot() as usize] = None;
    }

    fn cancel_slot(&mut self, slot: usize) {
        if let Some(handle) = self.handles[slot].take() {
            handle.abort();
        }
        self.epochs[slot] += 1;
    }
}

impl Drop for TimerHandles {
    fn drop(&mut self) {
        for handle in self.handles.iter_mut().filter_map(Option::take) {
            handle.abort();
        }
    }
}
