//! # Transaction Runner
//!
//! The event loop shared by all four transaction kinds. Each transaction
//! runs one loop on its own tokio task; the loop receives commands (routed
//! messages, application responses, timer firings, termination) and hands
//! them to the kind's [`TransactionLogic`], which answers with the next
//! state. The loop validates the transition, applies it and lets the logic
//! arm the timers of the new state.
//!
//! Timers post their firings into the same channel as messages, so a
//! transaction never handles two events at once and needs no locking of
//! its own data.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::transaction::logic::{TransactionContext, TransactionLogic};
use crate::transaction::{AtomicTransactionState, InternalTransactionCommand, TransactionState};

/// Runs a transaction until it terminates.
///
/// On exit all timers are cancelled, the transaction is removed from the
/// registry and the listener is told it terminated.
pub(crate) async fn run_transaction_loop<L>(
    mut tx: TransactionContext,
    logic: L,
    mut cmd_rx: mpsc::Receiver<InternalTransactionCommand>,
) where
    L: TransactionLogic,
{
    debug!(id = %tx.key, kind = ?logic.kind(), "Transaction loop starting");

    transition(&mut tx, &logic, logic.kind().initial_state()).await;

    while tx.state.get() != TransactionState::Terminated {
        let Some(command) = cmd_rx.recv().await else {
            debug!(id = %tx.key, "Command channel closed");
            break;
        };
        let current = tx.state.get();

        let outcome = match command {
            InternalTransactionCommand::ProcessMessage(message) => {
                logic.process_message(&mut tx, message, current).await
            }
            InternalTransactionCommand::SendResponse { response, reply } => {
                let result = logic.send_response(&mut tx, response, current).await;
                answer(reply, result)
            }
            InternalTransactionCommand::Retransmit { reply } => {
                let result = logic.retransmit(&mut tx, current).await.map(|_| None);
                answer(reply, result)
            }
            InternalTransactionCommand::Timer { timer, epoch } => {
                if !tx.timers.is_current(timer, epoch) {
                    trace!(id = %tx.key, %timer, epoch, "Dropping stale timer");
                    continue;
                }
                tx.timers.fired(timer);
                debug!(id = %tx.key, %timer, state = ?current, "Timer fired");
                logic.handle_timer(&mut tx, timer, current).await
            }
            InternalTransactionCommand::Terminate => {
                debug!(id = %tx.key, "Received Terminate command");
                Ok(Some(TransactionState::Terminated))
            }
        };

        match outcome {
            Ok(Some(next)) => transition(&mut tx, &logic, next).await,
            Ok(None) => {}
            Err(e) => fail(&mut tx, &logic, e).await,
        }
    }

    tx.timers.cancel_all();
    tx.state.set(TransactionState::Terminated);

    if let Some(registry) = tx.registry.upgrade() {
        registry.remove_if(&tx.key, |_, entry| Arc::ptr_eq(&entry.handle.state, &tx.state));
    }
    debug!(id = %tx.key, "Transaction loop ended");
    tx.listener.on_transaction_terminated(tx.handle());
}

/// Replies to the caller of an application command.
///
/// The caller gets every error. Only transport errors also reach the
/// loop, where they terminate the transaction.
fn answer(
    reply: oneshot::Sender<Result<()>>,
    result: Result<Option<TransactionState>>,
) -> Result<Option<TransactionState>> {
    let _ = reply.send(result.as_ref().map(|_| ()).map_err(|e| e.clone()));
    match result {
        Err(Error::Transport(reason)) => Err(Error::Transport(reason)),
        Err(_) => Ok(None),
        ok => ok,
    }
}

async fn fail<L: TransactionLogic>(tx: &mut TransactionContext, logic: &L, error: Error) {
    match error {
        Error::Transport(_) => {
            error!(id = %tx.key, error = %error, "Transport error, terminating transaction");
            tx.listener.on_transport_error(tx.handle(), &error);
            transition(tx, logic, TransactionState::Terminated).await;
        }
        _ => warn!(id = %tx.key, error = %error, state = ?tx.state.get(), "Transaction command failed"),
    }
}

/// Moves to `next`, then keeps following the states `on_enter_state` asks
/// for (a zero linger on a reliable transport goes straight to Terminated).
async fn transition<L: TransactionLogic>(
    tx: &mut TransactionContext,
    logic: &L,
    mut next: TransactionState,
) {
    loop {
        let current = tx.state.get();
        if current == next {
            trace!(id = %tx.key, state = ?current, "Already in requested state");
            return;
        }
        if let Err(e) = AtomicTransactionState::validate_transition(logic.kind(), current, next) {
            error!(id = %tx.key, error = %e, "Rejected state transition");
            return;
        }

        let previous = tx.state.set(next);
        debug!(id = %tx.key, from = ?previous, to = ?next, "State transition");

        if next == TransactionState::Terminated {
            tx.timers.cancel_all();
            return;
        }

        match logic.on_enter_state(tx, next, previous).await {
            Ok(Some(follow)) => next = follow,
            Ok(None) => return,
            Err(e @ Error::Transport(_)) => {
                error!(id = %tx.key, error = %e, state = ?next, "Transport error entering state");
                tx.listener.on_transport_error(tx.handle(), &e);
                next = TransactionState::Terminated;
            }
            Err(e) => {
                error!(id = %tx.key, error = %e, state = ?next, "Error entering state");
                return;
            }
        }
    }
}
