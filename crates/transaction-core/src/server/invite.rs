//! INVITE server transaction (RFC 3261 Section 17.2.1, Figure 7).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sipline_sip_core::types::{Method, StatusCode};
use sipline_sip_core::{Message, Response};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::event::Timeout;
use crate::server::expect_request;
use crate::timer::{TimerSlot, TimerType};
use crate::transaction::logic::{TransactionContext, TransactionLogic};
use crate::transaction::{TransactionKind, TransactionState};

/// Delay after which the transaction answers 100 Trying on its own
const TRYING_DELAY: Duration = Duration::from_millis(200);

pub(crate) struct InviteServerLogic;

#[async_trait]
impl TransactionLogic for InviteServerLogic {
    fn kind(&self) -> TransactionKind {
        TransactionKind::InviteServer
    }

    async fn on_enter_state(
        &self,
        tx: &mut TransactionContext,
        state: TransactionState,
        _previous: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match state {
            TransactionState::Proceeding => {
                if tx.config.auto_trying {
                    tx.start_timer(TimerType::Trying, TRYING_DELAY);
                }
                Ok(None)
            }
            TransactionState::Completed => {
                if !tx.reliable {
                    tx.interval = tx.config.timers.t1;
                    tx.start_timer(TimerType::G, tx.interval);
                }
                tx.start_timer(TimerType::H, tx.config.timers.transaction_timeout);
                Ok(None)
            }
            TransactionState::Confirmed => {
                tx.cancel_timer(TimerSlot::Retransmit);
                tx.cancel_timer(TimerSlot::Timeout);
                let wait = tx.linger(tx.config.timers.t4);
                if wait.is_zero() {
                    return Ok(Some(TransactionState::Terminated));
                }
                tx.start_timer(TimerType::I, wait);
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    async fn process_message(
        &self,
        tx: &mut TransactionContext,
        message: Message,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        let request = expect_request(message)?;

        match (request.method(), state) {
            (Method::Ack, TransactionState::Completed) => {
                debug!(id = %tx.key, "ACK received");
                Ok(Some(TransactionState::Confirmed))
            }
            (Method::Ack, _) => {
                trace!(id = %tx.key, ?state, "Absorbing ACK");
                Ok(None)
            }
            (_, TransactionState::Proceeding | TransactionState::Completed) => {
                trace!(id = %tx.key, ?state, "INVITE retransmission, resending last response");
                tx.resend_last_response().await?;
                Ok(None)
            }
            _ => {
                trace!(id = %tx.key, ?state, "Absorbing INVITE retransmission");
                Ok(None)
            }
        }
    }

    async fn handle_timer(
        &self,
        tx: &mut TransactionContext,
        timer: TimerType,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match (timer, state) {
            (TimerType::Trying, TransactionState::Proceeding) if tx.last_response.is_none() => {
                debug!(id = %tx.key, "Sending automatic 100 Trying");
                let trying = Response::for_request(&tx.request, StatusCode::new(100));
                tx.send(Message::Response(trying.clone())).await?;
                tx.last_response = Some(Arc::new(trying));
                Ok(None)
            }
            (TimerType::G, TransactionState::Completed) => {
                debug!(id = %tx.key, interval = ?tx.interval, "Retransmitting final response");
                tx.resend_last_response().await?;
                tx.interval = tx.config.timers.backoff_capped(tx.interval);
                tx.start_timer(TimerType::G, tx.interval);
                Ok(None)
            }
            (TimerType::H, TransactionState::Completed) => {
                debug!(id = %tx.key, "No ACK received");
                tx.notify_timeout(Timeout::Transaction);
                Ok(Some(TransactionState::Terminated))
            }
            (TimerType::I, TransactionState::Confirmed) => Ok(Some(TransactionState::Terminated)),
            _ => {
                trace!(id = %tx.key, %timer, ?state, "Timer ignored in this state");
                Ok(None)
            }
        }
    }

    async fn send_response(
        &self,
        tx: &mut TransactionContext,
        response: Response,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        if state != TransactionState::Proceeding {
            return Err(Error::InvalidMessage(format!(
                "cannot send {} in state {}",
                response.status(),
                state
            )));
        }
        tx.cancel_timer(TimerSlot::Provisional);

        let status = response.status().clone();
        tx.send(Message::Response(response.clone())).await?;
        tx.last_response = Some(Arc::new(response));

        if status.is_success() {
            Ok(Some(TransactionState::Terminated))
        } else if status.is_final() {
            Ok(Some(TransactionState::Completed))
        } else {
            Ok(None)
        }
    }
}
