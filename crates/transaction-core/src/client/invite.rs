//! INVITE client transaction (RFC 3261 Section 17.1.1, Figure 5).

use std::sync::Arc;

use async_trait::async_trait;
use sipline_sip_core::Message;
use tracing::{debug, trace};

use crate::client::{deliver, expect_response};
use crate::config::RetransmissionOwner;
use crate::error::{Error, Result};
use crate::event::Timeout;
use crate::timer::{TimerSlot, TimerType};
use crate::transaction::logic::{TransactionContext, TransactionLogic};
use crate::transaction::{TransactionKind, TransactionState};
use crate::utils::create_ack;

pub(crate) struct InviteClientLogic;

#[async_trait]
impl TransactionLogic for InviteClientLogic {
    fn kind(&self) -> TransactionKind {
        TransactionKind::InviteClient
    }

    async fn on_enter_state(
        &self,
        tx: &mut TransactionContext,
        state: TransactionState,
        _previous: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match state {
            TransactionState::Calling => {
                if !tx.reliable {
                    tx.interval = tx.config.timers.t1;
                    tx.start_timer(TimerType::A, tx.interval);
                }
                tx.start_timer(TimerType::B, tx.config.timers.transaction_timeout);
                Ok(None)
            }
            TransactionState::Proceeding => {
                // Timer B only guards the Calling state
                tx.cancel_timer(TimerSlot::Retransmit);
                tx.cancel_timer(TimerSlot::Timeout);
                Ok(None)
            }
            TransactionState::Completed => {
                tx.cancel_timer(TimerSlot::Retransmit);
                tx.cancel_timer(TimerSlot::Timeout);
                let wait = tx.linger(tx.config.timers.wait_time_d);
                if wait.is_zero() {
                    return Ok(Some(TransactionState::Terminated));
                }
                tx.start_timer(TimerType::D, wait);
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
        let response = Arc::new(expect_response(message)?);
        let status = response.status().clone();

        match state {
            TransactionState::Calling | TransactionState::Proceeding => {
                if status.is_provisional() {
                    deliver(tx, response);
                    Ok((state == TransactionState::Calling).then_some(TransactionState::Proceeding))
                } else if status.is_success() {
                    // The ACK for a 2xx belongs to the application
                    deliver(tx, response);
                    Ok(Some(TransactionState::Terminated))
                } else {
                    let ack = create_ack(&tx.request, &response)?;
                    deliver(tx, response);
                    tx.send(Message::Request(ack.clone())).await?;
                    tx.ack = Some(ack);
                    Ok(Some(TransactionState::Completed))
                }
            }
            TransactionState::Completed if status.is_final() => {
                if let Some(ack) = tx.ack.clone() {
                    trace!(id = %tx.key, %status, "Absorbing retransmitted final response, resending ACK");
                    tx.send(Message::Request(ack)).await?;
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    async fn handle_timer(
        &self,
        tx: &mut TransactionContext,
        timer: TimerType,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match (timer, state) {
            (TimerType::A, TransactionState::Calling) => {
                match tx.config.invite_retransmission {
                    RetransmissionOwner::Stack => {
                        debug!(id = %tx.key, interval = ?tx.interval, "Retransmitting INVITE");
                        tx.resend_request().await?;
                    }
                    RetransmissionOwner::Application => tx.notify_timeout(Timeout::Retransmit),
                }
                tx.interval = tx.config.timers.backoff_uncapped(tx.interval);
                tx.start_timer(TimerType::A, tx.interval);
                Ok(None)
            }
            (TimerType::B, TransactionState::Calling) => {
                debug!(id = %tx.key, "INVITE transaction timed out");
                tx.notify_timeout(Timeout::Transaction);
                Ok(Some(TransactionState::Terminated))
            }
            (TimerType::D, TransactionState::Completed) => Ok(Some(TransactionState::Terminated)),
            _ => {
                trace!(id = %tx.key, %timer, ?state, "Timer ignored in this state");
                Ok(None)
            }
        }
    }

    async fn retransmit(&self, tx: &mut TransactionContext, state: TransactionState) -> Result<()> {
        if state != TransactionState::Calling {
            return Err(Error::InvalidMessage(format!(
                "INVITE can only be resent while Calling, transaction is {}",
                state
            )));
        }
        debug!(id = %tx.key, "Application retransmitting INVITE");
        tx.resend_request().await
    }
}
