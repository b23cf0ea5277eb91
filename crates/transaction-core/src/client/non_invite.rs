//! Non-INVITE client transaction (RFC 3261 Section 17.1.2, Figure 6).

use std::sync::Arc;

use async_trait::async_trait;
use sipline_sip_core::Message;
use tracing::{debug, trace};

use crate::client::{deliver, expect_response};
use crate::error::Result;
use crate::event::Timeout;
use crate::timer::{TimerSlot, TimerType};
use crate::transaction::logic::{TransactionContext, TransactionLogic};
use crate::transaction::{TransactionKind, TransactionState};

pub(crate) struct NonInviteClientLogic;

#[async_trait]
impl TransactionLogic for NonInviteClientLogic {
    fn kind(&self) -> TransactionKind {
        TransactionKind::NonInviteClient
    }

    async fn on_enter_state(
        &self,
        tx: &mut TransactionContext,
        state: TransactionState,
        _previous: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match state {
            TransactionState::Trying => {
                if !tx.reliable {
                    tx.interval = tx.config.timers.t1;
                    tx.start_timer(TimerType::E, tx.interval);
                }
                tx.start_timer(TimerType::F, tx.config.timers.transaction_timeout);
                Ok(None)
            }
            // Timers E and F keep running; E switches to T2 on its next firing
            TransactionState::Proceeding => Ok(None),
            TransactionState::Completed => {
                tx.cancel_timer(TimerSlot::Retransmit);
                tx.cancel_timer(TimerSlot::Timeout);
                let wait = tx.linger(tx.config.timers.wait_time_k);
                if wait.is_zero() {
                    return Ok(Some(TransactionState::Terminated));
                }
                tx.start_timer(TimerType::K, wait);
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

        match state {
            TransactionState::Trying | TransactionState::Proceeding => {
                let status = response.status().clone();
                deliver(tx, response);
                if status.is_final() {
                    Ok(Some(TransactionState::Completed))
                } else if state == TransactionState::Trying {
                    Ok(Some(TransactionState::Proceeding))
                } else {
                    Ok(None)
                }
            }
            _ => {
                trace!(id = %tx.key, status = %response.status(), ?state, "Absorbing response retransmission");
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
            (TimerType::E, TransactionState::Trying | TransactionState::Proceeding) => {
                debug!(id = %tx.key, interval = ?tx.interval, "Retransmitting {}", tx.key.method);
                tx.resend_request().await?;
                tx.interval = if state == TransactionState::Trying {
                    tx.config.timers.backoff_capped(tx.interval)
                } else {
                    tx.config.timers.t2
                };
                tx.start_timer(TimerType::E, tx.interval);
                Ok(None)
            }
            (TimerType::F, TransactionState::Trying | TransactionState::Proceeding) => {
                debug!(id = %tx.key, "Non-INVITE transaction timed out");
                tx.notify_timeout(Timeout::Transaction);
                Ok(Some(TransactionState::Terminated))
            }
            (TimerType::K, TransactionState::Completed) => Ok(Some(TransactionState::Terminated)),
            _ => {
                trace!(id = %tx.key, %timer, ?state, "Timer ignored in this state");
                Ok(None)
            }
        }
    }
}
