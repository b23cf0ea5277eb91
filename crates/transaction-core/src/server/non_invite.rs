//! Non-INVITE server transaction (RFC 3261 Section 17.2.2, Figure 8).

use std::sync::Arc;

use async_trait::async_trait;
use sipline_sip_core::{Message, Response};
use tracing::trace;

use crate::error::{Error, Result};
use crate::server::expect_request;
use crate::timer::TimerType;
use crate::transaction::logic::{TransactionContext, TransactionLogic};
use crate::transaction::{TransactionKind, TransactionState};

pub(crate) struct NonInviteServerLogic;

#[async_trait]
impl TransactionLogic for NonInviteServerLogic {
    fn kind(&self) -> TransactionKind {
        TransactionKind::NonInviteServer
    }

    async fn on_enter_state(
        &self,
        tx: &mut TransactionContext,
        state: TransactionState,
        _previous: TransactionState,
    ) -> Result<Option<TransactionState>> {
        if state != TransactionState::Completed {
            return Ok(None);
        }
        let wait = tx.linger(tx.config.timers.transaction_timeout);
        if wait.is_zero() {
            return Ok(Some(TransactionState::Terminated));
        }
        tx.start_timer(TimerType::J, wait);
        Ok(None)
    }

    async fn process_message(
        &self,
        tx: &mut TransactionContext,
        message: Message,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        let request = expect_request(message)?;
        trace!(id = %tx.key, method = %request.method(), ?state, "Request retransmission");
        // Nothing has been sent yet while Trying
        tx.resend_last_response().await?;
        Ok(None)
    }

    async fn handle_timer(
        &self,
        tx: &mut TransactionContext,
        timer: TimerType,
        state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        match (timer, state) {
            (TimerType::J, TransactionState::Completed) => Ok(Some(TransactionState::Terminated)),
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
        if !matches!(state, TransactionState::Trying | TransactionState::Proceeding) {
            return Err(Error::InvalidMessage(format!(
                "cannot send {} in state {}",
                response.status(),
                state
            )));
        }

        let status = response.status().clone();
        tx.send(Message::Response(response.clone())).await?;
        tx.last_response = Some(Arc::new(response));

        if status.is_final() {
            Ok(Some(TransactionState::Completed))
        } else if state == TransactionState::Trying {
            Ok(Some(TransactionState::Proceeding))
        } else {
            Ok(None)
        }
    }
}
