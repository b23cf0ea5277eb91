//! Client transactions: the side that sent the request.

mod invite;
mod non_invite;

use std::sync::Arc;

use sipline_sip_core::{Message, Response};
use tracing::debug;

use crate::error::{Error, Result};
use crate::event::ResponseEvent;
use crate::transaction::logic::TransactionContext;

pub(crate) use invite::InviteClientLogic;
pub(crate) use non_invite::NonInviteClientLogic;

fn expect_response(message: Message) -> Result<Response> {
    match message {
        Message::Response(response) => Ok(response),
        Message::Request(request) => Err(Error::InvalidMessage(format!(
            "client transaction received a {} request",
            request.method()
        ))),
    }
}

/// Hands a response to the application
fn deliver(tx: &TransactionContext, response: Arc<Response>) {
    debug!(id = %tx.key, status = %response.status(), "Delivering response");
    tx.listener.on_response(ResponseEvent::new(tx.handle(), response));
}
