//! Server transactions: the side that received the request.

mod invite;
mod non_invite;

use sipline_sip_core::{Message, Request};

use crate::error::{Error, Result};

pub(crate) use invite::InviteServerLogic;
pub(crate) use non_invite::NonInviteServerLogic;

fn expect_request(message: Message) -> Result<Request> {
    match message {
        Message::Request(request) => Ok(request),
        Message::Response(response) => Err(Error::InvalidMessage(format!(
            "server transaction received response {}",
            response.status()
        ))),
    }
}
