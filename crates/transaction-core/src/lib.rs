//! # sipline-transaction-core
//!
//! The SIP transaction layer of RFC 3261 Section 17: client and server
//! transactions for INVITE and non-INVITE requests, their retransmission
//! and timeout timers, and delivery of responses, requests and timeouts to
//! the application through a [`SipListener`].
//!
//! ## Architecture
//!
//! - [`TransactionLayer`] keeps the registry of live transactions, keyed by
//!   [`TransactionKey`] (topmost Via branch, method, side).
//! - Every transaction runs its own tokio task. Messages, application
//!   responses and timer firings all arrive on that task's command channel,
//!   so one transaction never processes two events at once.
//! - Timer durations come from [`TimerSettings`]; retransmission timers run
//!   only when the [`Transport`] is unreliable.
//! - Messages are parsed and serialized by `sipline-sip-core`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use sipline_sip_core::prelude::{
//!     Address, CSeq, FromHeader, Method, Request, To, TypedHeader, Uri, Via, ViaEntry,
//! };
//! use sipline_sip_core::Message;
//! use sipline_transaction_core::{
//!     generate_branch, ChannelListener, TransactionConfig, TransactionEvent, TransactionLayer,
//!     Transport,
//! };
//!
//! #[derive(Debug)]
//! struct UdpSender(tokio::net::UdpSocket);
//!
//! #[async_trait]
//! impl Transport for UdpSender {
//!     async fn send_message(
//!         &self,
//!         message: Message,
//!         destination: SocketAddr,
//!     ) -> sipline_transaction_core::Result<()> {
//!         self.0
//!             .send_to(&message.to_bytes(), destination)
//!             .await
//!             .map(|_| ())
//!             .map_err(sipline_transaction_core::Error::transport)
//!     }
//!
//!     fn is_reliable(&self) -> bool {
//!         false
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let socket = tokio::net::UdpSocket::bind("0.0.0.0:5060").await?;
//! let (listener, mut events) = ChannelListener::new();
//! let layer = TransactionLayer::new(
//!     Arc::new(UdpSender(socket)),
//!     Arc::new(listener),
//!     TransactionConfig::default(),
//! );
//!
//! let request = Request::new(Method::Options, Uri::sip("example.com"))
//!     .with_header(TypedHeader::Via(Via::new(ViaEntry::new(
//!         "UDP",
//!         "192.0.2.1",
//!         Some(5060),
//!         &generate_branch(),
//!     ))))
//!     .with_header(TypedHeader::To(To::new(Address::new(Uri::sip("example.com")))))
//!     .with_header(TypedHeader::From(FromHeader::new(
//!         Address::new(Uri::sip("alice.example.com")).with_tag("1928301774"),
//!     )))
//!     .with_header(TypedHeader::CallId("a84b4c76e66710".parse()?))
//!     .with_header(TypedHeader::CSeq(CSeq::new(1, Method::Options)));
//!
//! layer.send_request(request, "192.0.2.10:5060".parse()?).await?;
//! while let Some(event) = events.recv().await {
//!     if let TransactionEvent::Response(response) = event {
//!         println!("{}", response.response().status());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod listener;
pub mod manager;
mod server;
pub mod timer;
pub mod transaction;
pub mod transport;
pub mod utils;

pub use config::{RetransmissionOwner, TransactionConfig};
pub use error::{Error, Result};
pub use event::{RequestEvent, ResponseEvent, Timeout, TimeoutEvent, TransactionEvent};
pub use listener::{ChannelListener, SipListener};
pub use manager::{Incoming, TransactionLayer};
pub use timer::{TimerSettings, TimerType};
pub use transaction::{
    AtomicTransactionState, TransactionHandle, TransactionKey, TransactionKind, TransactionState,
};
pub use transport::Transport;
pub use utils::{create_ack, generate_branch};
