//! # Transaction Layer
//!
//! [`TransactionLayer`] owns the registry of live transactions. It creates
//! client transactions for outgoing requests, routes incoming messages to
//! the transaction they belong to, creates server transactions for new
//! requests and passes the application's responses to them.
//!
//! ```text
//!  application ──send_request──▶ ┌──────────────────┐ ──send_message──▶ Transport
//!              ──send_response─▶ │ TransactionLayer │
//!  socket ─────handle_incoming─▶ │  (key → task)    │
//!              ◀── SipListener ─ └──────────────────┘
//! ```
//!
//! Each transaction runs on its own tokio task; the layer only holds the
//! command sender and a [`TransactionHandle`] per key.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sipline_sip_core::types::Method;
use sipline_sip_core::{parse_message, Message, Request, Response};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::client::{InviteClientLogic, NonInviteClientLogic};
use crate::config::TransactionConfig;
use crate::error::{Error, Result};
use crate::event::RequestEvent;
use crate::listener::SipListener;
use crate::server::{InviteServerLogic, NonInviteServerLogic};
use crate::transaction::logic::TransactionContext;
use crate::transaction::runner::run_transaction_loop;
use crate::transaction::{
    AtomicTransactionState, InternalTransactionCommand, TransactionHandle, TransactionKey,
    TransactionKind, TransactionState,
};
use crate::transport::Transport;

/// Registry entry of a live transaction
#[derive(Debug)]
pub(crate) struct TransactionEntry {
    pub handle: TransactionHandle,
    pub cmd_tx: mpsc::Sender<InternalTransactionCommand>,
}

pub(crate) type Registry = DashMap<TransactionKey, TransactionEntry>;

/// Where an incoming message went
#[derive(Debug, Clone)]
pub enum Incoming {
    /// Routed to the live transaction with this key
    Matched(TransactionKey),
    /// A new request; its server transaction was created and the listener's
    /// `on_request` called
    NewTransaction(TransactionHandle),
    /// A response no client transaction is waiting for, such as a 2xx
    /// retransmission after the INVITE transaction terminated
    StrayResponse(Arc<Response>),
    /// An ACK matching no INVITE server transaction: the ACK for a 2xx,
    /// which the application handles
    StrayAck(Arc<Request>),
}

/// The transaction layer of one SIP stack instance
pub struct TransactionLayer {
    transport: Arc<dyn Transport>,
    listener: Arc<dyn SipListener>,
    config: TransactionConfig,
    transactions: Arc<Registry>,
    shut_down: AtomicBool,
}

impl TransactionLayer {
    pub fn new(
        transport: Arc<dyn Transport>,
        listener: Arc<dyn SipListener>,
        config: TransactionConfig,
    ) -> Self {
        // A loaded config can carry a zero capacity, which tokio rejects
        let command_buffer = config.command_buffer;
        let config = config.with_command_buffer(command_buffer);
        TransactionLayer {
            transport,
            listener,
            config,
            transactions: Arc::new(DashMap::new()),
            shut_down: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &TransactionConfig {
        &self.config
    }

    /// Number of live transactions
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Handle of the live transaction with `key`
    pub fn transaction(&self, key: &TransactionKey) -> Option<TransactionHandle> {
        self.transactions.get(key).map(|entry| entry.handle.clone())
    }

    /// Sends `request` to `destination` inside a new client transaction.
    ///
    /// The request must carry a topmost Via with a unique branch (see
    /// [`generate_branch`](crate::generate_branch)). ACK never creates a
    /// client transaction and is rejected here; send it through the
    /// transport directly.
    pub async fn send_request(&self, request: Request, destination: SocketAddr) -> Result<TransactionHandle> {
        self.ensure_running()?;
        if request.method() == &Method::Ack {
            return Err(Error::InvalidMessage(
                "ACK does not create a client transaction".to_string(),
            ));
        }
        let key = TransactionKey::for_client_request(&request)?;
        let request = validated_request(Message::Request(request))?;

        let kind = if request.method() == &Method::Invite {
            TransactionKind::InviteClient
        } else {
            TransactionKind::NonInviteClient
        };
        let (handle, cmd_tx, cmd_rx) = self.register(key.clone(), kind)?;

        if let Err(e) = self
            .transport
            .send_message(Message::Request((*request).clone()), destination)
            .await
        {
            warn!(id = %key, error = %e, "Initial send failed");
            self.transactions.remove(&key);
            return Err(match e {
                Error::Transport(_) => e,
                other => Error::transport(other),
            });
        }

        debug!(id = %key, %destination, "Client transaction created");
        self.spawn(&handle, request, destination, cmd_tx, cmd_rx);
        Ok(handle)
    }

    /// Parses one datagram and routes it.
    ///
    /// Stream transports parse with
    /// [`parse_stream`](sipline_sip_core::parse_stream) and call
    /// [`handle_message`](Self::handle_message) instead.
    pub async fn handle_incoming(&self, bytes: &[u8], source: SocketAddr) -> Result<Incoming> {
        let message = parse_message(bytes)?;
        self.handle_message(message, source).await
    }

    /// Routes a parsed message to its transaction
    pub async fn handle_message(&self, message: Message, source: SocketAddr) -> Result<Incoming> {
        self.ensure_running()?;
        match message {
            Message::Response(response) => self.handle_response(response).await,
            Message::Request(request) => self.handle_request(request, source).await,
        }
    }

    async fn handle_response(&self, response: Response) -> Result<Incoming> {
        if !response.status().is_valid() {
            return Err(Error::InvalidMessage(format!(
                "status code {} out of range",
                response.status()
            )));
        }
        let key = match TransactionKey::for_response(&response) {
            Ok(key) => key,
            Err(e) => {
                debug!(error = %e, "Response cannot be matched");
                return Ok(Incoming::StrayResponse(Arc::new(response)));
            }
        };

        if let Some(cmd_tx) = self.command_sender(&key) {
            let command = InternalTransactionCommand::ProcessMessage(Message::Response(response));
            return match cmd_tx.send(command).await {
                Ok(()) => {
                    trace!(id = %key, "Response routed");
                    Ok(Incoming::Matched(key))
                }
                Err(mpsc::error::SendError(command)) => {
                    debug!(id = %key, "Transaction ended before the response arrived");
                    match command {
                        InternalTransactionCommand::ProcessMessage(Message::Response(response)) => {
                            Ok(Incoming::StrayResponse(Arc::new(response)))
                        }
                        _ => Err(Error::TransactionTerminated(key)),
                    }
                }
            };
        }

        debug!(id = %key, status = %response.status(), "Stray response");
        Ok(Incoming::StrayResponse(Arc::new(response)))
    }

    async fn handle_request(&self, request: Request, source: SocketAddr) -> Result<Incoming> {
        let key = TransactionKey::for_server_request(&request)?;

        let mut message = Message::Request(request);
        if let Some(cmd_tx) = self.command_sender(&key) {
            match cmd_tx.send(InternalTransactionCommand::ProcessMessage(message)).await {
                Ok(()) => {
                    trace!(id = %key, "Request routed to existing transaction");
                    return Ok(Incoming::Matched(key));
                }
                Err(mpsc::error::SendError(command)) => {
                    // The transaction is on its way out; treat the request as new
                    self.transactions.remove(&key);
                    message = match command {
                        InternalTransactionCommand::ProcessMessage(message) => message,
                        _ => return Err(Error::TransactionTerminated(key)),
                    };
                }
            }
        }

        let request = validated_request(message)?;
        if request.method() == &Method::Ack {
            debug!(id = %key, "ACK matches no transaction");
            return Ok(Incoming::StrayAck(request));
        }

        let kind = if request.method() == &Method::Invite {
            TransactionKind::InviteServer
        } else {
            TransactionKind::NonInviteServer
        };
        let (handle, cmd_tx, cmd_rx) = self.register(key.clone(), kind)?;
        debug!(id = %key, %source, "Server transaction created");
        self.spawn(&handle, request.clone(), source, cmd_tx, cmd_rx);

        self.listener
            .on_request(RequestEvent::new(handle.clone(), request, source));
        Ok(Incoming::NewTransaction(handle))
    }

    /// Sends the application's response on the server transaction `key`.
    ///
    /// Responses go back to the address the request came from.
    pub async fn send_response(&self, key: &TransactionKey, response: Response) -> Result<()> {
        self.ensure_running()?;
        if !key.is_server {
            return Err(Error::InvalidMessage(format!("{} is not a server transaction", key)));
        }
        if !response.status().is_valid() {
            return Err(Error::InvalidMessage(format!(
                "status code {} out of range",
                response.status()
            )));
        }
        self.request_reply(key, |reply| InternalTransactionCommand::SendResponse { response, reply })
            .await
    }

    /// Resends the INVITE of a client transaction whose retransmissions
    /// belong to the application
    pub async fn retransmit(&self, key: &TransactionKey) -> Result<()> {
        self.ensure_running()?;
        self.request_reply(key, |reply| InternalTransactionCommand::Retransmit { reply })
            .await
    }

    /// Terminates one transaction without notifying the peer
    pub async fn terminate(&self, key: &TransactionKey) -> Result<()> {
        let cmd_tx = self
            .command_sender(key)
            .ok_or_else(|| Error::TransactionNotFound(key.clone()))?;
        cmd_tx
            .send(InternalTransactionCommand::Terminate)
            .await
            .map_err(|_| Error::TransactionTerminated(key.clone()))
    }

    /// Terminates every live transaction and refuses further work.
    ///
    /// Calling it again does nothing.
    pub async fn shutdown(&self) {
        if self.shut_down.swap(true, Ordering::AcqRel) {
            return;
        }
        let senders: Vec<_> = self
            .transactions
            .iter()
            .map(|entry| entry.cmd_tx.clone())
            .collect();
        let count = senders.len();
        for cmd_tx in senders {
            let _ = cmd_tx.send(InternalTransactionCommand::Terminate).await;
        }
        self.transactions.clear();
        info!(transactions = count, "Transaction layer shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_shut_down() {
            Err(Error::ShutDown)
        } else {
            Ok(())
        }
    }

    fn command_sender(&self, key: &TransactionKey) -> Option<mpsc::Sender<InternalTransactionCommand>> {
        self.transactions.get(key).map(|entry| entry.cmd_tx.clone())
    }

    async fn request_reply<F>(&self, key: &TransactionKey, command: F) -> Result<()>
    where
        F: FnOnce(oneshot::Sender<Result<()>>) -> InternalTransactionCommand,
    {
        let cmd_tx = self
            .command_sender(key)
            .ok_or_else(|| Error::TransactionNotFound(key.clone()))?;
        let (reply_tx, reply_rx) = oneshot::channel();
        cmd_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| Error::TransactionTerminated(key.clone()))?;
        reply_rx
            .await
            .map_err(|_| Error::TransactionTerminated(key.clone()))?
    }

    #[allow(clippy::type_complexity)]
    fn register(
        &self,
        key: TransactionKey,
        kind: TransactionKind,
    ) -> Result<(
        TransactionHandle,
        mpsc::Sender<InternalTransactionCommand>,
        mpsc::Receiver<InternalTransactionCommand>,
    )> {
        let (cmd_tx, cmd_rx) = mpsc::channel(self.config.command_buffer);
        let state = Arc::new(AtomicTransactionState::new(TransactionState::Initial));
        let handle = TransactionHandle::new(key.clone(), kind, state);

        match self.transactions.entry(key) {
            Entry::Occupied(occupied) => Err(Error::TransactionExists(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(TransactionEntry {
                    handle: handle.clone(),
                    cmd_tx: cmd_tx.clone(),
                });
                Ok((handle, cmd_tx, cmd_rx))
            }
        }
    }

    fn spawn(
        &self,
        handle: &TransactionHandle,
        request: Arc<Request>,
        remote: SocketAddr,
        cmd_tx: mpsc::Sender<InternalTransactionCommand>,
        cmd_rx: mpsc::Receiver<InternalTransactionCommand>,
    ) {
        let context = TransactionContext::new(
            handle,
            request,
            remote,
            self.transport.clone(),
            self.listener.clone(),
            self.config.clone(),
            cmd_tx,
            Arc::downgrade(&self.transactions),
        );
        match handle.kind() {
            TransactionKind::InviteClient => {
                tokio::spawn(run_transaction_loop(context, InviteClientLogic, cmd_rx));
            }
            TransactionKind::NonInviteClient => {
                tokio::spawn(run_transaction_loop(context, NonInviteClientLogic, cmd_rx));
            }
            TransactionKind::InviteServer => {
                tokio::spawn(run_transaction_loop(context, InviteServerLogic, cmd_rx));
            }
            TransactionKind::NonInviteServer => {
                tokio::spawn(run_transaction_loop(context, NonInviteServerLogic, cmd_rx));
            }
        }
    }
}

impl std::fmt::Debug for TransactionLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionLayer")
            .field("transport", &self.transport)
            .field("transactions", &self.transactions.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

/// Checks the message with [`Message::validate`] and unwraps the request
fn validated_request(message: Message) -> Result<Arc<Request>> {
    message
        .validate()
        .map_err(|e| Error::InvalidMessage(e.to_string()))?;
    match message {
        Message::Request(request) => Ok(Arc::new(request)),
        Message::Response(_) => Err(Error::InvalidMessage("expected a request".to_string())),
    }
}
