//! The per-kind half of a transaction: what each state does on entry, on a
//! routed message and on a timer. The runner owns the loop; implementations
//! of [`TransactionLogic`] only decide.

use std::net::SocketAddr;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use sipline_sip_core::{Message, Request, Response};
use tokio::sync::mpsc;
use tracing::trace;

use crate::config::TransactionConfig;
use crate::error::{Error, Result};
use crate::event::{Timeout, TimeoutEvent};
use crate::listener::SipListener;
use crate::manager::Registry;
use crate::timer::{TimerHandles, TimerSlot, TimerType};
use crate::transaction::{
    AtomicTransactionState, InternalTransactionCommand, TransactionHandle, TransactionKey,
    TransactionKind, TransactionState,
};
use crate::transport::Transport;

/// Everything a running transaction owns
pub(crate) struct TransactionContext {
    pub key: TransactionKey,
    pub kind: TransactionKind,
    pub state: Arc<AtomicTransactionState>,
    /// The request that opened the transaction
    pub request: Arc<Request>,
    /// Where requests (client) or responses (server) are sent
    pub remote: SocketAddr,
    pub transport: Arc<dyn Transport>,
    pub listener: Arc<dyn SipListener>,
    pub config: TransactionConfig,
    pub reliable: bool,
    pub cmd_tx: mpsc::Sender<InternalTransactionCommand>,
    pub registry: Weak<Registry>,
    pub timers: TimerHandles,
    /// Current retransmission interval
    pub interval: Duration,
    /// Most recent response sent (server) or final response received (client)
    pub last_response: Option<Arc<Response>>,
    /// ACK generated for a non-2xx final response (INVITE client)
    pub ack: Option<Request>,
}

impl TransactionContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        handle: &TransactionHandle,
        request: Arc<Request>,
        remote: SocketAddr,
        transport: Arc<dyn Transport>,
        listener: Arc<dyn SipListener>,
        config: TransactionConfig,
        cmd_tx: mpsc::Sender<InternalTransactionCommand>,
        registry: Weak<Registry>,
    ) -> Self {
        let reliable = transport.is_reliable();
        let interval = config.timers.t1;
        TransactionContext {
            key: handle.key().clone(),
            kind: handle.kind(),
            state: handle.state.clone(),
            request,
            remote,
            transport,
            listener,
            config,
            reliable,
            cmd_tx,
            registry,
            timers: TimerHandles::default(),
            interval,
            last_response: None,
            ack: None,
        }
    }

    pub fn handle(&self) -> TransactionHandle {
        TransactionHandle::new(self.key.clone(), self.kind, self.state.clone())
    }

    pub fn start_timer(&mut self, timer: TimerType, delay: Duration) {
        self.timers.start(&self.key, timer, delay, &self.cmd_tx);
    }

    pub fn cancel_timer(&mut self, slot: TimerSlot) {
        self.timers.cancel(slot);
    }

    /// Linger interval for the Completed/Confirmed states: zero on reliable transports
    pub fn linger(&self, wait: Duration) -> Duration {
        if self.reliable {
            Duration::ZERO
        } else {
            wait
        }
    }

    pub async fn send(&self, message: Message) -> Result<()> {
        trace!(id = %self.key, remote = %self.remote, "Sending {}", start_line(&message));
        self.transport.send_message(message, self.remote).await.map_err(|e| match e {
            Error::Transport(_) => e,
            other => Error::transport(other),
        })
    }

    pub async fn resend_request(&self) -> Result<()> {
        self.send(Message::Request((*self.request).clone())).await
    }

    /// Resends the most recent response; a no-op before any was sent
    pub async fn resend_last_response(&self) -> Result<()> {
        match &self.last_response {
            Some(response) => self.send(Message::Response((**response).clone())).await,
            None => Ok(()),
        }
    }

    pub fn notify_timeout(&self, timeout: Timeout) {
        self.listener.on_timeout(TimeoutEvent::new(self.handle(), timeout));
    }
}

fn start_line(message: &Message) -> String {
    match message {
        Message::Request(request) => request.start_line(),
        Message::Response(response) => response.start_line(),
    }
}

/// State machine of one transaction kind.
///
/// Every method returns the state to move to next, if any. The runner
/// validates and applies the transition, then calls `on_enter_state`.
#[async_trait]
pub(crate) trait TransactionLogic: Send + Sync + 'static {
    fn kind(&self) -> TransactionKind;

    /// Arms and cancels timers for a state just entered
    async fn on_enter_state(
        &self,
        tx: &mut TransactionContext,
        state: TransactionState,
        previous: TransactionState,
    ) -> Result<Option<TransactionState>>;

    /// Handles a message the layer routed to this transaction
    async fn process_message(
        &self,
        tx: &mut TransactionContext,
        message: Message,
        state: TransactionState,
    ) -> Result<Option<TransactionState>>;

    /// Handles a timer firing that is still current
    async fn handle_timer(
        &self,
        tx: &mut TransactionContext,
        timer: TimerType,
        state: TransactionState,
    ) -> Result<Option<TransactionState>>;

    /// Sends a response from the application (server transactions)
    async fn send_response(
        &self,
        _tx: &mut TransactionContext,
        _response: Response,
        _state: TransactionState,
    ) -> Result<Option<TransactionState>> {
        Err(Error::InvalidMessage(
            "client transactions do not send responses".to_string(),
        ))
    }

    /// Resends the original request on the application's behalf (INVITE client)
    async fn retransmit(&self, _tx: &mut TransactionContext, _state: TransactionState) -> Result<()> {
        Err(Error::InvalidMessage(format!(
            "{:?} transactions are retransmitted by the stack",
            self.kind()
        )))
    }
}
