#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::time::{timeout, Duration, Instant};
use tracing_subscriber::EnvFilter;

use sipline_sip_core::prelude::*;
use sipline_transaction_core::{
    generate_branch, ChannelListener, Error, Result, TransactionConfig, TransactionEvent,
    TransactionLayer, Transport,
};

pub const CLIENT_ADDR: &str = "192.0.2.1:5060";
pub const SERVER_ADDR: &str = "192.0.2.10:5060";

pub fn client_addr() -> SocketAddr {
    CLIENT_ADDR.parse().unwrap()
}

pub fn server_addr() -> SocketAddr {
    SERVER_ADDR.parse().unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// One message handed to the transport
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub message: Message,
    pub destination: SocketAddr,
    pub at: Instant,
}

/// Transport that records everything sent through it
#[derive(Debug, Clone)]
pub struct MockTransport {
    sent: Arc<Mutex<VecDeque<SentMessage>>>,
    reliable: bool,
    failing: Arc<AtomicBool>,
}

impl MockTransport {
    pub fn unreliable() -> Self {
        Self::new(false)
    }

    pub fn reliable() -> Self {
        Self::new(true)
    }

    fn new(reliable: bool) -> Self {
        MockTransport {
            sent: Arc::new(Mutex::new(VecDeque::new())),
            reliable,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Makes every following send fail
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.sent.lock().await.clear();
    }

    /// Requests sent with `method`, oldest first
    pub async fn requests(&self, method: Method) -> Vec<SentMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|sent| {
                matches!(&sent.message, Message::Request(request) if request.method() == &method)
            })
            .cloned()
            .collect()
    }

    /// Status codes of the responses sent, oldest first
    pub async fn response_codes(&self) -> Vec<u16> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|sent| match &sent.message {
                Message::Response(response) => response.status().as_u16(),
                Message::Request(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_message(&self, message: Message, destination: SocketAddr) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::transport("network unreachable"));
        }
        self.sent.lock().await.push_back(SentMessage {
            message,
            destination,
            at: Instant::now(),
        });
        Ok(())
    }

    fn is_reliable(&self) -> bool {
        self.reliable
    }
}

pub fn new_layer(
    transport: &MockTransport,
    config: TransactionConfig,
) -> (TransactionLayer, mpsc::UnboundedReceiver<TransactionEvent>) {
    init_tracing();
    let (listener, events) = ChannelListener::new();
    let layer = TransactionLayer::new(Arc::new(transport.clone()), Arc::new(listener), config);
    (layer, events)
}

/// An outgoing request with a fresh branch
pub fn outgoing_request(method: Method, cseq: u64) -> Request {
    let branch = generate_branch();
    Request::new(method.clone(), Uri::sip("biloxi.com"))
        .with_header(TypedHeader::Via(Via::new(ViaEntry::new(
            "UDP",
            "192.0.2.1",
            Some(5060),
            &branch,
        ))))
        .with_header(TypedHeader::MaxForwards(MaxForwards::new(70)))
        .with_header(TypedHeader::To(To::new(Address::new(Uri::sip("biloxi.com")))))
        .with_header(TypedHeader::From(FromHeader::new(
            Address::new(Uri::sip("atlanta.com")).with_tag("1928301774"),
        )))
        .with_header(TypedHeader::CallId("a84b4c76e66710@pc33.atlanta.com".parse().unwrap()))
        .with_header(TypedHeader::CSeq(CSeq::new(cseq, method)))
}

/// Wire bytes of a request arriving from [`CLIENT_ADDR`]
pub fn incoming_request(method: &str, branch: &str, cseq_method: &str) -> Vec<u8> {
    format!(
        "{method} sip:bob@biloxi.com SIP/2.0\r\n\
         Via: SIP/2.0/UDP pc33.atlanta.com;branch={branch}\r\n\
         Max-Forwards: 70\r\n\
         To: Bob <sip:bob@biloxi.com>\r\n\
         From: Alice <sip:alice@atlanta.com>;tag=1928301774\r\n\
         Call-ID: a84b4c76e66710@pc33.atlanta.com\r\n\
         CSeq: 314159 {cseq_method}\r\n\
         Contact: <sip:alice@pc33.atlanta.com>\r\n\
         Content-Length: 0\r\n\
         \r\n"
    )
    .into_bytes()
}

/// A response to `request` as the server would send it
pub fn response_to(request: &Request, code: u16) -> Response {
    let response = Response::for_request(request, StatusCode::new(code));
    if code > 100 {
        response.with_to_tag("a6c85cf")
    } else {
        response
    }
}

/// Waits for the next event, failing the test after a while
pub async fn next_event(events: &mut mpsc::UnboundedReceiver<TransactionEvent>) -> TransactionEvent {
    timeout(Duration::from_secs(120), events.recv())
        .await
        .expect("timed out waiting for a transaction event")
        .expect("event channel closed")
}

/// Events already queued, without waiting
pub fn drain_events(events: &mut mpsc::UnboundedReceiver<TransactionEvent>) -> Vec<TransactionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Lets spawned transaction tasks run without moving the clock much
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
