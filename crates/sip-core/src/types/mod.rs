//! Typed representations of SIP messages and header values

pub mod accept;
pub mod address;
pub mod call_id;
pub mod contact;
pub mod cseq;
pub mod diagnostic;
pub mod from;
pub mod headers;
pub mod media_type;
pub mod message;
pub mod method;
pub mod numeric;
pub mod param;
pub mod retry_after;
pub mod scalar;
pub mod sip_request;
pub mod sip_response;
pub mod status;
pub mod to;
pub mod uri;
pub mod version;
pub mod via;
pub mod warning;

pub use accept::Accept;
pub use address::Address;
pub use call_id::CallId;
pub use contact::Contact;
pub use cseq::CSeq;
pub use diagnostic::Diagnostic;
pub use from::From as FromHeader;
pub use headers::{HeaderAccess, HeaderName, TypedHeader};
pub use media_type::{ContentType, MediaType};
pub use message::Message;
pub use method::Method;
pub use numeric::Numeric;
pub use param::{Param, Params};
pub use retry_after::RetryAfter;
pub use scalar::{ContentLength, Expires, MaxForwards};
pub use sip_request::{Request, RequestUri};
pub use sip_response::Response;
pub use status::StatusCode;
pub use to::To;
pub use uri::{Host, Scheme, Uri};
pub use version::Version;
pub use via::{SentProtocol, Via, ViaEntry, BRANCH_MAGIC_COOKIE};
pub use warning::{Warning, WarningValue};
