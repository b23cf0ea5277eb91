//! Transaction timers.
//!
//! ## Client Transaction Timers
//! - **Timer A** (INVITE): request retransmission, unreliable transports only
//! - **Timer B** (INVITE): transaction timeout
//! - **Timer D** (INVITE): wait for response retransmissions
//! - **Timer E** (non-INVITE): request retransmission, unreliable transports only
//! - **Timer F** (non-INVITE): transaction timeout
//! - **Timer K** (non-INVITE): wait for response retransmissions
//!
//! ## Server Transaction Timers
//! - **Timer G** (INVITE): response retransmission, unreliable transports only
//! - **Timer H** (INVITE): wait for ACK
//! - **Timer I** (INVITE): wait for ACK retransmissions
//! - **Timer J** (non-INVITE): wait for request retransmissions
//!
//! Every transaction arms its timers as tokio tasks that post back into the
//! transaction's own command channel.

mod handles;
pub mod settings;
pub mod types;

pub(crate) use handles::TimerHandles;
pub use settings::TimerSettings;
pub(crate) use types::TimerSlot;
pub use types::TimerType;
