//! Transaction layer configuration.

use serde::{Deserialize, Serialize};

use crate::timer::TimerSettings;

/// Who retransmits INVITE requests of client transactions.
///
/// With `Stack` the transaction resends the request on every Timer A firing
/// and the listener only hears about the final transaction timeout. With
/// `Application` the request is not resent; every Timer A firing is
/// reported as a `Retransmit` timeout and the application decides whether to
/// call [`TransactionLayer::retransmit`](crate::TransactionLayer::retransmit).
/// Non-INVITE and server transactions always retransmit in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RetransmissionOwner {
    #[default]
    Stack,
    Application,
}

/// Read-only settings shared by every transaction of a layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionConfig {
    pub timers: TimerSettings,
    pub invite_retransmission: RetransmissionOwner,
    /// Send 100 Trying for an INVITE the application has not answered within 200ms
    pub auto_trying: bool,
    /// Capacity of each transaction's command channel
    pub command_buffer: usize,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        TransactionConfig {
            timers: TimerSettings::default(),
            invite_retransmission: RetransmissionOwner::Stack,
            auto_trying: true,
            command_buffer: 32,
        }
    }
}

impl TransactionConfig {
    pub fn with_timers(mut self, timers: TimerSettings) -> Self {
        self.timers = timers;
        self
    }

    pub fn with_invite_retransmission(mut self, owner: RetransmissionOwner) -> Self {
        self.invite_retransmission = owner;
        self
    }

    pub fn with_auto_trying(mut self, enabled: bool) -> Self {
        self.auto_trying = enabled;
        self
    }

    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_builder() {
        let config = TransactionConfig::default()
            .with_timers(TimerSettings::from_t1(Duration::from_millis(200)))
            .with_invite_retransmission(RetransmissionOwner::Application)
            .with_auto_trying(false)
            .with_command_buffer(0);

        assert_eq!(config.timers.transaction_timeout, Duration::from_millis(12800));
        assert_eq!(config.invite_retransmission, RetransmissionOwner::Application);
        assert!(!config.auto_trying);
        assert_eq!(config.command_buffer, 1);
    }

    #[test]
    fn test_default_owner_is_stack() {
        assert_eq!(TransactionConfig::default().invite_retransmission, RetransmissionOwner::Stack);
    }
}
