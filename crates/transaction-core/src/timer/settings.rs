use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timer durations of RFC 3261 Section 17 and Appendix A.
///
/// Values are read by every transaction at creation and never change while
/// it runs. Defaults are the RFC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    /// RTT estimate; initial retransmission interval
    pub t1: Duration,
    /// Cap on the retransmission interval of non-INVITE requests and INVITE responses
    pub t2: Duration,
    /// Maximum time a message remains in the network
    pub t4: Duration,
    /// 64*T1: Timers B, F, H and J
    pub transaction_timeout: Duration,
    /// Timer D: linger for response retransmissions after a non-2xx INVITE final
    pub wait_time_d: Duration,
    /// Timer K: linger for response retransmissions after a non-INVITE final
    pub wait_time_k: Duration,
}

impl Default for TimerSettings {
    fn default() -> Self {
        TimerSettings::from_t1(Duration::from_millis(500))
    }
}

impl TimerSettings {
    /// RFC defaults with the timeouts derived from `t1`
    pub fn from_t1(t1: Duration) -> Self {
        let t4 = Duration::from_secs(5);
        TimerSettings {
            t1,
            t2: Duration::from_secs(4),
            t4,
            transaction_timeout: t1.saturating_mul(64),
            wait_time_d: Duration::from_secs(32),
            wait_time_k: t4,
        }
    }

    /// Next retransmission interval after `current`, doubled and capped at T2
    pub fn backoff_capped(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.t2)
    }

    /// Next Timer A interval. It has no T2 cap; an interval past the
    /// transaction timeout would never fire, so it stops growing there.
    pub fn backoff_uncapped(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.transaction_timeout)
    }
}
