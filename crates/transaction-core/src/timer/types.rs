use std::fmt;

/// The RFC 3261 transaction timers, plus the 200ms timer after which an
/// INVITE server transaction answers with 100 Trying on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerType {
    /// INVITE request retransmission
    A,
    /// INVITE transaction timeout
    B,
    /// Wait for response retransmissions (INVITE client)
    D,
    /// Non-INVITE request retransmission
    E,
    /// Non-INVITE transaction timeout
    F,
    /// INVITE response retransmission
    G,
    /// Wait for ACK
    H,
    /// Wait for ACK retransmissions
    I,
    /// Wait for request retransmissions (non-INVITE server)
    J,
    /// Wait for response retransmissions (non-INVITE client)
    K,
    /// Automatic 100 Trying
    Trying,
}

/// Each transaction holds at most one armed timer per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerSlot {
    Retransmit = 0,
    Timeout = 1,
    Linger = 2,
    Provisional = 3,
}

pub(crate) const SLOT_COUNT: usize = 4;

impl TimerType {
    pub(crate) fn slot(self) -> TimerSlot {
        match self {
            TimerType::A | TimerType::E | TimerType::G => TimerSlot::Retransmit,
            TimerType::B | TimerType::F | TimerType::H => TimerSlot::Timeout,
            TimerType::D | TimerType::I | TimerType::J | TimerType::K => TimerSlot::Linger,
            TimerType::Trying => TimerSlot::Provisional,
        }
    }
}

impl fmt::Display for TimerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerType::A => "A",
            TimerType::B => "B",
            TimerType::D => "D",
            TimerType::E => "E",
            TimerType::F => "F",
            TimerType::G => "G",
            TimerType::H => "H",
            TimerType::I => "I",
            TimerType::J => "J",
            TimerType::K => "K",
            TimerType::Trying => "100",
        };
        f.write_str(name)
    }
}
