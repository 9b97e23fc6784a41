use std::cell::Cell;
use std::rc::Rc;

use super::FetchMode;
use crate::types::DataSourceParams;

/// A dispatched request: its sequence number, merge mode and the params it
/// was sent with.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    seq: u64,
    mode: FetchMode,
    params: DataSourceParams,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn mode(&self) -> FetchMode {
        self.mode
    }

    pub fn params(&self) -> &DataSourceParams {
        &self.params
    }
}

#[derive(Debug, Default)]
struct Counters {
    /// Last sequence number issued, 0 if none
    latest: Cell<u64>,
    /// Sequence number the next applied response must carry
    next: Cell<u64>,
}

/// Monotonic request counter shared by clones.
///
/// Responses are applied in the order their requests were issued. A
/// `Replace` request makes every earlier request stale; `Append` requests
/// only queue behind the ones issued before them.
#[derive(Debug, Clone, Default)]
pub struct RequestSequence {
    counters: Rc<Counters>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket. Sequence numbers start at 1.
    pub fn issue(&self, params: DataSourceParams, mode: FetchMode) -> RequestTicket {
        let seq = self.counters.latest.get() + 1;
        self.counters.latest.set(seq);
        if mode == FetchMode::Replace || self.counters.next.get() == 0 {
            self.counters.next.set(seq);
        }
        RequestTicket { seq, mode, params }
    }

    /// Sequence number of the most recently issued ticket, 0 if none.
    pub fn latest(&self) -> u64 {
        self.counters.latest.get()
    }

    /// Sequence number of the response that may be applied next.
    pub fn next(&self) -> u64 {
        self.counters.next.get()
    }

    /// The ticket's response can never be applied: a newer `Replace` was
    /// issued, or the sequence was reset after it was issued.
    pub fn is_stale(&self, ticket: &RequestTicket) -> bool {
        ticket.seq < self.counters.next.get()
    }

    /// The ticket's response may be applied now.
    pub fn is_next(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.counters.next.get()
    }

    /// Record that the response for `seq` was applied.
    pub fn mark_applied(&self, seq: u64) {
        let next = self.counters.next.get().max(seq + 1);
        self.counters.next.set(next);
    }

    /// Make every ticket issued so far stale.
    pub fn reset(&self) {
        self.counters.next.set(self.counters.latest.get() + 1);
    }
}
