use std::sync::atomic::{AtomicU64, Ordering};

/// Position of a lifecycle call in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Ticket(u64);

/// Monotonic counter of issued lifecycle calls. A call may only commit while
/// its ticket is the newest one, so the last call *issued* wins regardless
/// of completion order.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    issued: AtomicU64,
}

impl RequestSequence {
    pub fn issue(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket.0
    }
}
