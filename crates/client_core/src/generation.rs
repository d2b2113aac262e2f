/// Identifies one request issued by a state machine. A completion carrying a
/// ticket that is no longer current belongs to a superseded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone, Default)]
pub(crate) struct Generation(u64);

impl Generation {
    pub(crate) fn advance(&mut self) -> Ticket {
        self.0 = self.0.wrapping_add(1);
        Ticket(self.0)
    }

    pub(crate) fn current(&self) -> Ticket {
        Ticket(self.0)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.0 == ticket.0
    }
}
