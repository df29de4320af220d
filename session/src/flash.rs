use scanword_core::FlashTicket;
use web_time::Instant;

/// Fire-once deadline for the error flash shown after a wrong guess.
///
/// The timer only hands back the ticket it was armed with; the engine decides
/// whether that ticket still refers to the flash on screen.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FlashTimer {
    pending: Option<(FlashTicket, Instant)>,
}

impl FlashTimer {
    pub fn arm(&mut self, ticket: FlashTicket, deadline: Instant) {
        self.pending = Some((ticket, deadline));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the ticket once `now` has reached the deadline.
    pub fn fire_due(&mut self, now: Instant) -> Option<FlashTicket> {
        match self.pending {
            Some((ticket, deadline)) if now >= deadline => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }
}
