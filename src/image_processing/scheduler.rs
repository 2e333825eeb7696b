//! Bookkeeping for previews computed off the UI thread
//!
//! At most one computation is in flight. Requests arriving meanwhile collapse
//! into a single pending run that starts when the in-flight one finishes, and
//! only the result of the newest request is ever applied.

/// Handle for one started computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What to do once a computation finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// The result belongs to the newest request and may be shown
    pub apply: bool,
    /// A computation that must be started now, with the current parameters
    pub next: Option<Ticket>,
}

#[derive(Debug, Default)]
pub struct PreviewScheduler {
    latest: u64,
    in_flight: Option<u64>,
    pending: bool,
}

impl PreviewScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter change
    ///
    /// Returns a ticket when the computation can start right away, `None` when
    /// it was queued behind the one in flight.
    pub fn request(&mut self) -> Option<Ticket> {
        self.latest += 1;
        if self.in_flight.is_some() {
            self.pending = true;
            None
        } else {
            self.in_flight = Some(self.latest);
            Some(Ticket {
                generation: self.latest,
            })
        }
    }

    /// Report that the computation for `ticket` finished
    pub fn complete(&mut self, ticket: Ticket) -> Completion {
        if self.in_flight != Some(ticket.generation) {
            return Completion {
                apply: false,
                next: None,
            };
        }

        self.in_flight = None;
        let apply = ticket.generation == self.latest;

        let next = if self.pending {
            self.pending = false;
            self.in_flight = Some(self.latest);
            Some(Ticket {
                generation: self.latest,
            })
        } else {
            None
        };

        Completion { apply, next }
    }

    /// Make every outstanding result stale, e.g. after a new image was loaded
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
