/// Handle for one scheduled evaluation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// Last-write-wins bookkeeping for deferred evaluations
///
/// Each `schedule` supersedes every earlier ticket, so an evaluation that
/// was queued before a newer change can never overwrite the newer result.
#[derive(Debug, Default)]
pub struct Scheduler {
    generation: u64,
    pending: Option<u64>,
}

impl Scheduler {
    pub fn schedule(&mut self) -> Ticket {
        self.generation += 1;
        self.pending = Some(self.generation);
        Ticket {
            generation: self.generation,
        }
    }

    /// Drop whatever is pending
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    pub fn pending(&self) -> Option<Ticket> {
        self.pending.map(|generation| Ticket { generation })
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.pending == Some(ticket.generation)
    }

    /// Consume `ticket`; true only if it was still current
    pub fn take(&mut self, ticket: Ticket) -> bool {
        if self.is_current(ticket) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let mut scheduler = Scheduler::default();
        let first = scheduler.schedule();
        let second = scheduler.schedule();

        assert!(!scheduler.take(first));
        assert!(scheduler.take(second));
        assert_eq!(scheduler.pending(), None);
    }

    #[test]
    fn test_ticket_runs_once() {
        let mut scheduler = Scheduler::default();
        let ticket = scheduler.schedule();

        assert!(scheduler.take(ticket));
        assert!(!scheduler.take(ticket));
    }

    #[test]
    fn test_invalidate_discards_pending() {
        let mut scheduler = Scheduler::default();
        let ticket = scheduler.schedule();
        scheduler.invalidate();

        assert!(!scheduler.is_current(ticket));
        assert_eq!(scheduler.pending(), None);
    }
}
