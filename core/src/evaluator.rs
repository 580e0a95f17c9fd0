use core::time::Duration;
use web_time::Instant;

use crate::*;

/// Handle for the delayed flip-back of a mismatched pair.
///
/// A ticket belongs to the session that created it. Once that session is replaced the ticket
/// can still be handed back to the engine, but it no longer matches anything and is ignored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResetTicket {
    session: SessionId,
    first: Position,
    second: Position,
    due: Instant,
}

impl ResetTicket {
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn positions(&self) -> (Position, Position) {
        (self.first, self.second)
    }

    pub fn due(&self) -> Instant {
        self.due
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Time left until the ticket is due, which is what a host timer should wait for.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Evaluation {
    Matched,
    Won,
    Mismatched(ResetTicket),
}

/// Decides what happens to the two face-up tiles of a turn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchEvaluator {
    delay: Duration,
}

impl MatchEvaluator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Evaluates the pair just turned up, `session` must already be locked.
    ///
    /// A match is applied right away. A mismatch leaves both tiles face up and the input locked,
    /// returning the ticket that flips them back once `delay` has passed.
    pub fn evaluate(
        &self,
        session: &mut SessionState,
        first: Position,
        second: Position,
        now: Instant,
    ) -> Evaluation {
        debug_assert!(session.is_locked());

        if session.deck().is_pair(first, second) {
            log::trace!("({}, {}) matched", first, second);
            if session.solve_revealed() {
                log::debug!("Session {} won", session.id().get());
                Evaluation::Won
            } else {
                Evaluation::Matched
            }
        } else {
            log::trace!("({}, {}) mismatched", first, second);
            Evaluation::Mismatched(ResetTicket {
                session: session.id(),
                first,
                second,
                due: now + self.delay,
            })
        }
    }

    /// Flips a mismatched pair back down and unlocks input.
    ///
    /// Does nothing unless `ticket` describes exactly the state `session` is waiting in.
    pub fn apply_reset(session: &mut SessionState, ticket: ResetTicket) -> bool {
        let waiting = session.id() == ticket.session
            && session.is_locked()
            && session.revealed() == [ticket.first, ticket.second];
        if waiting {
            session.release();
        } else {
            log::warn!(
                "Reset ticket for session {} does not match session {}",
                ticket.session.get(),
                session.id().get()
            );
        }
        waiting
    }
}

impl Default for MatchEvaluator {
    fn default() -> Self {
        Self::new(GameConfig::default().mismatch_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked_session(first: Position, second: Position) -> SessionState {
        let deck = Deck::from_values(BoardSize::MIN, &[1, 2, 1, 2]).unwrap();
        let mut session = SessionState::new(SessionId::default(), deck);
        session.reveal_first(first);
        session.lock_with(second);
        session
    }

    #[test]
    fn match_is_applied_immediately() {
        let mut session = locked_session(0, 2);

        let evaluation = MatchEvaluator::default().evaluate(&mut session, 0, 2, Instant::now());

        assert_eq!(evaluation, Evaluation::Matched);
        assert!(session.is_solved(0));
        assert!(session.is_solved(2));
        assert!(session.revealed().is_empty());
        assert!(!session.is_locked());
    }

    #[test]
    fn mismatch_waits_for_ticket() {
        let mut session = locked_session(0, 1);
        let now = Instant::now();
        let evaluator = MatchEvaluator::new(Duration::from_millis(1000));

        let Evaluation::Mismatched(ticket) = evaluator.evaluate(&mut session, 0, 1, now) else {
            panic!("expected mismatch");
        };

        assert!(session.is_locked());
        assert_eq!(session.revealed(), [0, 1]);
        assert_eq!(ticket.positions(), (0, 1));
        assert_eq!(ticket.due(), now + evaluator.delay());
        assert!(!ticket.is_due(now + Duration::from_millis(999)));
        assert!(ticket.is_due(now + Duration::from_millis(1000)));
        assert_eq!(ticket.remaining(now), Duration::from_millis(1000));

        assert!(MatchEvaluator::apply_reset(&mut session, ticket));
        assert!(session.revealed().is_empty());
        assert!(!session.is_locked());
    }

    #[test]
    fn reset_from_other_session_is_ignored() {
        let mut session = locked_session(0, 1);
        let evaluator = MatchEvaluator::default();
        let Evaluation::Mismatched(ticket) = evaluator.evaluate(&mut session, 0, 1, Instant::now())
        else {
            panic!("expected mismatch");
        };

        let deck = Deck::from_values(BoardSize::MIN, &[1, 2, 1, 2]).unwrap();
        let mut next = SessionState::new(session.id().next(), deck);
        next.reveal_first(0);
        next.lock_with(1);

        assert!(!MatchEvaluator::apply_reset(&mut next, ticket));
        assert!(next.is_locked());
        assert_eq!(next.revealed(), [0, 1]);
    }
}
