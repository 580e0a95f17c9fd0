use rand::{Rng, SeedableRng, rngs::SmallRng};
use web_time::Instant;

use crate::*;

/// Owns the running session and routes every player action through it.
///
/// The engine never sleeps or spawns: a mismatch hands out a [`ResetTicket`] and the host either
/// polls [`GameEngine::tick`] from its event loop or feeds the ticket back through
/// [`GameEngine::resolve`] once its own timer fires.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    evaluator: MatchEvaluator,
    session: SessionState,
    pending: Option<ResetTicket>,
    seeds: SmallRng,
}

impl GameEngine {
    /// Creates an engine and initializes the first session at `config.size`.
    pub fn new(config: GameConfig) -> Result<Self> {
        let size = config.validate_size(config.size.get())?;
        let mut seeds = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::seed_from_u64(rand::random()),
        };
        let deck = RandomDeckGenerator::new(seeds.random()).generate(size);
        Ok(Self::from_parts(config, deck, seeds))
    }

    /// Creates an engine whose first session plays the given deck.
    ///
    /// The deck's size must pass the same checks as `config.size`.
    pub fn with_deck(config: GameConfig, deck: Deck) -> Result<Self> {
        config.validate_size(deck.size().get())?;
        let seeds = SmallRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        Ok(Self::from_parts(config, deck, seeds))
    }

    fn from_parts(config: GameConfig, deck: Deck, seeds: SmallRng) -> Self {
        let config = GameConfig {
            size: deck.size(),
            ..config
        };
        log::debug!("Session 0 started on a {} board", deck.size());
        Self {
            config,
            evaluator: MatchEvaluator::new(config.mismatch_delay()),
            session: SessionState::new(SessionId::default(), deck),
            pending: None,
            seeds,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    pub fn board_size(&self) -> BoardSize {
        self.session.size()
    }

    pub fn deck(&self) -> &Deck {
        self.session.deck()
    }

    pub fn is_face_up(&self, position: Position) -> bool {
        self.session.is_face_up(position)
    }

    pub fn is_solved(&self, position: Position) -> bool {
        self.session.is_solved(position)
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    pub fn is_won(&self) -> bool {
        self.session.is_won()
    }

    pub fn tile_view(&self, position: Position) -> TileView {
        self.session.tile_view(position)
    }

    /// The mismatch reset waiting to fire, if any.
    pub fn pending_reset(&self) -> Option<ResetTicket> {
        self.pending
    }

    pub fn observe(&self) -> Observation {
        Observation::from_session(&self.session)
    }

    /// Starts a new session with a freshly shuffled deck, dropping any pending reset.
    ///
    /// Sizes refused by the odd board policy leave the session untouched.
    pub fn initialize(&mut self, size: BoardSize) -> Result<()> {
        self.check_size(size.get())?;
        self.deal(size);
        Ok(())
    }

    /// Starts a new session playing the given deck, dropping any pending reset.
    pub fn initialize_with_deck(&mut self, deck: Deck) -> Result<()> {
        self.check_size(deck.size().get())?;
        self.start(deck);
        Ok(())
    }

    /// Starts over on the current board size.
    pub fn reset(&mut self) {
        self.deal(self.board_size());
    }

    /// Validates a raw side length and starts a new session when it differs from the current one.
    ///
    /// Returns whether a new session was started. Rejected values leave the session untouched.
    pub fn change_size(&mut self, side: u8) -> Result<bool> {
        let size = self.check_size(side)?;
        Ok(self.resize(size))
    }

    /// Grows the board by one step, saturating at the largest size.
    pub fn grow(&mut self) -> bool {
        self.resize(self.board_size().saturating_step(self.size_step()))
    }

    /// Shrinks the board by one step, saturating at the smallest size.
    pub fn shrink(&mut self) -> bool {
        self.resize(self.board_size().saturating_step(-self.size_step()))
    }

    fn size_step(&self) -> i8 {
        match self.config.odd_boards {
            OddBoardPolicy::ExcludeOrphan => 1,
            OddBoardPolicy::Reject => 2,
        }
    }

    fn resize(&mut self, size: BoardSize) -> bool {
        if size == self.board_size() {
            return false;
        }
        self.deal(size);
        true
    }

    fn check_size(&self, side: u8) -> Result<BoardSize> {
        self.config.validate_size(side).inspect_err(|err| {
            log::debug!("Rejected board size {}: {}", side, err);
        })
    }

    /// Sizes reaching here were already accepted by [`GameConfig::validate_size`].
    fn deal(&mut self, size: BoardSize) {
        let deck = RandomDeckGenerator::new(self.seeds.random()).generate(size);
        self.start(deck);
    }

    fn start(&mut self, deck: Deck) {
        if let Some(ticket) = self.pending.take() {
            log::debug!(
                "Cancelled pending reset of {:?} in session {}",
                ticket.positions(),
                ticket.session().get()
            );
        }

        let id = self.session.id().next();
        self.config.size = deck.size();
        log::debug!("Session {} started on a {} board", id.get(), deck.size());
        self.session = SessionState::new(id, deck);
    }

    pub fn reveal(&mut self, position: Position) -> RevealOutcome {
        self.reveal_at(position, Instant::now())
    }

    /// Turns a tile face up, `now` is the time any resulting reset is scheduled from.
    pub fn reveal_at(&mut self, position: Position, now: Instant) -> RevealOutcome {
        use RevealOutcome::*;

        if self.session.is_won() || self.session.is_locked() {
            log::trace!("({}) ignored, input is closed", position);
            return NoChange;
        }

        if !self.board_size().contains(position) {
            log::warn!("Ignoring reveal of unknown position {}", position);
            return NoChange;
        }

        if self.session.is_solved(position) {
            log::warn!("Ignoring reveal of solved position {}", position);
            return NoChange;
        }

        match (self.session.revealed().len(), self.session.first_revealed()) {
            (0, _) => {
                log::trace!("({}) revealed", position);
                self.session.reveal_first(position);
                Revealed
            }
            (1, Some(first)) if first == position => {
                log::trace!("({}) deselected", position);
                self.session.deselect();
                Deselected
            }
            (1, Some(first)) => {
                log::trace!("({}) revealed, comparing with ({})", position, first);
                self.session.lock_with(position);
                match self.evaluator.evaluate(&mut self.session, first, position, now) {
                    Evaluation::Matched => Matched,
                    Evaluation::Won => Won,
                    Evaluation::Mismatched(ticket) => {
                        self.pending = Some(ticket);
                        Mismatched(ticket)
                    }
                }
            }
            (count, _) => {
                log::warn!("Ignoring reveal with {} tiles already face up", count);
                NoChange
            }
        }
    }

    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    /// Fires the pending reset if it is due at `now`, returns whether it fired.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(ticket) if ticket.is_due(now) => self.resolve(ticket),
            _ => false,
        }
    }

    /// Fires a reset ticket handed out by [`GameEngine::reveal`] without checking its due time.
    ///
    /// Tickets that are not the one currently pending, such as those from an earlier session, are
    /// ignored.
    pub fn resolve(&mut self, ticket: ResetTicket) -> bool {
        if self.pending != Some(ticket) {
            log::warn!(
                "Ignoring stale reset ticket from session {}",
                ticket.session().get()
            );
            return false;
        }

        self.pending = None;
        MatchEvaluator::apply_reset(&mut self.session, ticket)
    }
}
