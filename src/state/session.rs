use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::NewMatch;

/// Default number of points a side needs before it can win.
pub const DEFAULT_POINTS_TO_WIN: u32 = 11;
/// Default lead a side must hold over its opponent to win.
pub const DEFAULT_WIN_MARGIN: u32 = 2;

/// High-level phases a match session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Players are being selected; no score is kept yet.
    Setup,
    /// Points are being scored and the clock is running.
    Playing,
    /// One side satisfied the win condition; the result awaits persistence.
    Finished,
}

/// One of the two sides of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// First selected player.
    One,
    /// Second selected player.
    Two,
}

impl Slot {
    /// The opposite side.
    pub fn other(self) -> Self {
        match self {
            Slot::One => Slot::Two,
            Slot::Two => Slot::One,
        }
    }
}

/// Win condition applied after every point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRules {
    /// Minimum score the winning side must reach.
    pub points_to_win: u32,
    /// Minimum lead the winning side must hold.
    pub win_margin: u32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            points_to_win: DEFAULT_POINTS_TO_WIN,
            win_margin: DEFAULT_WIN_MARGIN,
        }
    }
}

impl MatchRules {
    /// Whether `score` wins against `opponent` under these rules.
    pub fn is_winning(&self, score: u32, opponent: u32) -> bool {
        score >= self.points_to_win && score >= opponent.saturating_add(self.win_margin)
    }

    /// Whether the pair of scores is where point-by-point play stops: the
    /// winner reached the target on exactly the point that gave the winning lead.
    pub fn is_terminal(&self, score_one: u32, score_two: u32) -> bool {
        let (winner, loser) = (score_one.max(score_two), score_one.min(score_two));
        winner != loser && winner == self.points_to_win.max(loser.saturating_add(self.win_margin))
    }
}

/// Result of registering a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOutcome {
    /// The session was not playing; nothing changed.
    Ignored,
    /// The point was added and the match continues.
    Scored,
    /// The point was added and the given side won the match.
    Won(Slot),
}

/// Errors raised by session transitions. None of them alter the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// At least one slot is still empty.
    #[error("players not selected")]
    PlayersNotSelected,
    /// Both slots hold the same player.
    #[error("players must differ")]
    PlayersMustDiffer,
    /// The operation is not allowed in the current phase.
    #[error("cannot {operation} while the session is {phase:?}")]
    InvalidPhase {
        /// Operation that was attempted.
        operation: &'static str,
        /// Phase the session was in.
        phase: SessionPhase,
    },
}

/// In-memory state of the single live match.
///
/// Transitions are plain methods; persistence and timing are driven from the
/// outside (see [`crate::state::live::SessionDriver`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSession {
    phase: SessionPhase,
    player_one: Option<Uuid>,
    player_two: Option<Uuid>,
    score_one: u32,
    score_two: u32,
    elapsed_seconds: u64,
    rules: MatchRules,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new(MatchRules::default())
    }
}

impl MatchSession {
    /// Create a fresh session in the setup phase.
    pub fn new(rules: MatchRules) -> Self {
        Self {
            phase: SessionPhase::Setup,
            player_one: None,
            player_two: None,
            score_one: 0,
            score_two: 0,
            elapsed_seconds: 0,
            rules,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Player selected for the given slot.
    pub fn player(&self, slot: Slot) -> Option<Uuid> {
        match slot {
            Slot::One => self.player_one,
            Slot::Two => self.player_two,
        }
    }

    /// Score of the given slot.
    pub fn score(&self, slot: Slot) -> u32 {
        match slot {
            Slot::One => self.score_one,
            Slot::Two => self.score_two,
        }
    }

    /// Seconds spent in the playing phase.
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Rules this session evaluates wins with.
    pub fn rules(&self) -> MatchRules {
        self.rules
    }

    /// Side currently holding the strictly higher score, if any.
    pub fn leader(&self) -> Option<Slot> {
        match self.score_one.cmp(&self.score_two) {
            std::cmp::Ordering::Greater => Some(Slot::One),
            std::cmp::Ordering::Less => Some(Slot::Two),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Assign (or clear) the player of a slot.
    ///
    /// Picking the player already held by the other slot clears that other
    /// slot, so both slots never show the same player.
    pub fn select_player(&mut self, slot: Slot, player: Option<Uuid>) -> Result<(), SessionError> {
        self.ensure_phase(SessionPhase::Setup, "select a player")?;

        if player.is_some() && self.player(slot.other()) == player {
            *self.slot_mut(slot.other()) = None;
        }
        *self.slot_mut(slot) = player;

        Ok(())
    }

    /// Begin play with the selected players.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.ensure_phase(SessionPhase::Setup, "start the match")?;

        let (Some(one), Some(two)) = (self.player_one, self.player_two) else {
            return Err(SessionError::PlayersNotSelected);
        };
        if one == two {
            return Err(SessionError::PlayersMustDiffer);
        }

        self.phase = SessionPhase::Playing;
        self.score_one = 0;
        self.score_two = 0;
        self.elapsed_seconds = 0;
        Ok(())
    }

    /// Add a point to `slot` and evaluate the win condition.
    ///
    /// Outside the playing phase this is a no-op.
    pub fn score_point(&mut self, slot: Slot) -> ScoreOutcome {
        if self.phase != SessionPhase::Playing {
            return ScoreOutcome::Ignored;
        }

        match slot {
            Slot::One => self.score_one += 1,
            Slot::Two => self.score_two += 1,
        }

        if self
            .rules
            .is_winning(self.score(slot), self.score(slot.other()))
        {
            self.phase = SessionPhase::Finished;
            ScoreOutcome::Won(slot)
        } else {
            ScoreOutcome::Scored
        }
    }

    /// Advance the elapsed time by one second.
    ///
    /// Returns `false` once the session is no longer playing, which tells the
    /// clock to stop.
    pub fn tick(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    /// Build the record candidate of a finished match.
    pub fn outcome(&self) -> Result<NewMatch, SessionError> {
        self.ensure_phase(SessionPhase::Finished, "finalize")?;

        let (Some(player_one_id), Some(player_two_id)) = (self.player_one, self.player_two) else {
            return Err(SessionError::PlayersNotSelected);
        };
        let winner_id = match self.leader() {
            Some(Slot::One) => player_one_id,
            Some(Slot::Two) => player_two_id,
            None => {
                return Err(SessionError::InvalidPhase {
                    operation: "finalize a tied match",
                    phase: self.phase,
                });
            }
        };

        Ok(NewMatch {
            player_one_id,
            player_two_id,
            winner_id,
            player_one_score: self.score_one,
            player_two_score: self.score_two,
            duration_in_seconds: self.elapsed_seconds,
        })
    }

    /// Hand the finished result to `persist` and reset on success.
    ///
    /// When `persist` fails the session stays finished with its scores and
    /// duration untouched so the caller can retry.
    pub async fn finalize<F, Fut, T, E>(&mut self, persist: F) -> Result<T, E>
    where
        F: FnOnce(NewMatch) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<SessionError>,
    {
        let candidate = self.outcome()?;
        let stored = persist(candidate).await?;
        self.reset();
        Ok(stored)
    }

    /// Discard everything and return to a fresh setup phase.
    pub fn reset(&mut self) {
        *self = Self::new(self.rules);
    }

    fn ensure_phase(&self, expected: SessionPhase, operation: &'static str) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<Uuid> {
        match slot {
            Slot::One => &mut self.player_one,
            Slot::Two => &mut self.player_two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_session() -> (MatchSession, Uuid, Uuid) {
        let one = Uuid::new_v4();
        let two = Uuid::new_v4();
        let mut session = MatchSession::default();
        session.select_player(Slot::One, Some(one)).unwrap();
        session.select_player(Slot::Two, Some(two)).unwrap();
        session.start().unwrap();
        (session, one, two)
    }

    fn score_many(session: &mut MatchSession, slot: Slot, count: u32) {
        for _ in 0..count {
            session.score_point(slot);
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    enum TestError {
        Session(SessionError),
        Storage,
    }

    impl From<SessionError> for TestError {
        fn from(err: SessionError) -> Self {
            TestError::Session(err)
        }
    }

    #[test]
    fn initial_state_is_setup() {
        let session = MatchSession::default();
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert_eq!(session.score(Slot::One), 0);
        assert_eq!(session.elapsed_seconds(), 0);
    }

    #[test]
    fn start_without_players_is_rejected() {
        let mut session = MatchSession::default();
        assert_eq!(session.start(), Err(SessionError::PlayersNotSelected));
        assert_eq!(session.phase(), SessionPhase::Setup);

        session.select_player(Slot::One, Some(Uuid::new_v4())).unwrap();
        assert_eq!(session.start(), Err(SessionError::PlayersNotSelected));
        assert_eq!(session.phase(), SessionPhase::Setup);
    }

    #[test]
    fn selecting_same_player_clears_other_slot() {
        let x = Uuid::new_v4();
        let mut session = MatchSession::default();

        session.select_player(Slot::One, Some(x)).unwrap();
        session.select_player(Slot::Two, Some(x)).unwrap();
        assert_eq!(session.player(Slot::Two), Some(x));
        assert_eq!(session.player(Slot::One), None);

        session.select_player(Slot::One, Some(x)).unwrap();
        assert_eq!(session.player(Slot::One), Some(x));
        assert_eq!(session.player(Slot::Two), None);
    }

    #[test]
    fn selection_is_locked_once_playing() {
        let (mut session, _, _) = playing_session();
        let err = session
            .select_player(Slot::One, Some(Uuid::new_v4()))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidPhase {
                phase: SessionPhase::Playing,
                ..
            }
        ));
    }

    #[test]
    fn win_requires_two_point_lead() {
        let (mut session, _, _) = playing_session();
        score_many(&mut session, Slot::One, 10);
        score_many(&mut session, Slot::Two, 10);

        assert_eq!(session.score_point(Slot::One), ScoreOutcome::Scored);
        assert_eq!(session.phase(), SessionPhase::Playing);

        assert_eq!(session.score_point(Slot::One), ScoreOutcome::Won(Slot::One));
        assert_eq!(session.phase(), SessionPhase::Finished);
        assert_eq!((session.score(Slot::One), session.score(Slot::Two)), (12, 10));
    }

    #[test]
    fn deuce_continues_past_eleven() {
        let (mut session, _, _) = playing_session();
        score_many(&mut session, Slot::One, 10);
        score_many(&mut session, Slot::Two, 10);
        for _ in 0..4 {
            assert_eq!(session.score_point(Slot::One), ScoreOutcome::Scored);
            assert_eq!(session.score_point(Slot::Two), ScoreOutcome::Scored);
        }
        assert_eq!((session.score(Slot::One), session.score(Slot::Two)), (14, 14));
        session.score_point(Slot::Two);
        assert_eq!(session.score_point(Slot::Two), ScoreOutcome::Won(Slot::Two));
        assert_eq!(session.outcome().unwrap().player_two_score, 16);
    }

    #[test]
    fn points_after_finish_are_ignored() {
        let (mut session, _, _) = playing_session();
        score_many(&mut session, Slot::One, 11);
        assert_eq!(session.phase(), SessionPhase::Finished);

        assert_eq!(session.score_point(Slot::Two), ScoreOutcome::Ignored);
        assert_eq!(session.score_point(Slot::One), ScoreOutcome::Ignored);
        assert_eq!((session.score(Slot::One), session.score(Slot::Two)), (11, 0));
    }

    #[test]
    fn ticks_only_count_while_playing() {
        let mut session = MatchSession::default();
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 0);

        let (mut session, _, _) = playing_session();
        assert!(session.tick());
        assert!(session.tick());
        score_many(&mut session, Slot::One, 11);
        assert!(!session.tick());
        assert_eq!(session.elapsed_seconds(), 2);
    }

    #[test]
    fn outcome_names_the_leader_as_winner() {
        let (mut session, one, two) = playing_session();
        score_many(&mut session, Slot::Two, 3);
        score_many(&mut session, Slot::One, 11);
        session.tick();

        let record = session.outcome().unwrap();
        assert_eq!(record.winner_id, one);
        assert_eq!(record.player_one_id, one);
        assert_eq!(record.player_two_id, two);
        assert_eq!(record.player_one_score, 11);
        assert_eq!(record.player_two_score, 3);
    }

    #[test]
    fn outcome_requires_finished_phase() {
        let (session, _, _) = playing_session();
        assert!(matches!(
            session.outcome(),
            Err(SessionError::InvalidPhase { .. })
        ));
    }

    #[tokio::test]
    async fn successful_finalize_resets_session() {
        let (mut session, one, _) = playing_session();
        score_many(&mut session, Slot::One, 11);

        let winner = session
            .finalize(|record| async move { Ok::<_, TestError>(record.winner_id) })
            .await
            .unwrap();

        assert_eq!(winner, one);
        assert_eq!(session, MatchSession::default());
    }

    #[tokio::test]
    async fn failed_finalize_keeps_result_for_retry() {
        let (mut session, _, _) = playing_session();
        score_many(&mut session, Slot::Two, 11);
        session.tick();
        let before = session.clone();

        let err = session
            .finalize(|_| async { Err::<(), _>(TestError::Storage) })
            .await
            .unwrap_err();
        assert_eq!(err, TestError::Storage);
        assert_eq!(session, before);
        assert_eq!(session.phase(), SessionPhase::Finished);

        let duration = session
            .finalize(|record| async move { Ok::<_, TestError>(record.duration_in_seconds) })
            .await
            .unwrap();
        assert_eq!(duration, 1);
        assert_eq!(session.phase(), SessionPhase::Setup);
    }

    #[tokio::test]
    async fn finalize_before_finish_is_rejected() {
        let (mut session, _, _) = playing_session();
        let err = session
            .finalize(|_| async { Ok::<(), TestError>(()) })
            .await
            .unwrap_err();
        assert!(matches!(err, TestError::Session(SessionError::InvalidPhase { .. })));
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn terminal_scores_follow_rules() {
        let rules = MatchRules::default();
        assert!(rules.is_terminal(11, 9));
        assert!(rules.is_terminal(5, 11));
        assert!(rules.is_terminal(16, 14));
        assert!(!rules.is_terminal(11, 10));
        assert!(!rules.is_terminal(10, 8));
        assert!(!rules.is_terminal(20, 5));
    }
}
