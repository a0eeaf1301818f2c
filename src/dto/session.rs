//! DTOs exposing the live match session.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    history::format_duration,
    session::{MatchSession, SessionPhase, Slot},
};

/// Side of the match addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotDto {
    /// First player.
    One,
    /// Second player.
    Two,
}

impl From<SlotDto> for Slot {
    fn from(value: SlotDto) -> Self {
        match value {
            SlotDto::One => Slot::One,
            SlotDto::Two => Slot::Two,
        }
    }
}

impl From<Slot> for SlotDto {
    fn from(value: Slot) -> Self {
        match value {
            Slot::One => SlotDto::One,
            Slot::Two => SlotDto::Two,
        }
    }
}

/// Phase of the live match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PhaseDto {
    /// Choosing players.
    Setup,
    /// Points are being scored.
    Playing,
    /// A winner is known and the result awaits storage.
    Finished,
}

impl From<SessionPhase> for PhaseDto {
    fn from(value: SessionPhase) -> Self {
        match value {
            SessionPhase::Setup => PhaseDto::Setup,
            SessionPhase::Playing => PhaseDto::Playing,
            SessionPhase::Finished => PhaseDto::Finished,
        }
    }
}

/// Assign or clear a slot. Omitting `playerId` clears it.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectPlayerRequest {
    /// Slot to update.
    pub slot: SlotDto,
    /// Player to seat, absent to empty the slot.
    #[serde(default)]
    pub player_id: Option<Uuid>,
}

/// Point scored by one side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScorePointRequest {
    /// Side that won the rally.
    pub slot: SlotDto,
}

/// Current state of the live match.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Current phase.
    pub phase: PhaseDto,
    /// Player in the first slot.
    pub player_one_id: Option<Uuid>,
    /// Player in the second slot.
    pub player_two_id: Option<Uuid>,
    /// Points of the first slot.
    pub player_one_score: u32,
    /// Points of the second slot.
    pub player_two_score: u32,
    /// Seconds played so far.
    pub elapsed_seconds: u64,
    /// Elapsed time rendered as `MM:SS`.
    pub elapsed_label: String,
    /// Side that won; only set once the match is finished.
    pub winner: Option<SlotDto>,
    /// Points needed to win.
    pub points_to_win: u32,
    /// Lead needed to win.
    pub win_margin: u32,
}

impl From<&MatchSession> for SessionResponse {
    fn from(session: &MatchSession) -> Self {
        let winner = match session.phase() {
            SessionPhase::Finished => session.leader().map(SlotDto::from),
            _ => None,
        };
        let rules = session.rules();
        Self {
            phase: session.phase().into(),
            player_one_id: session.player(Slot::One),
            player_two_id: session.player(Slot::Two),
            player_one_score: session.score(Slot::One),
            player_two_score: session.score(Slot::Two),
            elapsed_seconds: session.elapsed_seconds(),
            elapsed_label: format_duration(session.elapsed_seconds()),
            winner,
            points_to_win: rules.points_to_win,
            win_margin: rules.win_margin,
        }
    }
}

impl From<MatchSession> for SessionResponse {
    fn from(session: MatchSession) -> Self {
        Self::from(&session)
    }
}
