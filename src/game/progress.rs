//! Match progression: round history, per-slot scores, match completion.

use crate::config::MatchFormat;
use crate::game::board::Slot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Why a round or session ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EndedReason {
    /// A slot completed a win line.
    Win,
    /// Board filled with no winner.
    Draw,
    /// A participant abandoned the session.
    Abandoned,
    /// Presence was lost and the pause timed out.
    Disconnect,
}

/// Record of one completed round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    /// 1-based round number within the match.
    pub round_index: u32,
    /// Win or draw.
    pub ended_reason: EndedReason,
    /// Round winner, unset for a draw.
    pub winner: Option<Slot>,
    /// Moves played in the round.
    pub moves_count: u32,
    /// When the round completed.
    pub ended_at: DateTime<Utc>,
}

/// What a completed round means for the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundVerdict {
    /// The match is over.
    MatchOver {
        /// Reason to stamp on the session record.
        reason: EndedReason,
    },
    /// Scores persist, the board resets, and the next round begins.
    NextRound,
}

/// Best-of-N bookkeeping carried on the session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    /// Match format the session was created with.
    pub format: MatchFormat,
    /// Round wins required to take the match; derived from `format` at
    /// creation and never recomputed.
    pub target_wins: u32,
    /// 1-based index of the round in progress.
    pub round_index: u32,
    /// Round wins for slot A.
    pub score_a: u32,
    /// Round wins for slot B.
    pub score_b: u32,
    /// Overall match winner, set when a score reaches `target_wins`.
    pub match_winner: Option<Slot>,
    /// Completed rounds, oldest first.
    pub rounds: Vec<RoundSummary>,
}

impl MatchState {
    /// Creates bookkeeping for a fresh match.
    pub fn new(format: MatchFormat) -> Self {
        Self {
            format,
            target_wins: format.target_wins(),
            round_index: 1,
            score_a: 0,
            score_b: 0,
            match_winner: None,
            rounds: Vec::new(),
        }
    }

    /// Round-win count for a slot.
    pub fn score(&self, slot: Slot) -> u32 {
        match slot {
            Slot::A => self.score_a,
            Slot::B => self.score_b,
        }
    }

    /// Records a completed round and decides whether the match is over.
    ///
    /// A win bumps the winner's score; the match ends when that score
    /// reaches `target_wins`. A drawn round ends a single-format match with
    /// reason [`EndedReason::Draw`]; in bo3/bo5 it is recorded and replayed.
    pub fn record_round(
        &mut self,
        winner: Option<Slot>,
        moves_count: u32,
        now: DateTime<Utc>,
    ) -> RoundVerdict {
        let reason = if winner.is_some() {
            EndedReason::Win
        } else {
            EndedReason::Draw
        };
        self.rounds.push(RoundSummary {
            round_index: self.round_index,
            ended_reason: reason,
            winner,
            moves_count,
            ended_at: now,
        });

        if let Some(slot) = winner {
            match slot {
                Slot::A => self.score_a += 1,
                Slot::B => self.score_b += 1,
            }
            if self.score(slot) >= self.target_wins {
                self.match_winner = Some(slot);
                info!(
                    winner = %slot,
                    score_a = self.score_a,
                    score_b = self.score_b,
                    rounds = self.rounds.len(),
                    "Match complete"
                );
                return RoundVerdict::MatchOver {
                    reason: EndedReason::Win,
                };
            }
        } else if self.format == MatchFormat::Single {
            info!(rounds = self.rounds.len(), "Single-round match drawn");
            return RoundVerdict::MatchOver {
                reason: EndedReason::Draw,
            };
        }

        self.round_index += 1;
        debug!(
            round_index = self.round_index,
            score_a = self.score_a,
            score_b = self.score_b,
            "Advancing to next round"
        );
        RoundVerdict::NextRound
    }
}
