//! Match record model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::{MatchId, PlayerContribution};

/// Outcome of a match from the tracked player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Draw,
    Loss,
}

impl MatchResult {
    /// League points awarded for this result (3/1/0).
    pub fn points(&self) -> u32 {
        match self {
            MatchResult::Win => 3,
            MatchResult::Draw => 1,
            MatchResult::Loss => 0,
        }
    }

    /// Single-letter code used in compact form strings like "WWDL".
    pub fn letter(&self) -> char {
        match self {
            MatchResult::Win => 'W',
            MatchResult::Draw => 'D',
            MatchResult::Loss => 'L',
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "win"),
            MatchResult::Draw => write!(f, "draw"),
            MatchResult::Loss => write!(f, "loss"),
        }
    }
}

impl FromStr for MatchResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" | "w" => Ok(MatchResult::Win),
            "draw" | "d" => Ok(MatchResult::Draw),
            "loss" | "l" => Ok(MatchResult::Loss),
            other => Err(format!("unknown result '{}' (expected win, draw or loss)", other)),
        }
    }
}

/// Win/draw/loss record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WinLossRecord {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
}

impl WinLossRecord {
    /// Create a new record.
    pub fn new(wins: u32, draws: u32, losses: u32) -> Self {
        Self {
            wins,
            draws,
            losses,
        }
    }

    /// Count one more result.
    pub fn add(&mut self, result: MatchResult) {
        match result {
            MatchResult::Win => self.wins += 1,
            MatchResult::Draw => self.draws += 1,
            MatchResult::Loss => self.losses += 1,
        }
    }

    /// Total games played.
    pub fn total_games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    /// League points (3 per win, 1 per draw).
    pub fn points(&self) -> u32 {
        self.wins * 3 + self.draws
    }

    /// Win rate as a percentage (0.0 to 100.0).
    pub fn win_rate(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            0.0
        } else {
            self.wins as f64 / total as f64 * 100.0
        }
    }

    /// Share of available points earned, as a percentage.
    pub fn effectiveness(&self) -> f64 {
        let total = self.total_games();
        if total == 0 {
            0.0
        } else {
            self.points() as f64 / (total as f64 * 3.0) * 100.0
        }
    }
}

impl std::fmt::Display for WinLossRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}W-{}D-{}L", self.wins, self.draws, self.losses)
    }
}

/// A logged match as submitted, before it is given an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMatch {
    pub date: NaiveDate,
    pub result: MatchResult,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub assists: u32,
    #[serde(default)]
    pub goal_differential: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub tournament: Option<String>,
    #[serde(default)]
    pub teammates: Vec<PlayerContribution>,
    #[serde(default)]
    pub opponents: Vec<PlayerContribution>,
}

impl NewMatch {
    pub fn new(date: NaiveDate, result: MatchResult) -> Self {
        Self {
            date,
            result,
            goals_for: 0,
            assists: 0,
            goal_differential: None,
            notes: None,
            tournament: None,
            teammates: Vec::new(),
            opponents: Vec::new(),
        }
    }

    /// Assign an ID and creation timestamp.
    pub fn into_record(self, created_at: DateTime<Utc>) -> MatchRecord {
        MatchRecord {
            id: MatchId::for_match(self.date, created_at),
            date: self.date,
            result: self.result,
            goals_for: self.goals_for,
            assists: self.assists,
            goal_differential: self.goal_differential,
            notes: self.notes,
            tournament: self.tournament,
            teammates: self.teammates,
            opponents: self.opponents,
            created_at,
        }
    }
}

/// A single logged match of the tracked player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (derived from date + creation instant)
    pub id: MatchId,

    /// Calendar date the match was played
    pub date: NaiveDate,

    pub result: MatchResult,

    /// Goals scored by the tracked player
    #[serde(default)]
    pub goals_for: u32,

    /// Assists given by the tracked player
    #[serde(default)]
    pub assists: u32,

    /// Final goal difference from the tracked player's side
    #[serde(default)]
    pub goal_differential: Option<i32>,

    #[serde(default)]
    pub notes: Option<String>,

    /// Tournament or league label
    #[serde(default)]
    pub tournament: Option<String>,

    #[serde(default)]
    pub teammates: Vec<PlayerContribution>,

    #[serde(default)]
    pub opponents: Vec<PlayerContribution>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Create a bare record with no goals, assists or players.
    pub fn new(date: NaiveDate, result: MatchResult, created_at: DateTime<Utc>) -> Self {
        NewMatch::new(date, result).into_record(created_at)
    }

    /// Builder method to set the tracked player's goals and assists.
    pub fn with_output(mut self, goals_for: u32, assists: u32) -> Self {
        self.goals_for = goals_for;
        self.assists = assists;
        self
    }

    /// Builder method to set the goal differential.
    pub fn with_goal_differential(mut self, diff: i32) -> Self {
        self.goal_differential = Some(diff);
        self
    }

    /// Builder method to set the tournament label.
    pub fn with_tournament(mut self, tournament: impl Into<String>) -> Self {
        self.tournament = Some(tournament.into());
        self
    }

    /// Builder method to add a teammate.
    pub fn with_teammate(mut self, player: PlayerContribution) -> Self {
        self.teammates.push(player);
        self
    }

    /// Builder method to add an opponent.
    pub fn with_opponent(mut self, player: PlayerContribution) -> Self {
        self.opponents.push(player);
        self
    }

    /// Replace the editable fields, keeping identity and creation time.
    pub fn apply_edit(&mut self, edit: NewMatch) {
        self.date = edit.date;
        self.result = edit.result;
        self.goals_for = edit.goals_for;
        self.assists = edit.assists;
        self.goal_differential = edit.goal_differential;
        self.notes = edit.notes;
        self.tournament = edit.tournament;
        self.teammates = edit.teammates;
        self.opponents = edit.opponents;
    }

    /// The editable fields as a submission, for partial edits.
    pub fn to_new(&self) -> NewMatch {
        NewMatch {
            date: self.date,
            result: self.result,
            goals_for: self.goals_for,
            assists: self.assists,
            goal_differential: self.goal_differential,
            notes: self.notes.clone(),
            tournament: self.tournament.clone(),
            teammates: self.teammates.clone(),
            opponents: self.opponents.clone(),
        }
    }

    pub fn is_win(&self) -> bool {
        self.result == MatchResult::Win
    }
}
