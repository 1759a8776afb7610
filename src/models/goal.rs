//! Personal goals: a target on one metric over a period.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Goal definition errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("{metric} goals cannot be of type {goal_type}")]
    TypeNotAllowed {
        metric: GoalMetric,
        goal_type: GoalType,
    },

    #[error("Target must be greater than 0, got {0}")]
    NonPositiveTarget(f64),

    #[error("Invalid month '{0}' (expected YYYY-MM)")]
    InvalidMonth(String),

    #[error("Month range {0} .. {1} ends before it starts")]
    EmptyRange(YearMonth, YearMonth),

    #[error("Year {0} is out of range")]
    InvalidYear(i32),

    #[error("Give either a year or a month range, not both")]
    ConflictingPeriod,

    #[error("A month range needs both ends")]
    IncompleteRange,
}

/// What a goal measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalMetric {
    Goals,
    Assists,
    Wins,
    WinRate,
    UndefeatedRate,
    GoalsPerMatch,
    LongestWinStreak,
    LongestUndefeatedStreak,
}

impl GoalMetric {
    /// Goal types that make sense for this metric; the first is the default.
    pub fn goal_types(&self) -> &'static [GoalType] {
        match self {
            GoalMetric::Goals => &[GoalType::Accumulate, GoalType::Peak],
            GoalMetric::Assists | GoalMetric::Wins => &[GoalType::Accumulate],
            GoalMetric::WinRate | GoalMetric::UndefeatedRate => &[GoalType::Percentage],
            GoalMetric::GoalsPerMatch => &[GoalType::Average],
            GoalMetric::LongestWinStreak | GoalMetric::LongestUndefeatedStreak => {
                &[GoalType::Streak]
            }
        }
    }

    pub fn default_goal_type(&self) -> GoalType {
        self.goal_types()[0]
    }

    /// Rates and averages are fractional, everything else is a count.
    pub fn is_fractional(&self) -> bool {
        matches!(
            self,
            GoalMetric::WinRate | GoalMetric::UndefeatedRate | GoalMetric::GoalsPerMatch
        )
    }
}

impl fmt::Display for GoalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GoalMetric::Goals => "goals",
            GoalMetric::Assists => "assists",
            GoalMetric::Wins => "wins",
            GoalMetric::WinRate => "win_rate",
            GoalMetric::UndefeatedRate => "undefeated_rate",
            GoalMetric::GoalsPerMatch => "goals_per_match",
            GoalMetric::LongestWinStreak => "longest_win_streak",
            GoalMetric::LongestUndefeatedStreak => "longest_undefeated_streak",
        };
        f.write_str(name)
    }
}

/// How the metric is turned into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    /// Total over the period
    Accumulate,
    /// Share of matches, 0..100
    Percentage,
    /// Per-match mean
    Average,
    /// Longest run inside the period
    Streak,
    /// Best single match, over the whole history
    Peak,
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GoalType::Accumulate => "accumulate",
            GoalType::Percentage => "percentage",
            GoalType::Average => "average",
            GoalType::Streak => "streak",
            GoalType::Peak => "peak",
        };
        f.write_str(name)
    }
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GoalError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = GoalError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<YearMonth> for String {
    fn from(ym: YearMonth) -> Self {
        ym.to_string()
    }
}

/// The stretch of time a goal covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalPeriod {
    AllTime,
    Year(i32),
    /// Inclusive on both ends
    Months { from: YearMonth, to: YearMonth },
}

impl GoalPeriod {
    /// Build a period from optional CLI or query parts.
    pub fn from_parts(
        year: Option<i32>,
        from: Option<YearMonth>,
        to: Option<YearMonth>,
    ) -> Result<Self, GoalError> {
        match (year, from, to) {
            (None, None, None) => Ok(GoalPeriod::AllTime),
            (Some(year), None, None) => Ok(GoalPeriod::Year(year)),
            (None, Some(from), Some(to)) => Ok(GoalPeriod::Months { from, to }),
            (None, _, _) => Err(GoalError::IncompleteRange),
            (Some(_), _, _) => Err(GoalError::ConflictingPeriod),
        }
    }

    /// First and last day, `None` for all time.
    pub fn bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>, GoalError> {
        match *self {
            GoalPeriod::AllTime => Ok(None),
            GoalPeriod::Year(year) => {
                let first = NaiveDate::from_ymd_opt(year, 1, 1);
                let last = NaiveDate::from_ymd_opt(year, 12, 31);
                match first.zip(last) {
                    Some(bounds) => Ok(Some(bounds)),
                    None => Err(GoalError::InvalidYear(year)),
                }
            }
            GoalPeriod::Months { from, to } => {
                if from > to {
                    return Err(GoalError::EmptyRange(from, to));
                }
                let first = from.first_day();
                let last = to.last_day();
                match first.zip(last) {
                    Some(bounds) => Ok(Some(bounds)),
                    None => Err(GoalError::InvalidMonth(to.to_string())),
                }
            }
        }
    }
}

/// A personal target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub metric: GoalMetric,
    pub goal_type: GoalType,
    pub target: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Both set for a dated goal, both unset for an all-time one
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Goal {
    /// An all-time goal. Fails if the type does not fit the metric or the
    /// target is not positive.
    pub fn new(metric: GoalMetric, goal_type: GoalType, target: f64) -> Result<Self, GoalError> {
        if !metric.goal_types().contains(&goal_type) {
            return Err(GoalError::TypeNotAllowed { metric, goal_type });
        }
        if target.is_nan() || target <= 0.0 {
            return Err(GoalError::NonPositiveTarget(target));
        }
        Ok(Self {
            metric,
            goal_type,
            target,
            title: None,
            start_date: None,
            end_date: None,
        })
    }

    /// Restrict the goal to a period. Peak goals always look at every match
    /// and keep no dates.
    pub fn with_period(mut self, period: GoalPeriod) -> Result<Self, GoalError> {
        let bounds = period.bounds()?;
        if self.goal_type != GoalType::Peak {
            self.start_date = bounds.map(|(first, _)| first);
            self.end_date = bounds.map(|(_, last)| last);
        }
        Ok(self)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Date bounds, when both ends are set.
    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.bounds() {
            Some((first, last)) => first <= date && date <= last,
            None => true,
        }
    }
}

/// How a target compares with what has been done before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalDifficulty {
    /// Already reached in the period
    Easy,
    /// At or below the historical best
    Challenging,
    /// Beats the historical best
    NewRecord,
    /// More than 1.5 times the historical best
    Epic,
}

/// Where a goal stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal: Goal,

    /// Value over the goal's period
    pub current: f64,

    /// Best value of any season (or the whole history for all-time goals)
    pub historical_best: f64,

    pub target: f64,
    pub achieved: bool,

    /// `current / target` as a percentage, capped at 100
    pub percent: f64,

    pub difficulty: GoalDifficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_types_per_metric() {
        assert_eq!(GoalMetric::Goals.default_goal_type(), GoalType::Accumulate);
        assert!(GoalMetric::Goals.goal_types().contains(&GoalType::Peak));
        assert_eq!(GoalMetric::WinRate.default_goal_type(), GoalType::Percentage);
        assert_eq!(GoalMetric::LongestWinStreak.goal_types(), &[GoalType::Streak]);
    }

    #[test]
    fn test_new_rejects_bad_goals() {
        assert_eq!(
            Goal::new(GoalMetric::Assists, GoalType::Peak, 3.0),
            Err(GoalError::TypeNotAllowed {
                metric: GoalMetric::Assists,
                goal_type: GoalType::Peak
            })
        );
        assert!(matches!(
            Goal::new(GoalMetric::Wins, GoalType::Accumulate, 0.0),
            Err(GoalError::NonPositiveTarget(_))
        ));
        assert!(Goal::new(GoalMetric::Wins, GoalType::Accumulate, f64::NAN).is_err());
    }

    #[test]
    fn test_year_month_parse() {
        assert_eq!(
            "2025-03".parse::<YearMonth>(),
            Ok(YearMonth { year: 2025, month: 3 })
        );
        assert!("2025-13".parse::<YearMonth>().is_err());
        assert!("march".parse::<YearMonth>().is_err());
        assert_eq!(YearMonth::new(2024, 2).unwrap().to_string(), "2024-02");
    }

    #[test]
    fn test_year_month_last_day() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29));
        let dec = YearMonth::new(2025, 12).unwrap();
        assert_eq!(dec.last_day(), NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[test]
    fn test_period_from_parts() {
        let march = YearMonth::new(2025, 3).unwrap();
        let june = YearMonth::new(2025, 6).unwrap();
        assert_eq!(GoalPeriod::from_parts(None, None, None), Ok(GoalPeriod::AllTime));
        assert_eq!(GoalPeriod::from_parts(Some(2025), None, None), Ok(GoalPeriod::Year(2025)));
        assert_eq!(
            GoalPeriod::from_parts(None, Some(march), Some(june)),
            Ok(GoalPeriod::Months { from: march, to: june })
        );
        assert_eq!(
            GoalPeriod::from_parts(None, Some(march), None),
            Err(GoalError::IncompleteRange)
        );
        assert_eq!(
            GoalPeriod::from_parts(Some(2025), Some(march), Some(june)),
            Err(GoalError::ConflictingPeriod)
        );
    }

    #[test]
    fn test_month_range_bounds() {
        let period = GoalPeriod::Months {
            from: YearMonth::new(2025, 3).unwrap(),
            to: YearMonth::new(2025, 4).unwrap(),
        };
        assert_eq!(
            period.bounds(),
            Ok(Some((
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap()
            )))
        );

        let backwards = GoalPeriod::Months {
            from: YearMonth::new(2025, 5).unwrap(),
            to: YearMonth::new(2025, 4).unwrap(),
        };
        assert!(matches!(backwards.bounds(), Err(GoalError::EmptyRange(_, _))));
    }

    #[test]
    fn test_peak_goal_ignores_period() {
        let goal = Goal::new(GoalMetric::Goals, GoalType::Peak, 4.0)
            .unwrap()
            .with_period(GoalPeriod::Year(2025))
            .unwrap();
        assert_eq!(goal.bounds(), None);
    }

    #[test]
    fn test_covers_year() {
        let goal = Goal::new(GoalMetric::Wins, GoalType::Accumulate, 10.0)
            .unwrap()
            .with_period(GoalPeriod::Year(2025))
            .unwrap();
        assert!(goal.covers(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()));
        assert!(!goal.covers(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn test_goal_serialization() {
        let goal = Goal::new(GoalMetric::GoalsPerMatch, GoalType::Average, 1.5)
            .unwrap()
            .with_title("Hat-trick hero");
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["metric"], "goals_per_match");
        assert_eq!(json["goal_type"], "average");
        assert_eq!(json["title"], "Hat-trick hero");

        let ym: YearMonth = serde_json::from_str("\"2025-07\"").unwrap();
        assert_eq!(serde_json::to_string(&ym).unwrap(), "\"2025-07\"");
    }
}
