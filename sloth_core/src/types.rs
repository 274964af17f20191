//! Core domain types shared across the stores, the scoring engine and the CLI.
//!
//! This module defines:
//! - Profile enums (sex, measurement system, fitness goal)
//! - The six RPG stats
//! - Log entry value types (exercise kind, recorded total)
//! - Elapsed-time formatting used for paces and durations

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Profile Types
// ============================================================================

/// Biological sex as recorded in the profile
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Sex {
    pub fn code(self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// Unit system used for body measurements and distances
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum MeasuringSystem {
    #[serde(rename = "I")]
    Imperial,
    #[serde(rename = "M")]
    Metric,
}

impl MeasuringSystem {
    pub fn code(self) -> &'static str {
        match self {
            MeasuringSystem::Imperial => "I",
            MeasuringSystem::Metric => "M",
        }
    }

    /// The other system, used when the user switches units
    pub fn other(self) -> Self {
        match self {
            MeasuringSystem::Imperial => MeasuringSystem::Metric,
            MeasuringSystem::Metric => MeasuringSystem::Imperial,
        }
    }
}

impl fmt::Display for MeasuringSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasuringSystem::Imperial => f.write_str("Imperial"),
            MeasuringSystem::Metric => f.write_str("Metric"),
        }
    }
}

/// Fitness goal chosen during onboarding, persisted as 1-4
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub enum Goal {
    PowerLifting,
    Strength,
    WeightLoss,
    Cardio,
}

impl TryFrom<u8> for Goal {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            1 => Ok(Goal::PowerLifting),
            2 => Ok(Goal::Strength),
            3 => Ok(Goal::WeightLoss),
            4 => Ok(Goal::Cardio),
            other => Err(format!("goal must be 1-4, got {}", other)),
        }
    }
}

impl From<Goal> for u8 {
    fn from(goal: Goal) -> u8 {
        match goal {
            Goal::PowerLifting => 1,
            Goal::Strength => 2,
            Goal::WeightLoss => 3,
            Goal::Cardio => 4,
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Points every character distributes across the six stats
pub const STAT_POINTS_TOTAL: u8 = 26;

/// Upper bound for a single stat
pub const STAT_MAX: u8 = 10;

/// The six RPG stats in allocation order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    Agility,
    Charisma,
    Defense,
    Endurance,
    Intelligence,
    Strength,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Agility,
        Stat::Charisma,
        Stat::Defense,
        Stat::Endurance,
        Stat::Intelligence,
        Stat::Strength,
    ];

    /// Short description shown while allocating points
    pub fn blurb(self) -> &'static str {
        match self {
            Stat::Agility => "Agility - Your reaction time",
            Stat::Charisma => "Charisma - Influence over others",
            Stat::Defense => "Defense - How well you can take a punch",
            Stat::Endurance => "Endurance - Your overall health",
            Stat::Intelligence => "Intelligence - Technical know-how",
            Stat::Strength => "Strength - How well you can give a punch",
        }
    }
}

/// A complete stat allocation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub agility: u8,
    pub charisma: u8,
    pub defense: u8,
    pub endurance: u8,
    pub intelligence: u8,
    pub strength: u8,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> u8 {
        match stat {
            Stat::Agility => self.agility,
            Stat::Charisma => self.charisma,
            Stat::Defense => self.defense,
            Stat::Endurance => self.endurance,
            Stat::Intelligence => self.intelligence,
            Stat::Strength => self.strength,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u8) {
        match stat {
            Stat::Agility => self.agility = value,
            Stat::Charisma => self.charisma = value,
            Stat::Defense => self.defense = value,
            Stat::Endurance => self.endurance = value,
            Stat::Intelligence => self.intelligence = value,
            Stat::Strength => self.strength = value,
        }
    }

    pub fn total(&self) -> u32 {
        Stat::ALL.iter().map(|s| u32::from(self.get(*s))).sum()
    }

    /// Each stat within 0-10 and all of them summing to 26
    pub fn is_valid(&self) -> bool {
        Stat::ALL.iter().all(|s| self.get(*s) <= STAT_MAX)
            && self.total() == u32::from(STAT_POINTS_TOTAL)
    }
}

// ============================================================================
// Log Entry Values
// ============================================================================

/// Exercise recorded in a log entry
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exercise {
    Run,
    Jog,
    Walk,
    Deteriorate,
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Exercise::Run => "RUN",
            Exercise::Jog => "JOG",
            Exercise::Walk => "WALK",
            Exercise::Deteriorate => "DETERIORATE",
        };
        f.write_str(s)
    }
}

/// The `Total` column: elapsed time for workouts, points lost for decay ticks
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Total {
    PointsLost(u64),
    Elapsed(String),
}

impl fmt::Display for Total {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Total::PointsLost(points) => write!(f, "-{}", points),
            Total::Elapsed(elapsed) => f.write_str(elapsed),
        }
    }
}

// ============================================================================
// Clock Formatting
// ============================================================================

/// A whole number of seconds displayed as `MM:SS`, or `HH:MM:SS` from one hour up
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(pub u64);

impl ClockTime {
    pub fn hours(self) -> u64 {
        self.0 / 3600
    }

    /// Minutes within the hour
    pub fn minutes(self) -> u64 {
        (self.0 % 3600) / 60
    }

    pub fn seconds(self) -> u64 {
        self.0 % 60
    }

    /// Whole minutes, not wrapped at the hour
    pub fn total_minutes(self) -> u64 {
        self.0 / 60
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hours() > 0 {
            write!(
                f,
                "{:02}:{:02}:{:02}",
                self.hours(),
                self.minutes(),
                self.seconds()
            )
        } else {
            write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
        }
    }
}
