//! Line-oriented prompts with retry on invalid input.
//!
//! A [`Prompt`] pairs a fixed question with a converter. Asking it prints
//! the question, reads one line, and either returns the converted value or
//! prints the converter's message and asks again. Closing the input stream
//! surfaces as [`Error::Aborted`].

use crate::convert::{self, Confirmation, StatInput, StatSlot};
use crate::{Error, Goal, MeasuringSystem, Result, Sex, Stat, Stats, STAT_POINTS_TOTAL};
use chrono::{NaiveDate, NaiveTime};
use std::fmt::Display;
use std::io::{self, BufRead, Stdin, Stdout, Write};

/// Why a line of input could not be converted; shown to the user verbatim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ConversionFailed(pub String);

/// Terminal input and output
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, Stdout> {
    /// Console over the process's stdin and stdout
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.output, "{}", line)?;
        Ok(())
    }

    /// Print `text` without a newline and read the reply
    pub fn read_line(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::Aborted);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// A question and the converter that validates its answer
pub struct Prompt<'a, T> {
    text: String,
    convert: Box<dyn Fn(&str) -> std::result::Result<T, ConversionFailed> + 'a>,
}

impl<'a, T> Prompt<'a, T> {
    pub fn new<F>(text: impl Into<String>, convert: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, ConversionFailed> + 'a,
    {
        Self {
            text: format!("{}: ", text.into()),
            convert: Box::new(convert),
        }
    }

    /// Ask until the answer converts
    pub fn ask<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<T> {
        loop {
            let raw = console.read_line(&self.text)?;
            match (self.convert)(&raw) {
                Ok(value) => return Ok(value),
                Err(failed) => {
                    tracing::debug!("Rejected input {:?}: {}", raw, failed);
                    console.say(&failed)?;
                }
            }
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

pub fn first_name_prompt() -> Prompt<'static, String> {
    Prompt::new("Enter your first name (20 character limit)", convert::first_name)
}

pub fn birth_date_prompt() -> Prompt<'static, NaiveDate> {
    Prompt::new("Enter your birthday (like 1999-12-31)", convert::birth_date)
}

pub fn sex_prompt() -> Prompt<'static, Sex> {
    Prompt::new("Enter your sex (M/F)", convert::sex)
}

pub fn goal_prompt() -> Prompt<'static, Goal> {
    Prompt::new(
        "What is your fitness goal?\n\
         1 for power lifting\n\
         2 for strength\n\
         3 for weight loss\n\
         4 for cardio",
        convert::goal,
    )
}

pub fn measuring_system_prompt() -> Prompt<'static, MeasuringSystem> {
    Prompt::new("(I)mperial or (M)etric measurements?", convert::measuring_system)
}

pub fn body_weight_prompt(system: MeasuringSystem) -> Prompt<'static, f64> {
    let text = match system {
        MeasuringSystem::Imperial => "Enter weight in pounds (whole number)",
        MeasuringSystem::Metric => "Enter weight in kilograms (float number)",
    };
    Prompt::new(text, move |raw| convert::body_weight(raw, system))
}

pub fn body_height_prompt(system: MeasuringSystem) -> Prompt<'static, f64> {
    let text = match system {
        MeasuringSystem::Imperial => "Enter height in inches (whole number)",
        MeasuringSystem::Metric => "Enter height in meters (float number)",
    };
    Prompt::new(text, move |raw| convert::body_height(raw, system))
}

pub fn log_before_deterioration_prompt() -> Prompt<'static, bool> {
    Prompt::new(
        "Do you have anything to log before deterioration? (Y/N)",
        convert::yes_no,
    )
}

pub fn switch_system_prompt(to: MeasuringSystem) -> Prompt<'static, Confirmation> {
    Prompt::new(format!("Would you like to switch to {}? (Y/N)", to), convert::confirm)
}

pub fn duration_prompt() -> Prompt<'static, u64> {
    Prompt::new("How long did you go? (10:00/10:00:00)", convert::duration)
}

pub fn distance_prompt(system: MeasuringSystem) -> Prompt<'static, f64> {
    let text = match system {
        MeasuringSystem::Imperial => "How many miles? (mi to km is 1.609344)",
        MeasuringSystem::Metric => "How many kilometers? (km to mi is 0.62137)",
    };
    Prompt::new(text, move |raw| convert::distance(raw, system))
}

pub fn workout_date_prompt(today: NaiveDate) -> Prompt<'static, NaiveDate> {
    Prompt::new(
        "What day? (Format 1999-12-31) (Enter for today)",
        move |raw| convert::workout_date(raw, today),
    )
}

pub fn finish_time_prompt(now: NaiveTime) -> Prompt<'static, NaiveTime> {
    Prompt::new(
        "What time did you finish? (Format 20:30:15) (Enter for now)",
        move |raw| convert::finish_time(raw, now),
    )
}

/// Walk the user through placing 26 points across the six stats
///
/// Any stat after the first accepts `b` to go back and redo the previous one.
pub fn allocate_stats<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<Stats> {
    console.say(format!(
        "You have {} points to place into {} stats.",
        STAT_POINTS_TOTAL,
        Stat::ALL.len()
    ))?;
    console.say("Press 'b' to go back after agility")?;

    let mut stats = Stats::default();
    let mut index = 0;
    while index < Stat::ALL.len() {
        let stat = Stat::ALL[index];
        let placed: u8 = Stat::ALL[..index].iter().map(|s| stats.get(*s)).sum();
        let slot = StatSlot {
            remaining: STAT_POINTS_TOTAL - placed,
            stats_after: (Stat::ALL.len() - index - 1) as u8,
            can_go_back: index > 0,
        };

        let prompt = Prompt::new(
            format!("{} (0/10) ({} left)", stat.blurb(), slot.remaining),
            move |raw| convert::stat(raw, slot),
        );
        match prompt.ask(console)? {
            StatInput::Value(value) => {
                stats.set(stat, value);
                index += 1;
            }
            StatInput::Back => {
                index -= 1;
                stats.set(Stat::ALL[index], 0);
            }
        }
    }

    Ok(stats)
}
