//! Converters from raw terminal input to validated values.
//!
//! Each converter takes the line the user typed and either returns a typed
//! value or a [`ConversionFailed`] carrying the message to show before the
//! question is asked again.

use crate::cardio::{MAX_ELAPSED_SECONDS, MAX_KILOMETERS, MAX_MILES};
use crate::prompt::ConversionFailed;
use crate::{Goal, MeasuringSystem, Sex, STAT_MAX};
use chrono::{NaiveDate, NaiveTime};

type Converted<T> = std::result::Result<T, ConversionFailed>;

fn fail<T>(message: &str) -> Converted<T> {
    Err(ConversionFailed(message.to_string()))
}

fn integer(raw: &str) -> Converted<i64> {
    raw.trim()
        .parse()
        .map_err(|_| ConversionFailed("Please enter a whole number".into()))
}

/// Upper-case the first character and lower-case the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn first_name(raw: &str) -> Converted<String> {
    let name = capitalize(raw.trim());
    if name.chars().count() > 20 {
        return fail("There's a 20 character limit...");
    }
    if name.is_empty() {
        return fail("How were you expecting that to work?");
    }
    Ok(name)
}

pub fn birth_date(raw: &str) -> Converted<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ConversionFailed("Format is 1999-12-31".into()))
}

pub fn sex(raw: &str) -> Converted<Sex> {
    match raw.trim().to_uppercase().as_str() {
        "M" => Ok(Sex::Male),
        "F" => Ok(Sex::Female),
        _ => fail("You didn't choose male or female."),
    }
}

pub fn goal(raw: &str) -> Converted<Goal> {
    let value = integer(raw)?;
    u8::try_from(value)
        .ok()
        .and_then(|v| Goal::try_from(v).ok())
        .ok_or_else(|| ConversionFailed("Options are: 1/2/3/4".into()))
}

pub fn measuring_system(raw: &str) -> Converted<MeasuringSystem> {
    match raw.trim().to_uppercase().as_str() {
        "I" => Ok(MeasuringSystem::Imperial),
        "M" => Ok(MeasuringSystem::Metric),
        _ => fail("Choose (M)etric or (I)mperial"),
    }
}

/// Body weight in kilograms (metric, decimal) or pounds (imperial, whole)
pub fn body_weight(raw: &str, system: MeasuringSystem) -> Converted<f64> {
    let raw = raw.trim();
    let (weight, low, high) = match system {
        MeasuringSystem::Metric => {
            let w: f64 = raw
                .parse()
                .map_err(|_| ConversionFailed("You can only put in a float (1.0) number.".into()))?;
            (w, 22.679, 453.592)
        }
        MeasuringSystem::Imperial => {
            let w: i64 = raw
                .parse()
                .map_err(|_| ConversionFailed("You can only use whole numbers.".into()))?;
            (w as f64, 50.0, 1000.0)
        }
    };

    if !weight.is_finite() || weight <= low {
        fail("Pretty sure that's not your real weight.")
    } else if weight >= high {
        fail("I seriously doubt you're that big.")
    } else {
        Ok(weight)
    }
}

/// Body height in meters (metric, decimal) or inches (imperial, whole)
pub fn body_height(raw: &str, system: MeasuringSystem) -> Converted<f64> {
    let raw = raw.trim();
    let (height, low, high) = match system {
        MeasuringSystem::Metric => {
            let h: f64 = raw
                .parse()
                .map_err(|_| ConversionFailed("You can only put in a float (1.0) number.".into()))?;
            (h, 0.5, 2.7)
        }
        MeasuringSystem::Imperial => {
            let h: i64 = raw
                .parse()
                .map_err(|_| ConversionFailed("You can only use whole numbers.".into()))?;
            (h as f64, 20.0, 108.0)
        }
    };

    if !height.is_finite() || height <= low {
        fail("Put in your real height, please.")
    } else if height >= high {
        fail("Taller than the tallest person recorded?")
    } else {
        Ok(height)
    }
}

/// Yes/no where a blank answer means no
pub fn yes_no(raw: &str) -> Converted<bool> {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" => Ok(true),
        "" | "n" | "no" => Ok(false),
        _ => fail("That wasn't a valid input, let's try again."),
    }
}

/// Answer to a confirmation that never re-asks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
    /// Unrecognized answer, treated as no
    AssumedNo,
}

impl Confirmation {
    pub fn is_yes(self) -> bool {
        self == Confirmation::Yes
    }
}

/// Confirmation where anything but yes counts as no
pub fn confirm(raw: &str) -> Converted<Confirmation> {
    Ok(match raw.trim().to_lowercase().as_str() {
        "y" | "yes" => Confirmation::Yes,
        "n" | "no" => Confirmation::No,
        _ => Confirmation::AssumedNo,
    })
}

fn clock_seconds(parts: &[&str]) -> Option<u64> {
    let mut total = 0u64;
    for part in parts {
        let value: u64 = part.trim().parse().ok()?;
        total = total.checked_mul(60)?.checked_add(value)?;
    }
    Some(total)
}

/// Workout duration as `MM:SS` or `HH:MM:SS`, in seconds
pub fn duration(raw: &str) -> Converted<u64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    let seconds = match parts.len() {
        2 | 3 => clock_seconds(&parts),
        _ => None,
    }
    .ok_or_else(|| ConversionFailed("Only digits and \":\" can be used. (10:00:00/10:00)".into()))?;

    if seconds > MAX_ELAPSED_SECONDS {
        fail("You can't put 24 hours+ as your time.")
    } else if seconds == 0 {
        fail("A workout has to take some time.")
    } else {
        Ok(seconds)
    }
}

/// Distance in miles or kilometers
pub fn distance(raw: &str, system: MeasuringSystem) -> Converted<f64> {
    let distance: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ConversionFailed("A whole ( 1 ) or float ( 1.0 ) number is required".into()))?;
    let max = match system {
        MeasuringSystem::Imperial => MAX_MILES,
        MeasuringSystem::Metric => MAX_KILOMETERS,
    };

    if !distance.is_finite() || distance <= 0.0 {
        fail("You have to go somewhere to log it.")
    } else if distance >= max {
        fail("Pretty sure you didn't go that far.")
    } else {
        Ok(distance)
    }
}

/// Day of the workout; blank means `today`
pub fn workout_date(raw: &str, today: NaiveDate) -> Converted<NaiveDate> {
    if raw.trim().is_empty() {
        return Ok(today);
    }
    birth_date(raw)
}

/// Time of day the workout finished as `HH:MM:SS`; blank means `now`
pub fn finish_time(raw: &str, now: NaiveTime) -> Converted<NaiveTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(now);
    }

    let parts: Vec<&str> = raw.split(':').collect();
    let seconds = match parts.len() {
        3 => clock_seconds(&parts),
        _ => None,
    }
    .ok_or_else(|| ConversionFailed("Only digits and \":\" can be used. (10:00:00)".into()))?;

    if seconds > MAX_ELAPSED_SECONDS {
        return fail("There's only 24 hours in a day");
    }
    NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0)
        .ok_or_else(|| ConversionFailed("There's only 24 hours in a day".into()))
}

/// Where a stat sits in the allocation sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatSlot {
    /// Points not yet placed in earlier stats
    pub remaining: u8,
    /// Stats still to be filled after this one
    pub stats_after: u8,
    pub can_go_back: bool,
}

/// A stat answer: a value, or a request to redo the previous stat
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatInput {
    Value(u8),
    Back,
}

/// Points for one stat; `b` goes back to the previous stat
///
/// The last stat must use up the remaining points exactly, and no earlier
/// stat may leave more points than the stats after it can hold.
pub fn stat(raw: &str, slot: StatSlot) -> Converted<StatInput> {
    let raw = raw.trim().to_lowercase();
    if raw == "b" && slot.can_go_back {
        return Ok(StatInput::Back);
    }

    let value: i64 = raw
        .parse()
        .map_err(|_| ConversionFailed("Incorrect input".into()))?;
    if value < 0 {
        return fail("Incorrect input");
    }
    if value > i64::from(STAT_MAX) {
        return fail("That's over the allowed amount (10)");
    }
    if value > i64::from(slot.remaining) {
        return fail("You have no more points to use..");
    }

    let left = i64::from(slot.remaining) - value;
    if slot.stats_after == 0 && left > 0 {
        return fail("You still have points to apply.");
    }
    if left > i64::from(slot.stats_after) * i64::from(STAT_MAX) {
        return fail("You won't be able to place all of your points.");
    }

    Ok(StatInput::Value(value as u8))
}
