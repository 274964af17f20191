//! Interactive flows: onboarding, start-up, the main menu and cardio logging.
//!
//! Every flow takes a [`Console`] so the binary can drive it from the
//! terminal and tests can drive it from a buffer.

use crate::cardio::{record_cardio, CardioOutcome, CardioWorkout};
use crate::checks::{personal_checks, Standing};
use crate::convert::Confirmation;
use crate::deterioration::{apply_deterioration, weeks_since_last_entry};
use crate::level::xp_to_next_level;
use crate::log::LogStore;
use crate::prompt::{self, Console, ConversionFailed, Prompt};
use crate::settings::SettingsStore;
use crate::{Error, MeasuringSystem, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::io::{BufRead, Write};

/// Meters per inch
pub const METERS_PER_INCH: f64 = 0.0254;

/// Kilograms per pound
pub const KILOGRAMS_PER_POUND: f64 = 0.453_592_37;

/// Gather the profile from the user and write a fresh settings file
///
/// The settings file is only written once every answer is in.
pub fn initial_questions<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    settings: &mut SettingsStore,
) -> Result<()> {
    let name = prompt::first_name_prompt().ask(console)?;
    let birth_date = prompt::birth_date_prompt().ask(console)?;
    let sex = prompt::sex_prompt().ask(console)?;
    let goal = prompt::goal_prompt().ask(console)?;
    let system = prompt::measuring_system_prompt().ask(console)?;
    let weight = prompt::body_weight_prompt(system).ask(console)?;
    let height = prompt::body_height_prompt(system).ask(console)?;
    let stats = prompt::allocate_stats(console)?;

    settings.set_name(name);
    settings.set_birth_date(birth_date);
    settings.set_sex(sex);
    settings.set_goal(goal);
    settings.set_measuring(system);
    settings.set_weight(weight);
    settings.set_height(height);
    settings.set_stats(stats);
    settings.set_xp(0);
    settings.commit()?;

    tracing::info!("Created settings at {:?}", settings.path());
    Ok(())
}

/// Convert a height and weight between unit systems
///
/// Imperial values are rounded to whole inches and pounds.
pub fn convert_body_measurements(
    height: f64,
    weight: f64,
    from: MeasuringSystem,
    to: MeasuringSystem,
) -> (f64, f64) {
    match (from, to) {
        (MeasuringSystem::Imperial, MeasuringSystem::Metric) => (
            (height * METERS_PER_INCH * 100.0).round() / 100.0,
            (weight * KILOGRAMS_PER_POUND * 10.0).round() / 10.0,
        ),
        (MeasuringSystem::Metric, MeasuringSystem::Imperial) => (
            (height / METERS_PER_INCH).round(),
            (weight / KILOGRAMS_PER_POUND).round(),
        ),
        _ => (height, weight),
    }
}

/// Flip the measuring system, converting height and weight, and commit
pub fn switch_measuring_system(settings: &mut SettingsStore) -> Result<MeasuringSystem> {
    let profile = settings.profile()?;
    let to = profile.measuring.other();
    let (height, weight) =
        convert_body_measurements(profile.height, profile.weight, profile.measuring, to);

    settings.set_measuring(to);
    settings.set_height(height);
    settings.set_weight(weight);
    settings.commit()?;

    tracing::info!("Switched measuring system to {}", to);
    Ok(to)
}

/// Offer to switch the measuring system
pub fn change_settings<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    settings: &mut SettingsStore,
) -> Result<()> {
    let current = settings.profile()?.measuring;
    match prompt::switch_system_prompt(current.other()).ask(console)? {
        Confirmation::Yes => {
            let to = switch_measuring_system(settings)?;
            console.say(format!("Measurements are now {}.", to))?;
        }
        Confirmation::No => {
            console.say(format!("Keeping {} measurements.", current))?;
        }
        Confirmation::AssumedNo => {
            console.say("I'll take that as a no.")?;
            console.say(format!("Keeping {} measurements.", current))?;
        }
    }
    Ok(())
}

fn dashes<R: BufRead, W: Write>(console: &mut Console<R, W>, width: usize) -> Result<()> {
    console.say("-".repeat(width))
}

/// Ask for a cardio workout, score it, and log it
///
/// `now` fixes both the defaults for blank answers and the time zone the
/// answers are read in.
pub fn log_cardio<R, W, Tz>(
    console: &mut Console<R, W>,
    settings: &mut SettingsStore,
    logs: &LogStore,
    now: DateTime<Tz>,
) -> Result<CardioOutcome>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
{
    let system = settings.profile()?.measuring;

    let distance = prompt::distance_prompt(system).ask(console)?;
    let elapsed_seconds = prompt::duration_prompt().ask(console)?;
    let date = prompt::workout_date_prompt(now.date_naive()).ask(console)?;
    let time = prompt::finish_time_prompt(now.time()).ask(console)?;

    let finished_at = now
        .timezone()
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .ok_or_else(|| Error::Validation(format!("{} {} is not a valid local time", date, time)))?
        .with_timezone(&Utc);

    let workout = CardioWorkout {
        distance,
        elapsed_seconds,
        measuring: system,
        date,
        finished_at,
    };

    let outcome = record_cardio(settings, logs, &workout, now.with_timezone(&Utc))?;
    match &outcome {
        CardioOutcome::FutureDated => {
            console.say("You're wanting to log for the future?")?;
        }
        CardioOutcome::TooFast { .. } => {
            console.say("You can run faster than Hicham El Guerrouj?")?;
            dashes(console, 28)?;
        }
        CardioOutcome::Logged { entry, points, .. } => {
            console.say(format!("Your average time was {}", entry.average))?;
            if *points == 0 {
                console.say("Didn't qualify for points")?;
                dashes(console, 28)?;
            } else {
                let line = format!("{} points were received!", points);
                let width = line.len() + 1;
                console.say(line)?;
                dashes(console, width)?;
            }
        }
    }

    Ok(outcome)
}

/// Start-up: validate, offer a last log, apply deterioration, validate again
pub fn start_up<R, W, Tz>(
    console: &mut Console<R, W>,
    settings: &mut SettingsStore,
    logs: &LogStore,
    now: DateTime<Tz>,
) -> Result<Standing>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
{
    personal_checks(settings, logs)?;

    let utc_now = now.with_timezone(&Utc);
    if weeks_since_last_entry(logs, utc_now)? > 0
        && prompt::log_before_deterioration_prompt().ask(console)?
    {
        log_cardio(console, settings, logs, now.clone())?;
    }

    let ticks = apply_deterioration(settings, logs, utc_now)?;
    if !ticks.is_empty() {
        let lost: u64 = ticks.iter().filter_map(|t| t.points_lost()).sum();
        console.say(format!(
            "{} week(s) without a workout cost you {} XP.",
            ticks.len(),
            lost
        ))?;
    }

    personal_checks(settings, logs)
}

/// Print the greeting with level and XP
pub fn hello<R: BufRead, W: Write>(console: &mut Console<R, W>, standing: &Standing) -> Result<()> {
    console.say(standing.greeting())?;
    if let Some(needed) = xp_to_next_level(standing.xp) {
        console.say(format!("{} XP to level {}", needed, standing.level + 1))?;
    }
    Ok(())
}

/// Print the most recent `limit` log entries, oldest first
pub fn show_history<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    logs: &LogStore,
    limit: usize,
) -> Result<()> {
    let entries = logs.entries()?;
    if entries.is_empty() {
        return console.say("Nothing logged yet.");
    }

    let skip = entries.len().saturating_sub(limit);
    for entry in &entries[skip..] {
        console.say(format!(
            "{}  {:<11} {:>6} {:>9} avg {:>8}  {:>5} pts",
            entry.date,
            entry.exercise.to_string(),
            entry.distance,
            entry.total.to_string(),
            entry.average,
            entry.points
        ))?;
    }
    Ok(())
}

/// Main menu options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Cardio,
    Settings,
    History,
    Quit,
}

fn menu_choice(raw: &str) -> std::result::Result<MenuChoice, ConversionFailed> {
    match raw.trim().to_lowercase().as_str() {
        "c" | "cardio" => Ok(MenuChoice::Cardio),
        "s" | "settings" => Ok(MenuChoice::Settings),
        "h" | "history" | "log" => Ok(MenuChoice::History),
        "q" | "quit" | "exit" => Ok(MenuChoice::Quit),
        _ => Err(ConversionFailed(
            "Options are (C)ardio, (S)ettings, (H)istory or (Q)uit".into(),
        )),
    }
}

pub fn menu_prompt() -> Prompt<'static, MenuChoice> {
    Prompt::new(
        "What did you want to do? (C)ardio/(S)ettings/(H)istory/(Q)uit",
        menu_choice,
    )
}

/// Run the main menu until the user quits
///
/// `clock` is asked for the current time whenever a workout is logged.
pub fn press_start<R, W, Tz, C>(
    console: &mut Console<R, W>,
    settings: &mut SettingsStore,
    logs: &LogStore,
    clock: C,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
    C: Fn() -> DateTime<Tz>,
{
    loop {
        match menu_prompt().ask(console)? {
            MenuChoice::Cardio => {
                log_cardio(console, settings, logs, clock())?;
                let standing = personal_checks(settings, logs)?;
                hello(console, &standing)?;
            }
            MenuChoice::Settings => change_settings(console, settings)?,
            MenuChoice::History => show_history(console, logs, 10)?,
            MenuChoice::Quit => {
                console.say("Goodbye!")?;
                return Ok(());
            }
        }
    }
}
