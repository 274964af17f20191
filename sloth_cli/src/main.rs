use chrono::Local;
use clap::{Parser, Subcommand};
use sloth_core::export::export_csv;
use sloth_core::level::xp_to_next_level;
use sloth_core::session::{hello, initial_questions, log_cardio, press_start, start_up};
use sloth_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sloth")]
#[command(about = "Fitness RPG: log cardio, earn XP, level up", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the start-up checks and open the main menu (default)
    Start,

    /// Log a single cardio workout and exit
    Cardio,

    /// Show name, level and XP without prompting
    Status,

    /// Export the workout log to CSV
    Export {
        /// Destination file (defaults to log.csv in the data directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    sloth_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let mut config = Config::load()?;
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }

    let outcome = match cli.command {
        Some(Commands::Start) | None => cmd_start(&config),
        Some(Commands::Cardio) => cmd_cardio(&config),
        Some(Commands::Status) => cmd_status(&config),
        Some(Commands::Export { output }) => cmd_export(&config, output),
    };

    match outcome {
        Err(Error::Aborted) => {
            println!("\nGoodbye!");
            Ok(())
        }
        other => other,
    }
}

/// Load the settings file, running onboarding when there is none yet
fn open_settings<R, W>(config: &Config, console: &mut Console<R, W>) -> Result<SettingsStore>
where
    R: std::io::BufRead,
    W: std::io::Write,
{
    let mut settings = SettingsStore::new(config.settings_path());
    if settings.exists() {
        settings.load()?;
    } else {
        tracing::info!("No settings at {:?}, starting onboarding", settings.path());
        initial_questions(console, &mut settings)?;
    }
    Ok(settings)
}

fn cmd_start(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.data.data_dir)?;

    let mut console = Console::stdio();
    let mut settings = open_settings(config, &mut console)?;
    let logs = LogStore::new(config.log_path());

    let standing = start_up(&mut console, &mut settings, &logs, Local::now())?;
    hello(&mut console, &standing)?;
    press_start(&mut console, &mut settings, &logs, Local::now)
}

fn cmd_cardio(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.data.data_dir)?;

    let mut console = Console::stdio();
    let mut settings = open_settings(config, &mut console)?;
    let logs = LogStore::new(config.log_path());

    personal_checks(&mut settings, &logs)?;
    log_cardio(&mut console, &mut settings, &logs, Local::now())?;
    let standing = personal_checks(&mut settings, &logs)?;
    hello(&mut console, &standing)
}

fn cmd_status(config: &Config) -> Result<()> {
    let mut settings = SettingsStore::new(config.settings_path());
    if !settings.exists() {
        return Err(Error::Config(format!(
            "no settings at {}; run `sloth` to create a character",
            settings.path().display()
        )));
    }
    settings.load()?;
    let logs = LogStore::new(config.log_path());

    let standing = personal_checks(&mut settings, &logs)?;
    println!("{}", standing.greeting());
    match xp_to_next_level(standing.xp) {
        Some(needed) => println!("{} XP to level {}", needed, standing.level + 1),
        None => println!("Max level reached"),
    }
    Ok(())
}

fn cmd_export(config: &Config, output: Option<PathBuf>) -> Result<()> {
    let logs = LogStore::new(config.log_path());
    let csv_path = output.unwrap_or_else(|| config.data.data_dir.join("log.csv"));

    let count = export_csv(&logs, &csv_path)?;

    println!("✓ Exported {} log entries to CSV", count);
    println!("  CSV: {}", csv_path.display());
    Ok(())
}
