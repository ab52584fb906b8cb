mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use wordgarden_lib::vocab::quiz::RoundKind;

#[derive(Parser)]
#[command(name = "wordgarden-cli", about = "WordGarden vocabulary practice", version)]
struct Cli {
    /// Config file (default: <config dir>/wordgarden/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum RewardKind {
    /// Finished a review session; N is the number of words reviewed
    Review,
    /// Won the matching game; N is the number of correct matches
    Game,
    /// Finished a quiz; N is the number of correct answers
    Quiz,
}

#[derive(Subcommand)]
enum Command {
    /// Stars, streak and today's progress
    Status,

    /// List word packs
    Packs,

    /// Mark a word as mastered and start its review schedule
    Learn {
        /// Word id (e.g. u2-cat)
        word_id: String,
    },

    /// List words due for review
    Due,

    /// Review every due word interactively
    Review,

    /// Play the matching game: five words, three lives
    Play,

    /// Take a ten-question quiz
    Quiz,

    /// Record one review outcome
    Answer {
        /// Word id
        word_id: String,
        #[command(flatten)]
        outcome: Outcome,
    },

    /// Award stars for a finished activity
    Reward {
        kind: RewardKind,
        /// Words reviewed or correct answers
        count: u32,
    },

    /// Switch the current word pack
    Category {
        /// Pack name
        name: String,
    },

    /// Show the wrong-word notebook
    Misses,

    /// Generate (or fetch from cache) an illustration for a word
    Illustrate {
        /// English word
        word: String,
        /// Write the image here instead of printing its data URL
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate a pronunciation and save it as a WAV file
    Say {
        /// English word
        word: String,
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Outcome {
    /// The word was recalled
    #[arg(long)]
    correct: bool,
    /// The word was missed
    #[arg(long)]
    wrong: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let mut app = app::App::new(cli.config.as_deref())?;

    match cli.command {
        Command::Status => commands::status::run(&app, &cli.format, use_color)?,
        Command::Packs => commands::packs::run(&app, &cli.format)?,
        Command::Learn { word_id } => commands::learn::run(&mut app, &word_id, &cli.format)?,
        Command::Due => commands::due::run(&app, &cli.format)?,
        Command::Review => commands::review::run_interactive(&mut app, use_color)?,
        Command::Play => commands::practice::run(&mut app, RoundKind::MatchGame, use_color)?,
        Command::Quiz => commands::practice::run(&mut app, RoundKind::Quiz, use_color)?,
        Command::Answer { word_id, outcome } => {
            commands::review::run_answer(&mut app, &word_id, outcome.correct, &cli.format)?
        }
        Command::Reward { kind, count } => {
            commands::reward::run(&mut app, kind, count, &cli.format)?
        }
        Command::Category { name } => commands::category::run(&mut app, &name, &cli.format)?,
        Command::Misses => commands::misses::run(&app, &cli.format)?,
        Command::Illustrate { word, out } => {
            commands::media::run_illustrate(&app, &word, out.as_deref(), &cli.format)?
        }
        Command::Say { word, out } => commands::media::run_say(&app, &word, &out, &cli.format)?,
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
