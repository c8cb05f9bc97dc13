use std::fmt;
use std::sync::Arc;

use composition_core::model::{GameResult, Level};
use services::{
    Clock, EnglishResources, GameController, GameError, GameState, LocalGameRepository,
    TextResources, TextTemplate,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidLevel { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  composition [--level <test|easy|normal|hard>] [--seed <u64>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --level normal");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  COMPOSITION_LEVEL, COMPOSITION_SEED, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    level: Level,
    seed: Option<u64>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            level: Level::Normal,
            seed: None,
        }
    }
}

impl Args {
    fn from_env() -> Self {
        let defaults = Self::default();
        let level = std::env::var("COMPOSITION_LEVEL")
            .ok()
            .and_then(|value| value.parse::<Level>().ok())
            .unwrap_or(defaults.level);
        let seed = std::env::var("COMPOSITION_SEED")
            .ok()
            .and_then(|value| value.parse::<u64>().ok());
        Self { level, seed }
    }

    fn parse(
        mut self,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Option<Self>, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--level" => {
                    let value = require_value(args, "--level")?;
                    self.level = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    self.seed = Some(parsed);
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Some(self))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_question(state: &GameState) {
    let Some(question) = state.question.as_ref() else {
        return;
    };
    let options = question
        .options()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join("  ");
    println!();
    println!(
        "[{}] {} | {}% (need {}%)",
        state.formatted_time,
        state.progress_answers,
        state.percent_of_right_answers,
        state.min_percent
    );
    println!("{} = {} + ?", question.sum(), question.visible_number());
    println!("options: {options}");
}

fn render_result(result: &GameResult, resources: &dyn TextResources) {
    let settings = &result.settings;
    println!();
    println!("{}", if result.winner { "You won!" } else { "You lost." });
    println!(
        "{}",
        resources.format(
            TextTemplate::RequiredScore,
            &[settings.min_count_of_right_answers()]
        )
    );
    println!(
        "{}",
        resources.format(TextTemplate::ScoreAnswers, &[result.count_of_right_answers])
    );
    println!(
        "{}",
        resources.format(
            TextTemplate::RequiredPercentage,
            &[settings.min_percent_of_right_answers()]
        )
    );
    println!(
        "{}",
        resources.format(
            TextTemplate::ScorePercentage,
            &[result.percent_of_right_answers()]
        )
    );
}

async fn play(controller: &GameController) -> Result<GameResult, Box<dyn std::error::Error>> {
    let mut updates = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    render_question(&updates.borrow_and_update());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                changed?;
                if let Some(result) = updates.borrow_and_update().result.clone() {
                    return Ok(result);
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    // Nothing more to read; let the clock run out.
                    stdin_open = false;
                    continue;
                };
                let Ok(selection) = line.trim().parse::<i64>() else {
                    println!("type a number");
                    continue;
                };
                match controller.choose_answer(selection) {
                    Ok(outcome) => {
                        println!("{}", if outcome.correct { "right" } else { "wrong" });
                        render_question(&controller.state());
                    }
                    Err(GameError::Finished) => {}
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::from_env().parse(&mut argv) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    init_tracing();
    info!(level = %parsed.level, seed = ?parsed.seed, "starting game");

    let repository = match parsed.seed {
        Some(seed) => LocalGameRepository::with_seed(seed),
        None => LocalGameRepository::new(),
    };
    let resources: Arc<dyn TextResources> = Arc::new(EnglishResources);
    let controller = GameController::start(
        parsed.level,
        Arc::new(repository),
        Arc::clone(&resources),
        Clock::default(),
    )?;

    let settings = controller.settings();
    println!(
        "Level {}: {} seconds, {} right answers and {}% needed.",
        parsed.level,
        settings.game_time_in_seconds(),
        settings.min_count_of_right_answers(),
        settings.min_percent_of_right_answers()
    );

    let result = play(&controller).await?;
    render_result(&result, resources.as_ref());
    Ok(())
}

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            2
        }
    };
    // The stdin reader may still be parked on a blocking read; exit without waiting on it.
    std::process::exit(code);
}
