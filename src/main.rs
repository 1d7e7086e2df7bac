use std::path::PathBuf;

use clap::Parser;
use topic_quiz::{AppConfig, Difficulty, Quiz, QuizError, QuizSettings, logging};
use tracing::error;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./topic-quiz.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Topic to generate questions about; starts the quiz right away
    #[arg(short, long)]
    topic: Option<String>,

    /// Number of questions (5, 10, 15 or 20)
    #[arg(short = 'n', long, default_value_t = 5)]
    questions: usize,

    /// Question difficulty
    #[arg(short, long, value_enum, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        error!("Quiz failed: {}", e);
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), QuizError> {
    let config = AppConfig::load(args.config.as_deref())?;
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Logging disabled: {}", e);
    }

    let settings = QuizSettings::new(
        args.topic.clone().unwrap_or_default(),
        args.questions,
        args.difficulty,
    );

    let mut quiz = Quiz::from_config(&config, &settings)?;
    if args.topic.is_some() {
        quiz = quiz.start_immediately()?;
    }

    quiz.run().await
}
