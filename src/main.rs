use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use video_quiz::config::LogFormat;
use video_quiz::service::Difficulty;
use video_quiz::session::ScoringMode;
use video_quiz::{AppError, Config, HttpQuizService, LocalQuizService, QuizSource};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser, Debug)]
#[command(version, about = "Generate and take a timed quiz from a YouTube video", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the quiz generation service
    #[arg(long)]
    api_url: Option<String>,

    /// Language the questions should be written in
    #[arg(long)]
    lang: Option<String>,

    #[arg(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Quiz length in seconds
    #[arg(long)]
    duration: Option<u32>,

    /// Seconds to wait for the quiz service before giving up
    #[arg(long)]
    timeout: Option<u64>,

    /// Score answers locally or with the service's verification endpoint
    #[arg(long, value_enum)]
    scoring: Option<ScoringMode>,

    /// Use the bundled demo quiz instead of the service
    #[arg(long, conflicts_with = "quiz_file")]
    offline: bool,

    /// Serve every quiz from this JSON file instead of the service
    #[arg(long)]
    quiz_file: Option<PathBuf>,

    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
        if let Some(lang) = &self.lang {
            config.target_lang = lang.clone();
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(duration) = self.duration {
            config.quiz_duration_secs = duration;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(scoring) = self.scoring {
            config.scoring = scoring;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "quiz client failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    video_quiz::telemetry::init_tracing(&config)?;
    info!(?config, "configuration loaded");

    if args.offline {
        return video_quiz::run(&config, LocalQuizService::bundled(), "offline demo").await;
    }
    if let Some(path) = args.quiz_file {
        let label = path.display().to_string();
        let service = LocalQuizService::new(QuizSource::File(path));
        return video_quiz::run(&config, service, &label).await;
    }

    let service = HttpQuizService::new(&config.api_base_url, CONNECT_TIMEOUT)?;
    let label = service.base_url().to_string();
    video_quiz::run(&config, service, &label).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "video-quiz",
            "--api-url",
            "http://127.0.0.1:9000",
            "--difficulty",
            "hard",
            "--duration",
            "120",
            "--scoring",
            "remote",
        ]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.quiz_duration_secs, 120);
        assert_eq!(config.scoring, ScoringMode::Remote);
        assert_eq!(config.target_lang, "en");
    }

    #[test]
    fn test_offline_conflicts_with_quiz_file() {
        let parsed = Args::try_parse_from(["video-quiz", "--offline", "--quiz-file", "q.json"]);
        assert!(parsed.is_err());
    }
}
