use tracing::Level;

/// Environment variable selecting the log level when no flag is given.
pub const LOG_LEVEL_ENV: &str = "logging_level";

#[derive(Debug, PartialEq, Eq)]
pub struct LevelChoice {
    pub level: Level,
    pub invalid_env: bool,
}

/// Flags win over the environment; unrecognised environment values fall
/// back to ERROR.
pub fn select_level(verbose: bool, quiet: bool, env: Option<&str>) -> LevelChoice {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        match env.map(|v| v.trim().to_uppercase()) {
            None => Level::INFO,
            Some(v) if v == "INFO" => Level::INFO,
            Some(v) if v == "WARNING" || v == "WARN" => Level::WARN,
            Some(v) if v == "ERROR" => Level::ERROR,
            Some(_) => {
                return LevelChoice {
                    level: Level::ERROR,
                    invalid_env: true,
                }
            }
        }
    };

    LevelChoice {
        level,
        invalid_env: false,
    }
}

pub fn init(verbose: bool, quiet: bool) {
    let env = std::env::var(LOG_LEVEL_ENV).ok();
    let choice = select_level(verbose, quiet, env.as_deref());

    tracing_subscriber::fmt()
        .with_max_level(choice.level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if choice.invalid_env {
        tracing::error!(
            "The {} environment variable is not set to INFO, WARNING, or ERROR. The log level is set to ERROR",
            LOG_LEVEL_ENV
        );
    }
}
