use std::fmt::Display;

use colored::Colorize;
use log::Level;

/// External crates only need to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];
const ALLOWED_LEVELS: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

pub fn init_logger() {
    let result = fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_to_string(&record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .filter(|meta| {
            let target = Target::from_str(meta.target());

            let is_allowed = ALLOWED_LEVELS.contains(&meta.level());
            let is_severe = ALLOWED_EXTERNAL_LEVELS.contains(&meta.level());

            target.is_local() && is_allowed || is_severe
        })
        .chain(std::io::stdout())
        .apply();

    if let Err(e) = result {
        eprintln!("A logger was already installed: {e}");
    }
}

enum Target {
    External(String),
    Main,
    Core,
    Market,
    Impls,
    Server,
}

impl Target {
    fn from_str(target: &str) -> Self {
        let module = target.split("::").next().unwrap_or_default();

        match module {
            "spincity" => Self::Main,
            "spincity_core" => Self::Core,
            "spincity_market" => Self::Market,
            "spincity_impls" => Self::Impls,
            "spincity_server" => Self::Server,
            other => Self::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Self::External(x) => x.as_str().clear(),
            Self::Main => "MAIN".white(),
            Self::Core => "CORE".blue(),
            Self::Market => "MARKET".bright_purple(),
            Self::Impls => "IMPLS".cyan(),
            Self::Server => "SERVER".bright_green(),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_targets() {
        assert!(matches!(
            Target::from_str("spincity_market::sellers"),
            Target::Market
        ));
        assert!(matches!(Target::from_str("spincity"), Target::Main));
        assert!(!Target::from_str("sqlx::query").is_local());
    }
}
