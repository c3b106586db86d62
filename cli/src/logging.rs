use std::io::{self, IsTerminal as _};

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

const ENV_NAME: &str = "HMERKLE_LOG";

fn istty() -> bool {
    io::stderr().is_terminal()
}

/// Creates the env filter from [`ENV_NAME`], falling back to `info`.
fn env_filter() -> anyhow::Result<EnvFilter> {
    let directives = match std::env::var(ENV_NAME) {
        Ok(env) => env,
        Err(std::env::VarError::NotPresent) => String::new(),
        Err(std::env::VarError::NotUnicode(_)) => {
            anyhow::bail!("Environment variable {} is not unicode", ENV_NAME)
        }
    };

    Ok(EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse(directives)?)
}

/// Install the global subscriber. Logs go to stderr so that stdout only carries results.
pub fn init() -> anyhow::Result<()> {
    let format = fmt::format()
        .with_level(true)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .compact()
        .with_timer(fmt::time::SystemTime::default());
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter()?)
        .with_writer(io::stderr)
        .with_ansi(istty())
        .event_format(format)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
