use std::path::PathBuf;

use log::Dispatch;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{Layer, Subscriber},
    layer::SubscriberExt,
};

fn create_filter(verbose: Option<u8>, level: Option<LevelFilter>) -> anyhow::Result<EnvFilter> {
    let mut extreme_trace = false;

    #[allow(clippy::wildcard_in_or_patterns)]
    let level_filter = level.unwrap_or_else(|| match verbose {
        None | Some(0) => LevelFilter::INFO,
        Some(1) => LevelFilter::DEBUG,
        Some(2) => LevelFilter::TRACE,
        Some(3) | _ => {
            extreme_trace = true;
            LevelFilter::TRACE
        }
    });

    // the HTTP stack is far too chatty below info
    let mut filter = EnvFilter::from_default_env()
        .add_directive(level_filter.into())
        .add_directive("hyper=info".parse()?)
        .add_directive("hyper_util=info".parse()?)
        .add_directive("h2=info".parse()?);

    if !extreme_trace {
        filter = filter.add_directive("journal::tasks=debug".parse()?);
    }

    Ok(filter)
}

/// Builds the log dispatcher for the embedding shell to install, plus the
/// flush guard when logging to files. The guard must be held for as long
/// as the dispatcher is in use.
pub fn generate(verbose: Option<u8>, dir: Option<PathBuf>) -> Result<(Dispatch, Option<WorkerGuard>), anyhow::Error> {
    let filter = create_filter(verbose, None)?;

    Ok(match dir {
        None => (
            Dispatch::new(Subscriber::builder().with_env_filter(filter).with_writer(std::io::stdout).finish()),
            None,
        ),
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_logger = Layer::new().with_writer(non_blocking).with_ansi(false);
            let stdout_logger = Layer::new().with_writer(std::io::stdout);

            let collector = tracing_subscriber::registry().with(filter).with(file_logger).with(stdout_logger);

            (Dispatch::new(collector), Some(guard))
        }
    })
}
