use clap::Parser;
use smithtree::cli::commands::execute_command;
use smithtree::cli::{output, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` raises smithtree's own level one step per flag; RUST_LOG, when set, wins.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,smithtree={level}")));

    // per node traversal spans only at -ddd
    let spans = if level == LevelFilter::TRACE {
        FmtSpan::ENTER | FmtSpan::CLOSE
    } else {
        FmtSpan::CLOSE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_span_events(spans)
                .with_filter(filter),
        )
        .init();
    tracing::debug!(%level, "logging initialised");
}
