//! mongo-reply command-line tool
//!
//! Interprets captured MongoDB server replies offline: update replies from
//! write-command or legacy servers, and aggregation replies in either the
//! inline or the cursor shape.
//!
//! # Usage
//!
//! ```bash
//! mongo-reply update replies.json --indexes 0,2,5 --server-version 2.4.9
//! mongo-reply aggregate replies.json --format table
//! mongo-reply config
//! ```

use tracing::debug;

use mongo_reply::cli::CliInterface;
use mongo_reply::error::Result;
use mongo_reply::executor::ReplyExecutor;
use mongo_reply::formatter::Formatter;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Interpret the replies and print the formatted result
///
/// # Returns
/// * `Result<()>` - Success or error
fn run() -> Result<()> {
    let cli = CliInterface::new()?;
    initialize_logging(&cli);

    let Some(command) = cli.build_command()? else {
        print!("{}", cli.config().to_toml_string()?);
        return Ok(());
    };

    debug!("Expected reply shape: {:?}", cli.capability());
    let executor = ReplyExecutor::new(cli.config().clone());
    let result = executor.execute(command)?;

    let formatter = Formatter::new(cli.config().display.format);
    let output = formatter.format(&result)?;

    if result.success {
        println!("{output}");
        Ok(())
    } else {
        eprintln!("{output}");
        std::process::exit(2);
    }
}

/// Initialize logging system
///
/// Logs go to stderr so formatted output on stdout stays machine-readable.
///
/// # Arguments
/// * `cli` - CLI interface with configuration
fn initialize_logging(cli: &CliInterface) {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
