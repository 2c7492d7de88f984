use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use shelf2md::config::{CliOverrides, Settings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = Command::new("shelf2md")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Turn a book-tracking CSV export into a Markdown review log and reading list")
        .arg(
            Arg::new("input")
                .help("CSV export to read")
                .index(1),
        )
        .arg(
            Arg::new("reviews")
                .short('r')
                .long("reviews")
                .value_name("PATH")
                .help("Where to write the review log"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .value_name("PATH")
                .help("Where to write the reading list"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Extra configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log more (repeat for debug output)"),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"));

    let config_file = matches.get_one::<String>("config").map(PathBuf::from);
    let mut settings = Settings::new(config_file.as_deref())?;

    // CLI values win over configuration
    settings.update_with_cli_args(CliOverrides {
        input_path: matches.get_one::<String>("input").map(PathBuf::from),
        reviews_path: matches.get_one::<String>("reviews").map(PathBuf::from),
        list_path: matches.get_one::<String>("list").map(PathBuf::from),
    });
    tracing::debug!(?settings, "Settings resolved");

    let export = shelf2md::convert_from_path(&settings.input_path, settings.date_formats.as_slice())
        .with_context(|| format!("Failed to convert {}", settings.input_path.display()))?;

    shelf2md::write_export(&export, &settings.reviews_path, &settings.list_path)?;

    println!(
        "{} read books written to: {}",
        export.read_books,
        settings.reviews_path.display()
    );
    println!(
        "{} to-read books written to: {}",
        export.to_read_books,
        settings.list_path.display()
    );
    Ok(())
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
