//! Layered configuration.
//!
//! Sources, lowest priority first:
//! 1. the built-in `Config.toml` compiled into the binary
//! 2. a `Config.toml` sitting next to the executable
//! 3. an explicit file passed on the command line
//! 4. `SHELF2MD__*` environment variables (e.g. `SHELF2MD__REVIEWS_PATH`)
//! 5. command line overrides, applied with [`Settings::update_with_cli_args`]
//!
//! ```no_run
//! use shelf2md::config::Settings;
//!
//! let settings = Settings::new(None).unwrap();
//! println!("{}", settings.input_path.display());
//! ```

use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::{env, path::Path, path::PathBuf};

use crate::error::Result;

const EMBEDDED: &str = include_str!("../Config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// CSV export to read.
    pub input_path: PathBuf,
    /// Destination of the review log.
    pub reviews_path: PathBuf,
    /// Destination of the reading list.
    pub list_path: PathBuf,
    /// chrono format strings, tried in order.
    pub date_formats: Vec<String>,
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub input_path: Option<PathBuf>,
    pub reviews_path: Option<PathBuf>,
    pub list_path: Option<PathBuf>,
}

impl Settings {
    /// Built-in defaults only, ignoring files and environment.
    pub fn embedded() -> Result<Self> {
        Ok(embedded_builder().build()?.try_deserialize()?)
    }

    pub fn new(config_file: Option<&Path>) -> Result<Self> {
        // 1. built-in default config
        let mut builder = embedded_builder();

        // 2. try to load external config file
        if let Ok(exe_path) = env::current_exe() {
            if let Some(dir) = exe_path.parent() {
                let external = dir.join("Config.toml");
                if external.is_file() {
                    tracing::debug!(path = %external.display(), "Loading config next to executable");
                    builder = builder.add_source(File::from(external).required(false));
                }
            }
        }

        // 3. explicit config file
        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "Loading config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        // 4. environment variables; date formats may contain commas
        builder = builder.add_source(
            Environment::with_prefix("SHELF2MD")
                .separator("__")
                .try_parsing(true)
                .list_separator(";")
                .with_list_parse_key("date_formats"),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn update_with_cli_args(&mut self, overrides: CliOverrides) {
        if let Some(input) = overrides.input_path {
            self.input_path = input;
        }
        if let Some(reviews) = overrides.reviews_path {
            self.reviews_path = reviews;
        }
        if let Some(list) = overrides.list_path {
            self.list_path = list;
        }
    }
}

fn embedded_builder() -> ConfigBuilder<DefaultState> {
    Config::builder().add_source(File::from_str(EMBEDDED, FileFormat::Toml))
}
