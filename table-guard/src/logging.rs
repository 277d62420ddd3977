//! Logging utilities and configuration for table-guard.
//!
//! The library only emits `tracing` events and spans; installing a
//! subscriber is left to the application. [`setup::init_logging`] is the
//! subscriber the `table-guard` binary uses.

/// Truncates a string to the maximum field length if needed.
///
/// Used for cell values and patterns that end up in log fields.
pub fn truncate_field(value: &str, max_length: usize) -> String {
    if value.len() <= max_length {
        return value.to_string();
    }
    let mut end = max_length;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...(truncated)", &value[..end])
}

/// Subscriber setup for the `table-guard` command line.
///
/// A validation run is short-lived and its stdout carries the result line,
/// so logs always go to stderr. The text format is compact: no timestamps,
/// no module targets, one line per event with its span fields.
pub mod setup {
    use tracing::{Level, Subscriber};
    use tracing_subscriber::{registry::LookupSpan, Layer};

    /// Configuration for the logging subscriber.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct LoggingConfig {
        /// Level for everything outside table-guard (DataFusion, calamine, ...)
        pub dependency_level: Level,
        /// Level for table-guard's own events
        pub guard_level: Level,
        /// Emit one JSON object per event instead of text
        pub json_format: bool,
        /// Prefix text events with their timestamp and module target
        pub timestamps: bool,
        /// Environment filter override
        pub env_filter: Option<String>,
    }

    impl Default for LoggingConfig {
        fn default() -> Self {
            Self::cli()
        }
    }

    impl LoggingConfig {
        /// Progress at info, warnings from dependencies, compact text.
        pub fn cli() -> Self {
            Self {
                dependency_level: Level::WARN,
                guard_level: Level::INFO,
                json_format: false,
                timestamps: false,
                env_filter: None,
            }
        }

        /// Only warnings and errors, such as ignored rule keys.
        pub fn quiet() -> Self {
            Self {
                guard_level: Level::WARN,
                ..Self::cli()
            }
        }

        /// Per-check debug events with timestamps.
        pub fn verbose() -> Self {
            Self {
                guard_level: Level::DEBUG,
                timestamps: true,
                ..Self::cli()
            }
        }

        /// Maps `-v`/`-q` counts onto a preset.
        ///
        /// `quiet` wins over any `-v`. Two or more `-v` also open up
        /// dependency logs and table-guard traces.
        pub fn from_verbosity(verbose: u8, quiet: bool) -> Self {
            match (quiet, verbose) {
                (true, _) => Self::quiet(),
                (false, 0) => Self::cli(),
                (false, 1) => Self::verbose(),
                (false, _) => Self {
                    dependency_level: Level::INFO,
                    guard_level: Level::TRACE,
                    ..Self::verbose()
                },
            }
        }

        /// Sets the level for table-guard events.
        pub fn with_guard_level(mut self, level: Level) -> Self {
            self.guard_level = level;
            self
        }

        /// Sets whether to use JSON output format.
        pub fn with_json_format(mut self, enabled: bool) -> Self {
            self.json_format = enabled;
            self
        }

        /// Sets a custom environment filter.
        pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
            self.env_filter = Some(filter.into());
            self
        }

        /// Builds the environment filter string.
        pub fn env_filter(&self) -> String {
            match &self.env_filter {
                Some(filter) => filter.clone(),
                None => format!(
                    "{},table_guard={}",
                    self.dependency_level.as_str().to_lowercase(),
                    self.guard_level.as_str().to_lowercase()
                ),
            }
        }

        /// Builds the formatting layer, writing to stderr.
        pub fn fmt_layer<S>(&self) -> Box<dyn Layer<S> + Send + Sync>
        where
            S: Subscriber + for<'a> LookupSpan<'a>,
        {
            let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
            match (self.json_format, self.timestamps) {
                (true, _) => layer.json().with_current_span(true).boxed(),
                (false, true) => layer.compact().boxed(),
                (false, false) => layer.compact().without_time().with_target(false).boxed(),
            }
        }
    }

    /// Installs a global subscriber writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the configured filter.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use table_guard::logging::setup::{init_logging, LoggingConfig};
    ///
    /// init_logging(LoggingConfig::from_verbosity(1, false).with_json_format(true)).unwrap();
    /// ```
    pub fn init_logging(config: LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config.env_filter()))?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(config.fmt_layer())
            .try_init()?;

        Ok(())
    }
}
