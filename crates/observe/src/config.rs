use tracing::Level;

/// How log events are rendered.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Format {
    #[default]
    Plain,
    Json,
}

/// Settings of the process wide tracing subscriber.
#[derive(Debug, Clone)]
pub struct Config {
    /// Filters spans and events based on a set of filter directives
    /// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
    pub(crate) env_filter: String,
    /// Events at least as severe as this level are written to stderr, all
    /// others to stdout. Without a threshold everything goes to stderr,
    /// leaving stdout to the program's actual output.
    pub(crate) stderr_threshold: Option<Level>,
    pub(crate) format: Format,
}

impl Config {
    pub fn new(env_filter: &str) -> Self {
        Self {
            env_filter: env_filter.to_owned(),
            stderr_threshold: None,
            format: Format::Plain,
        }
    }

    pub fn with_stderr_threshold(mut self, stderr_threshold: Option<Level>) -> Self {
        self.stderr_threshold = stderr_threshold;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }
}
