use {
    crate::config::{Config, Format},
    std::{
        io::IsTerminal,
        panic::PanicHookInfo,
        sync::Once,
    },
    time::macros::format_description,
    tracing::Level,
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Installs the global tracing subscriber and routes panics through it.
/// `env_filter` has similar syntax to env_logger. It is documented at
/// https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html
pub fn initialize(config: &Config) {
    set_tracing_subscriber(config);
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Like [`initialize`], but can be called multiple times in a row. Later calls
/// are ignored.
///
/// Useful for tests.
pub fn initialize_reentrant(env_filter: &str) {
    // The subscriber is a global, a second installation would fail.
    static ONCE: Once = Once::new();
    ONCE.call_once(|| initialize(&Config::new(env_filter)));
}

fn set_tracing_subscriber(config: &Config) {
    // `with_max_level` keeps the given level and everything more severe.
    let writer = std::io::stderr
        .with_max_level(config.stderr_threshold.unwrap_or(Level::TRACE))
        .or_else(std::io::stdout);
    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let env_filter = EnvFilter::new(&config.env_filter);

    let fmt_layer = match config.format {
        Format::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_timer(timer)
            .with_filter(env_filter)
            .boxed(),
        Format::Plain => tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_timer(timer)
            .with_ansi(std::io::stderr().is_terminal())
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Logs panics with `tracing::error!` in roughly the format of the default
/// hook, so they end up wherever the logs go.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
