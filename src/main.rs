use std::{env, io::Write, process::ExitCode, sync::LazyLock};

use {
    anyhow::Context,
    jiff::{Timestamp, Zoned, tz::TimeZone},
};

mod args;
mod cmd;
mod config;
mod datetime;
mod error;
mod logger;
mod meeting;
mod paths;
mod recurrence;
mod render;
mod style;
mod template;

static TZ: LazyLock<TimeZone> = LazyLock::new(|| TimeZone::system());

/// The current time, overridable with `AGENDA_NOW` so that tests can pin the
/// window of accepted years.
static NOW: LazyLock<Zoned> = LazyLock::new(|| {
    let ts = match read_env_agenda_now() {
        Ok(Some(ts)) => {
            log::trace!(
                "setting current time to `{ts}` from `AGENDA_NOW` \
                 environment variable",
            );
            ts
        }
        Ok(None) => Timestamp::now(),
        Err(err) => {
            let now = Timestamp::now();
            log::warn!(
                "reading `AGENDA_NOW` failed, using current time \
                 `{now}`: {err:#}",
            );
            now
        }
    };
    ts.to_zoned(TZ.clone())
});

fn main() -> ExitCode {
    let err = match run() {
        Ok(code) => return code,
        Err(err) => err,
    };
    if let Some(help) = err.root_cause().downcast_ref::<args::Help>() {
        writeln!(&mut std::io::stdout(), "{help}").unwrap();
        return ExitCode::SUCCESS;
    }
    if let Some(version) = err.root_cause().downcast_ref::<args::Version>() {
        writeln!(&mut std::io::stdout(), "{version}").unwrap();
        return ExitCode::SUCCESS;
    }
    // Rust ignores SIGPIPE, so a closed stdout shows up as an I/O error.
    // Exit quietly as other Unix tools do.
    for cause in err.chain() {
        if let Some(err) = cause.downcast_ref::<std::io::Error>() {
            if err.kind() == std::io::ErrorKind::BrokenPipe {
                return ExitCode::from(0);
            }
        }
    }
    if std::env::var("RUST_BACKTRACE").map_or(false, |v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        writeln!(&mut std::io::stderr(), "{:?}", err).unwrap();
    } else {
        writeln!(&mut std::io::stderr(), "{:#}", err).unwrap();
    }
    ExitCode::from(1)
}

fn run() -> anyhow::Result<ExitCode> {
    let level = env::var("AGENDA_LOG").unwrap_or_else(|_| String::new());
    let level = match &*level {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        unk => anyhow::bail!("unrecognized log level '{}'", unk),
    };
    log::set_max_level(level);
    // The logger starts out in UTC, since finding the system time zone may
    // itself log. Once `TZ` is resolved, timestamps become local.
    let logger = logger::Logger::init()?;
    logger.set_time_zone(TZ.clone());
    cmd::run(&mut lexopt::Parser::from_env())?;
    Ok(ExitCode::SUCCESS)
}

fn read_env_agenda_now() -> anyhow::Result<Option<Timestamp>> {
    let Some(val) = std::env::var_os("AGENDA_NOW") else { return Ok(None) };
    let Some(val) = val.to_str() else {
        anyhow::bail!(
            "`AGENDA_NOW` environment variable is not valid UTF-8: {val:?}"
        )
    };
    val.parse::<Timestamp>()
        .context(
            "`AGENDA_NOW` environment variable is not a valid RFC 3339 \
             timestamp",
        )
        .map(Some)
}
