//! Default logging setup for hashkit tools
#![warn(missing_docs)]

use std::sync::Mutex;

const TIMESTAMP_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::BrightBlack)));

const TARGET_STYLE: anstyle::Style =
    anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Magenta)));

/// Environment variable holding the log filter, defaulting to `info`.
pub const FILTER_ENV: &str = "HASHKIT_LOG";

/// Environment variable selecting whether log output is colored.
pub const STYLE_ENV: &str = "HASHKIT_LOG_STYLE";

/// Perform the default logging setup used by hashkit tools.
///
/// Each record is prefixed with the time elapsed since setup and its level. Whenever the record's
/// target changes, a header line naming the new target is emitted first.
pub fn setup() {
    builder().init();
}

/// Like [`setup`], but does not fail if a logger was already installed.
///
/// Returns `false` when another logger is active.
pub fn try_setup() -> bool {
    builder().try_init().is_ok()
}

fn builder() -> env_logger::Builder {
    let start_time = std::time::Instant::now();
    let last_target = Mutex::new(String::new());

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::new()
            .filter_or(FILTER_ENV, "info")
            .write_style(STYLE_ENV),
    );
    builder.format(move |buf, record| {
        use std::io::Write;

        let timestamp = start_time.elapsed();
        let level = record.level();
        let target = record.target();

        {
            let mut last_target = last_target.lock().unwrap_or_else(|err| err.into_inner());

            if target != *last_target {
                last_target.clear();
                last_target.push_str(target);

                writeln!(
                    buf,
                    "{} {}",
                    format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
                    format_args!("{style}{target}{style:#}", style = TARGET_STYLE)
                )?;
            }
        }
        writeln!(
            buf,
            "{} {} {}",
            format_args!("{style}{timestamp:>9.2?}{style:#}", style = TIMESTAMP_STYLE),
            format_args!(
                "{style}{level:5}{style:#}",
                style = buf.default_level_style(level),
            ),
            record.args(),
        )
    });
    builder
}
