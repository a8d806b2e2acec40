//! Logger setup shared by every devflow binary.
//!
//! The library only uses the `log` macros; binaries call [`init`] once at
//! startup. `RUST_LOG` overrides the level chosen from `--verbose`.

use std::io::Write;

use console::style;
use log::{Level, LevelFilter};

use crate::output::OutputConfig;

/// Default level filter for the given verbosity.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Install `env_logger` writing `[LEVEL] message` lines to stderr.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: bool, output: &OutputConfig) {
    let use_color = output.use_color;
    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level(verbose));
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.format(move |buf, record| {
        writeln!(
            buf,
            "{} {}",
            level_tag(record.level(), use_color),
            record.args()
        )
    });
    let _ = builder.try_init();
}

fn level_tag(level: Level, use_color: bool) -> String {
    let tag = format!("[{}]", level);
    if !use_color {
        return tag;
    }
    let styled = match level {
        Level::Error => style(tag).red().bold(),
        Level::Warn => style(tag).yellow(),
        Level::Info => style(tag).green(),
        Level::Debug | Level::Trace => style(tag).dim(),
    };
    styled.force_styling(true).to_string()
}
