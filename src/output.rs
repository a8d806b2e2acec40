//! # Output Configuration
//!
//! Decides whether devflow output uses colour and emoji. An explicit
//! `--color always|never` wins; in `auto` mode the usual conventions apply,
//! checked in this order:
//!
//! 1. `NO_COLOR` set to anything, even empty: off
//! 2. `CLICOLOR=0`: off
//! 3. `CLICOLOR_FORCE` set to a non-zero value: on, even without a TTY
//! 4. `TERM=dumb`: off
//! 5. otherwise whatever the terminal on stdout supports

use std::env;

use clap::ValueEnum;

/// Value of the `--color` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

/// Output configuration for colours and emoji.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colours and emoji should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve `choice` against the process environment and stdout.
    pub fn new(choice: ColorChoice) -> Self {
        let use_color = match choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => auto_color(
                |key| env::var_os(key).map(|v| v.to_string_lossy().into_owned()),
                || console::Term::stdout().features().colors_supported(),
            ),
        };
        Self { use_color }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// Pick the emoji when colour is on, the plain marker otherwise.
    pub fn marker<'a>(&self, emoji: &'a str, plain: &'a str) -> &'a str {
        if self.use_color {
            emoji
        } else {
            plain
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

/// `auto` mode decision over an injectable environment lookup.
fn auto_color(var: impl Fn(&str) -> Option<String>, terminal: impl FnOnce() -> bool) -> bool {
    if var("NO_COLOR").is_some() {
        return false;
    }
    match var("CLICOLOR_FORCE").as_deref() {
        _ if var("CLICOLOR").as_deref() == Some("0") => false,
        Some(force) if !force.is_empty() && force != "0" => true,
        _ if var("TERM").as_deref() == Some("dumb") => false,
        _ => terminal(),
    }
}
