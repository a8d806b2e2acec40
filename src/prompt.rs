//! Interactive prompts: yes/no confirmation and masked secret input.

use std::io::{BufRead, Write};

use console::Term;
use dialoguer::{theme::ColorfulTheme, Password};

use crate::error::{Error, Result};

/// Ask a yes/no question on the controlling terminal.
///
/// Empty input (or end of input) returns `default`.
pub fn confirm(prompt: &str, default: bool) -> Result<bool> {
    let term = Term::stderr();
    loop {
        term.write_str(&prompt_line(prompt, default))?;
        let line = term.read_line()?;
        match parse_answer(&line) {
            Some(Answer::Empty) => return Ok(default),
            Some(Answer::Yes) => return Ok(true),
            Some(Answer::No) => return Ok(false),
            None => term.write_line("Please answer yes or no.")?,
        }
    }
}

/// Same loop as [`confirm`] over arbitrary streams.
pub fn confirm_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    default: bool,
) -> Result<bool> {
    loop {
        write!(output, "{}", prompt_line(prompt, default))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(default);
        }
        match parse_answer(&line) {
            Some(Answer::Empty) => return Ok(default),
            Some(Answer::Yes) => return Ok(true),
            Some(Answer::No) => return Ok(false),
            None => writeln!(output, "Please answer yes or no.")?,
        }
    }
}

/// Read a secret without echoing it.
pub fn secret(prompt: &str) -> Result<String> {
    let value = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact()?;
    if value.is_empty() {
        return Err(Error::Prompt {
            message: format!("no value entered for '{}'", prompt),
        });
    }
    Ok(value)
}

#[derive(Debug, PartialEq, Eq)]
enum Answer {
    Empty,
    Yes,
    No,
}

fn prompt_line(prompt: &str, default: bool) -> String {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    format!("{} {} ", prompt, hint)
}

fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_lowercase().as_str() {
        "" => Some(Answer::Empty),
        "y" | "yes" => Some(Answer::Yes),
        "n" | "no" => Some(Answer::No),
        _ => None,
    }
}
