//! ui::prompts
//!
//! Interactive prompts and confirmations.
//!
//! # Design
//!
//! Prompts are only shown in interactive mode. In non-interactive mode,
//! operations requiring user input must either have defaults or fail
//! with a clear error message.
//!
//! The `*_from` variants take explicit reader and writer handles so the
//! answer parsing can be tested without a terminal.

use std::io::{self, BufRead, Write};

use thiserror::Error;

/// Errors from prompts.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("prompt cancelled by user")]
    Cancelled,

    #[error("not in interactive mode")]
    NotInteractive,

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<io::Error> for PromptError {
    fn from(e: io::Error) -> Self {
        PromptError::IoError(e.to_string())
    }
}

/// Prompt for confirmation (yes/no) on the terminal.
///
/// Returns `Ok(true)` only for `y` or `yes` (case-insensitive); anything
/// else, including an empty answer, declines.
///
/// # Errors
///
/// Returns `PromptError::NotInteractive` if not in interactive mode.
pub fn confirm(message: &str, interactive: bool) -> Result<bool, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let stdin = io::stdin();
    confirm_from(&mut stdin.lock(), &mut io::stdout(), message)
}

/// Prompt for confirmation using explicit input and output handles.
pub fn confirm_from(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    message: &str,
) -> Result<bool, PromptError> {
    write!(writer, "{} [y/N]: ", message)?;
    writer.flush()?;

    let answer = read_answer(reader)?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Prompt for a line of text on the terminal.
///
/// # Errors
///
/// - `NotInteractive` if not in interactive mode
/// - `Cancelled` if the answer is empty
pub fn input(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let stdin = io::stdin();
    input_from(&mut stdin.lock(), &mut io::stdout(), message)
}

/// Prompt for a line of text using explicit input and output handles.
pub fn input_from(
    reader: &mut impl BufRead,
    writer: &mut impl Write,
    message: &str,
) -> Result<String, PromptError> {
    write!(writer, "{}: ", message)?;
    writer.flush()?;

    let answer = read_answer(reader)?;
    if answer.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(answer)
}

/// Prompt for masked input (e.g., tokens).
///
/// The input is not echoed to the terminal.
///
/// # Errors
///
/// - `NotInteractive` if not in interactive mode
/// - `Cancelled` if nothing was entered
pub fn password(message: &str, interactive: bool) -> Result<String, PromptError> {
    if !interactive {
        return Err(PromptError::NotInteractive);
    }
    let secret = rpassword::prompt_password(format!("{}: ", message))?;
    let secret = secret.trim().to_string();
    if secret.is_empty() {
        return Err(PromptError::Cancelled);
    }
    Ok(secret)
}

/// Read one trimmed line. End of input counts as an empty answer.
fn read_answer(reader: &mut impl BufRead) -> Result<String, PromptError> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
