//! Line-based stdin prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};

/// Reads one trimmed line after printing `label`.
///
/// # Errors
/// Fails when stdin is closed, so scripted input cannot loop forever.
pub fn line(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        bail!("Input closed before {label} was entered");
    }
    Ok(input.trim().to_string())
}

/// Like [`line`], but an empty answer keeps `current`.
pub fn line_or_keep(label: &str, current: &str) -> Result<String> {
    let answer = if current.is_empty() {
        line(label)?
    } else {
        line(&format!("{label} [{current}]"))?
    };
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer
    })
}

/// `[y/N]` question; anything but `y`/`yes` is a no.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = line(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}
