//! Line input for the interactive session
//!
//! A terminal gets dialoguer prompts; piped stdin is read line by line so the
//! session can be scripted.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, IsTerminal, Write};

pub trait Prompter {
    /// Read one line. `None` means input ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Yes/no question, `false` on end of input
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{prompt} [y/N]"))?;
        Ok(answer.is_some_and(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

/// Prompter for the current stdin
pub fn stdin_prompter() -> Box<dyn Prompter> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompter)
    } else {
        Box::new(LinePrompter::new(io::stdin().lock()))
    }
}

pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let result = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text();
        match result {
            Ok(line) => Ok(Some(line)),
            Err(dialoguer::Error::IO(e))
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact_opt()?;
        Ok(answer.unwrap_or(false))
    }
}

/// Reads from any buffered reader, echoing the prompt to stdout
pub struct LinePrompter<R> {
    reader: R,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Prompter for LinePrompter<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !prompt.is_empty() {
            print!("{} ", format!("{prompt}:").bold());
            io::stdout().flush()?;
        }
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
