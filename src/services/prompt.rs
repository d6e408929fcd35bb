//! Single-key prompts.
//!
//! Decisions are taken one keypress at a time. Keystrokes buffered before a
//! prompt is shown are discarded so a stray earlier keypress cannot answer
//! the next question, and Ctrl-C surfaces as its own error instead of a
//! selection.

use crate::{Error, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::Write;
use std::time::Duration;

/// Something that can answer single-key questions.
pub trait Prompter {
    /// Block until one of `options` is pressed and return it.
    fn select(&self, options: &[char]) -> Result<char>;

    /// Block for a y/n answer.
    fn confirm(&self) -> Result<bool>;
}

/// Prompter reading raw key events from the terminal.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        TerminalPrompter
    }

    fn read_key(&self) -> Result<char> {
        enable_raw_mode()?;
        let key = self.read_key_raw();
        disable_raw_mode()?;
        key
    }

    fn read_key_raw(&self) -> Result<char> {
        // drain anything typed before the prompt appeared
        while event::poll(Duration::ZERO)? {
            let _ = event::read()?;
        }

        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    return Err(Error::Interrupted);
                }
                if let KeyCode::Char(c) = key.code {
                    return Ok(c);
                }
            }
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(&self, options: &[char]) -> Result<char> {
        loop {
            let c = self.read_key()?;
            if options.contains(&c) {
                print!("{c}");
                let _ = std::io::stdout().flush();
                return Ok(c);
            }
            // ignore anything that isn't an option
        }
    }

    fn confirm(&self) -> Result<bool> {
        loop {
            match self.read_key()? {
                'y' | 'Y' => return Ok(true),
                'n' | 'N' => return Ok(false),
                other => {
                    print!("{other}");
                    let _ = std::io::stdout().flush();
                }
            }
        }
    }
}
