//! External command runner for mv/rm/rmdir.
//!
//! Every command line is printed before it runs; with confirmation on, a
//! y/n keypress gates execution. Subprocess output is echoed back indented
//! to match the surrounding progress output.

use crate::services::prompt::Prompter;
use crate::utils::term::print_indented;
use crate::{Error, Result};
use colored::Colorize;
use std::ffi::OsStr;
use std::io::Write;
use std::process::Command;

/// What happened to a command handed to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command executed successfully.
    Ran,
    /// The operator answered "n" at the confirmation; nothing ran.
    Declined,
}

/// Print and run a command, optionally asking for confirmation first.
pub fn run_command<S: AsRef<OsStr>>(
    prompter: &dyn Prompter,
    indent: usize,
    confirm: bool,
    program: &str,
    args: &[S],
) -> Result<RunOutcome> {
    let shown = args
        .iter()
        .map(|a| a.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    print!("  {}", format!("{program} {shown}").bright_black());

    if confirm {
        print!(" {} ", "CONFIRM y/n:".bright_yellow());
        let _ = std::io::stdout().flush();
        let yes = prompter.confirm()?;
        println!();
        if !yes {
            return Ok(RunOutcome::Declined);
        }
    } else {
        println!();
    }

    let output = Command::new(program).args(args).output()?;

    if !output.stdout.is_empty() {
        print_indented(indent, &String::from_utf8_lossy(&output.stdout));
    }
    if !output.stderr.is_empty() {
        print_indented(indent, &String::from_utf8_lossy(&output.stderr));
    }

    if !output.status.success() {
        return Err(Error::CommandFailed(format!(
            "{program} {shown} exited with {}",
            output.status
        )));
    }

    Ok(RunOutcome::Ran)
}
