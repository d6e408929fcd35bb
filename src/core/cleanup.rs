//! Folder cleanup after moves and deletes.

use crate::services::prompt::Prompter;
use crate::services::runner::run_command;
use crate::utils::fs::{folder_empty, is_junk_file, list_entries};
use crate::Result;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;

fn os_args<'a>(flag: &'a str, path: &'a Path) -> [Cow<'a, OsStr>; 2] {
    [OsStr::new(flag).into(), path.as_os_str().into()]
}

/// Remove a directory when it holds nothing at all.
pub fn delete_if_empty(
    prompter: &dyn Prompter,
    indent: usize,
    confirm: bool,
    path: &Path,
) -> Result<()> {
    if folder_empty(path)? {
        run_command(prompter, indent, confirm, "rmdir", &os_args("-v", path))?;
    }
    Ok(())
}

/// Delete metadata/artwork junk from a folder, then remove the folder if
/// that left it empty. Anything else stays untouched.
pub fn delete_if_empty_or_only_junk(
    prompter: &dyn Prompter,
    indent: usize,
    confirm: bool,
    path: &Path,
) -> Result<()> {
    for entry in list_entries(path)? {
        if is_junk_file(&entry) {
            run_command(prompter, indent, confirm, "rm", &os_args("-v", &entry))?;
        }
    }

    delete_if_empty(prompter, indent, confirm, path)
}
