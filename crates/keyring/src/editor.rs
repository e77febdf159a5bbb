//! Round-trips through the user's editor

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;

use crate::prompt;

/// Run `editor` on `path` and wait for it to exit successfully
pub fn run_editor(editor: &OsStr, path: &Path) -> Result<()> {
    let status = Command::new(editor)
        .arg(path)
        .status()
        .with_context(|| format!("failed to start your editor (`{}`)", editor.to_string_lossy()))?;
    if !status.success() {
        bail!("your editor (`{}`) exited with {}", editor.to_string_lossy(), status);
    }
    Ok(())
}

/// Edit `initial` until it parses as `T` and passes `check`
///
/// After a failure the user may edit again or give up.
pub fn edit_yaml<T, F>(editor: &OsStr, initial: &str, mut check: F) -> Result<T>
where
    T: DeserializeOwned,
    F: FnMut(&T) -> Result<()>,
{
    let mut temp = tempfile::Builder::new()
        .prefix("keyring-")
        .suffix(".yaml")
        .tempfile()
        .context("failed to create temporary file, prior to opening it in your editor")?;
    temp.write_all(initial.as_bytes())
        .and_then(|()| temp.flush())
        .context("failed to write temporary file, prior to opening it in your editor")?;

    loop {
        run_editor(editor, temp.path())?;

        // Editors may replace the file rather than rewrite it
        let content = fs::read_to_string(temp.path()).context("failed to read back the edited file")?;
        let outcome = serde_yaml::from_str::<T>(&content)
            .context("failed to parse the result")
            .and_then(|value| check(&value).map(|()| value));

        match outcome {
            Ok(value) => return Ok(value),
            Err(err) => {
                eprintln!("{:#}", err);
                if !prompt::confirm("Edit again?", true)? {
                    bail!("Editing cancelled; exiting.");
                }
            }
        }
    }
}
