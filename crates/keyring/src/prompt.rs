//! Terminal prompts

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use keyring::Password;

/// Ask a yes/no question; an empty answer takes `default`
pub fn confirm(question: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    let answer = read_line(&format!("{} {} ", question, hint))?;
    Ok(parse_yes_no(&answer, default))
}

fn parse_yes_no(answer: &str, default: bool) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Print `prompt` to stderr and read one trimmed line from stdin
pub fn read_line(prompt: &str) -> Result<String> {
    eprint!("{}", prompt);
    io::stderr().flush()?;
    let mut line = String::new();
    let n = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if n == 0 {
        bail!("no input (stdin closed)");
    }
    Ok(line.trim().to_string())
}

/// Read a passphrase without echo
pub fn passphrase(prompt: &str) -> Result<Password> {
    let pass = rpassword::prompt_password(prompt).context("failed to read passphrase from TTY")?;
    Ok(Password::new(pass))
}

/// Read a new passphrase twice
pub fn new_passphrase() -> Result<Password> {
    let pass = passphrase("    New passphrase: ")?;
    let confirm = passphrase("Confirm passphrase: ")?;
    if pass != confirm {
        bail!("Passphrases did not match.");
    }
    if pass.as_str().is_empty() {
        bail!("Empty passphrase not allowed");
    }
    Ok(pass)
}

/// Let the user pick one of `names` by number or exact name
pub fn select_item(names: &[&str]) -> Result<String> {
    if names.is_empty() {
        bail!("Nothing in the keyring.");
    }
    for (i, name) in names.iter().enumerate() {
        eprintln!("{:>4}  {}", i + 1, name);
    }
    let answer = read_line("Item: ")?;
    match resolve_selection(names, &answer) {
        Some(name) => Ok(name.to_string()),
        None if answer.is_empty() => bail!("Item selection cancelled; exiting."),
        // Hidden items can still be named explicitly
        None => Ok(answer),
    }
}

fn resolve_selection<'a>(names: &[&'a str], answer: &str) -> Option<&'a str> {
    if let Some(name) = names.iter().copied().find(|n| *n == answer) {
        return Some(name);
    }
    let index: usize = answer.parse().ok()?;
    index.checked_sub(1).and_then(|i| names.get(i)).copied()
}
