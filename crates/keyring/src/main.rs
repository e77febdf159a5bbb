//! keyring - command-line access to an encrypted keyring file
//!
//! Commands:
//! - create: Create a new, empty keyring
//! - list: List item names and types
//! - get [NAME]: Print an item as YAML
//! - edit [NAME]: Edit an item in $EDITOR
//! - remove [NAME]: Delete an item
//! - import / export: YAML item documents on stdin / stdout
//! - change-password: Re-seal under a new passphrase
//! - password new | copy | generate: Work with login items

mod editor;
mod prompt;
mod yaml;

use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use keyring::generate::{self, generate_password};
use keyring::seal::DecryptError;
use keyring::{
    AddOptions, Credential, ErrorKind, ItemRegistry, ItemValue, Keyring, KeyringError,
    KeyringLock, LoginItem, LOGIN_MIMETYPE,
};
use keyring_core::{perms, CredentialMode, KeyringConfig};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::yaml::YamlItem;

#[derive(Parser)]
#[command(name = "keyring")]
#[command(about = "Encrypted keyring for passwords, security questions and other secrets")]
#[command(version)]
#[command(after_help = r#"FILES:
    ~/.keyring/keyring.v2          Default keyring (age-encrypted ZIP archive)
    ~/.config/keyring/config.yaml  Configuration

RECOVERY:
    The keyring is a standard age file wrapping a ZIP archive:
    age -d keyring.v2 > keyring.zip && unzip keyring.zip

EXIT CODES:
    0 ok, 1 error, 2 wrong passphrase, 3 no keyring file, 4 invalid item,
    5 no such item, 6 duplicate name, 7 corrupt keyring, 8 keyring locked"#)]
struct Cli {
    /// Keyring file (overrides KEYRING_FILE and the config file)
    #[arg(long, global = true, value_name = "FILE")]
    keyring: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new, empty keyring file
    #[command(alias = "init")]
    Create,

    /// List items on the keyring
    List {
        /// Include hidden items
        #[arg(short, long)]
        all: bool,
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print an item as a YAML document
    Get {
        /// Item name (prompts if omitted)
        name: Option<String>,
    },

    /// Edit an item in your editor; changing `name` renames it
    Edit {
        /// Item name (prompts if omitted)
        name: Option<String>,
    },

    /// Remove an item from the keyring
    Remove {
        /// Item name (prompts if omitted)
        name: Option<String>,
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Import YAML item documents from stdin
    Import,

    /// Export every item as YAML documents to stdout
    Export,

    /// Re-encrypt the keyring under a new passphrase
    ChangePassword,

    /// Commands for login (password) items
    #[command(subcommand, alias = "pw")]
    Password(PasswordCommand),
}

#[derive(Subcommand)]
enum PasswordCommand {
    /// Generate a password, then fill in name, username and security
    /// questions in your editor; the result is stored as a login item
    New,

    /// Copy a login item's password to the clipboard
    Copy {
        /// Item name (prompts if omitted)
        name: Option<String>,
    },

    /// Print a random password
    Generate {
        /// Number of characters
        #[arg(short, long)]
        length: Option<usize>,
        /// Alphabets joined by '+': letters, numbers, symbols, more_symbols
        #[arg(short, long)]
        alphabet: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let ctx = Ctx::new(KeyringConfig::load()?, cli.keyring);
    match cli.command {
        Commands::Create => cmd_create(&ctx),
        Commands::List { all, json } => cmd_list(&ctx, all, json),
        Commands::Get { name } => cmd_get(&ctx, name),
        Commands::Edit { name } => cmd_edit(&ctx, name),
        Commands::Remove { name, yes } => cmd_remove(&ctx, name, yes),
        Commands::Import => cmd_import(&ctx),
        Commands::Export => cmd_export(&ctx),
        Commands::ChangePassword => cmd_change_password(&ctx),
        Commands::Password(PasswordCommand::New) => cmd_password_new(&ctx),
        Commands::Password(PasswordCommand::Copy { name }) => cmd_password_copy(&ctx, name),
        Commands::Password(PasswordCommand::Generate { length, alphabet }) => {
            cmd_generate(&ctx.config, length, alphabet.as_deref())
        }
    }
}

/// Stable process exit code for an error chain
fn exit_code(err: &anyhow::Error) -> i32 {
    let Some(err) = err.chain().find_map(|e| e.downcast_ref::<KeyringError>()) else {
        return 1;
    };
    match err.kind() {
        ErrorKind::WrongCredential => 2,
        ErrorKind::FileNotFound => 3,
        ErrorKind::Schema => 4,
        ErrorKind::NotFound => 5,
        ErrorKind::DuplicateName => 6,
        ErrorKind::Format => 7,
        ErrorKind::Decrypt if matches!(err, KeyringError::Decrypt(DecryptError::Corrupt(_))) => 7,
        ErrorKind::Locked => 8,
        _ => 1,
    }
}

/// Resolved keyring location and configuration for one invocation
struct Ctx {
    path: PathBuf,
    config: KeyringConfig,
}

/// An open keyring together with what is needed to write it back
struct Session {
    keyring: Keyring,
    credential: Credential,
    _lock: KeyringLock,
}

impl Ctx {
    fn new(config: KeyringConfig, flag: Option<PathBuf>) -> Self {
        let path = config.keyring_path(flag);
        tracing::debug!(path = %path.display(), "using keyring");
        Self { path, config }
    }

    fn registry(&self) -> ItemRegistry {
        ItemRegistry::builtin(self.config.require_password)
    }

    fn credential(&self) -> Result<Credential> {
        match self.config.credential {
            CredentialMode::Passphrase => {
                let pass = prompt::passphrase("Passphrase: ")?;
                Ok(self.passphrase_credential(pass.as_str()))
            }
            CredentialMode::Identity => self.identity_credential(),
        }
    }

    fn passphrase_credential(&self, pass: &str) -> Credential {
        Credential::passphrase(pass).with_max_work_factor(self.config.max_work_factor)
    }

    fn identity_credential(&self) -> Result<Credential> {
        let path = self
            .config
            .identity_path()
            .context("credential is `identity` but no identity_file is configured")?;
        Credential::from_identity_file(&path)
            .with_context(|| format!("failed to read identity file {}", path.display()))
    }

    /// Lock, check permissions, prompt for the credential, and open
    fn open(&self) -> Result<Session> {
        if !self.path.exists() {
            return Err(KeyringError::FileNotFound(self.path.clone()))
                .context("create one with `keyring create`");
        }
        let lock = KeyringLock::acquire(&self.path)?;
        self.warn_permissions();
        let credential = self.credential()?;
        let keyring = Keyring::load_with(&self.path, &credential, self.registry())
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        Ok(Session {
            keyring,
            credential,
            _lock: lock,
        })
    }

    fn save(&self, session: &mut Session) -> Result<()> {
        session
            .keyring
            .save_to(&self.path, &session.credential, self.config.armor)
            .with_context(|| format!("failed to save {}", self.path.display()))
    }

    fn warn_permissions(&self) {
        match perms::check_keyring_modes(&self.path) {
            Ok(warnings) => {
                for w in warnings {
                    eprintln!("warning: {}", w);
                }
            }
            Err(e) => tracing::debug!(error = %e, "could not check permissions"),
        }
    }
}

/// The named item, or one picked interactively
fn item_name(keyring: &Keyring, name: Option<String>) -> Result<String> {
    match name {
        Some(name) => Ok(name),
        None => {
            let names: Vec<&str> = keyring.list_items(false).map(|m| m.name).collect();
            prompt::select_item(&names)
        }
    }
}

/// Create a new keyring
fn cmd_create(ctx: &Ctx) -> Result<()> {
    if let Some(dir) = ctx.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        perms::create_private_dir(dir)?;
    }
    let _lock = KeyringLock::acquire(&ctx.path)?;
    if ctx.path.exists() {
        return Err(KeyringError::AlreadyExists(ctx.path.clone()).into());
    }

    eprintln!("Creating a new keyring at {}", ctx.path.display());
    let credential = match ctx.config.credential {
        CredentialMode::Passphrase => {
            let pass = prompt::new_passphrase()?;
            ctx.passphrase_credential(pass.as_str())
        }
        CredentialMode::Identity => ctx.identity_credential()?,
    };
    Keyring::create_at(&ctx.path, &credential, ctx.config.armor)?;
    eprintln!("New keyring created at {}", ctx.path.display());
    Ok(())
}

/// List items
fn cmd_list(ctx: &Ctx, all: bool, json: bool) -> Result<()> {
    let session = ctx.open()?;
    let items: Vec<_> = session.keyring.list_items(all).collect();

    if json {
        let rows: Vec<_> = items
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.name,
                    "mimetype": m.mimetype,
                    "hidden": m.hidden,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("Nothing in the keyring.");
        return Ok(());
    }

    let rows: Vec<(&str, &str)> = items.iter().map(|m| (m.name, m.mimetype)).collect();
    print_table(("Item name", "Item mimetype"), &rows, io::stdout().lock())?;
    Ok(())
}

fn print_table<W: Write>(header: (&str, &str), rows: &[(&str, &str)], mut out: W) -> io::Result<()> {
    let width = rows
        .iter()
        .map(|(name, _)| name.chars().count())
        .chain(std::iter::once(header.0.chars().count()))
        .max()
        .unwrap_or(0);
    writeln!(out, "{:<width$}  {}", header.0, header.1, width = width)?;
    writeln!(out, "{:-<width$}  {:-<w2$}", "", "", width = width, w2 = header.1.len())?;
    for (name, mimetype) in rows {
        writeln!(out, "{:<width$}  {}", name, mimetype, width = width)?;
    }
    Ok(())
}

/// Print one item
fn cmd_get(ctx: &Ctx, name: Option<String>) -> Result<()> {
    let session = ctx.open()?;
    let name = item_name(&session.keyring, name)?;
    let entry = session.keyring.get_raw_item(&name)?;
    let item = YamlItem::from_entry(&name, entry);
    serde_yaml::to_writer(io::stdout().lock(), &item).context("failed to write item as YAML to stdout")?;
    Ok(())
}

/// Edit one item
fn cmd_edit(ctx: &Ctx, name: Option<String>) -> Result<()> {
    let mut session = ctx.open()?;
    let original = item_name(&session.keyring, name)?;
    let entry = session.keyring.get_raw_item(&original)?;
    let initial = serde_yaml::to_string(&YamlItem::from_entry(&original, entry))?;

    let keyring = &session.keyring;
    let edited: YamlItem = editor::edit_yaml(&ctx.config.editor(), &initial, |item: &YamlItem| {
        check_edited_item(keyring, &original, item)
    })?;

    let data = edited.encode_data()?;
    let options = AddOptions {
        hidden: edited.hidden,
        overwrite: true,
    };
    if edited.name != original {
        session.keyring.remove_item(&original)?;
        eprintln!("Renaming {:?} to {:?}", original, edited.name);
    }
    session
        .keyring
        .add_raw_item(&edited.name, &edited.mimetype, data, options)?;

    ctx.save(&mut session)?;
    eprintln!("Saved {:?}.", edited.name);
    Ok(())
}

/// Everything `cmd_edit` needs to store `item` in place of `original`
fn check_edited_item(keyring: &Keyring, original: &str, item: &YamlItem) -> Result<()> {
    if item.name != original {
        if keyring.has_item(&item.name) {
            bail!(
                "There already exists an item named {:?}.\n\
                 This command refuses to overwrite it; inspect and remove that item first \
                 if you want to replace it.",
                item.name
            );
        }
        keyring.check_name(&item.name, Some(original))?;
    }
    let data = item.encode_data()?;
    keyring
        .registry()
        .validate(&item.mimetype, &data)
        .with_context(|| format!("item {:?} is not a valid {}", item.name, item.mimetype))
}

/// Remove one item
fn cmd_remove(ctx: &Ctx, name: Option<String>, yes: bool) -> Result<()> {
    let mut session = ctx.open()?;
    let name = item_name(&session.keyring, name)?;
    if !session.keyring.has_item(&name) {
        return Err(KeyringError::NotFound(name).into());
    }

    eprintln!("This will delete the item named {:?} from the keyring.", name);
    if !yes && !prompt::confirm("Delete?", false)? {
        bail!("Delete aborted; exiting.");
    }
    session.keyring.remove_item(&name)?;
    ctx.save(&mut session)?;
    eprintln!("Deleted {:?}.", name);
    Ok(())
}

/// Import items from stdin; all or nothing
fn cmd_import(ctx: &Ctx) -> Result<()> {
    // Read stdin before prompting so a bad document fails fast
    let items = yaml::read_items(io::stdin().lock())?;
    let mut session = ctx.open()?;

    let mut seen = BTreeSet::new();
    for item in &items {
        if session.keyring.has_item(&item.name) || !seen.insert(item.name.as_str()) {
            return Err(KeyringError::DuplicateName(item.name.clone()))
                .context("the import conflicts with an item already on the keyring; nothing was imported");
        }
    }

    for item in &items {
        let data = item.encode_data()?;
        if !session.keyring.registry().is_registered(&item.mimetype) {
            eprintln!(
                "warning: unable to validate item {:?} with mimetype {}",
                item.name, item.mimetype
            );
        }
        let options = AddOptions {
            hidden: item.hidden,
            overwrite: false,
        };
        session
            .keyring
            .add_raw_item(&item.name, &item.mimetype, data, options)
            .with_context(|| format!("failed to import {:?}; nothing was imported", item.name))?;
    }

    ctx.save(&mut session)?;
    eprintln!("Imported {} items.", items.len());
    Ok(())
}

/// Export every item to stdout
fn cmd_export(ctx: &Ctx) -> Result<()> {
    let session = ctx.open()?;
    let items: Vec<YamlItem> = session
        .keyring
        .entries()
        .map(|(name, entry)| YamlItem::from_entry(name, entry))
        .collect();
    yaml::write_items(io::stdout().lock(), &items)?;
    eprintln!("Exported {} items.", items.len());
    Ok(())
}

/// Re-seal under a new passphrase
fn cmd_change_password(ctx: &Ctx) -> Result<()> {
    if ctx.config.credential != CredentialMode::Passphrase {
        bail!("this keyring is sealed to an identity; there is no passphrase to change");
    }
    let mut session = ctx.open()?;
    let pass = prompt::new_passphrase()?;
    session.credential = ctx.passphrase_credential(pass.as_str());
    ctx.save(&mut session)?;
    eprintln!("Passphrase changed.");
    Ok(())
}

const NEW_PASSWORD_TEMPLATE: &str = r#"name:  # the name of the new item
login:
  # username:
  # email:
  password: $PASSWORD
  # security_questions:
  #   - q:
  #     a:
"#;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NewPassword {
    name: Option<String>,
    login: LoginItem,
}

fn new_password_template(password: &str) -> Result<String> {
    // Quote as a YAML scalar so symbols survive
    let scalar = serde_yaml::to_string(password)?;
    Ok(NEW_PASSWORD_TEMPLATE.replace("$PASSWORD", scalar.trim_end()))
}

/// Generate a password and store it as a new login item
fn cmd_password_new(ctx: &Ctx) -> Result<()> {
    let mut session = ctx.open()?;
    let alphabet = generate::parse_alphabet(&ctx.config.generator.alphabets)?;
    let password = generate_password(&mut rand::thread_rng(), &alphabet, ctx.config.generator.length)?;
    let template = new_password_template(password.as_str())?;

    let keyring = &session.keyring;
    let new: NewPassword = editor::edit_yaml(&ctx.config.editor(), &template, |new: &NewPassword| {
        let name = check_new_login_name(keyring, new.name.as_deref())?;
        if keyring.has_item(name) {
            eprintln!("The keyring already contains an item named {:?}.", name);
            if !prompt::confirm("Replace it?", false)? {
                bail!("an item named {:?} already exists", name);
            }
        }
        keyring
            .registry()
            .encode(LOGIN_MIMETYPE, &ItemValue::Login(new.login.clone()))
            .map(|_| ())
            .context("the login is not valid")
    })?;

    let name = new.name.unwrap_or_default();
    session.keyring.add_item(
        &name,
        LOGIN_MIMETYPE,
        &ItemValue::Login(new.login),
        AddOptions::overwrite(),
    )?;
    ctx.save(&mut session)?;
    eprintln!("Stored new login {:?}.", name);
    Ok(())
}

/// The name for a new login; an existing name is allowed and replaced later
fn check_new_login_name<'a>(keyring: &Keyring, name: Option<&'a str>) -> Result<&'a str> {
    let name = name.unwrap_or_default();
    if name.is_empty() {
        bail!("the item needs a name");
    }
    if !keyring.has_item(name) {
        keyring.check_name(name, None)?;
    }
    Ok(name)
}

/// Copy a login's password to the clipboard
fn cmd_password_copy(ctx: &Ctx, name: Option<String>) -> Result<()> {
    let session = ctx.open()?;
    let name = item_name(&session.keyring, name)?;
    let (_, value) = session.keyring.get_item(&name)?;
    let login = value
        .as_login()
        .with_context(|| format!("The item named {:?} is not a login item.", name))?;
    let password = login
        .password
        .as_ref()
        .with_context(|| format!("The login {:?} has no password.", name))?;
    send_to_clipboard(password.as_str().as_bytes())?;
    eprintln!("Copied to the clipboard.");
    Ok(())
}

fn send_to_clipboard(data: &[u8]) -> Result<()> {
    let mut child = clipboard_command()
        .stdin(Stdio::piped())
        .spawn()
        .context("failed to start the clipboard program")?;
    child
        .stdin
        .take()
        .context("clipboard program has no stdin")?
        .write_all(data)?;
    let status = child.wait()?;
    if !status.success() {
        bail!("clipboard program exited with {}", status);
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn clipboard_command() -> Command {
    Command::new("pbcopy")
}

#[cfg(not(target_os = "macos"))]
fn clipboard_command() -> Command {
    let mut cmd = Command::new("xsel");
    cmd.arg("-b");
    cmd
}

/// Print a random password
fn cmd_generate(config: &KeyringConfig, length: Option<usize>, alphabet: Option<&str>) -> Result<()> {
    let alphabet = generate::parse_alphabet(alphabet.unwrap_or(&config.generator.alphabets))?;
    let length = length.unwrap_or(config.generator.length);
    let password = generate_password(&mut rand::thread_rng(), &alphabet, length)?;
    println!("{}", password.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use keyring::container::FormatError;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("keyring").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_commands() {
        let cli = parse(&["--keyring", "/tmp/k", "list", "--all"]);
        assert_eq!(cli.keyring, Some(PathBuf::from("/tmp/k")));
        assert!(matches!(cli.command, Commands::List { all: true, json: false }));

        assert!(matches!(parse(&["init"]).command, Commands::Create));
        assert!(matches!(
            parse(&["get", "bank"]).command,
            Commands::Get { name: Some(ref n) } if n == "bank"
        ));
        assert!(matches!(parse(&["remove"]).command, Commands::Remove { name: None, yes: false }));
        assert!(matches!(parse(&["change-password"]).command, Commands::ChangePassword));
    }

    #[test]
    fn test_parse_password_commands() {
        assert!(matches!(
            parse(&["pw", "copy", "bank"]).command,
            Commands::Password(PasswordCommand::Copy { name: Some(_) })
        ));
        assert!(matches!(
            parse(&["password", "generate", "-l", "24", "--alphabet", "letters"]).command,
            Commands::Password(PasswordCommand::Generate { length: Some(24), alphabet: Some(_) })
        ));
        // The keyring flag is accepted after the subcommand too
        let cli = parse(&["password", "new", "--keyring", "x"]);
        assert_eq!(cli.keyring, Some(PathBuf::from("x")));
    }

    #[test]
    fn test_exit_codes() {
        let code = |e: KeyringError| exit_code(&anyhow::Error::new(e).context("outer"));
        assert_eq!(code(KeyringError::Decrypt(DecryptError::WrongCredential)), 2);
        assert_eq!(code(KeyringError::FileNotFound(PathBuf::from("k"))), 3);
        assert_eq!(code(KeyringError::NotFound("x".to_string())), 5);
        assert_eq!(code(KeyringError::DuplicateName("x".to_string())), 6);
        assert_eq!(code(KeyringError::Format(FormatError::BadMagic)), 7);
        assert_eq!(code(KeyringError::Decrypt(DecryptError::Corrupt("x".to_string()))), 7);
        assert_eq!(code(KeyringError::Locked(PathBuf::from("k"))), 8);
        assert_eq!(exit_code(&anyhow::anyhow!("plain")), 1);
    }

    #[test]
    fn test_new_password_template() {
        let template = new_password_template("a#b: c").unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&template).unwrap();
        assert_eq!(parsed["login"]["password"].as_str(), Some("a#b: c"));

        let filled = template.replace("name:  #", "name: bank #");
        let new: NewPassword = serde_yaml::from_str(&filled).unwrap();
        assert_eq!(new.name.as_deref(), Some("bank"));
        assert_eq!(new.login.password.unwrap().as_str(), "a#b: c");
    }

    fn keyring_with_bank() -> Keyring {
        let mut keyring = Keyring::create();
        keyring
            .add_item(
                "bank",
                LOGIN_MIMETYPE,
                &ItemValue::Login(LoginItem::default()),
                AddOptions::default(),
            )
            .unwrap();
        keyring
            .add_item(
                "mail",
                LOGIN_MIMETYPE,
                &ItemValue::Login(LoginItem::default()),
                AddOptions::default(),
            )
            .unwrap();
        keyring
    }

    fn edited(name: &str) -> YamlItem {
        YamlItem {
            name: name.to_string(),
            mimetype: LOGIN_MIMETYPE.to_string(),
            hidden: false,
            data_encoding: yaml::DataEncoding::Json,
            data: serde_yaml::from_str("username: bob").unwrap(),
        }
    }

    #[test]
    fn test_check_edited_item_names() {
        let keyring = keyring_with_bank();
        assert!(check_edited_item(&keyring, "bank", &edited("bank")).is_ok());
        assert!(check_edited_item(&keyring, "bank", &edited("banking/main")).is_ok());
        assert!(check_edited_item(&keyring, "bank", &edited("bank/old")).is_ok());

        // Rejected inside the editor loop, so the edit can be retried
        for bad in ["a//b", "../x", "", "mail/pin"] {
            let err = check_edited_item(&keyring, "bank", &edited(bad)).unwrap_err();
            assert_eq!(exit_code(&err), 1, "{:?}", bad);
            assert!(err.chain().any(|e| e.is::<KeyringError>()), "{:?}", bad);
        }
        assert!(check_edited_item(&keyring, "bank", &edited("mail")).is_err());
    }

    #[test]
    fn test_check_edited_item_payload() {
        let keyring = keyring_with_bank();
        let mut item = edited("bank");
        item.data = serde_yaml::from_str("pin: 1234").unwrap();
        assert!(check_edited_item(&keyring, "bank", &item).is_err());
    }

    #[test]
    fn test_check_new_login_name() {
        let keyring = keyring_with_bank();
        assert_eq!(check_new_login_name(&keyring, Some("shop")).unwrap(), "shop");
        assert_eq!(check_new_login_name(&keyring, Some("bank")).unwrap(), "bank");
        assert!(check_new_login_name(&keyring, None).is_err());
        assert!(check_new_login_name(&keyring, Some("")).is_err());
        assert!(check_new_login_name(&keyring, Some("a//b")).is_err());
        assert!(check_new_login_name(&keyring, Some("bank/pin")).is_err());
    }

    #[test]
    fn test_print_table() {
        let mut out = Vec::new();
        print_table(("Item name", "Item mimetype"), &[("bank", "text/plain")], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Item name  Item mimetype");
        assert_eq!(lines[2], "bank       text/plain");
    }
}
