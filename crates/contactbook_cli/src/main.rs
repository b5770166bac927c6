//! Command-line front end for the contact book.
//!
//! # Responsibility
//! - Play the list / detail / form screens over the `ContactBook` facade.
//! - Resolve configuration (CLI > ENV > defaults) and start file logging.
//!
//! # Invariants
//! - The database file is only deleted by `reset --yes`.
//! - Every failure is reported on stderr with a non-zero exit code.

use clap::{Args, Parser, Subcommand};
use contactbook_core::{
    init_logging, Contact, ContactBook, ContactBookConfig, ContactForm, ContactId,
};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

/// Local contact book
#[derive(Parser, Debug)]
#[command(name = "contactbook", version, about, long_about = None)]
struct Cli {
    /// Database file (overrides CONTACTBOOK_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print contacts as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all contacts by name
    List,
    /// Show one contact
    Show { id: ContactId },
    /// Add a new contact
    Add(AddArgs),
    /// Update fields of an existing contact; an empty value clears an optional field
    Update {
        id: ContactId,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    /// Insert the sample contacts
    Seed,
    /// Delete the database file
    Reset {
        /// Confirm deletion of all contacts
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    nickname: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    nickname: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    address: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = ContactBookConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &ContactBookConfig) -> Result<(), String> {
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Command::List => {
            let book = open_book(config)?;
            let contacts = book.try_fetch_all().map_err(|err| err.to_string())?;
            if cli.json {
                print_json(&contacts)
            } else {
                print_list(&contacts);
                Ok(())
            }
        }
        Command::Show { id } => {
            let book = open_book(config)?;
            let contact = book
                .try_fetch_one(id)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("contact {id} not found"))?;
            print_contact(&contact, cli.json)
        }
        Command::Add(args) => {
            let book = open_book(config)?;
            let form = ContactForm {
                id: None,
                name: args.name,
                nickname: args.nickname.unwrap_or_default(),
                email: args.email.unwrap_or_default(),
                phone: args.phone,
                address: args.address.unwrap_or_default(),
            };
            let saved = form.submit(book).map_err(|err| err.to_string())?;
            print_contact(&saved, cli.json)
        }
        Command::Update { id, fields } => {
            let book = open_book(config)?;
            let existing = book
                .try_fetch_one(id)
                .map_err(|err| err.to_string())?
                .ok_or_else(|| format!("contact {id} not found"))?;
            let form = apply_updates(ContactForm::from_contact(&existing), fields);
            let saved = form.submit(book).map_err(|err| err.to_string())?;
            print_contact(&saved, cli.json)
        }
        Command::Seed => seed(open_book(config)?),
        Command::Reset { yes } => reset(config, yes),
    }
}

fn open_book(config: &ContactBookConfig) -> Result<&'static ContactBook, String> {
    let book =
        ContactBook::open(config).map_err(|err| format!("Error opening database: {err}"))?;
    ContactBook::install_global(book)
        .map_err(|_| "contact book is already initialized".to_string())
}

fn reset(config: &ContactBookConfig, confirmed: bool) -> Result<(), String> {
    if !confirmed {
        return Err(format!(
            "refusing to delete `{}` without --yes",
            config.db_path.display()
        ));
    }

    warn!("event=db_reset module=cli status=start confirmed=true");
    let removed = ContactBook::reset(&config.db_path).map_err(|err| err.to_string())?;
    if removed {
        println!("Deleted {}", config.db_path.display());
    } else {
        println!("Nothing to delete at {}", config.db_path.display());
    }
    Ok(())
}

fn seed(book: &ContactBook) -> Result<(), String> {
    let samples = [
        Contact::new("Jonny", "90767").with_nickname("nick"),
        Contact::new("Olaf", "444").with_address("Couchirardrard"),
        Contact::new("Elon", "12345")
            .with_email("elon@example.com")
            .with_address("Mars"),
    ];

    let mut inserted = 0;
    for sample in &samples {
        match book.insert(sample) {
            Some(_) => inserted += 1,
            None => eprintln!("Failed to insert contact."),
        }
    }

    println!("Inserted {inserted} of {} sample contacts.", samples.len());
    if inserted == samples.len() {
        Ok(())
    } else {
        Err("seeding was incomplete".to_string())
    }
}

fn apply_updates(mut form: ContactForm, fields: UpdateArgs) -> ContactForm {
    if let Some(name) = fields.name {
        form.name = name;
    }
    if let Some(phone) = fields.phone {
        form.phone = phone;
    }
    if let Some(nickname) = fields.nickname {
        form.nickname = nickname;
    }
    if let Some(email) = fields.email {
        form.email = email;
    }
    if let Some(address) = fields.address {
        form.address = address;
    }
    form
}

fn print_list(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No contacts.");
        return;
    }

    for contact in contacts {
        let id = contact.id.unwrap_or_default();
        match &contact.nickname {
            Some(nickname) => println!("{id:>4}  {} ({nickname})", contact.name),
            None => println!("{id:>4}  {}", contact.name),
        }
    }
}

fn print_contact(contact: &Contact, json: bool) -> Result<(), String> {
    if json {
        return print_json(contact);
    }

    println!("Name: {}", contact.name);
    if let Some(nickname) = &contact.nickname {
        println!("Nickname: {nickname}");
    }
    if let Some(email) = &contact.email {
        println!("Email: {email}");
    }
    println!("Phone: {}", contact.phone);
    if let Some(address) = &contact.address {
        println!("Address: {address}");
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::List => "list",
        Command::Show { .. } => "show",
        Command::Add(_) => "add",
        Command::Update { .. } => "update",
        Command::Seed => "seed",
        Command::Reset { .. } => "reset",
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_updates, Cli, Command, UpdateArgs};
    use clap::{CommandFactory, Parser};
    use contactbook_core::{Contact, ContactForm};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add_with_global_flags() {
        let cli = Cli::try_parse_from([
            "contactbook",
            "--db",
            "/tmp/contacts.sqlite3",
            "add",
            "--name",
            "Elon",
            "--phone",
            "12345",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Add(ref args) if args.name == "Elon"));
    }

    #[test]
    fn reset_defaults_to_unconfirmed() {
        let cli = Cli::try_parse_from(["contactbook", "reset"]).unwrap();
        assert!(matches!(cli.command, Command::Reset { yes: false }));
    }

    #[test]
    fn apply_updates_only_touches_given_fields() {
        let existing = Contact {
            id: Some(1),
            ..Contact::new("Olaf", "444").with_address("Couchirardrard")
        };
        let form = apply_updates(
            ContactForm::from_contact(&existing),
            UpdateArgs {
                name: None,
                phone: Some("555".to_string()),
                nickname: None,
                email: None,
                address: Some(String::new()),
            },
        );

        let contact = form.to_contact().unwrap();
        assert_eq!(contact.name, "Olaf");
        assert_eq!(contact.phone, "555");
        assert_eq!(contact.address, None);
        assert_eq!(contact.id, Some(1));
    }
}
