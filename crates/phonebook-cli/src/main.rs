//! Phonebook CLI
//!
//! Terminal front end for a running Phonebook server.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod prompt;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phonebook_client::{
    DEFAULT_URL, Notification, NotificationKind, PhonebookClient, RemoteStore, Session,
};
use phonebook_core::{Confirm, ContactId, NameMatch};

use crate::prompt::Prompt;

/// Phonebook CLI - manage contacts on a Phonebook server
#[derive(Parser, Debug)]
#[command(name = "phonebook")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server base URL
    #[arg(long, env = "PHONEBOOK_URL", default_value = DEFAULT_URL)]
    url: String,

    /// How a new name is matched against existing ones (containment or exact)
    #[arg(long, default_value_t = NameMatch::Containment)]
    name_match: NameMatch,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List contacts
    List {
        /// Show only names containing this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Add a contact, or replace the number of an existing one
    Add {
        /// Contact name
        name: String,
        /// Phone number
        number: String,
        /// Replace an existing number without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete a contact by id
    Delete {
        /// Contact identifier
        id: String,
        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the server's info page
    Info,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let client = PhonebookClient::new(&args.url)?;
    let store = RemoteStore::new(client.clone()).with_name_match(args.name_match);
    let mut session = Session::new(Arc::new(store));

    let result = run(args.command, &client, &mut session).await;
    if let Some(note) = session.notifier().current() {
        print_notification(&note);
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        // Already shown on the banner
        Err(e) if e.downcast_ref::<phonebook_core::Error>().is_some() => Ok(ExitCode::FAILURE),
        Err(e) => Err(e),
    }
}

async fn run(command: Command, client: &PhonebookClient, session: &mut Session) -> Result<()> {
    match command {
        Command::List { filter } => {
            session.refresh().await?;
            if let Some(filter) = filter {
                session.set_filter(filter);
            }
            for contact in session.visible() {
                println!("{:<38} {} {}", contact.id.as_str(), contact.name, contact.number);
            }
        }
        Command::Add { name, number, yes } => {
            session.refresh().await?;
            if yes {
                session.submit(&name, &number, &mut Confirm(true)).await?;
            } else {
                let mut prompt = Prompt::new(io::stdin().lock(), io::stdout());
                session.submit(&name, &number, &mut prompt).await?;
            }
        }
        Command::Delete { id, yes } => {
            session.refresh().await?;
            let id = ContactId::new(id);
            let Some(contact) = session.contacts().iter().find(|c| c.id == id).cloned() else {
                println!("No contact with id {id}");
                return Ok(());
            };

            let confirmed = yes
                || Prompt::new(io::stdin().lock(), io::stdout())
                    .ask(&format!("Delete {}?", contact.name));
            if confirmed {
                session.delete(&id).await?;
                println!("Deleted {}", contact.name);
            }
        }
        Command::Info => {
            let html = client.info().await?;
            println!("{}", strip_tags(&html));
        }
    }
    Ok(())
}

fn print_notification(note: &Notification) {
    match note.kind {
        NotificationKind::Confirmation => println!("{}", note.message),
        NotificationKind::Info => println!("note: {}", note.message),
        NotificationKind::Error => eprintln!("error: {}", note.message),
    }
}

/// Renders the info page as plain lines, one per `<div>`.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
        if ch == '<' && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
    }
    out.trim_end().to_string()
}
