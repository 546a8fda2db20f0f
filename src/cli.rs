//! Note Keeper - CLI Tool
//!
//! Command-line client for the note API.

use anyhow::Result;
use clap::{Parser, Subcommand};
use note_keeper::client::{NoteClient, Session};
use note_keeper::notes::{Note, NoteId, NotePatch, Priority};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "CLI for Note Keeper")]
struct Cli {
    /// Note Keeper server URL
    #[arg(long, env = "NOTES_URL", default_value = "http://localhost:8080")]
    server: String,

    /// Bearer token (see `note-keeper token`)
    #[arg(long, env = "NOTES_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List your notes
    List,

    /// Add a note
    Add {
        /// Note title (at least 5 characters)
        #[arg(short, long)]
        title: String,

        /// Note description (at least 5 characters)
        #[arg(short, long)]
        desc: String,

        /// Priority (LOW, MED, HIGH)
        #[arg(short, long, default_value = "LOW")]
        priority: Priority,
    },

    /// Edit a note; omitted fields are left unchanged
    Edit {
        /// Note ID
        id: NoteId,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        desc: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,
    },

    /// Delete a note
    Delete {
        /// Note ID
        id: NoteId,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut client = NoteClient::new(&cli.server, Session::new(cli.token));

    match cli.command {
        Commands::List => {
            let notes = client.fetch_notes().await?;
            print_table(notes);
        }

        Commands::Add {
            title,
            desc,
            priority,
        } => {
            let note = client.add_note(&title, &desc, priority).await?;
            println!("Created note: {}", note.id);
        }

        Commands::Edit {
            id,
            title,
            desc,
            priority,
        } => {
            let patch = NotePatch {
                title,
                description: desc,
                priority,
            };
            let note = client.edit_note(id, &patch).await?;
            println!("{}", serde_json::to_string_pretty(&note)?);
        }

        Commands::Delete { id } => {
            let note = client.delete_note(id).await?;
            println!("Deleted note: {} ({})", note.id, note.title);
        }
    }

    Ok(())
}

fn print_table(notes: &[Note]) {
    println!("{:<36} {:<5} {:<24} {}", "ID", "PRI", "TITLE", "DESCRIPTION");
    println!("{}", "-".repeat(100));
    for note in notes {
        println!(
            "{:<36} {:<5} {:<24} {}",
            note.id.to_string(),
            note.priority.as_str(),
            note.title,
            note.description
        );
    }
}
