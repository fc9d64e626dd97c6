//! Standalone `estimator` CLI binary.
//!
//! Talks to a running estimate service:
//!
//! ```text
//! estimator ask "Rough cost for a 24x30 detached garage?"
//! estimator chat
//! estimator sessions list
//! estimator sessions show <ID>
//! estimator sessions delete <ID>
//! ```

use clap::{Parser, Subcommand};
use estimator::client::{ApiClient, ChatClient, RequestOutcome, DEFAULT_SERVER_URL};
use std::io::Write;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "estimator",
    version,
    about = "Chat with the construction estimate service",
    long_about = "Estimator CLI: submit construction questions to the estimate\n\
        service and read the answers back as a conversation.\n\n\
        Sessions are identified by a client-generated id; pass --session to\n\
        continue an earlier conversation."
)]
struct Cli {
    /// Base URL of the estimate service
    #[arg(
        long,
        env = "ESTIMATOR_SERVER",
        default_value = DEFAULT_SERVER_URL,
        global = true,
        value_name = "URL"
    )]
    server: String,
    #[command(subcommand)]
    command: EstimatorCommands,
}

#[derive(Debug, Subcommand)]
enum EstimatorCommands {
    /// Send one message and wait for the answer
    Ask {
        /// The question to ask
        message: String,
        /// URL of an already-uploaded PDF to attach
        #[arg(long, value_name = "URL")]
        attachment_url: Option<String>,
        /// Continue an existing session instead of starting a new one
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
    /// Interactive chat loop
    Chat {
        /// Continue an existing session
        #[arg(long, value_name = "ID")]
        session: Option<String>,
    },
    /// Manage stored conversations
    Sessions {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Debug, Subcommand)]
enum SessionCommands {
    /// List recent sessions
    List,
    /// Print a session transcript
    Show {
        /// Session id
        id: String,
    },
    /// Delete a session and its messages
    Delete {
        /// Session id
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let api = Arc::new(ApiClient::new(&cli.server));

    match cli.command {
        EstimatorCommands::Ask {
            message,
            attachment_url,
            session,
        } => ask(api, message, attachment_url, session).await,
        EstimatorCommands::Chat { session } => chat(api, session).await,
        EstimatorCommands::Sessions { command } => match command {
            SessionCommands::List => list_sessions(api).await,
            SessionCommands::Show { id } => show_session(api, id).await,
            SessionCommands::Delete { id } => delete_session(api, id).await,
        },
    }
}

async fn ask(
    api: Arc<ApiClient>,
    message: String,
    attachment_url: Option<String>,
    session: Option<String>,
) -> anyhow::Result<()> {
    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut chat = ChatClient::new(api, session_id);
    let outcome = chat
        .send_message(&message, attachment_url.as_deref())
        .await?;
    if let Some(reply) = chat.transcript().last() {
        println!("{}", reply.content);
    }
    eprintln!();
    eprintln!("Session: {}", chat.session_id());
    if outcome != RequestOutcome::Completed {
        std::process::exit(1);
    }
    Ok(())
}

async fn chat(api: Arc<ApiClient>, session: Option<String>) -> anyhow::Result<()> {
    let session_id = session.unwrap_or_else(|| Uuid::new_v4().to_string());
    println!(
        "Session {} (/quit to exit, /attach <url> to stage a PDF)",
        session_id
    );

    let mut chat = ChatClient::new(api, session_id);
    let mut attachment: Option<String> = None;
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();

        if input == "/quit" {
            break;
        }
        if let Some(url) = input.strip_prefix("/attach ") {
            let url = url.trim().to_string();
            println!("Attachment staged: {}", url);
            attachment = Some(url);
            continue;
        }
        if input.is_empty() && attachment.is_none() {
            continue;
        }

        let staged = attachment.take();
        match chat.send_message(input, staged.as_deref()).await {
            Ok(_) => {
                if let Some(reply) = chat.transcript().last() {
                    println!("{}", reply.content);
                }
            }
            Err(err) => eprintln!("Error: {}", err),
        }
    }

    Ok(())
}

async fn list_sessions(api: Arc<ApiClient>) -> anyhow::Result<()> {
    let sessions = api.list_sessions().await?;
    if sessions.is_empty() {
        println!("No sessions stored.");
        return Ok(());
    }
    for session in sessions {
        println!(
            "{}  {}  {}",
            session.id,
            session.updated_at.format("%Y-%m-%d %H:%M"),
            session.title.as_deref().unwrap_or("Untitled Conversation"),
        );
    }
    Ok(())
}

async fn show_session(api: Arc<ApiClient>, id: String) -> anyhow::Result<()> {
    let messages = api.session_messages(&id).await?;
    for message in messages {
        println!("[{}] {}", message.role, message.content);
    }
    Ok(())
}

async fn delete_session(api: Arc<ApiClient>, id: String) -> anyhow::Result<()> {
    api.delete_session(&id).await?;
    println!("Deleted session {}", id);
    Ok(())
}
