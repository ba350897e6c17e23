use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;

use commands::context::AppContext;

#[derive(Parser)]
#[command(name = "classroom")]
#[command(about = "Classroom CLI - class members and status feed", long_about = None)]
struct Cli {
    /// Use this directory instead of the platform config directory
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List class members for an enrollment year
    Members {
        #[arg(long)]
        year: Option<String>,
    },
    /// Show the status feed, newest first
    Feed {
        /// Show at most this many posts
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Publish a post
    Post { text: String },
    /// Like a post, or unlike it if already liked
    Like { post_id: String },
    /// Comment on a post
    Comment { post_id: String, text: String },
    /// Delete one of your posts
    DeletePost {
        post_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Delete one of your comments
    DeleteComment {
        post_id: String,
        comment_id: String,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print the configuration file path
    ConfigPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::load(cli.config_dir.as_deref())?;
    if let Commands::ConfigPath = cli.command {
        println!("{}", ctx.config_path.display());
        return Ok(());
    }

    let _log_guard = logging::init(&ctx.config.log_level, ctx.logs_dir.as_deref());
    let app = ctx.connect().await?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::auth::login(&app, &email, password).await?
        }
        Commands::Logout => commands::auth::logout(&app).await?,
        Commands::Whoami => commands::auth::whoami(&app).await?,
        Commands::Members { year } => commands::members::list(&app, year.as_deref()).await?,
        Commands::Feed { limit } => commands::feed::show(&app, limit).await?,
        Commands::Post { text } => commands::feed::post(&app, &text).await?,
        Commands::Like { post_id } => commands::feed::like(&app, &post_id).await?,
        Commands::Comment { post_id, text } => {
            commands::feed::comment(&app, &post_id, &text).await?
        }
        Commands::DeletePost { post_id, yes } => {
            commands::feed::delete_post(&app, &post_id, yes).await?
        }
        Commands::DeleteComment {
            post_id,
            comment_id,
            yes,
        } => commands::feed::delete_comment(&app, &post_id, &comment_id, yes).await?,
        Commands::ConfigPath => {}
    }

    Ok(())
}
