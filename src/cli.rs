//! CLI definitions for rednote.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// rednote CLI.
#[derive(Parser)]
#[command(name = "rednote")]
#[command(about = "Publish image/text notes through the creator web editor")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.rednote/config.toml)
    #[arg(short, long, global = true, env = "REDNOTE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Publish one note
    Publish(PublishArgs),

    /// Show how a body text is split into text and hashtag segments
    Tokenize {
        /// Body text
        text: String,
    },

    /// Validate the configuration file
    Check,

    /// Open the publish page in a visible browser, e.g. to log in
    Browser,
}

#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Note title
    #[arg(short, long)]
    pub title: String,

    /// Body text; `#name` runs become topics
    #[arg(long, conflicts_with = "content_file")]
    pub content: Option<String>,

    /// Read the body text from a file
    #[arg(long)]
    pub content_file: Option<PathBuf>,

    /// Image to upload (repeat for several, uploaded in order)
    #[arg(short, long = "image", required = true)]
    pub images: Vec<PathBuf>,

    /// Override the overall publish deadline
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    /// Leave a Chrome launched by this command running afterwards
    #[arg(long)]
    pub keep_browser: bool,
}
