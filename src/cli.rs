//! CLI definitions for taskqueue.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// taskqueue CLI.
#[derive(Parser)]
#[command(name = "taskqueue")]
#[command(about = "Push tasks to a hosted task queue and inspect its length")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TASKQUEUE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Queue name, overriding the configured one
    #[arg(short, long, global = true)]
    pub queue: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Add tasks to a batch and push it
    Push(PushArgs),

    /// Print the number of tasks waiting in the queue
    Curlen,

    /// Print the number of tasks the queue can still accept
    Leftlen,
}

#[derive(Args)]
pub(crate) struct PushArgs {
    /// Task URL, absolute or starting with '/'
    #[arg(long, required_unless_present = "tasks", conflicts_with = "tasks")]
    pub url: Option<String>,

    /// POST body sent to the task URL
    #[arg(long, requires = "url")]
    pub data: Option<String>,

    /// Put the task at the head of the queue
    #[arg(long, requires = "url")]
    pub prior: bool,

    /// Delay before the task runs, in seconds
    #[arg(long, requires = "url")]
    pub delay: Option<u32>,

    /// JSON file holding an array of task descriptors or a single one
    #[arg(long)]
    pub tasks: Option<PathBuf>,
}
