use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "notulen")]
#[command(about = "Meeting recorder with automatic minutes extraction", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print version information
    Version,
    /// Control and inspect meetings via the running service
    Meeting(MeetingCliArgs),
    /// Manage the transcription and analysis API keys
    Keys(KeysCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct MeetingCliArgs {
    #[command(subcommand)]
    pub command: MeetingCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// Start a meeting recording
    Start {
        /// Optional meeting title
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Stop the active recording and run transcription + analysis
    Stop,
    /// Show the live pipeline status
    Status,
    /// List recorded meetings
    List {
        /// Maximum number of meetings to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show one meeting with its extracted minutes
    Show { id: String },
    /// Delete a meeting
    Delete { id: String },
}

#[derive(ClapArgs, Debug)]
pub struct KeysCliArgs {
    #[command(subcommand)]
    pub command: KeysCommand,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Interactively set the transcription and analysis API keys
    Set,
    /// Show which API keys are configured (masked)
    Show,
}
