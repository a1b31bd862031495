use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "git-guard",
    version,
    about = "Pre-commit and pre-push guards for git repositories"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Color mode
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check the staged changes before a commit
    PreCommit,

    /// Check outgoing revisions before a push (ref updates on stdin)
    PrePush {
        /// Name of the remote being pushed to
        remote: String,

        /// URL of the remote being pushed to
        url: Option<String>,
    },

    /// Install the pre-commit and pre-push hook shims
    Install {
        /// Replace hooks not written by git-guard
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
