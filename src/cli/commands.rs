use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::tasks::CommentTarget;

/// Gemini-driven pull request assistant backed by the GitHub MCP server
#[derive(Parser, Debug)]
#[command(
    name = "prscout",
    about = "Gemini-driven pull request assistant backed by the GitHub MCP server",
    version,
    author,
    long_about = "prscout lets a Gemini model inspect and act on a GitHub pull request \
                  through the tools exposed by the GitHub MCP server. Credentials and the \
                  target pull request are read from the environment or a .env file \
                  (GITHUB_PAT_TOKEN, GITHUB_OWNER, GITHUB_REPO, TARGET_PR_NUMBER, \
                  GOOGLE_API_KEY, MODEL_ID)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Look for committed secrets and comment on them",
        long_about = "Asks the model to inspect every changed line of the pull request for \
                      credentials and to comment on each finding.\n\n\
                      Examples:\n  \
                      prscout comment\n  \
                      prscout comment --target issue\n  \
                      prscout comment --owner octo --repo demo --pr 42"
    )]
    Comment(CommentArgs),

    #[command(about = "List the files changed by the pull request")]
    Files(TargetArgs),

    #[command(about = "Summarize the pull request and flag issues")]
    Analyze(TargetArgs),

    #[command(
        about = "Interactive menu",
        long_about = "Prompts repeatedly for one of the three operations until 0 is entered."
    )]
    Menu(TargetArgs),
}

/// Overrides for the values otherwise read from the environment
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetArgs {
    #[arg(long, value_name = "OWNER", help = "Repository owner (overrides GITHUB_OWNER)")]
    pub owner: Option<String>,

    #[arg(long, value_name = "REPO", help = "Repository name (overrides GITHUB_REPO)")]
    pub repo: Option<String>,

    #[arg(long, value_name = "NUMBER", help = "Pull request number (overrides TARGET_PR_NUMBER)")]
    pub pr: Option<u64>,

    #[arg(short = 'm', long, value_name = "MODEL", help = "Gemini model (overrides MODEL_ID)")]
    pub model: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CommentArgs {
    #[command(flatten)]
    pub target_args: TargetArgs,

    #[arg(
        short = 't',
        long,
        value_enum,
        default_value = "line",
        help = "Kind of comment to post for each finding"
    )]
    pub target: CommentTargetArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentTargetArg {
    /// Review comment on the offending line
    Line,
    /// One comment on the pull request conversation
    Issue,
}

impl From<CommentTargetArg> for CommentTarget {
    fn from(arg: CommentTargetArg) -> Self {
        match arg {
            CommentTargetArg::Line => CommentTarget::LineReview,
            CommentTargetArg::Issue => CommentTarget::IssueComment,
        }
    }
}
