use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error};

use super::commands::{CommentArgs, TargetArgs};
use crate::config::AppConfig;
use crate::tasks::{
    add_secret_comment, analyze_pull_request, list_pull_request_files, CommentTarget,
    PullRequestContext, TaskRunner,
};

const MENU_RULE: &str = "====================";

/// One line of the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Exit,
    Comment,
    ListFiles,
    Analyze,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "0" => Some(Self::Exit),
            "1" => Some(Self::Comment),
            "2" => Some(Self::ListFiles),
            "3" => Some(Self::Analyze),
            _ => None,
        }
    }
}

pub async fn handle_comment(args: &CommentArgs) -> i32 {
    let target = CommentTarget::from(args.target);
    run_single(&args.target_args, |runner, context| async move {
        add_secret_comment(&runner, &context, target).await
    })
    .await
}

pub async fn handle_files(args: &TargetArgs) -> i32 {
    run_single(args, |runner, context| async move {
        list_pull_request_files(&runner, &context).await
    })
    .await
}

pub async fn handle_analyze(args: &TargetArgs) -> i32 {
    run_single(args, |runner, context| async move {
        analyze_pull_request(&runner, &context).await
    })
    .await
}

pub async fn handle_menu(args: &TargetArgs) -> i32 {
    let (runner, context) = match prepare(args) {
        Ok(prepared) => prepared,
        Err(e) => return report(e),
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    match run_menu(stdin, &mut stdout, &runner, &context).await {
        Ok(()) => 0,
        Err(e) => report(e),
    }
}

/// Prompts until `0` or end of input; each choice runs one task and prints
/// its result
pub async fn run_menu<R, W>(
    mut input: R,
    output: &mut W,
    runner: &TaskRunner,
    context: &PullRequestContext,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();

    loop {
        let menu = format!(
            "{rule}\nOptions:\n0. Exit\n1. Add PR comment\n2. List all files in PR\n3. Analyze full PR\n{rule}\nChoose option (1-3): ",
            rule = MENU_RULE
        );
        output.write_all(menu.as_bytes()).await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await.context("Failed to read menu choice")? == 0 {
            return Ok(());
        }

        let result = match MenuChoice::parse(&line) {
            Some(MenuChoice::Exit) => return Ok(()),
            Some(MenuChoice::Comment) => {
                add_secret_comment(runner, context, CommentTarget::default()).await
            }
            Some(MenuChoice::ListFiles) => list_pull_request_files(runner, context).await,
            Some(MenuChoice::Analyze) => analyze_pull_request(runner, context).await,
            None => "Invalid option".to_string(),
        };

        output.write_all(format!("{}\n", result).as_bytes()).await?;
    }
}

async fn run_single<F, Fut>(args: &TargetArgs, task: F) -> i32
where
    F: FnOnce(TaskRunner, PullRequestContext) -> Fut,
    Fut: std::future::Future<Output = String>,
{
    let (runner, context) = match prepare(args) {
        Ok(prepared) => prepared,
        Err(e) => return report(e),
    };

    let result = task(runner, context).await;
    println!("{}", result);
    0
}

fn prepare(args: &TargetArgs) -> Result<(TaskRunner, PullRequestContext)> {
    let config = AppConfig::from_env().with_overrides(
        args.owner.clone(),
        args.repo.clone(),
        args.pr,
        args.model.clone(),
    );
    debug!("{:?}", config);

    config.validate().context("Invalid configuration")?;
    let context = config.pull_request()?;
    let runner = config.create_runner()?;
    Ok((runner, context))
}

fn report(e: anyhow::Error) -> i32 {
    error!("{:#}", e);
    eprintln!("Error: {:#}", e);
    1
}
