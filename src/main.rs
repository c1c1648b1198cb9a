use prscout::cli::commands::{CliArgs, Commands};
use prscout::cli::handlers::{handle_analyze, handle_comment, handle_files, handle_menu};
use prscout::config::load_dotenv;
use prscout::util::logging::parse_level;
use prscout::util::{init_logging, LoggingConfig};
use prscout::VERSION;

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    // .env may set PRSCOUT_LOG_LEVEL, so it is read before the subscriber
    let dotenv = load_dotenv();
    init_logging_from_args(&args);
    dotenv.log();

    debug!("prscout v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Comment(comment_args) => handle_comment(comment_args).await,
        Commands::Files(target_args) => handle_files(target_args).await,
        Commands::Analyze(target_args) => handle_analyze(target_args).await,
        Commands::Menu(target_args) => handle_menu(target_args).await,
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
