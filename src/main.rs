use std::process::ExitCode;

use clap::{Parser, Subcommand};

use ac2git::{
    commands::{
        accurev::{
            HistArgs, PopArgs, StreamsArgs, handle_depots, handle_hist, handle_login, handle_logout, handle_pop,
            handle_streams, handle_users,
        },
        git::{handle_branches, handle_stitch, handle_status},
    },
    core::{
        app::App,
        config::ToolConfig,
        error::{AppError, AppResult},
        logging::{LogLevel, init_logging},
    },
};

#[derive(Parser, Debug)]
#[command(name = "ac2git", version, about = "Inspect AccuRev and git state for a migration")]
struct Cli {
    #[command(flatten)]
    config: ToolConfig,

    /// Log verbosity; RUST_LOG overrides it
    #[arg(long, env = "AC2GIT_LOG", value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the transactions of a depot or stream.
    /// Usage: hist [-p depot] [-s stream] [-t time] [elements..]
    Hist(HistArgs),
    /// List AccuRev users.
    Users,
    /// List AccuRev depots.
    Depots,
    /// List streams of a depot.
    /// Usage: streams [-p depot] [-s stream] [-l tree|children|immediate]
    Streams(StreamsArgs),
    /// Populate elements into a workspace.
    /// Usage: pop [-R] [-O] [-v version -L location] [elements..]
    Pop(PopArgs),
    /// Log in to the AccuRev server. The password is always prompted for.
    Login {
        user: Option<String>,
    },
    /// Log out of the AccuRev server.
    Logout,

    /// Show the parsed git status of the repository.
    Status,
    /// List local branches with their upstream.
    Branches,
    /// Find commits on different branches that share a tree.
    Stitch,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let app = App::new(cli.config);
    let command_result: AppResult<()> = match cli.command {
        // AccuRev
        Commands::Hist(args) => handle_hist(&app, args),
        Commands::Users => handle_users(&app),
        Commands::Depots => handle_depots(&app),
        Commands::Streams(args) => handle_streams(&app, args),
        Commands::Pop(args) => handle_pop(&app, args),
        Commands::Login { user } => handle_login(&app, user.as_deref()),
        Commands::Logout => handle_logout(&app),

        // git
        Commands::Status => handle_status(&app),
        Commands::Branches => handle_branches(&app),
        Commands::Stitch => handle_stitch(&app),
    };

    match command_result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::OperationCancelled) => {
            app.ui.success("Operation cancelled by user.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            app.ui.error(&format!("{}", e));
            if let AppError::CommandFailed { stderr, .. } = &e {
                if !stderr.trim().is_empty() {
                    eprintln!("{}", stderr.trim_end());
                }
            }
            ExitCode::FAILURE
        }
    }
}
