use crate::demo::{run_demo, run_status_resolve, DemoArgs, StatusResolveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recruit_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Recruitment Validation Service",
    about = "Run the candidate validation service or resolve statuses from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect candidate pipeline statuses
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
    /// Walk sample candidates through the validation workflow in memory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum StatusCommand {
    /// Resolve statuses from a validation export CSV
    Resolve(StatusResolveArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Status {
            command: StatusCommand::Resolve(args),
        } => run_status_resolve(args),
        Command::Demo(args) => run_demo(args),
    }
}
