use crate::demo::{run_demo, run_resolve, DemoArgs, ResolveArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fellowship_review::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fellowship Review",
    about = "Serve and inspect the fellowship application review dashboard",
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
    /// Resolve a stored application JSON file and print its review view
    Resolve(ResolveArgs),
    /// Seed sample applications in every historical shape and print their cards
    Demo(DemoArgs),
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
        Command::Resolve(args) => run_resolve(args),
        Command::Demo(args) => run_demo(args),
    }
}
