use crate::demo::{run_demo, run_estimate, run_resources, DemoArgs, EstimateArgs, ResourcesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use support_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Support Intake",
    about = "Estimate emergency support and find nearby assistance resources",
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
    /// Estimate emergency support for a set of answers
    Estimate(EstimateArgs),
    /// List the nearest resources around a coordinate
    Resources(ResourcesArgs),
    /// Run a full intake assessment for a sample submission
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
        Command::Estimate(args) => run_estimate(args),
        Command::Resources(args) => run_resources(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
