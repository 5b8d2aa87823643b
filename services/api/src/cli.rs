use crate::browse::{run_listings, run_map, BrowseArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use listing_hub::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Listing Hub",
    about = "Serve and browse aggregated agent listings from the command line",
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
    /// Print one page of an agent's filtered and sorted listings
    Listings(BrowseArgs),
    /// Print de-overlapped map markers and the viewport for an agent's listings
    Map(BrowseArgs),
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
        Command::Listings(args) => run_listings(args).await,
        Command::Map(args) => run_map(args).await,
    }
}
