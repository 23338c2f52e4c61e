use clap::{Parser, Subcommand};

use meshview::commands::{self, LimiterArgs, SearchArgs};
use meshview::config;
use meshview::error::ViewerError;

/// Renders triangle meshes, limiter outlines and search highlights
#[derive(Parser, Debug)]
#[command(name = "meshview", version)]
struct Cli {
    /// JSON file with figure size and colours
    #[arg(long, global = true)]
    style: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plot the limiter polyline over the mesh and write limit_flat
    Limiter(LimiterArgs),
    /// Plot the mesh with the triangles listed in the search file highlighted
    Search(SearchArgs),
}

fn run(cli: Cli) -> Result<(), ViewerError> {
    let style = config::load_style(cli.style.as_deref())?;

    match cli.command {
        Command::Limiter(args) => commands::limiter(&args, &style)?,
        Command::Search(args) => commands::search(&args, &style)?,
    };

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1)
    }
}
