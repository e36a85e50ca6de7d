/// repivot - move a mesh's pivot and bake it into the vertices
///
/// # Commands
///
/// - `repivot info <mesh.stl>` - print bounds and pivot candidates
/// - `repivot apply <mesh.stl> --ops center-hor,bottom` - rebase and save
///
/// Logging goes through `RUST_LOG` (default `info`).
use anyhow::Result;
use clap::{Parser, Subcommand};
use repivot_cli::{run_apply, run_info, ApplyArgs, InfoArgs};

#[derive(Parser)]
#[command(name = "repivot")]
#[command(about = "Move a mesh's pivot point and bake it into the vertices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print world-space bounds and every pivot candidate
    Info(InfoArgs),

    /// Run pivot operations and save the rebased mesh
    Apply(ApplyArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => run_info(&args),
        Commands::Apply(args) => {
            run_apply(&args)?;
            Ok(())
        }
    }
}
