use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for rotorfft")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test {
        /// Also run the no_std, property-test, logging and scalar-kernel passes
        #[arg(long)]
        all: bool,
    },
    Clippy,
    Fmt,
    Analyze,
    Bench,
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();
    println!("host kernel: {}", cfg.kernel);

    let cmds = match cli.command {
        Commands::Build => vec![build_command(&cfg)],
        Commands::Test { all: false } => vec![test_command(&cfg)],
        Commands::Test { all: true } => test_matrix_commands(&cfg),
        Commands::Clippy => vec![clippy_command()],
        Commands::Fmt => vec![fmt_command()],
        Commands::Analyze => vec![fmt_command(), clippy_command()],
        Commands::Bench => vec![bench_command()],
    };
    run_all(cmds)
}
