mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{export, generate, serve, ExportArgs, GenerateArgs, ServeArgs};

/// LessonForge CLI - dual-track AI lesson authoring
#[derive(Parser, Debug)]
#[command(name = "lessonforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the lesson API server
    Serve(ServeArgs),

    /// Generate a lesson and write it to disk
    Generate(GenerateArgs),

    /// Package a saved lesson as one playable HTML file
    Export(ExportArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Generate(args) => generate(args).await,
        Command::Export(args) => export(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
