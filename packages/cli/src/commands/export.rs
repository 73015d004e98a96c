use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use lessonforge_model::{GeneratedLesson, LessonParams};
use lessonforge_workspace::playable_lesson;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Saved lesson.json produced by `generate`
    #[arg(long, default_value = "./lesson/lesson.json")]
    pub lesson: PathBuf,

    /// Matching params.json produced by `generate`
    #[arg(long, default_value = "./lesson/params.json")]
    pub params: PathBuf,

    /// Output HTML file
    #[arg(short, long, default_value = "./lesson/playable.html")]
    pub out: PathBuf,
}

pub fn export(args: ExportArgs) -> Result<()> {
    let lesson: GeneratedLesson = serde_json::from_str(
        &fs::read_to_string(&args.lesson)
            .with_context(|| format!("Cannot read {}", args.lesson.display()))?,
    )?;
    let params: LessonParams = serde_json::from_str(
        &fs::read_to_string(&args.params)
            .with_context(|| format!("Cannot read {}", args.params.display()))?,
    )?;

    let html = playable_lesson(&params, &lesson.regional_html_pages);
    if let Some(parent) = args.out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&args.out, html)?;

    println!(
        "{} Packaged {} pages",
        "✅".green(),
        lesson.regional_html_pages.len()
    );
    println!("  {} {}", "✓".green(), args.out.display());

    Ok(())
}
