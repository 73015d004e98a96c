use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::Args;
use colored::Colorize;
use lessonforge_gateway::{GeminiClient, LessonGateway};
use lessonforge_model::{LessonParams, SourceDocument};
use lessonforge_workspace::playable_lesson;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Grade level (e.g. 3)
    #[arg(long)]
    pub grade: String,

    /// Subject name
    #[arg(long)]
    pub subject: String,

    /// Learning objective code (e.g. MT03A01)
    #[arg(long)]
    pub lo_code: String,

    /// Learning objective statement
    #[arg(long)]
    pub objective: String,

    /// Topic outcome statement
    #[arg(long)]
    pub outcome: String,

    /// Regional language for the primary track
    #[arg(long)]
    pub language: String,

    /// Extra curriculum context text
    #[arg(long)]
    pub context: Option<String>,

    /// PDF to attach as grounding material
    #[arg(long)]
    pub pdf: Option<PathBuf>,

    /// Icon URL for the playable export header
    #[arg(long)]
    pub icon: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "./lesson")]
    pub out_dir: PathBuf,
}

pub async fn generate(args: GenerateArgs) -> Result<()> {
    let params = build_params(&args)?;
    params.validate()?;

    println!("{}", "📚 Generating lesson...".bright_blue().bold());
    println!(
        "   {} - grade {}, {} ({})",
        params.lo_code, params.grade, params.subject, params.regional_language
    );

    let gateway = GeminiClient::from_env()?;
    let lesson = gateway.generate(&params).await?;

    fs::create_dir_all(&args.out_dir)?;

    let lesson_path = args.out_dir.join("lesson.json");
    fs::write(&lesson_path, serde_json::to_string_pretty(&lesson)?)?;
    fs::write(
        args.out_dir.join("params.json"),
        serde_json::to_string_pretty(&params)?,
    )?;

    let pages_dir = args.out_dir.join("pages");
    fs::create_dir_all(&pages_dir)?;
    for (i, page) in lesson.regional_html_pages.iter().enumerate() {
        fs::write(pages_dir.join(format!("regional-{}.html", i + 1)), page)?;
    }
    for (i, page) in lesson.english_html_pages.iter().enumerate() {
        fs::write(pages_dir.join(format!("english-{}.html", i + 1)), page)?;
    }

    let playable_path = args.out_dir.join("playable.html");
    fs::write(
        &playable_path,
        playable_lesson(&params, &lesson.regional_html_pages),
    )?;

    println!();
    println!(
        "{} Generated {} pages per track",
        "✅".green(),
        lesson.regional_html_pages.len()
    );
    println!("  {} {}", "✓".green(), lesson_path.display());
    println!("  {} {}", "✓".green(), playable_path.display());

    Ok(())
}

fn build_params(args: &GenerateArgs) -> Result<LessonParams> {
    let source_document = match &args.pdf {
        Some(path) => {
            let bytes =
                fs::read(path).with_context(|| format!("Cannot read {}", path.display()))?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("attachment.pdf")
                .to_string();
            Some(SourceDocument {
                name,
                media_type: "application/pdf".to_string(),
                data: STANDARD.encode(bytes),
            })
        }
        None => None,
    };

    Ok(LessonParams {
        grade: args.grade.clone(),
        subject: args.subject.clone(),
        lo_code: args.lo_code.clone(),
        learning_objective: args.objective.clone(),
        topic_outcome: args.outcome.clone(),
        regional_language: args.language.clone(),
        context_text: args.context.clone(),
        source_document,
        custom_icon: args.icon.clone(),
        refined_blocks: None,
    })
}
