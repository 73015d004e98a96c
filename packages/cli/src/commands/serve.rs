use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use lessonforge_gateway::GeminiClient;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "4545")]
    pub port: u16,
}

pub async fn serve(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let gateway = Arc::new(GeminiClient::from_env()?);
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    println!("{}", "🚀 LessonForge API server".bright_blue().bold());
    println!("   Listening on http://{}", addr);
    println!();

    lessonforge_workspace::serve(addr, gateway).await
}
