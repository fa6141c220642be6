use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use grammar_fixer::cli::ServiceArgs;
use grammar_fixer::grammar::SharedGrammar;
use grammar_fixer::pipeline::CorrectionPipeline;
use grammar_fixer::spell_check::load_spelling_service;
use grammar_fixer::web::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "grammar-web", version, about = "JSON API for grammar and spelling correction")]
struct Args {
    /// Address to listen on [default: web.bind from the configuration]
    #[arg(long)]
    bind: Option<String>,

    #[command(flatten)]
    service: ServiceArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = args.service.load_config()?;
    if let Some(bind) = args.bind {
        config.web.bind = bind;
    }

    let listener = TcpListener::bind(&config.web.bind).await?;

    // The grammar server is required; fail at startup rather than on the first request.
    let grammar = Arc::new(SharedGrammar::new(
        config.grammar.server_url.clone(),
        config.language.clone(),
    ));
    let warm = Arc::clone(&grammar);
    if let Err(e) = tokio::task::spawn_blocking(move || warm.warm_up()).await? {
        error!("❌ Grammar service unavailable: {}", e);
        eprintln!(
            "Configuration error: no LanguageTool server at {} ({}). Start one or pass --server.",
            config.grammar.server_url, e
        );
        process::exit(1);
    }

    let dictionary = config.spelling.dictionary.clone();
    let spelling = tokio::task::spawn_blocking(move || load_spelling_service(dictionary.as_deref())).await?;
    let pipeline = Arc::new(CorrectionPipeline::new(grammar, spelling));
    let state = AppState::new(Arc::clone(&pipeline), config.web.max_chars);

    info!("🚀 Listening on http://{}", config.web.bind);
    let served = web::serve(listener, state).await;

    // The blocking HTTP client inside must not be dropped on an async worker.
    tokio::task::spawn_blocking(move || drop(pipeline)).await?;
    served?;
    Ok(())
}
