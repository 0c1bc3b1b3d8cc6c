use clap::{Parser, Subcommand};
use research_chatbot::agents::ResponseFormatter;
use research_chatbot::utils::{default_log_dir, init_logger, LogTarget};
use research_chatbot::{chat, tui, ChatSession, Config, ResearchPipeline};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

/// Research Chatbot: ask a question, get a researched answer
#[derive(Parser, Debug)]
#[command(name = "research-chatbot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Interactive terminal chat (default)
    Tui,
    /// Answer a single question and exit
    Ask {
        /// The question to research
        query: String,
        /// Print the full research state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Line-oriented chat on stdin/stdout
    Repl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Tui);

    let config = Config::from_env();

    let target = match command {
        Command::Tui => LogTarget::File(
            config
                .as_ref()
                .ok()
                .and_then(|c| c.log_dir.clone())
                .unwrap_or_else(default_log_dir),
        ),
        _ => LogTarget::Stderr,
    };
    let _guard = init_logger(&target)?;

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(anyhow::anyhow!("Configuration error: {}", e));
        }
    };
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        "Configuration loaded"
    );

    let pipeline = Arc::new(ResearchPipeline::from_config(&config)?);

    match command {
        Command::Tui => tui::run(pipeline).await,
        Command::Ask { query, json } => ask(&pipeline, &query, json).await,
        Command::Repl => repl(&pipeline).await,
    }
}

async fn ask(pipeline: &ResearchPipeline, query: &str, json: bool) -> anyhow::Result<()> {
    if !json {
        let reply = chat::respond(pipeline, query, |_| {}).await;
        println!("{}", reply.content);
        if !reply.succeeded {
            std::process::exit(1);
        }
        return Ok(());
    }

    match pipeline.run(query).await {
        Ok(state) => {
            println!("{}", serde_json::to_string_pretty(&state)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", ResponseFormatter::render_failure(&e));
            std::process::exit(1);
        }
    }
}

async fn repl(pipeline: &ResearchPipeline) -> anyhow::Result<()> {
    let mut session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Research Chatbot (model: {}). Type \"exit\" to quit.", pipeline.model());

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text.eq_ignore_ascii_case("exit") || text.eq_ignore_ascii_case("quit") {
            break;
        }

        let reply = session.handle_message(pipeline, text).await;
        println!("\n{}\n", reply.content);
    }

    session.end();
    Ok(())
}
