mod cli;

use std::collections::HashMap;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use cli::{Cli, Command};
use ragcore::config::Config;
use ragcore::context::{DEFAULT_INSERTION_FORMAT, format_context, should_run_query, strip_command};
use ragcore::ingest::{load_folder, load_url_map};
use ragcore::query::{QueryNormalizer, StopwordStore};
use ragcore::search::{DEFAULT_TOP_N, RankingPolicy, RetrievalService};
use ragcore::solr::SolrClient;
use ragcore::Lang;
use reqwest::Client;
use tracing::{info, warn};

/// TCP connection establishment timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ragcore=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_lookup(|var| {
        let flag = match var {
            "SOLR_SERVER" => cli.server.clone(),
            "CORE_NAME" => cli.core.clone(),
            "STOPWORDS_DIR" => cli
                .stopwords_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            _ => None,
        };
        flag.or_else(|| std::env::var(var).ok())
    })?;

    let http = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let service = RetrievalService::new(
        SolrClient::new(http, &config.solr)?,
        QueryNormalizer::new(StopwordStore::new(&config.stopwords_dir)),
        RankingPolicy::default().with_min_score_weight(config.min_score_weight),
    );

    match cli.command {
        Command::Ping => {
            if !service.is_available().await {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Upload { folders, urls, lang } => {
            let urls = match urls {
                Some(path) => load_url_map(&path)?,
                None => HashMap::new(),
            };
            let lang = Lang::coerce(&lang);
            for folder in &folders {
                let documents = load_folder(folder, &urls, lang)?;
                service.index(&documents).await?;
            }
            info!(folders = folders.len(), "upload finished");
        }
        Command::Search {
            question,
            lang,
            top_n,
        } => {
            let answer = service.search(&question, &lang, top_n).await?;
            if answer.is_empty() {
                println!("No relevant context found.");
            }
            for snippet in &answer.snippets {
                println!("{snippet}\n");
            }
            for source in &answer.sources {
                println!("Source: {source}");
            }
        }
        Command::Prompt {
            message,
            lang,
            explicit,
        } => {
            if !should_run_query(&message, explicit) {
                warn!("message does not trigger retrieval, passing it through");
                println!("{message}");
                return Ok(ExitCode::SUCCESS);
            }
            let question = strip_command(&message);
            let answer = service.search(question, &lang, DEFAULT_TOP_N).await?;
            println!("{}", format_context(&answer, question, DEFAULT_INSERTION_FORMAT));
            if !answer.sources.is_empty() {
                println!("\nSources: {}", answer.sources.join(", "));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
