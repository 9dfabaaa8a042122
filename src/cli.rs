use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ragcore::search::DEFAULT_TOP_N;

#[derive(Debug, Parser)]
#[command(
    name = "ragcore",
    version,
    about = "Index documents into Solr and retrieve cited context for chat questions"
)]
pub struct Cli {
    /// Solr host[:port] (overrides SOLR_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Solr core name (overrides CORE_NAME)
    #[arg(long, global = true)]
    pub core: Option<String>,

    /// Directory with stopwords_<lang>.txt files (overrides STOPWORDS_DIR)
    #[arg(long, global = true)]
    pub stopwords_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the Solr server answers
    Ping,
    /// Upload folders of extracted documents (first line title, rest body)
    Upload {
        /// Folders to upload; every file becomes one document
        #[arg(required = true)]
        folders: Vec<PathBuf>,
        /// JSON object mapping file names to source URLs
        #[arg(long)]
        urls: Option<PathBuf>,
        /// Language field the text is stored in
        #[arg(long, default_value = "en")]
        lang: String,
    },
    /// Retrieve context for a question and print snippets with sources
    Search {
        question: String,
        /// Language code of the question (unsupported codes fall back to English)
        #[arg(long, default_value = "en")]
        lang: String,
        /// Number of Solr hits to re-rank
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// Print the context message a chat turn would send to the model
    Prompt {
        message: String,
        #[arg(long, default_value = "en")]
        lang: String,
        /// Only retrieve for messages starting with /query
        #[arg(long)]
        explicit: bool,
    },
}
