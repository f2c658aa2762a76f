// SPDX-License-Identifier: MIT OR Apache-2.0

//! CLI argument parsing using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// wordvecs - On-demand pretrained word vectors
///
/// Downloads a word vector corpus once, loads it into a local SQLite store
/// and looks words up in it.
#[derive(Parser, Debug)]
#[command(name = "wordvecs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Hide download and ingestion progress bars
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Corpus family
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CorpusKind {
    /// Stanford GloVe vectors
    Glove,
    /// fastText Wikipedia vectors
    Fasttext,
    /// Character n-gram vectors (Hashimoto et al.)
    Kazuma,
    /// ConceptNet Numberbatch
    Numberbatch,
}

/// Out-of-vocabulary mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliOovMode {
    /// Report unknown words as missing
    None,
    /// Zero vector
    Zero,
    /// Uniform random values in [-0.1, 0.1]
    Random,
}

/// Which corpus configuration to use
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Corpus family
    #[arg(value_enum)]
    pub corpus: CorpusKind,

    /// Corpus name (GloVe setting or Numberbatch version)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Vector dimension (GloVe only)
    #[arg(short, long)]
    pub dim: Option<usize>,

    /// Language (fastText only)
    #[arg(short, long)]
    pub lang: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available corpora and their settings
    Corpora,

    /// Show the state of a corpus store without downloading anything
    Status {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Download and ingest a corpus if its store is incomplete
    Ingest {
        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Print the vectors of one or more words
    #[command(alias = "emb")]
    Lookup {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Words to look up
        #[arg(required = true)]
        words: Vec<String>,

        /// How to embed unknown words (defaults to the configured mode)
        #[arg(long, value_enum)]
        default: Option<CliOovMode>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
