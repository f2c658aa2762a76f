// SPDX-License-Identifier: MIT OR Apache-2.0

//! wordvecs - On-demand pretrained word vectors
//!
//! Fetches GloVe, fastText, character n-gram and Numberbatch vectors on first
//! use, keeps them in per-corpus SQLite stores and serves lookups from there.

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, CliOovMode, Commands, CorpusArgs, CorpusKind, OutputFormat};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use wordvecs::cache::CacheRoot;
use wordvecs::config::Config;
use wordvecs::corpus::{
    fasttext, glove, kazuma, numberbatch, AnyCorpus, Corpus, FastTextCorpus, GloveCorpus,
    KazumaCorpus, NumberbatchCorpus,
};
use wordvecs::embedding::ingest::STATE_COMPLETE;
use wordvecs::embedding::storage::{META_INGESTION, META_VOCABULARY};
use wordvecs::embedding::{
    CorpusIngester, Embedding, EmbeddingOptions, NgramEmbedding, OovMode, VectorStore,
    WordEmbedding,
};
use wordvecs::fetch::ArtifactFetcher;
use wordvecs::output::{
    colorize_detail, colorize_heading, colorize_path, colorize_word, format_vector, use_colors,
};

fn main() -> Result<()> {
    // Initialize tracing with WORDVECS_LOG env var (e.g., WORDVECS_LOG=debug wordvecs ingest glove)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WORDVECS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;
    let config = Config::load();

    match cli.command {
        Commands::Corpora => {
            list_corpora(format)?;
        }
        Commands::Status { corpus } => {
            let corpus = select_corpus(&corpus)?;
            show_status(&corpus, &config, format)?;
        }
        Commands::Ingest { corpus } => {
            let corpus = select_corpus(&corpus)?;
            let fetcher = build_fetcher(&config, cli.quiet)?;
            let mut options = EmbeddingOptions::from_config(&config);
            options.ingest.show_progress &= !cli.quiet;

            let name = corpus.name();
            let embedding = Embedding::open(corpus, &fetcher, &options)
                .with_context(|| format!("Failed to prepare {}", name))?;
            let count = embedding.count()?;
            let path = embedding.store().path().display().to_string();

            match format {
                OutputFormat::Json => {
                    let report = IngestReport {
                        corpus: name,
                        store: path,
                        words: count,
                    };
                    println!("{}", serde_json::to_string(&report)?);
                }
                OutputFormat::Text => {
                    let use_color = use_colors();
                    println!(
                        "{}: {} words in {}",
                        colorize_word(&name, use_color),
                        count,
                        colorize_path(&path, use_color)
                    );
                }
            }
        }
        Commands::Lookup {
            corpus,
            words,
            default,
        } => {
            let corpus = select_corpus(&corpus)?;
            let fetcher = build_fetcher(&config, cli.quiet)?;
            let mut options = EmbeddingOptions::from_config(&config);
            options.ingest.show_progress &= !cli.quiet;

            let name = corpus.name();
            let embedding = open_word_embedding(corpus, &fetcher, &options)
                .with_context(|| format!("Failed to prepare {}", name))?;
            let mode = default.map(|m| match m {
                CliOovMode::None => OovMode::None,
                CliOovMode::Zero => OovMode::Zero,
                CliOovMode::Random => OovMode::RandomUniform,
            });

            let mut results = Vec::with_capacity(words.len());
            for word in words {
                let vector = embedding.emb(&word, mode)?;
                results.push(WordVector { word, vector });
            }
            print_vectors(&results, format)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "wordvecs", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct WordVector {
    word: String,
    vector: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct IngestReport {
    corpus: String,
    store: String,
    words: u64,
}

#[derive(Serialize)]
struct StatusReport {
    corpus: String,
    store: PathBuf,
    dimension: usize,
    expected: u64,
    words: u64,
    ingestion: Option<String>,
    vocabulary: Option<String>,
    complete: bool,
}

#[derive(Serialize)]
struct CorpusEntry {
    corpus: &'static str,
    name: String,
    dimensions: Vec<usize>,
    size: u64,
    description: String,
}

/// Builds the corpus named on the command line, with family defaults.
fn select_corpus(args: &CorpusArgs) -> Result<AnyCorpus> {
    let ignored = |flag: &str, present: bool| {
        if present {
            warn!("--{} has no effect for this corpus", flag);
        }
    };

    let corpus = match args.corpus {
        CorpusKind::Glove => {
            ignored("lang", args.lang.is_some());
            AnyCorpus::Glove(GloveCorpus::new(
                args.name.as_deref().unwrap_or(glove::DEFAULT_NAME),
                args.dim.unwrap_or(glove::DEFAULT_DIMENSION),
            )?)
        }
        CorpusKind::Fasttext => {
            ignored("name", args.name.is_some());
            ignored("dim", args.dim.is_some());
            AnyCorpus::FastText(FastTextCorpus::new(args.lang.as_deref().unwrap_or("en"))?)
        }
        CorpusKind::Kazuma => {
            ignored("name", args.name.is_some());
            ignored("dim", args.dim.is_some());
            ignored("lang", args.lang.is_some());
            AnyCorpus::Kazuma(KazumaCorpus)
        }
        CorpusKind::Numberbatch => {
            ignored("dim", args.dim.is_some());
            ignored("lang", args.lang.is_some());
            AnyCorpus::Numberbatch(NumberbatchCorpus::new(
                args.name.as_deref().unwrap_or(numberbatch::DEFAULT_NAME),
            )?)
        }
    };
    Ok(corpus)
}

fn build_fetcher(config: &Config, quiet: bool) -> Result<ArtifactFetcher> {
    let cache = CacheRoot::resolve(config.cache())?;
    let fetcher = ArtifactFetcher::new(cache, config.fetch())?.with_progress(!quiet);
    Ok(fetcher)
}

/// Character n-gram vectors are looked up through their n-grams, every other
/// corpus word by word.
fn open_word_embedding(
    corpus: AnyCorpus,
    fetcher: &ArtifactFetcher,
    options: &EmbeddingOptions,
) -> Result<Box<dyn WordEmbedding>> {
    let is_ngram = matches!(corpus, AnyCorpus::Kazuma(_));
    let embedding = Embedding::open(corpus, fetcher, options)?;
    if is_ngram {
        Ok(Box::new(NgramEmbedding::new(embedding)))
    } else {
        Ok(Box::new(embedding))
    }
}

fn print_vectors(results: &[WordVector], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(results)?);
        }
        OutputFormat::Text => {
            let use_color = use_colors();
            for result in results {
                let rendered = match &result.vector {
                    Some(vector) => format_vector(vector),
                    None => colorize_detail("(missing)", use_color),
                };
                println!("{}\t{}", colorize_word(&result.word, use_color), rendered);
            }
        }
    }
    Ok(())
}

/// Reports the store state without downloading or ingesting anything.
fn show_status(corpus: &AnyCorpus, config: &Config, format: OutputFormat) -> Result<()> {
    let cache = CacheRoot::resolve(config.cache())?;
    let path = cache.path(corpus.store_path());
    let expected = corpus.expected_size();

    let (words, ingestion, vocabulary, complete) = if path.exists() {
        let store = VectorStore::open_read_only(&path, corpus.dimension())
            .with_context(|| format!("Failed to open {}", path.display()))?;
        (
            store.count()?,
            store.get_meta(META_INGESTION)?,
            store.get_meta(META_VOCABULARY)?,
            CorpusIngester::is_complete(&store, expected)?,
        )
    } else {
        (0, None, None, false)
    };

    let report = StatusReport {
        corpus: corpus.name(),
        store: path,
        dimension: corpus.dimension(),
        expected,
        words,
        ingestion,
        vocabulary,
        complete,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&report)?);
        }
        OutputFormat::Text => {
            let use_color = use_colors();
            let state = if report.complete {
                "ready".to_string()
            } else if report.ingestion.as_deref() == Some(STATE_COMPLETE) {
                "short".to_string()
            } else if report.words == 0 {
                "not ingested".to_string()
            } else {
                "partial".to_string()
            };
            println!(
                "{} ({})",
                colorize_heading(&report.corpus, use_color),
                state
            );
            println!(
                "  store:     {}",
                colorize_path(&report.store.display().to_string(), use_color)
            );
            println!("  dimension: {}", report.dimension);
            println!("  words:     {} / {}", report.words, report.expected);
        }
    }
    Ok(())
}

fn list_corpora(format: OutputFormat) -> Result<()> {
    let mut entries = Vec::new();
    for setting in glove::SETTINGS {
        entries.push(CorpusEntry {
            corpus: "glove",
            name: setting.name.to_string(),
            dimensions: setting.dimensions.to_vec(),
            size: setting.size,
            description: setting.description.to_string(),
        });
    }
    for (lang, size) in fasttext::LANGUAGES {
        entries.push(CorpusEntry {
            corpus: "fasttext",
            name: lang.to_string(),
            dimensions: vec![fasttext::DIMENSION],
            size: *size,
            description: format!("fastText Wikipedia vectors ({})", lang),
        });
    }
    entries.push(CorpusEntry {
        corpus: "kazuma",
        name: "charNgram".to_string(),
        dimensions: vec![kazuma::DIMENSION],
        size: kazuma::SIZE,
        description: "Character n-gram vectors".to_string(),
    });
    for setting in numberbatch::SETTINGS {
        entries.push(CorpusEntry {
            corpus: "numberbatch",
            name: setting.name.to_string(),
            dimensions: vec![numberbatch::DIMENSION],
            size: setting.size,
            description: setting.description.to_string(),
        });
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&entries)?);
        }
        OutputFormat::Text => {
            let use_color = use_colors();
            let mut current = "";
            for entry in &entries {
                if entry.corpus != current {
                    current = entry.corpus;
                    println!("{}", colorize_heading(current, use_color));
                }
                let dimensions: Vec<String> =
                    entry.dimensions.iter().map(|d| d.to_string()).collect();
                println!(
                    "  {:<20} {:>12} words  dim {:<14} {}",
                    entry.name,
                    entry.size,
                    dimensions.join(","),
                    colorize_detail(&entry.description, use_color)
                );
            }
        }
    }
    Ok(())
}
