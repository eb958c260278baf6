//! lexitag command-line tool
//!
//! Matches sentences against an entity dictionary, reports dictionary
//! statistics, scores prediction files and inspects tagger configs.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lexitag::{
    bioes_to_bio, ensure_dirs, lexicon_ids, load_dictionary, sentence_matches, Evaluation,
    Lexicon, LexiconConfig, LexiconMatch, ModelConfig, Tokenizer, UNKNOWN_ID, UNKNOWN_TOKEN,
};

/// CLI arguments
#[derive(Parser)]
#[command(name = "lexitag")]
#[command(about = "Lexicon matching and NER evaluation")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Dictionary options shared by the lexicon commands.
#[derive(clap::Args)]
struct DictArgs {
    /// Dictionary file (`entity<TAB>source` per line)
    #[arg(short, long, env = "LEXITAG_DICT")]
    dict: PathBuf,

    /// Keep case instead of lower-casing tokens
    #[arg(long)]
    cased: bool,

    /// String placed between matched tokens
    #[arg(long, default_value = "")]
    joiner: String,
}

impl DictArgs {
    fn load(&self) -> Result<Lexicon> {
        let config = LexiconConfig::new()
            .with_lowercase(!self.cased)
            .with_joiner(self.joiner.clone());
        let mut lexicon = Lexicon::new(config);
        load_dictionary(&mut lexicon, &self.dict)
            .with_context(|| format!("failed to load dictionary {}", self.dict.display()))?;
        Ok(lexicon)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Match sentences from stdin, one JSON object per line on stdout
    Match {
        #[command(flatten)]
        dict: DictArgs,
    },
    /// Show dictionary statistics
    Stats {
        #[command(flatten)]
        dict: DictArgs,

        /// Also list every entry with its id
        #[arg(short, long)]
        list: bool,
    },
    /// Score a `token gold pred` prediction file
    Eval {
        /// Prediction file
        predictions: PathBuf,

        /// Convert BIOES tags to BIO before scoring
        #[arg(long)]
        bioes: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a default tagger config
    InitConfig {
        /// Output path
        path: PathBuf,

        /// Vocabulary size
        #[arg(long)]
        num_words: usize,

        /// Tag set size
        #[arg(long)]
        num_tags: usize,

        /// Enable lexicon features with this dictionary
        #[arg(long)]
        lexicon_file: Option<PathBuf>,
    },
    /// Validate a tagger config and log its options
    CheckConfig {
        /// Config path
        path: PathBuf,

        /// Dictionary to check against `num_lexicon`
        #[arg(long)]
        dict: Option<PathBuf>,

        /// Keep case instead of lower-casing tokens
        #[arg(long, requires = "dict")]
        cased: bool,

        /// String placed between matched tokens
        #[arg(long, default_value = "")]
        joiner: String,
    },
}

#[derive(Debug, Serialize)]
struct MatchOutput {
    input: String,
    tokens: Vec<String>,
    matches: Vec<LexiconMatch>,
    ids: Vec<u32>,
}

fn run_match(dict: &DictArgs) -> Result<()> {
    let lexicon = dict.load()?;
    let tokenizer = Tokenizer::new()?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens = tokenizer.tokenize_texts(line);
        let output = MatchOutput {
            input: line.to_string(),
            matches: sentence_matches(&lexicon, &tokens)?,
            ids: lexicon_ids(&lexicon, &tokens)?,
            tokens,
        };
        writeln!(stdout, "{}", serde_json::to_string(&output)?)?;
    }
    Ok(())
}

fn run_stats(dict: &DictArgs, list: bool) -> Result<()> {
    let lexicon = dict.load()?;
    println!("entries:  {}", lexicon.size());
    println!("ids:      {}", lexicon.id_count());
    if list {
        println!("{UNKNOWN_ID}\t{UNKNOWN_TOKEN}\t-");
        for (entry, source, id) in lexicon.iter() {
            println!("{id}\t{entry}\t{source}");
        }
    }
    Ok(())
}

fn run_eval(predictions: &Path, bioes: bool, json: bool) -> Result<()> {
    let content = fs::read_to_string(predictions)
        .with_context(|| format!("failed to read {}", predictions.display()))?;

    let lines: Vec<String> = if bioes {
        content
            .lines()
            .map(convert_line)
            .collect::<Result<_>>()?
    } else {
        content.lines().map(str::to_string).collect()
    };

    let report = Evaluation::from_prediction_lines(&lines)?.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines() {
            println!("{line}");
        }
    }
    Ok(())
}

/// Rewrite the gold and predicted columns of one line from BIOES to BIO.
fn convert_line(line: &str) -> Result<String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Ok(line.to_string());
    }
    let split = fields.len() - 2;
    let tags = bioes_to_bio(&fields[split..])?;
    Ok(format!("{} {}", fields[..split].join(" "), tags.join(" ")))
}

fn run_init_config(
    path: &Path,
    num_words: usize,
    num_tags: usize,
    lexicon_file: Option<PathBuf>,
) -> Result<()> {
    let mut config = ModelConfig::new(num_words, num_tags);
    if let Some(file) = lexicon_file {
        config = config.with_lexicon(file);
    }
    config.validate()?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dirs(&[parent])?;
    }
    config
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote config");
    Ok(())
}

fn run_check_config(path: &Path, dict: Option<DictArgs>) -> Result<()> {
    let config = ModelConfig::load(path)
        .with_context(|| format!("invalid config {}", path.display()))?;
    config.log_summary();

    if let Some(dict) = dict {
        let lexicon = dict.load()?;
        config.check_lexicon_capacity(&lexicon)?;
        info!(ids = lexicon.id_count(), capacity = config.num_lexicon, "lexicon fits");
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Match { dict } => run_match(&dict),
        Commands::Stats { dict, list } => run_stats(&dict, list),
        Commands::Eval {
            predictions,
            bioes,
            json,
        } => run_eval(&predictions, bioes, json),
        Commands::InitConfig {
            path,
            num_words,
            num_tags,
            lexicon_file,
        } => run_init_config(&path, num_words, num_tags, lexicon_file),
        Commands::CheckConfig {
            path,
            dict,
            cased,
            joiner,
        } => {
            let dict = dict.map(|dict| DictArgs {
                dict,
                cased,
                joiner,
            });
            run_check_config(&path, dict)
        }
    }
}
