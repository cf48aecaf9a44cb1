//! Treemap CLI: build alphabet tables and query lexicon prefix trees.
//!
//! Thin wrapper over the `treemap` library crate.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use treemap::{
    AlphabetBuilder, FieldSplit, LexiconOptions, Treemap, load_alphabet, read_lexicon,
    store_alphabet,
};

/// Treemap: compress a lexicon into a grapheme-coded prefix tree.
#[derive(Parser, Debug)]
#[command(name = "treemap", version, about)]
struct Cli {
    /// Log progress to stderr (honours RUST_LOG when set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all logging, including warnings.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Split lexicon fields on any whitespace instead of tabs.
    #[arg(long, global = true)]
    whitespace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect every grapheme of a lexicon and write the alphabet table
    Alphabet {
        /// Tab-separated lexicon (surface, lemma, tag, features)
        #[arg(long)]
        lexicon: PathBuf,

        /// Alphabet table to write (one `<code> <grapheme>` per line)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Look words up in the tree; reads stdin when no words are given
    Lookup {
        /// Lexicon to build the tree from
        #[arg(long, required_unless_present = "snapshot", requires = "alphabet")]
        lexicon: Option<PathBuf>,

        /// Alphabet table for the lexicon
        #[arg(long, requires = "lexicon")]
        alphabet: Option<PathBuf>,

        /// Load a previously saved tree instead of building one
        #[arg(long, conflicts_with_all = ["lexicon", "alphabet"])]
        snapshot: Option<PathBuf>,

        /// Save the tree as a JSON snapshot before answering queries
        #[arg(long)]
        save: Option<PathBuf>,

        /// Words to look up
        words: Vec<String>,
    },

    /// Print record, node and word counts for a lexicon
    Stats {
        #[arg(long)]
        lexicon: PathBuf,

        #[arg(long)]
        alphabet: PathBuf,
    },
}

fn init_tracing(cli: &Cli) {
    //   --quiet   → "off"
    //   --verbose → RUST_LOG if set, otherwise "info"
    //   default   → "warn"
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let options = LexiconOptions {
        split: if cli.whitespace {
            FieldSplit::Whitespace
        } else {
            FieldSplit::Tab
        },
    };

    match cli.command {
        Commands::Alphabet { lexicon, output } => build_alphabet(&lexicon, &output, options),
        Commands::Lookup {
            lexicon,
            alphabet,
            snapshot,
            save,
            words,
        } => {
            let tree = match (snapshot, lexicon, alphabet) {
                (Some(snapshot), _, _) => Treemap::load(&snapshot)
                    .with_context(|| format!("loading snapshot {}", snapshot.display()))?,
                (None, Some(lexicon), Some(alphabet)) => build_tree(&lexicon, &alphabet, options)?,
                _ => bail!("either --snapshot or both --lexicon and --alphabet are required"),
            };

            if let Some(path) = save {
                tree.save(&path)
                    .with_context(|| format!("saving snapshot {}", path.display()))?;
                info!(path = %path.display(), "snapshot written");
            }

            lookup(&tree, words)
        }
        Commands::Stats { lexicon, alphabet } => {
            let records = read_lexicon(&lexicon, options)
                .with_context(|| format!("reading lexicon {}", lexicon.display()))?;
            let table = load_alphabet(&alphabet)
                .with_context(|| format!("reading alphabet {}", alphabet.display()))?;

            let mut tree = Treemap::new(table);
            tree.setup_tree(&records);

            println!("records\t{}", records.len());
            println!("alphabet\t{}", tree.codec().len());
            println!("nodes\t{}", tree.trie().len());
            println!("words\t{}", tree.trie().word_count());
            Ok(())
        }
    }
}

fn build_alphabet(lexicon: &Path, output: &Path, options: LexiconOptions) -> Result<()> {
    let records = read_lexicon(lexicon, options)
        .with_context(|| format!("reading lexicon {}", lexicon.display()))?;

    let mut builder = AlphabetBuilder::new();
    builder.add_words(records.iter().map(|r| r.surface.as_str()));
    let table = builder.build()?;

    store_alphabet(output, &table)
        .with_context(|| format!("writing alphabet {}", output.display()))?;
    println!("{} graphemes written to {}", table.len(), output.display());
    Ok(())
}

fn build_tree(lexicon: &Path, alphabet: &Path, options: LexiconOptions) -> Result<Treemap> {
    Treemap::from_files(lexicon, alphabet, options).with_context(|| {
        format!(
            "building tree from {} with {}",
            lexicon.display(),
            alphabet.display()
        )
    })
}

/// Print `<word>\t<retrieved>\t<yes|no>` for each query.
fn lookup(tree: &Treemap, words: Vec<String>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut answer = |word: &str| -> io::Result<()> {
        let found = tree.get_word(word);
        let member = if tree.contains_word(word) { "yes" } else { "no" };
        writeln!(out, "{word}\t{found}\t{member}")
    };

    if words.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            answer(word)?;
        }
    } else {
        for word in &words {
            answer(word)?;
        }
    }

    Ok(())
}
