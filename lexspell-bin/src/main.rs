use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use gumdrop::Options;
use serde::Serialize;

use lexspell::checker::{check, fill, CheckOutcome, CheckReport};
use lexspell::dictionary::{
    dot, Dictionary, HashDictionary, ProbeStrategy, TreeDictionary, TreeMode,
};
use lexspell::tokenizer::Tokenize;

trait OutputWriter {
    fn write_unknown(&mut self, word: &str);
    fn write_report(&mut self, report: &CheckReport);
    fn finish(&mut self);
}

struct StdoutWriter;

impl OutputWriter for StdoutWriter {
    fn write_unknown(&mut self, word: &str) {
        println!("{}", word);
    }

    fn write_report(&mut self, report: &CheckReport) {
        let mut stderr = io::stderr();
        report.write_to(&mut stderr).expect("writing report");
    }

    fn finish(&mut self) {}
}

#[derive(Debug, Default, Serialize)]
struct JsonWriter {
    unknown: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<CheckReport>,
}

impl JsonWriter {
    pub fn new() -> JsonWriter {
        JsonWriter::default()
    }
}

impl OutputWriter for JsonWriter {
    fn write_unknown(&mut self, word: &str) {
        self.unknown.push(word.to_owned());
    }

    fn write_report(&mut self, report: &CheckReport) {
        self.report = Some(report.clone());
    }

    fn finish(&mut self) {
        println!("{}", serde_json::to_string_pretty(self).unwrap());
    }
}

#[derive(Debug, Options)]
struct Args {
    #[options(help = "print help message")]
    help: bool,

    #[options(command)]
    command: Option<Command>,
}

#[derive(Debug, Options)]
enum Command {
    #[options(help = "build a dictionary and optionally spell-check a document against it")]
    Check(CheckArgs),

    #[options(help = "print input in word-separated tokenized form")]
    Tokenize(TokenizeArgs),
}

#[derive(Debug, Options)]
struct CheckArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, help = "dictionary file; read from stdin when omitted")]
    dictionary: Option<PathBuf>,

    #[options(short = "c", help = "spell-check the words of this document against the dictionary")]
    check: Option<PathBuf>,

    #[options(short = "T", help = "use a search tree instead of a hash table")]
    tree: bool,

    #[options(
        short = "r",
        long = "red-black",
        help = "balance the tree as a red-black tree (implies --tree)"
    )]
    red_black: bool,

    #[options(
        short = "d",
        long = "double-hashing",
        help = "resolve hash collisions by double hashing (linear probing is the default)"
    )]
    double_hashing: bool,

    #[options(
        short = "t",
        long = "table-size",
        help = "hash table capacity, rounded up to the next prime",
        default = "113"
    )]
    table_size: usize,

    #[options(short = "e", long = "print-table", help = "dump every hash table slot to stderr")]
    print_table: bool,

    #[options(
        short = "p",
        long = "print-stats",
        help = "print occupancy statistics (hash table) or structural statistics (tree)"
    )]
    print_stats: bool,

    #[options(
        short = "s",
        help = "number of contiguous segments for table statistics",
        default = "1"
    )]
    segments: usize,

    #[options(short = "o", long = "dot", help = "write a DOT graph of the tree to stdout")]
    dot: bool,

    #[options(no_short, long = "json", help = "output in JSON format")]
    use_json: bool,
}

#[derive(Debug, Options)]
struct TokenizeArgs {
    #[options(help = "print help message")]
    help: bool,

    #[options(free, help = "text to be tokenized")]
    inputs: Vec<String>,
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("can't read {}", path.display())),
        None => {
            eprintln!("Reading from stdin...");
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            Ok(buffer)
        }
    }
}

fn make_writer(use_json: bool) -> Box<dyn OutputWriter> {
    if use_json {
        Box::new(JsonWriter::new())
    } else {
        Box::new(StdoutWriter)
    }
}

fn check_document<D>(
    dictionary: &D,
    document: &str,
    writer: &mut dyn OutputWriter,
) -> CheckOutcome
where
    D: Dictionary + ?Sized,
{
    let outcome = check(dictionary, document);
    for word in &outcome.unknown {
        writer.write_unknown(word);
    }
    outcome
}

fn run_tree(args: &CheckArgs, dictionary_text: &str, document: Option<&str>) -> anyhow::Result<()> {
    let mode = if args.red_black {
        TreeMode::RedBlack
    } else {
        TreeMode::Bst
    };
    let mut tree = TreeDictionary::new(mode);
    let fill_time = fill(&mut tree, dictionary_text).context("building the dictionary")?;

    match document {
        Some(document) => {
            // --check takes precedence; --print-stats and --dot are ignored
            let mut writer = make_writer(args.use_json);
            let outcome = check_document(&tree, document, writer.as_mut());
            writer.write_report(&CheckReport::new(fill_time, &outcome));
            writer.finish();
        }
        None if args.print_stats => {
            println!("Words  : {}", tree.len());
            println!("Height : {}", tree.height());
        }
        None if args.dot => {
            let stdout = io::stdout();
            dot::write_dot(&tree, &mut stdout.lock()).context("writing DOT graph")?;
        }
        None => {
            tree.inorder(|word, frequency| println!("{:>5} {}", frequency, word));
        }
    }

    Ok(())
}

fn run_hash(args: &CheckArgs, dictionary_text: &str, document: Option<&str>) -> anyhow::Result<()> {
    let strategy = if args.double_hashing {
        ProbeStrategy::DoubleHashing
    } else {
        ProbeStrategy::LinearProbing
    };
    let mut table = HashDictionary::new(args.table_size, strategy);
    let fill_time = fill(&mut table, dictionary_text).context("building the dictionary")?;

    if args.print_table {
        let stderr = io::stderr();
        table
            .print_entire_table(&mut stderr.lock())
            .context("dumping the table")?;
    }

    match document {
        Some(document) => {
            // --check takes precedence; --print-stats is ignored
            let mut writer = make_writer(args.use_json);
            let outcome = check_document(&table, document, writer.as_mut());
            writer.write_report(&CheckReport::new(fill_time, &outcome));
            writer.finish();
        }
        None if args.print_stats => {
            let stdout = io::stdout();
            table
                .print_stats(&mut stdout.lock(), args.segments)
                .context("writing table statistics")?;
        }
        None => {
            for (word, frequency) in table.iter() {
                println!("{:>5} {}", frequency, word);
            }
        }
    }

    Ok(())
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    let dictionary_text = read_input(args.dictionary.as_deref())?;
    let document = match args.check.as_deref() {
        Some(path) => Some(
            fs::read_to_string(path).with_context(|| format!("can't read {}", path.display()))?,
        ),
        None => None,
    };

    if args.tree || args.red_black {
        run_tree(&args, &dictionary_text, document.as_deref())
    } else {
        run_hash(&args, &dictionary_text, document.as_deref())
    }
}

fn tokenize(args: TokenizeArgs) -> anyhow::Result<()> {
    let inputs: String = if args.inputs.is_empty() {
        eprintln!("Reading from stdin...");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("reading stdin")?;
        buffer
    } else {
        args.inputs.join(" ")
    };

    for (index, word) in inputs.word_indices() {
        println!("{:>4}: \"{}\"", index, word);
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse_args_default_or_exit();

    match args.command {
        None => Ok(()),
        Some(Command::Check(args)) => run_check(args),
        Some(Command::Tokenize(args)) => tokenize(args),
    }
}
