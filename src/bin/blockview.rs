//! Print structural views of an analysed document as JSON.
//!
//! Usage:
//!   blockview <document.json> <lines|pairs|tables|entities|search|count> [--page N] [--query Q] [--service S]
//!
//! Without `--page` the whole document is processed. `entities` reads the
//! `comprehend` artifact unless `--service` names another one.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use blockview::graph::BlockGraph;
use blockview::model::{Document, NlpService};
use blockview::search::{match_document, match_words, query_patterns};
use blockview::views::{
    count_key_value_pairs, document_entity_groups, document_key_value_pairs, document_lines,
    document_tables, page_entity_groups, page_key_value_pairs, page_lines, page_tables,
};

const USAGE: &str = "Usage: blockview <document.json> <lines|pairs|tables|entities|search|count> \
                     [--page N] [--query Q] [--service S]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Lines,
    Pairs,
    Tables,
    Entities,
    Search,
    Count,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "lines" => Some(Self::Lines),
            "pairs" => Some(Self::Pairs),
            "tables" => Some(Self::Tables),
            "entities" => Some(Self::Entities),
            "search" => Some(Self::Search),
            "count" => Some(Self::Count),
            _ => None,
        }
    }
}

struct CliConfig {
    document: PathBuf,
    command: Command,
    page: Option<u32>,
    query: String,
    service: NlpService,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut page = None;
        let mut query = String::new();
        let mut service = NlpService::Comprehend;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--page" | "-p" => {
                    i += 1;
                    let value = args.get(i).ok_or("--page needs a value")?;
                    page = Some(value.parse::<u32>().map_err(|e| format!("invalid page '{}': {}", value, e))?);
                },
                "--query" | "-q" => {
                    i += 1;
                    query = args.get(i).ok_or("--query needs a value")?.clone();
                },
                "--service" | "-s" => {
                    i += 1;
                    let value = args.get(i).ok_or("--service needs a value")?;
                    service = value.parse().map_err(|e| format!("{}", e))?;
                },
                "--help" | "-h" => return Err(USAGE.to_string()),
                other => positional.push(other.to_string()),
            }
            i += 1;
        }

        let [document, command] = positional.as_slice() else {
            return Err(USAGE.to_string());
        };
        let command = Command::parse(command).ok_or_else(|| format!("unknown command '{}'\n{}", command, USAGE))?;

        Ok(Self {
            document: PathBuf::from(document),
            command,
            page,
            query,
            service,
        })
    }
}

fn run(config: &CliConfig) -> blockview::Result<String> {
    let file = File::open(&config.document)?;
    let doc = Document::from_reader(BufReader::new(file))?;
    let graph = BlockGraph::build(&doc)?;
    log::debug!(
        "Loaded '{}' ({} pages, {} blocks)",
        doc.id,
        graph.page_count(),
        graph.index().len()
    );

    let json = match (config.command, config.page) {
        (Command::Lines, Some(page)) => serde_json::to_string_pretty(&page_lines(&graph, page))?,
        (Command::Lines, None) => serde_json::to_string_pretty(&document_lines(&graph))?,
        (Command::Pairs, Some(page)) => serde_json::to_string_pretty(&page_key_value_pairs(&graph, page))?,
        (Command::Pairs, None) => serde_json::to_string_pretty(&document_key_value_pairs(&graph))?,
        (Command::Tables, Some(page)) => serde_json::to_string_pretty(&page_tables(&graph, page))?,
        (Command::Tables, None) => serde_json::to_string_pretty(&document_tables(&graph))?,
        (Command::Entities, Some(page)) => {
            serde_json::to_string_pretty(&page_entity_groups(&graph, page, config.service))?
        },
        (Command::Entities, None) => serde_json::to_string_pretty(&document_entity_groups(&graph, config.service))?,
        (Command::Search, page) => {
            let patterns = query_patterns(&config.query)?;
            match page {
                Some(page) => serde_json::to_string_pretty(&match_words(&graph, page, &patterns))?,
                None => serde_json::to_string_pretty(&match_document(&graph, &patterns))?,
            }
        },
        (Command::Count, _) => serde_json::to_string_pretty(&serde_json::json!({
            "pages": graph.page_count(),
            "keyValuePairs": count_key_value_pairs(&graph),
        }))?,
    };
    Ok(json)
}

fn main() {
    env_logger::init();

    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        },
    };

    match run(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
