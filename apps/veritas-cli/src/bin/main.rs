use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use veritas_core::chunker::ChunkingConfig;
use veritas_core::config::Config;
use veritas_core::source::FileSource;
use veritas_core::types::{Answer, SearchType, DEFAULT_K};
use veritas_embed::get_default_embedder;
use veritas_llm::get_default_generator;
use veritas_rag::PolicyAnalyzer;

const SOURCES_SHOWN: usize = 3;
const PREVIEW_CHARS: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "veritas", about = "Veritas Policy Analyzer: ask questions about company policies")]
struct Args {
    /// Policy file or directory of .txt files (default: data.policy_file from config)
    #[arg(long)]
    policy_file: Option<String>,
    /// Characters per chunk
    #[arg(long)]
    chunk_size: Option<usize>,
    /// Characters shared by consecutive chunks
    #[arg(long)]
    chunk_overlap: Option<usize>,
}

/// Search settings for the current chat session.
#[derive(Debug, Clone, Copy)]
struct SearchChoice {
    search_type: SearchType,
    k: usize,
    score_threshold: Option<f32>,
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════╗
    ║              VERITAS POLICY ANALYZER         ║
    ║         AI-Powered Policy Assistant          ║
    ╚══════════════════════════════════════════════╝
"#
    );
}

fn print_help() {
    println!("Commands:");
    println!("  config, settings   choose search method, result count and threshold");
    println!("  help               show this message");
    println!("  quit, exit, q      leave");
    println!("Anything else is asked as a question about the loaded policies.");
}

/// Prints `message` and reads one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, message: &str) -> io::Result<Option<String>> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn ask_search_choice(input: &mut impl BufRead) -> io::Result<Option<SearchChoice>> {
    println!("\n🔍 Search Configuration:");
    println!("1. Similarity Search");
    println!("2. MMR Search (Maximal Marginal Relevance)");

    let search_type = loop {
        match prompt(input, "Choose search method (1 or 2): ")?.as_deref() {
            None => return Ok(None),
            Some("1") => break SearchType::Similarity,
            Some("2") => break SearchType::Mmr,
            Some(_) => println!("Please enter 1 or 2"),
        }
    };

    let k = loop {
        let Some(answer) = prompt(input, &format!("Number of results to retrieve (default: {DEFAULT_K}): "))? else { return Ok(None) };
        if answer.is_empty() {
            break DEFAULT_K;
        }
        match answer.parse::<usize>() {
            Ok(k) if k > 0 => break k,
            Ok(_) => println!("Please enter a positive number"),
            Err(_) => println!("Please enter a valid number"),
        }
    };

    let mut score_threshold = None;
    if search_type == SearchType::Similarity {
        loop {
            let Some(answer) = prompt(input, "Similarity threshold (0.0-1.0, Enter for no threshold): ")? else { return Ok(None) };
            if answer.is_empty() {
                break;
            }
            match answer.parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => {
                    score_threshold = Some(t);
                    break;
                }
                Ok(_) => println!("Please enter a value between 0.0 and 1.0"),
                Err(_) => println!("Please enter a valid number"),
            }
        }
    }
    Ok(Some(SearchChoice { search_type, k, score_threshold }))
}

fn preview(content: &str) -> String {
    let mut s: String = content.chars().take(PREVIEW_CHARS).collect();
    if content.chars().count() > PREVIEW_CHARS {
        s.push_str("...");
    }
    s
}

fn print_answer(answer: &Answer, choice: &SearchChoice) {
    println!("\n✅ Answer:");
    println!("   {}", answer.answer);

    if !answer.sources.is_empty() {
        println!("\n📚 Sources (using {} search):", answer.search_type);
        for source in answer.sources.iter().take(SOURCES_SHOWN) {
            println!("   {}. {}", source.rank, preview(&source.content));
            if let Some(score) = source.score {
                println!("      Score: {score:.3}");
            }
        }
    }

    let mut line = format!("\n⚙️  Search: {} | Results: {}", choice.search_type, choice.k);
    if let Some(t) = choice.score_threshold {
        line.push_str(&format!(" | Threshold: {t}"));
    }
    println!("{line}");
}

fn chat_loop(analyzer: &PolicyAnalyzer, mut choice: SearchChoice) -> io::Result<()> {
    println!("\n💬 Chat with Veritas! Type 'quit' to exit, 'config' to change search settings, 'help' for commands");
    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        let Some(query) = prompt(&mut input, "\n❓ Your question: ")? else { break };
        match query.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "config" | "settings" => {
                match ask_search_choice(&mut input)? {
                    Some(c) => choice = c,
                    None => break,
                }
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            "" => continue,
            _ => {}
        }

        println!("🤔 Analyzing...");
        let result = analyzer
            .query_config(choice.search_type, choice.k, choice.score_threshold)
            .and_then(|config| analyzer.ask(&query, &config));
        match result {
            Ok(answer) => print_answer(&answer, &choice),
            Err(e) => {
                tracing::error!(error = %e, "question failed");
                println!("❌ Error: {e}");
            }
        }
    }
    println!("👋 Thank you for using Veritas!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {e:#}"); e })?;
    let mut settings = config.settings().map_err(|e| { eprintln!("Invalid configuration: {e:#}"); e })?;
    if let Some(policy_file) = args.policy_file {
        settings.data.policy_file = policy_file;
    }
    settings.chunking = ChunkingConfig::new(
        args.chunk_size.unwrap_or(settings.chunking.chunk_size),
        args.chunk_overlap.unwrap_or(settings.chunking.chunk_overlap),
    )?;

    print_banner();
    println!("🔄 Initializing Veritas Policy Analyzer...");
    let embedder = get_default_embedder(&settings.embedding)?;
    let generator = get_default_generator(&settings.generation)?;
    let mut analyzer = PolicyAnalyzer::from_settings(&settings, embedder, generator, Box::new(FileSource::new()));

    let policy_file = settings.data.policy_file.clone();
    match analyzer.load_policies(&policy_file) {
        Ok(chunks) => println!("✅ Loaded {} policy chunks from '{policy_file}'", chunks.len()),
        Err(e) => {
            eprintln!("❌ Error initializing analyzer: {e}");
            eprintln!("Please make sure the file exists or provide the correct path with --policy-file.");
            std::process::exit(1);
        }
    }

    let retrieval = settings.retrieval;
    let choice = SearchChoice { search_type: retrieval.search_type, k: retrieval.k, score_threshold: retrieval.score_threshold };
    chat_loop(&analyzer, choice)?;
    Ok(())
}
