use std::env;
use std::process;

use anyhow::{anyhow, Context};
use tracing_subscriber::EnvFilter;

use qa_bot::{Chatbot, EngineKind};
use qa_core::config::Config;
use qa_text::LexicalEngine;

const USAGE: &str = "Usage: qa-cli <ask|search|stats> [options] [question]\n\
  ask    [--engine lexical|semantic] <question>\n\
  search [--top-k N] <question>\n\
  stats  [--engine lexical|semantic]";

struct Args {
    cmd: String,
    engine: EngineKind,
    top_k: usize,
    question: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = env::args().skip(1);
    let cmd = args.next().ok_or_else(|| anyhow!("missing command"))?;
    let mut engine = EngineKind::Lexical;
    let mut top_k = 3;
    let mut words = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--engine" | "-e" => {
                engine = args.next().ok_or_else(|| anyhow!("--engine needs a value"))?.parse()?;
            }
            "--top-k" | "-k" => {
                let v = args.next().ok_or_else(|| anyhow!("--top-k needs a value"))?;
                top_k = v.parse().with_context(|| format!("invalid --top-k '{v}'"))?;
            }
            _ => words.push(arg),
        }
    }
    Ok(Args { cmd, engine, top_k, question: words.join(" ") })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}\n{USAGE}");
            process::exit(1);
        }
    };
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {e:#}");
        e
    })?;
    let settings = config.settings()?;
    let corpus_path = config.corpus_path()?;

    match args.cmd.as_str() {
        "ask" => {
            if args.question.trim().is_empty() {
                eprintln!("{USAGE}");
                process::exit(1);
            }
            let bot = Chatbot::build(args.engine, &settings, &corpus_path)?;
            let reply = bot.reply(&args.question)?;
            println!("{}", reply.text);
        }
        "search" => {
            if args.question.trim().is_empty() {
                eprintln!("{USAGE}");
                process::exit(1);
            }
            let mut engine = LexicalEngine::new(settings.lexical.clone())?;
            engine.load_path(&corpus_path)?;
            engine.train()?;
            let hits = engine.find(&args.question, args.top_k)?;
            println!("🔍 Found {} matches for: \"{}\"", hits.len(), args.question);
            for (i, hit) in hits.iter().enumerate() {
                println!("\n  {}. score={:.4}  {}", i + 1, hit.score, hit.matched_question);
                println!("     📝 {}", hit.answer);
            }
        }
        "stats" => {
            let bot = Chatbot::build(args.engine, &settings, &corpus_path)?;
            let stats = bot.stats()?;
            println!("📊 engine={}  questions={}  index={}", stats.engine, stats.questions, stats.index);
            println!("   corpus: {}", corpus_path.display());
        }
        other => {
            eprintln!("Unknown command: {other}\n{USAGE}");
            process::exit(1);
        }
    }
    Ok(())
}
