//! sjq: jq-style queries over semi-indexed JSON.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use semidex::jq::Query;
use semidex::json::Document;

#[derive(Debug, Parser)]
#[command(name = "sjq")]
#[command(about = "Query JSON documents without parsing them", long_about = None)]
#[command(version)]
struct Cli {
    /// jq filter to evaluate (e.g. '.users | .[0].name')
    query: String,

    /// Input files; stdin when omitted
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let query = Query::parse(&cli.query)
        .with_context(|| format!("invalid query '{}'", cli.query))?;

    if cli.files.is_empty() {
        let mut src = String::new();
        std::io::stdin()
            .read_to_string(&mut src)
            .context("reading stdin")?;
        run(&query, src, "<stdin>")?;
    } else {
        for path in &cli.files {
            let src = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            run(&query, src, &path.display().to_string())?;
        }
    }

    Ok(())
}

fn run(query: &Query, src: String, name: &str) -> Result<()> {
    let doc = Document::new(src).with_context(|| format!("indexing {}", name))?;
    debug!(
        "{}: indexed {} bytes into {} skeleton nodes",
        name,
        doc.source().len(),
        doc.navigator().len()
    );

    let results = query
        .execute(&doc)
        .with_context(|| format!("querying {}", name))?;
    for value in results {
        let text = value.to_json_text();
        let parsed: serde_json::Value = serde_json::from_str(&text)
            .with_context(|| format!("rendering result '{}'", text))?;
        println!("{}", serde_json::to_string_pretty(&parsed)?);
    }
    Ok(())
}
