//! fltree-gen: CLI tool for compiling filter lists to the binary format.

use clap::{Parser, Subcommand};
use fltree::binary::{self, read_header};
use fltree::parser::FilterListParser;
use fltree::{generator, RuleNode};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fltree-gen")]
#[command(version)]
#[command(about = "Compile adblock filter lists to compact binary files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a filter list text file and write the binary form
    Compile {
        /// Input filter list text file
        #[arg(short, long)]
        input: PathBuf,

        /// Output binary file
        #[arg(short, long)]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Read a binary file and regenerate the filter list text
    Decompile {
        /// Input binary file
        #[arg(short, long)]
        input: PathBuf,

        /// Output text file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dump the rule tree as JSON instead of filter list text
        #[arg(short, long)]
        json: bool,
    },

    /// Print header and rule statistics of a binary file
    Inspect {
        /// Input binary file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            input,
            output,
            verbose,
        } => compile(&input, &output, verbose),
        Commands::Decompile {
            input,
            output,
            json,
        } => decompile(&input, output.as_deref(), json),
        Commands::Inspect { input } => inspect(&input),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compile(
    input: &PathBuf,
    output: &PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Reading input file: {:?}", input);
    }

    let text = fs::read_to_string(input)?;
    let list = FilterListParser::parse(&text);

    if verbose {
        let invalid = list
            .children
            .iter()
            .filter(|r| matches!(r, RuleNode::Invalid(_)))
            .count();
        println!("Parsed {} rules ({} invalid)", list.children.len(), invalid);
    }

    let data = binary::write_filter_list_file(&list)?;
    fs::write(output, &data)?;

    if verbose {
        println!(
            "Wrote {:?}: {} bytes from {} bytes of text",
            output,
            data.len(),
            text.len()
        );
    }
    Ok(())
}

fn decompile(
    input: &PathBuf,
    output: Option<&std::path::Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let list = binary::open_filter_list(input)?;
    let text = if json {
        serde_json::to_string_pretty(&list)?
    } else {
        generator::generate_filter_list(&list)
    };

    match output {
        Some(path) => fs::write(path, text)?,
        None => println!("{}", text),
    }
    Ok(())
}

fn inspect(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let header = read_header(&data)?;

    println!("Format version: {}", header.version);
    println!("Flags:          {:?}", header.format_flags());
    println!("Timestamp:      {}", header.timestamp);
    println!("Rule count:     {}", header.rule_count);
    println!("Payload bytes:  {}", data.len().saturating_sub(binary::HEADER_SIZE));

    let list = binary::read_filter_list_file(&data)?;
    let mut comments = 0usize;
    let mut network = 0usize;
    let mut cosmetic = 0usize;
    let mut hosts = 0usize;
    let mut invalid = 0usize;
    let mut empty = 0usize;
    for rule in &list.children {
        match rule {
            RuleNode::Comment(_) => comments += 1,
            RuleNode::Network(_) => network += 1,
            RuleNode::Cosmetic(_) => cosmetic += 1,
            RuleNode::Host(_) => hosts += 1,
            RuleNode::Invalid(_) => invalid += 1,
            RuleNode::Empty(_) => empty += 1,
        }
    }
    println!(
        "Rules:          {} network, {} cosmetic, {} hosts, {} comments, {} empty, {} invalid",
        network, cosmetic, hosts, comments, empty, invalid
    );
    Ok(())
}
