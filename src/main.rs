//! # chatlog CLI
//!
//! Command-line interface for the chatlog library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chatlog::cli::Args;
use chatlog::{ChatlogError, Message};
use chatlog::config::PipelineConfig;
use chatlog::core::ProcessingStats;
use chatlog::core::merge::merge_sources;
use chatlog::core::processor::collate_consecutive;
use chatlog::format::write_to_format;
use chatlog::parser::InputFormat;
use chatlog::pipeline::{InputFile, output_config, parse_input, read_inputs, read_style};

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(args: &Args) -> Result<(), ChatlogError> {
    let total_start = Instant::now();
    let config = args.pipeline_config();
    let format = args.output_format();

    // Print header
    println!("💬 chatlog v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for input in &args.inputs {
        println!("📂 Input:   {}", input.display());
    }
    println!("💾 Output:  {}", args.output.display());
    println!("📄 Format:  {}", format);
    if let Some(style) = &args.style {
        println!("🎨 Style:   {}", style.display());
    }
    println!();

    // Step 1: Read everything before producing any output
    let inputs = read_inputs(args.inputs.as_slice())?;
    let css = read_style(args.style.as_deref())?;

    // Step 2: Parse each input
    println!("⏳ Parsing {} file(s)...", inputs.len());
    let parse_start = Instant::now();
    let sources = inputs
        .iter()
        .map(|input| parse_reporting(input, &config))
        .collect::<Result<Vec<_>, _>>()?;
    let original_count: usize = sources.iter().map(Vec::len).sum();
    println!(
        "   Found {} messages ({:.2}s)",
        original_count,
        parse_start.elapsed().as_secs_f64()
    );

    // Step 3: Merge and deduplicate
    println!("🔀 Merging into one timeline...");
    let merged = merge_sources(sources, &config.merge);
    println!(
        "   {} messages after dropping {} duplicates",
        merged.len(),
        original_count - merged.len()
    );
    let merged_count = merged.len();

    // Step 4: Collate (optional)
    let final_messages = if config.collate {
        println!("🧩 Collating consecutive messages...");
        let collated = collate_consecutive(&merged);
        println!(
            "   Compressed to {} entries ({:.1}% reduction)",
            collated.len(),
            ProcessingStats::new(merged_count, collated.len()).compression_ratio()
        );
        collated
    } else {
        merged
    };

    // Step 5: Write output in selected format
    println!("💾 Writing {}...", format);
    let write_start = Instant::now();
    write_to_format(
        &final_messages,
        &args.output,
        format,
        &output_config(&inputs, &config, &css),
    )?;
    println!("   Written in {:.2}s", write_start.elapsed().as_secs_f64());

    println!();
    println!("✅ Done! Output saved to {}", args.output.display());

    // Summary
    println!();
    println!("📊 Summary:");
    println!("   Parsed:    {} messages", original_count);
    println!("   Merged:    {} messages", merged_count);
    println!("   Final:     {} entries", final_messages.len());
    println!("   Time:      {:.2}s", total_start.elapsed().as_secs_f64());

    Ok(())
}

/// Parses one input and prints which parser handled it.
fn parse_reporting(input: &InputFile, config: &PipelineConfig) -> Result<Vec<Message>, ChatlogError> {
    let messages = parse_input(input, config)?;

    match config
        .input_format
        .or_else(|| InputFormat::detect(&input.content))
    {
        Some(format) => println!(
            "   {} ({}): {} messages",
            input.display_name(),
            format,
            messages.len()
        ),
        None => println!("   {}: empty", input.display_name()),
    }
    Ok(messages)
}
