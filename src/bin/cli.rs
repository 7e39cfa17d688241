use anyhow::{bail, Context, Result};
use clap::Parser;
use odds_distribution::data::{
    load_lines, save_analysis_to_json, save_issues_to_csv, save_ranges_to_csv,
};
use odds_distribution::{analyze, Line, Severity};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Turn sportsbook Over/Under lines into a distribution over outcomes
#[derive(Debug, Parser)]
#[command(name = "cli", version)]
struct Args {
    /// Lines such as "Over 28.5 @ -110"
    lines: Vec<String>,

    /// JSON or CSV file of lines
    #[arg(short, long, env = "LINES_FILE")]
    file: Option<PathBuf>,

    /// Write ranges.csv and issues.csv to the output directory
    #[arg(long, env = "SAVE_CSV")]
    save_csv: bool,

    /// Write analysis.json to the output directory
    #[arg(long, env = "OUTPUT_JSON")]
    json: bool,

    #[arg(short, long, env = "OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut lines: Vec<Line> = Vec::new();
    if let Some(path) = &args.file {
        lines.extend(load_lines(path)?);
    }
    for text in &args.lines {
        let line: Line = text
            .parse()
            .with_context(|| format!("Invalid line '{}'", text))?;
        lines.push(line);
    }

    if lines.is_empty() {
        bail!("No lines given; pass lines like \"Over 28.5 @ -110\" or use --file");
    }

    let analysis = analyze(&lines);

    println!("Odds Distribution\n");
    println!("LINES\n");
    for line in &analysis.lines {
        println!("  {}", line);
    }

    println!("\nNORMALIZED THRESHOLDS\n");
    for normalized in &analysis.normalized {
        println!(
            "  P(over {}) = {:.2}%",
            normalized.threshold,
            normalized.over_probability * 100.0
        );
    }

    println!("\nOUTCOME DISTRIBUTION\n");
    for (i, range) in analysis.ranges.iter().enumerate() {
        let fair_odds = range
            .fair_odds()
            .map(|odds| format!("{:+}", odds))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{}. {:>8} | {:>7.2}% | Fair: {}",
            i + 1,
            range.label,
            range.probability * 100.0,
            fair_odds
        );
    }
    println!("\nTotal: {:.2}%", analysis.total_probability * 100.0);

    println!("\nVALIDATION\n");
    if analysis.validation.issues.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &analysis.validation.issues {
            let marker = match issue.severity {
                Severity::Error => "❌",
                Severity::Warning => "⚠️ ",
                Severity::Info => "ℹ️ ",
            };
            println!("{} [{}] {}", marker, issue.kind, issue.message);
        }
    }
    if !analysis.validation.is_valid {
        println!("\nThese lines are mathematically inconsistent.");
    }

    if args.save_csv || args.json {
        std::fs::create_dir_all(&args.output_dir)
            .with_context(|| format!("Failed to create {:?}", args.output_dir))?;
    }

    if args.save_csv {
        let ranges_file = args.output_dir.join("ranges.csv");
        save_ranges_to_csv(&analysis.ranges, &ranges_file)?;
        println!("\nSaved outcome ranges to {}", ranges_file.display());

        let issues_file = args.output_dir.join("issues.csv");
        save_issues_to_csv(&analysis.validation.issues, &issues_file)?;
        println!("Saved validation issues to {}", issues_file.display());
    }

    if args.json {
        let json_file = args.output_dir.join("analysis.json");
        save_analysis_to_json(&analysis, &json_file)?;
        println!("\nSaved analysis to {}", json_file.display());
    }

    Ok(())
}
