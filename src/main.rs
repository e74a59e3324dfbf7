use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use field_backfill::rule::{ANCHOR_FIELD, INDENT, INSERTED_FIELD};
use field_backfill::{Patcher, SubstitutionRule};
use similar::{ChangeTag, TextDiff};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "field-backfill")]
#[command(about = "Insert missing struct-field initializers into generated test sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Test source file to patch in place
    #[arg(default_value = "tests/operations_tests.rs")]
    file: PathBuf,

    /// Field whose initializer lines anchor the insertion
    #[arg(long, default_value = ANCHOR_FIELD)]
    field: String,

    /// Value tokens that qualify an anchor line for patching
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "None,config,interleave_config,deinterleave_config"
    )]
    values: Vec<String>,

    /// Line to insert after each qualifying anchor (without indentation)
    #[arg(long, default_value = INSERTED_FIELD)]
    insert: String,

    /// Leading spaces on the inserted line
    #[arg(long, default_value_t = INDENT)]
    indent: usize,

    /// Dry run - show what would change without modifying the file
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Show unified diff of changes
    #[arg(short, long)]
    diff: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let rule = SubstitutionRule::new(&cli.field, &cli.values, &cli.insert, cli.indent)?;
    let patcher = Patcher::new(&cli.file, rule);

    if cli.dry_run || cli.diff {
        let (original, rewrite) = patcher.preview()?;

        if cli.diff && rewrite.changed() {
            display_diff(&cli.file, &original, &rewrite.text);
        }

        if cli.dry_run {
            println!(
                "{}",
                format!(
                    "[dry run] {} insertion(s) in {}",
                    rewrite.insertions,
                    cli.file.display()
                )
                .cyan()
            );
            return Ok(());
        }
    }

    let outcome = patcher.apply()?;

    // The confirmation is unconditional: zero matches still counts as an
    // up-to-date file.
    println!(
        "Updated {} with {} fields",
        outcome.file().display(),
        inserted_field_name(&cli.insert)
    );

    Ok(())
}

/// Field name of the inserted line, for the confirmation message.
fn inserted_field_name(insert: &str) -> &str {
    insert.split(':').next().unwrap_or(insert).trim()
}

/// Helper: Show unified diff between original and modified content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (patched)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}
