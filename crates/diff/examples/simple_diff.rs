use anyhow::Result;
use diffpatch::delta::to_delta;
use diffpatch::{levenshtein_distance, Config, Diff, EditType};

fn main() -> Result<()> {
    // Two sample texts to compare
    let text1 = "This is the first line.\nHere is the second line.\nAnd the third line.";
    let text2 = "This is the first line.\nThis is a completely different second line.\nAnd the third line.\nPlus a new fourth line.";

    let config = Config::default();
    config.validate()?;

    // Generate the edit script
    let mut diffs = Diff::with_config(text1, text2, config).compare();
    Diff::assign_indices(&mut diffs);

    println!("Edit script:");
    for diff in &diffs {
        let colour = match diff.edit_type {
            EditType::Delete => "\x1b[31m",
            EditType::Insert => "\x1b[32m",
            EditType::Equal => "\x1b[37m",
        };
        println!(
            "  {}{} {:?}\x1b[0m (at {})",
            colour,
            diff.edit_type.symbol(),
            diff.text,
            diff.index.unwrap_or_default()
        );
    }

    // Print diff statistics
    println!("\nDiff statistics:");
    println!("  Spans: {}", diffs.len());
    println!("  Script distance: {}", Diff::levenshtein(&diffs));
    println!("  Levenshtein distance: {}", levenshtein_distance(text1, text2));
    println!("  Delta: {}", to_delta(&diffs));

    println!("\nHTML:");
    println!("{}", Diff::pretty_html(&diffs));

    Ok(())
}
