use anyhow::Result;
use diffpatch::{Config, Patch};

fn main() -> Result<()> {
    let original = "The quick brown fox jumps over the lazy dog.";
    let edited = "The quick red fox jumps over the very lazy dog.";

    let config = Config::default();
    let mut patch = Patch::make(original, edited, config);
    patch.split_max();

    let stored = patch.to_text();
    println!("Stored patch:\n{}", stored);

    // Someone else edited the text in the meantime.
    let drifted = "Story: The quick brown fox jumps over the lazy dog!";
    let restored: Patch = stored.parse()?;
    let applied = restored.with_config(config).apply(drifted);

    println!("Drifted text: {}", drifted);
    println!("Patched text: {}", applied.text);
    for (i, ok) in applied.results.iter().enumerate() {
        println!("  entry {}: {}", i, if *ok { "applied" } else { "failed" });
    }

    Ok(())
}
