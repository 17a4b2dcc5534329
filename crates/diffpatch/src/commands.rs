use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use diffpatch::delta::to_delta;
use diffpatch::encoding::encode;
use diffpatch::{Config, Diff, Patch};
use log::{debug, info, warn};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = cli.tuning.config().context("Invalid tuning options")?;
    debug!("Using {:?}", config);
    match cli.command {
        Command::Diff(args) => cmd_diff(args, config),
        Command::Make(args) => cmd_make(args, config),
        Command::Apply(args) => cmd_apply(args, config),
        Command::Delta(args) => cmd_delta(args, config),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn cmd_diff(args: DiffArgs, config: Config) -> anyhow::Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let mut diffs = Diff::with_config(&old, &new, config)
        .check_lines(!args.no_line_mode)
        .compare();
    info!("{} spans between {} and {}", diffs.len(), args.old.display(), args.new.display());

    if args.html {
        Diff::assign_indices(&mut diffs);
        println!("{}", Diff::pretty_html(&diffs));
    } else {
        for diff in &diffs {
            println!("{}{}", diff.edit_type, encode(&diff.text));
        }
    }
    Ok(())
}

fn cmd_make(args: MakeArgs, config: Config) -> anyhow::Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let mut patch = Patch::make(&old, &new, config);
    patch.split_max();
    info!("Patch has {} entries", patch.len());
    print!("{}", patch);
    Ok(())
}

fn cmd_apply(args: ApplyArgs, config: Config) -> anyhow::Result<()> {
    let patch_text = read_text(&args.patch)?;
    let text = read_text(&args.file)?;
    let patch = Patch::from_text(&patch_text)
        .with_context(|| format!("Failed to parse patch {}", args.patch.display()))?
        .with_config(config);

    let applied = patch.apply(&text);
    match &args.output {
        Some(output) => fs::write(output, &applied.text)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => print!("{}", applied.text),
    }

    let failed = applied.failed_entries();
    for i in &failed {
        warn!("Patch entry {} did not apply", i);
        eprintln!("entry {} failed:\n{}", i, patch.entries()[*i]);
    }
    if !failed.is_empty() {
        bail!(
            "{} of {} patch entries failed to apply",
            failed.len(),
            applied.results.len()
        );
    }
    Ok(())
}

fn cmd_delta(args: DeltaArgs, config: Config) -> anyhow::Result<()> {
    let old = read_text(&args.old)?;
    let new = read_text(&args.new)?;
    let diffs = Diff::with_config(&old, &new, config).compare();
    println!("{}", to_delta(&diffs));
    Ok(())
}
