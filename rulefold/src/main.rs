mod rewrite;

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;
use rulefold_core::{convert, RenderMode, Tables};
use tracing_subscriber::EnvFilter;

/// Merge and normalize windowrule/layerrule lines of a config file in place
#[derive(FromArgs)]
struct Cli {
    /// config file to rewrite
    #[argh(positional)]
    file: PathBuf,
    /// emit named rule blocks instead of one line per rule
    #[argh(switch)]
    named: bool,
    /// restore the file from its .bak copy and exit
    #[argh(switch)]
    restore: bool,
    /// print the rewritten file instead of writing it
    #[argh(switch)]
    stdout: bool,
    /// print the merged rules as JSON
    #[argh(switch)]
    dump: bool,
}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(&cli)
}

fn render_mode(cli: &Cli) -> RenderMode {
    if cli.named {
        RenderMode::Named
    } else {
        RenderMode::Anonymous
    }
}

fn run(cli: &Cli) -> Result<()> {
    if cli.restore {
        if rewrite::restore(&cli.file)? {
            println!("Restored {}", cli.file.display());
        } else {
            println!(
                "No backup found: {}",
                rewrite::backup_path(&cli.file).display()
            );
        }
        return Ok(());
    }

    let tables = Tables::builtin();
    let content = rewrite::read(&cli.file)?;
    let conversion = convert(&content, &tables, render_mode(cli))?;

    if conversion.rules.window.is_empty() && conversion.rules.layer.is_empty() {
        tracing::warn!("No rules found in {}", cli.file.display());
    }

    if cli.dump {
        println!("{}", serde_json::to_string_pretty(&conversion.rules)?);
    }

    if cli.stdout {
        print!("{}", conversion.output);
        return Ok(());
    }

    let backup = rewrite::write_with_backup(&cli.file, &conversion.output)?;
    println!(
        "Rewrote {} ({} window rules, {} layer rules), backup at {}",
        cli.file.display(),
        conversion.rules.window.len(),
        conversion.rules.layer.len(),
        backup.display()
    );
    Ok(())
}
