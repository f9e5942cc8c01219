use super::{absolute_root, catalog_path_for};
use cuesync::catalog::xml;
use cuesync::config::Config;
use cuesync::reconcile::{collapse_duplicates, find_duplicates};
use dialoguer::{Confirm, theme::ColorfulTheme};
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_cleandb(
    root: &str,
    catalog: Option<&str>,
    dry_run: bool,
    yes: bool,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let root = absolute_root(root)?;
    let catalog_path = catalog_path_for(&root, catalog, &config)?;

    println!(
        "{} {}",
        "Cleaning catalog:".bright_black(),
        catalog_path.display().to_string().cyan()
    );

    let catalog = xml::load(&catalog_path)?;
    let groups = find_duplicates(&catalog, &root);
    if groups.is_empty() {
        println!("{} No duplicate songs under {}", "✓".green(), root.display());
        return Ok(());
    }

    for group in &groups {
        let (first, rest) = group.split_first().ok_or("empty duplicate group")?;
        println!("  {} {}", "Keeping:".green(), first.file_path);
        for song in rest {
            println!("    {} {}", "merging:".bright_black(), song.file_path.bright_black());
        }
    }

    let (cleaned, removed) = collapse_duplicates(&catalog, &root);
    if dry_run {
        println!(
            "\n{} Would remove {} duplicate songs (dry run, nothing written)",
            "ℹ".blue(),
            removed.to_string().yellow().bold()
        );
        return Ok(());
    }

    let proceed = yes
        || Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Remove {} duplicate songs from {}?",
                removed.to_string().yellow(),
                catalog_path.display()
            ))
            .default(false)
            .interact()?;
    if !proceed {
        println!("{} Catalog left unchanged", "ℹ".blue());
        return Ok(());
    }

    xml::save(&catalog_path, &cleaned)?;
    println!(
        "\n{} Removed {} duplicate songs",
        "✓".green().bold(),
        removed.to_string().yellow().bold()
    );
    Ok(())
}
