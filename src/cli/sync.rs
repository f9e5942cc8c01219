use super::{absolute_root, catalog_path_for};
use cuesync::config::{Config, expand};
use cuesync::error::Error as SyncError;
use cuesync::sync::{self, SyncOptions, SyncReport};
use cuesync::utils::progress::create_progress_spinner;
use cuesync::utils::validation::validate_directory;
use cuesync::vcs::{GitRepository, SharedCatalog, ensure_working_copy};
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_sync(
    root: &str,
    shared: Option<&str>,
    catalog: Option<&str>,
    memo: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let root = absolute_root(root)?;
    validate_directory(&root)?;

    let options = SyncOptions {
        catalog_path: catalog_path_for(&root, catalog, &config)?,
        memo_path: match memo {
            Some(path) => expand(path),
            None => config.resolve_memo_path()?,
        },
        extensions: config.extensions.clone(),
        root,
    };

    let repository = match shared {
        Some(dir) => {
            let dir = expand(dir);
            ensure_working_copy(&dir)?;
            Some(GitRepository {
                dir,
                remote: config.shared_remote.clone(),
                branch: config.shared_branch.clone(),
                file_name: config.shared_file.clone(),
            })
        }
        None => None,
    };

    println!(
        "{} {}",
        "Syncing music in:".bright_black(),
        options.root.display().to_string().cyan()
    );
    println!(
        "  {} {}",
        "Catalog:".bright_black(),
        options.catalog_path.display()
    );
    println!("  {} {}", "Memo:".bright_black(), options.memo_path.display());
    if let Some(repo) = &repository {
        println!("  {} {}", "Shared:".bright_black(), repo.catalog_path().display());
    }

    let spinner = create_progress_spinner("Reconciling catalog, memo and files...");
    let result = sync::run(
        &options,
        repository.as_ref().map(|repo| repo as &dyn SharedCatalog),
    );
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            print_sync_summary(&report, repository.is_some());
            Ok(())
        }
        Err(SyncError::DuplicateSongs { groups, .. }) => {
            eprintln!(
                "{} Found songs sharing a file name and size; nothing was written.",
                "Error:".red().bold()
            );
            for group in &groups {
                eprintln!("  {}", "Duplicates:".yellow());
                for path in group {
                    eprintln!("    {}", path.bright_black());
                }
            }
            Err(format!(
                "{} duplicate group(s) found, run `cuesync cleandb` first",
                groups.len()
            )
            .into())
        }
        Err(e) => Err(e.into()),
    }
}

fn print_sync_summary(report: &SyncReport, shared: bool) {
    println!("\n{} {}", "✓".green().bold(), "Sync complete!".bold());
    println!(
        "  {} {} songs in catalog",
        "Catalog:".bright_black(),
        report.songs.to_string().cyan().bold()
    );
    println!(
        "  {} {} media files found, {} moved",
        "Scanned:".bright_black(),
        report.scanned_files.to_string().cyan(),
        report.paths_rewritten.to_string().yellow().bold()
    );
    if report.duplicates_folded > 0 {
        println!(
            "  {} {} stale entries merged into moved songs",
            "Folded:".bright_black(),
            report.duplicates_folded.to_string().yellow()
        );
    }
    println!(
        "  {} {} merged, {} new",
        "Memo:".bright_black(),
        report.memo_merged.to_string().green(),
        report.memo_added.to_string().green().bold()
    );
    println!(
        "  {} {} merged from memo, {} restored",
        "Songs:".bright_black(),
        report.catalog_merged.to_string().green(),
        report.catalog_added.to_string().green().bold()
    );
    if shared {
        let published = if report.shared_published {
            "pushed".green().to_string()
        } else {
            "no changes".yellow().to_string()
        };
        println!(
            "  {} {} songs added from shared catalog, {}",
            "Shared:".bright_black(),
            report.shared_added.to_string().cyan(),
            published
        );
    }
}
