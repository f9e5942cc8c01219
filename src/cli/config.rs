use cuesync::config::Config;
use std::error::Error;
use std::process::Command;

fn or_default(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(default)")
}

pub fn handle_config_view() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;

    println!("Current cuesync configuration:");
    println!("  catalog_path: {}", or_default(&config.catalog_path));
    println!("  memo_path: {}", or_default(&config.memo_path));
    println!("  extensions: {}", config.extensions.join(","));
    println!("  shared_remote: {}", config.shared_remote);
    println!("  shared_branch: {}", config.shared_branch);
    println!("  shared_file: {}", config.shared_file);
    println!("  log_file: {}", or_default(&config.log_file));
    println!("Memo file: {}", config.resolve_memo_path()?.display());

    Ok(())
}

pub fn handle_config_set(key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load()?;

    config.set_value(key, value)?;
    config.save()?;

    println!("Configuration updated: {key} = {value}");

    Ok(())
}

pub fn handle_config_edit() -> Result<(), Box<dyn Error>> {
    if !Config::exists()? {
        return Err("cuesync not initialized. Run 'cuesync init' first.".into());
    }

    let config_path = Config::config_path()?;
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    println!("Opening {} in {}", config_path.display(), editor);

    let status = Command::new(&editor)
        .arg(&config_path)
        .status()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                format!("Editor '{editor}' not found. Set $EDITOR to a valid editor path.")
            } else {
                format!("Failed to launch editor '{editor}': {e}")
            }
        })?;

    if !status.success() {
        return Err(format!("Editor '{editor}' exited with error").into());
    }

    // Validate the config after editing
    match Config::load() {
        Ok(_) => println!("Configuration saved successfully"),
        Err(e) => {
            return Err(format!("Configuration validation failed: {e}").into());
        }
    }

    Ok(())
}
