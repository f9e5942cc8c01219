use cuesync::config::Config;
use std::error::Error;

pub fn handle_init() -> Result<(), Box<dyn Error>> {
    if Config::exists()? {
        return Err(
            "cuesync is already initialized. Use 'cuesync config set <key> <value>' to change it."
                .into(),
        );
    }

    let config = Config::new();
    config.save()?;

    println!("cuesync initialized successfully!");
    println!(
        "Configuration saved to: {}",
        Config::config_path()?.display()
    );
    println!("Memo will be kept at: {}", config.resolve_memo_path()?.display());

    Ok(())
}
