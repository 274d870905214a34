//! Settings command handler.

use anyhow::{Context, Result};

use crate::cli::SettingsArgs;
use crate::cli::settings::Settings;

pub fn handle_settings(args: &SettingsArgs) -> Result<()> {
    let mut settings = Settings::load()?;
    let mut changed = false;

    if let Some(input) = &args.input {
        settings.input = Some(input.clone());
        changed = true;
    }
    if let Some(volume) = args.volume {
        settings.set_volume(volume);
        changed = true;
    }
    if args.mute {
        settings.mute();
        changed = true;
    }
    if args.restore {
        settings.restore_volume();
        changed = true;
    }
    if let Some(path) = &args.add_collection {
        let path = path
            .canonicalize()
            .with_context(|| format!("not a usable collection root: {}", path.display()))?;
        settings.collections.insert(path);
        changed = true;
    }

    if changed {
        settings.save()?;
    }

    println!("input: {}", settings.input.as_deref().unwrap_or("(none)"));
    println!("volume: {:.2}", settings.volume);
    for collection in &settings.collections {
        println!("collection: {}", collection.display());
    }
    Ok(())
}
