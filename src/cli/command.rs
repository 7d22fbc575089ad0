//! Custom command management

use anyhow::{Result, bail};

use hark::config::Config;
use hark::store::CommandStore;
use hark::{ActionDescriptor, CatalogueEntry, Locale, MatchPolicy};

/// Build the action from whichever `add` flag was given
pub fn action_from_args(
    speak: Option<String>,
    launch: Option<String>,
    url: Option<String>,
    intent: Option<String>,
) -> Result<ActionDescriptor> {
    let action = match (speak, launch, url, intent) {
        (Some(response), None, None, None) => ActionDescriptor::Speak { response },
        (None, Some(package), None, None) => ActionDescriptor::LaunchApplication { package },
        (None, None, Some(url), None) => ActionDescriptor::OpenUrl { url },
        (None, None, None, Some(action)) => ActionDescriptor::Intent {
            action,
            extras: Default::default(),
        },
        _ => bail!("Give exactly one of --speak, --launch, --url or --intent"),
    };
    Ok(action)
}

pub async fn add_command(
    config: &Config,
    keyphrase: String,
    policy: &str,
    action: ActionDescriptor,
    locale: Option<String>,
) -> Result<()> {
    let policy: MatchPolicy = policy.parse()?;
    if policy == MatchPolicy::Custom {
        hark::resolve::compile_custom(keyphrase.trim())?;
    }

    let locale = locale
        .map(Locale::new)
        .unwrap_or_else(|| config.resolver.locale());
    let entry = CatalogueEntry::new(keyphrase, policy, &action, locale)?;

    let store = CommandStore::open(&config.store_path())?;
    let id = store.insert(&entry)?;
    println!("Added #{} \"{}\" [{}] -> {}", id, entry.keyphrase.trim(), policy, action.summary());

    Ok(())
}

pub async fn remove_command(config: &Config, id: i64) -> Result<()> {
    let store = CommandStore::open(&config.store_path())?;
    if !store.delete(id)? {
        bail!("No custom command with id {}", id);
    }
    println!("Removed #{}", id);
    Ok(())
}

pub async fn list_command(config: &Config, locale: Option<String>) -> Result<()> {
    let store = CommandStore::open(&config.store_path())?;
    let locale = locale.map(Locale::new);
    let entries: Vec<CatalogueEntry> = store
        .load_all()?
        .into_iter()
        .filter(|e| {
            locale
                .as_ref()
                .is_none_or(|l| l.language() == e.locale.language())
        })
        .collect();

    if entries.is_empty() {
        println!("No custom commands found.");
        return Ok(());
    }

    println!("Custom commands ({}):\n", entries.len());
    for entry in entries {
        let action = entry
            .action()
            .map(|a| a.summary())
            .unwrap_or_else(|e| format!("<unreadable: {}>", e));
        println!(
            "  #{} [{}] ({}) \"{}\" -> {}",
            entry.id, entry.policy, entry.locale, entry.keyphrase, action
        );
    }

    Ok(())
}
