use tally_config::Config;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change client preferences",
        "config [show|set <key> <value>]",
        cmd_config,
    )]
}

/// Keys read once when the controller and store are built.
const RESTART_KEYS: [&str; 2] = ["api_base_url", "balance_source"];

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_ascii_lowercase()).as_deref() {
        None | Some("show") => show_config(context),
        Some("set") => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    Config::KEYS.join("|")
                )));
            }
            set_config_value(context, args[1], args[2..].join(" ").trim())
        }
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; use `show` or `set`"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output_section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {:<16} = {}", key, value));
    }
    io::print_info(format!(
        "  Stored in {}",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let key = key.to_ascii_lowercase();
    let mut updated = context.config.clone();
    updated.set(&key, value)?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    io::apply_config(&context.config);

    tracing::info!(%key, "configuration updated");
    io::print_success(format!("Set {key}."));
    if RESTART_KEYS.contains(&key.as_str()) {
        io::print_hint(format!("Restart tally for `{key}` to take effect."));
    }
    Ok(())
}
