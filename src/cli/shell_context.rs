use dialoguer::theme::ColorfulTheme;
use tally_config::{Config, ConfigManager};
use tokio::runtime::Runtime;

use crate::controller::FormController;

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Everything a command handler can reach.
///
/// The shell is synchronous; `runtime` is a current-thread runtime that
/// drives one controller future per command.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub controller: FormController,
    pub runtime: Runtime,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub last_command: Option<String>,
    pub running: bool,
}
