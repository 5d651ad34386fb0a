//! Command dispatch, error reporting and construction of the shell context.

use std::{env, io};

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use tally_config::{Config, ConfigError, ConfigManager};
use tally_store::{
    HttpTransactionStore, MemoryTransactionStore, StoreError, StoreOperation, TransactionStore,
};

use crate::controller::{ControllerError, FormController, Mode};
use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

/// Set to any value to replace the REST backend with an in-memory store.
pub const OFFLINE_ENV: &str = "TALLY_OFFLINE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl ShellContext {
    pub fn new(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        store: Box<dyn TransactionStore>,
    ) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        cli_io::apply_config(&config);
        let controller = FormController::new(store, config.balance_source);

        Ok(ShellContext {
            mode,
            registry,
            controller,
            runtime,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            last_command: None,
            running: true,
        })
    }

    /// Loads the persisted config, applies env overrides and picks the store.
    pub fn from_environment(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(ConfigManager::default_base_dir())?;
        let mut config = config_manager.load()?;
        config.apply_env_overrides();

        let store: Box<dyn TransactionStore> = if env::var_os(OFFLINE_ENV).is_some() {
            tracing::info!("using the in-memory transaction store");
            Box::new(MemoryTransactionStore::new())
        } else {
            tracing::info!(origin = %config.api_base_url, "using the REST transaction store");
            Box::new(HttpTransactionStore::new(&config.api_base_url)?)
        };

        Self::new(mode, config_manager, config, store)
    }

    /// Initial fetch; a failure is reported and the shell starts anyway.
    pub(crate) fn startup(&mut self) -> Result<(), CliError> {
        if env::var_os(OFFLINE_ENV).is_some() {
            cli_io::print_info("Offline mode: transactions are kept in memory.");
        } else {
            cli_io::print_info(format!("Backend: {}", self.config.api_base_url));
        }
        match self.runtime.block_on(self.controller.refresh()) {
            Ok(()) => {
                let count = self.controller.state().transactions.len();
                cli_io::print_info(format!("Loaded {count} transaction(s)."));
                Ok(())
            }
            Err(err) => self.report_error(err.into()),
        }
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn can_prompt(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// `tally>` normally; shows the edited id and a busy marker when relevant.
    pub(crate) fn prompt(&self) -> String {
        let mut prompt = String::from("tally");
        if let Mode::Edit(id) = self.controller.mode() {
            prompt.push_str(&format!(" (edit {id})"));
        }
        if self.controller.is_busy() {
            prompt.push_str(" [busy]");
        }
        prompt.push_str("> ");
        prompt
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if !self.can_prompt() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit tally?", true).map_err(CliError::from)
    }

    /// Prints a failed command; the shell keeps running afterwards.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        tracing::debug!(command = ?self.last_command, error = %err, "command failed");
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
            }
            CommandError::Controller(ControllerError::UnknownTransaction(id)) => {
                self.print_error(&format!("Transaction {id} is not in the list."));
                cli_io::print_hint("Run `list` to see the current ids, or `refresh` to reload.");
            }
            CommandError::Controller(ControllerError::Busy) => {
                self.print_error("A request is still in progress.");
                cli_io::print_hint("Wait for it to finish before sending another.");
            }
            CommandError::Controller(err @ ControllerError::StaleView { .. }) => {
                self.print_warning(&err.to_string());
                cli_io::print_hint("Run `refresh` to reload the list.");
            }
            CommandError::Controller(ControllerError::Store(err)) => {
                self.print_error(&format!("Backend request failed: {err}"));
                cli_io::print_hint(store_failure_hint(&err));
            }
            other => self.print_error(&other.to_string()),
        }
        Ok(())
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }
}

/// What to do next after a failed store call, by the call that failed.
fn store_failure_hint(err: &StoreError) -> &'static str {
    match err.operation() {
        Some(StoreOperation::Create | StoreOperation::Update) => {
            "Nothing was saved; the draft is kept. Run `submit` to try again."
        }
        Some(StoreOperation::Delete) if err.is_not_found() => {
            "That id no longer exists on the backend. Run `refresh` to reload the list."
        }
        Some(StoreOperation::Delete) => "Nothing was deleted. Run `delete` again to retry.",
        Some(StoreOperation::List | StoreOperation::Balance) | None => {
            "The list shown is the last one fetched. Run `refresh` to try again."
        }
    }
}

#[cfg(test)]
pub(crate) fn script_context(config_dir: &std::path::Path) -> ShellContext {
    let manager = ConfigManager::with_base_dir(config_dir.to_path_buf()).unwrap();
    let config = Config {
        ui_color_enabled: false,
        plain_output: true,
        ..Config::default()
    };
    ShellContext::new(
        CliMode::Script,
        manager,
        config,
        Box::new(MemoryTransactionStore::new()),
    )
    .unwrap()
}

#[cfg(test)]
pub(crate) fn process_script(
    context: &mut ShellContext,
    lines: &[&str],
) -> Result<(), CommandError> {
    for line in lines {
        match context.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => {
                context.running = false;
                break;
            }
        }
    }
    Ok(())
}
