use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            usage,
            handler,
        }
    }

    pub const fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations never shadow an existing name or alias.
    pub fn register(&mut self, entry: CommandEntry) {
        if self.lookup.contains_key(entry.name) {
            return;
        }
        let index = self.entries.len();
        self.lookup.insert(entry.name, index);
        for &alias in entry.aliases {
            self.lookup.entry(alias).or_insert(index);
        }
        self.entries.push(entry);
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|&index| &self.entries[index])
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    /// Every name and alias, for completion and suggestions.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries
            .iter()
            .flat_map(|entry| std::iter::once(entry.name).chain(entry.aliases.iter().copied()))
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn aliases_resolve_to_their_command() {
        let mut registry = CommandRegistry::new();
        registry.register(
            CommandEntry::new("list", "Show rows", "list", noop).with_aliases(&["ls"]),
        );
        registry.register(CommandEntry::new("delete", "Remove", "delete <id>", noop));

        assert_eq!(registry.get("ls").map(|entry| entry.name), Some("list"));
        assert!(registry.get("remove").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["list", "ls", "delete"]);
    }

    #[test]
    fn duplicate_names_keep_first_registration() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("list", "first", "list", noop));
        registry.register(CommandEntry::new("list", "second", "list", noop));
        assert_eq!(registry.list().count(), 1);
        assert_eq!(registry.get("list").map(|entry| entry.description), Some("first"));
    }
}
