//! Prompt-driven entry of the transaction draft.
//!
//! [`DraftForm`] walks the fields in order and pushes every answer through
//! the controller setters, so a field is re-asked until it validates. The
//! terminal side sits behind [`FormInteraction`] and is swapped for a
//! scripted implementation in tests.

use std::fmt;
use std::io::{self, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};
use dialoguer::{theme::ColorfulTheme, Select};
use tally_domain::{TransactionDraft, TransactionKind};

use crate::cli::core::CommandError;
use crate::controller::{FieldError, FormController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Description,
    Kind,
    Amount,
    Date,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Description,
        DraftField::Kind,
        DraftField::Amount,
        DraftField::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DraftField::Description => "Description",
            DraftField::Kind => "Type",
            DraftField::Amount => "Amount",
            DraftField::Date => "Date",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "description" | "desc" => Some(DraftField::Description),
            "type" | "kind" => Some(DraftField::Kind),
            "amount" | "montant" => Some(DraftField::Amount),
            "date" => Some(DraftField::Date),
            _ => None,
        }
    }

    pub fn current_value(self, draft: &TransactionDraft) -> String {
        match self {
            DraftField::Description => draft.description.clone(),
            DraftField::Kind => draft.kind.to_string(),
            DraftField::Amount => draft.amount.clone(),
            DraftField::Date => draft.date.clone(),
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Writes one textual field into the draft and returns its validation error.
pub fn apply_field(
    controller: &mut FormController,
    field: DraftField,
    value: &str,
) -> Result<Option<FieldError>, CommandError> {
    let errors = match field {
        DraftField::Description => {
            controller.set_description(value);
            controller.state().errors.description
        }
        DraftField::Kind => {
            let kind = value
                .parse::<TransactionKind>()
                .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
            controller.set_kind(kind);
            None
        }
        DraftField::Amount => {
            controller.set_amount(value);
            controller.state().errors.amount
        }
        DraftField::Date => {
            controller.set_date(value);
            controller.state().errors.date
        }
    };
    Ok(errors)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Value(String),
    /// Enter on an empty line: keep what the draft already holds.
    Keep,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Completed,
    Cancelled,
}

pub trait FormInteraction {
    fn prompt_text(&mut self, field: DraftField, current: &str)
        -> Result<PromptResponse, CommandError>;

    /// `None` cancels the form.
    fn prompt_kind(
        &mut self,
        current: TransactionKind,
    ) -> Result<Option<TransactionKind>, CommandError>;

    fn show_error(&mut self, message: &str);
}

pub struct DraftForm<'a> {
    controller: &'a mut FormController,
}

impl<'a> DraftForm<'a> {
    pub fn new(controller: &'a mut FormController) -> Self {
        Self { controller }
    }

    pub fn run(&mut self, ui: &mut dyn FormInteraction) -> Result<FormOutcome, CommandError> {
        for field in DraftField::ALL {
            if !self.collect(field, ui)? {
                return Ok(FormOutcome::Cancelled);
            }
        }
        Ok(FormOutcome::Completed)
    }

    /// Returns `false` when the user cancelled.
    fn collect(
        &mut self,
        field: DraftField,
        ui: &mut dyn FormInteraction,
    ) -> Result<bool, CommandError> {
        if field == DraftField::Kind {
            let current = self.controller.state().draft.kind;
            return Ok(match ui.prompt_kind(current)? {
                Some(kind) => {
                    self.controller.set_kind(kind);
                    true
                }
                None => false,
            });
        }

        loop {
            let current = field.current_value(&self.controller.state().draft);
            let value = match ui.prompt_text(field, &current)? {
                PromptResponse::Cancel => return Ok(false),
                PromptResponse::Keep => current,
                PromptResponse::Value(value) => value,
            };
            match apply_field(self.controller, field, &value)? {
                None => return Ok(true),
                Some(error) => ui.show_error(&format!("{field} {error}")),
            }
        }
    }
}

/// Raw-mode line input plus a `dialoguer` selector for the type.
pub struct TerminalForm<'t> {
    theme: &'t ColorfulTheme,
}

impl<'t> TerminalForm<'t> {
    pub fn new(theme: &'t ColorfulTheme) -> Self {
        Self { theme }
    }
}

impl FormInteraction for TerminalForm<'_> {
    fn prompt_text(
        &mut self,
        field: DraftField,
        current: &str,
    ) -> Result<PromptResponse, CommandError> {
        if current.is_empty() {
            println!("{} (Esc to cancel):", field);
        } else {
            println!("{} [{}] (Enter keeps, Esc cancels):", field, current);
        }
        Ok(read_line_raw(!current.is_empty())?)
    }

    fn prompt_kind(
        &mut self,
        current: TransactionKind,
    ) -> Result<Option<TransactionKind>, CommandError> {
        let labels: Vec<&str> = TransactionKind::ALL
            .iter()
            .map(|kind| kind.wire_name())
            .collect();
        let default = TransactionKind::ALL
            .iter()
            .position(|kind| *kind == current)
            .unwrap_or(0);
        let choice = Select::with_theme(self.theme)
            .with_prompt("Type")
            .items(&labels)
            .default(default)
            .interact_opt()?;
        Ok(choice.map(|index| TransactionKind::ALL[index]))
    }

    fn show_error(&mut self, message: &str) {
        crate::cli::io::print_warning(message);
    }
}

fn read_line_raw(has_current: bool) -> io::Result<PromptResponse> {
    let mut guard = RawModeGuard::activate()?;
    let mut stdout = io::stdout();
    let mut buffer = String::new();
    redraw(&mut stdout, &buffer)?;

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => break finish(&mut guard, PromptResponse::Cancel),
            KeyCode::Char('c') if ctrl => break finish(&mut guard, PromptResponse::Cancel),
            KeyCode::Char('u') if ctrl => buffer.clear(),
            KeyCode::Enter => {
                let response = if buffer.trim().is_empty() && has_current {
                    PromptResponse::Keep
                } else {
                    PromptResponse::Value(buffer)
                };
                break finish(&mut guard, response);
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(ch) => buffer.push(ch),
            _ => continue,
        }
        redraw(&mut stdout, &buffer)?;
    }
}

fn finish(guard: &mut RawModeGuard, response: PromptResponse) -> io::Result<PromptResponse> {
    guard.deactivate();
    println!();
    Ok(response)
}

fn redraw(stdout: &mut io::Stdout, buffer: &str) -> io::Result<()> {
    stdout.execute(cursor::MoveToColumn(0))?;
    stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
    write!(stdout, "> {}", buffer)?;
    stdout.flush()
}

/// Restores cooked mode even when input handling bails out early.
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}
