use tally_domain::{Displayable, TransactionId};

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::forms::{apply_field, DraftField, DraftForm, FormOutcome, TerminalForm};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{balance_line, transaction_table};
use crate::controller::{Mode, Outcome};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "Show transactions and the balance", "list", cmd_list)
            .with_aliases(&["ls"]),
        CommandEntry::new(
            "refresh",
            "Reload transactions from the backend",
            "refresh",
            cmd_refresh,
        ),
        CommandEntry::new("balance", "Show the current balance", "balance", cmd_balance),
        CommandEntry::new(
            "add",
            "Record a new transaction (opens the form without arguments)",
            "add [description type amount date]",
            cmd_add,
        )
        .with_aliases(&["new"]),
        CommandEntry::new(
            "edit",
            "Load a transaction into the form, optionally changing fields",
            "edit <id> [field value ...]",
            cmd_edit,
        ),
        CommandEntry::new(
            "set",
            "Change one field of the draft",
            "set <description|type|amount|date> <value>",
            cmd_set,
        ),
        CommandEntry::new("draft", "Show the form contents and errors", "draft", cmd_draft),
        CommandEntry::new("submit", "Validate and save the draft", "submit", cmd_submit)
            .with_aliases(&["save"]),
        CommandEntry::new("cancel", "Discard the draft", "cancel", cmd_cancel),
        CommandEntry::new("delete", "Delete a transaction", "delete <id>", cmd_delete)
            .with_aliases(&["rm"]),
    ]
}

fn print_balance(context: &ShellContext) {
    io::print_info(balance_line(
        context.controller.state().balance,
        &context.config.currency_label,
    ));
}

fn parse_id(args: &[&str], usage: &str) -> Result<TransactionId, CommandError> {
    args.first()
        .map(|raw| TransactionId::new(raw.trim()))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let transactions = &context.controller.state().transactions;
    output_section("Transactions");
    if transactions.is_empty() {
        io::print_info("No transactions recorded.");
    } else {
        println!("{}", transaction_table(transactions).render());
    }
    print_balance(context);
    Ok(())
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.runtime.block_on(context.controller.refresh())?;
    let count = context.controller.state().transactions.len();
    io::print_success(format!("Loaded {count} transaction(s)."));
    print_balance(context);
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_balance(context);
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            context.controller.cancel();
            if context.can_prompt() {
                return run_form(context);
            }
            io::print_info("New draft started. Use `set <field> <value>`, then `submit`.");
            Ok(())
        }
        [description, kind, amount, date] => {
            context.controller.cancel();
            fill_fields(
                context,
                &[
                    (DraftField::Description, *description),
                    (DraftField::Kind, *kind),
                    (DraftField::Amount, *amount),
                    (DraftField::Date, *date),
                ],
            )?;
            submit_and_report(context)
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: add [description type amount date]".into(),
        )),
    }
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit <id> [field value ...]";
    let id = parse_id(args, usage)?;
    let pairs = &args[1..];
    if pairs.len() % 2 != 0 {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    let updates = pairs
        .chunks(2)
        .map(|pair| {
            DraftField::parse(pair[0])
                .map(|field| (field, pair[1]))
                .ok_or_else(|| unknown_field(pair[0]))
        })
        .collect::<Result<Vec<_>, _>>()?;

    context.controller.edit(&id)?;
    if !updates.is_empty() {
        fill_fields(context, &updates)?;
        return submit_and_report(context);
    }
    if context.can_prompt() {
        return run_form(context);
    }
    io::print_info(format!(
        "Editing transaction {id}. Use `set <field> <value>`, then `submit` or `cancel`."
    ));
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, value @ ..] = args else {
        return Err(set_usage());
    };
    if value.is_empty() {
        return Err(set_usage());
    }
    let field = DraftField::parse(name).ok_or_else(|| unknown_field(name))?;
    let value = value.join(" ");
    match apply_field(&mut context.controller, field, &value)? {
        Some(error) => io::print_warning(format!("{field} {error}")),
        None => io::print_success(format!("{field} set.")),
    }
    Ok(())
}

fn cmd_draft(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let state = context.controller.state();
    match state.mode() {
        Mode::Create => output_section("Draft (new transaction)"),
        Mode::Edit(id) => output_section(format!("Draft (editing {id})")),
    }
    println!("{}", serde_json::to_string_pretty(&state.draft)?);
    for message in state.errors.messages() {
        io::print_warning(message);
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    submit_and_report(context)
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.controller.cancel();
    io::print_info("Draft cleared.");
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = parse_id(args, "delete <id>")?;
    if context.can_prompt() {
        let label = context
            .controller
            .state()
            .find(&id)
            .map_or_else(|| format!("transaction {id}"), Displayable::display_label);
        if !io::confirm_action(&context.theme, &format!("Delete {label}?"), false)? {
            io::print_info("Deletion cancelled.");
            return Ok(());
        }
    }
    context.runtime.block_on(context.controller.delete(&id))?;
    io::print_success(format!("Deleted transaction {id}."));
    print_balance(context);
    Ok(())
}

/// Applies every field or none: an unparsable value drops the whole draft.
fn fill_fields(context: &mut ShellContext, fields: &[(DraftField, &str)]) -> CommandResult {
    for (field, value) in fields {
        if let Err(err) = apply_field(&mut context.controller, *field, value) {
            context.controller.cancel();
            return Err(err);
        }
    }
    Ok(())
}

fn run_form(context: &mut ShellContext) -> CommandResult {
    let mut ui = TerminalForm::new(&context.theme);
    let outcome = DraftForm::new(&mut context.controller).run(&mut ui)?;
    match outcome {
        FormOutcome::Completed => submit_and_report(context),
        FormOutcome::Cancelled => {
            context.controller.cancel();
            io::print_info("Form cancelled.");
            Ok(())
        }
    }
}

fn submit_and_report(context: &mut ShellContext) -> CommandResult {
    let outcome = context.runtime.block_on(context.controller.submit())?;
    match outcome {
        Outcome::Rejected(errors) => {
            for message in errors.messages() {
                io::print_warning(message);
            }
            io::print_hint("Nothing was sent. Fix the fields with `set`, then `submit` again.");
            return Ok(());
        }
        Outcome::Created(txn) => {
            io::print_success(format!("Created transaction {} ({}).", txn.id, txn.description));
        }
        Outcome::Updated(txn) => {
            io::print_success(format!("Updated transaction {} ({}).", txn.id, txn.description));
        }
        _ => {}
    }
    print_balance(context);
    Ok(())
}

fn set_usage() -> CommandError {
    CommandError::InvalidArguments("usage: set <description|type|amount|date> <value>".into())
}

fn unknown_field(name: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "unknown field `{name}` (expected description, type, amount or date)"
    ))
}
