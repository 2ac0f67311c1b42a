use gestor_core::format::{CurrencyFormatter, DateFormatter};
use gestor_core::{TransactionDraft, TransactionService};
use gestor_domain::{ExpenseCategory, TransactionKind};

use crate::cli::core::{
    parse_amount, parse_count, parse_date, split_flags, usage, CommandError, CommandResult,
};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "transaction add <revenue|expense> <amount (1.500 = 1500, 1.234,56)> <category> [--company id] [--date YYYY-MM-DD] [--employee id] [--contract id] [--description text] | transaction list [limit]";
const FLAGS: [&str; 5] = ["company", "date", "employee", "contract", "description"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "transaction",
        "Record a revenue or expense, or list recent entries",
        USAGE,
        cmd_transaction,
    )
    .with_subcommands(&["add", "list"])]
}

fn cmd_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => list_transactions(context, None),
        ["list", limit] => list_transactions(context, Some(parse_count(limit, "limit")?)),
        ["add", rest @ ..] => add_transaction(context, rest),
        _ => Err(usage(USAGE)),
    }
}

fn add_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positionals, flags) = split_flags(args, &FLAGS)?;
    let [kind, amount, category @ ..] = positionals.as_slice() else {
        return Err(usage(USAGE));
    };
    let kind: TransactionKind = kind.parse().map_err(CommandError::InvalidArguments)?;
    let category = category.join(" ");
    let category = match kind {
        TransactionKind::Expense => category
            .parse::<ExpenseCategory>()
            .map_err(CommandError::InvalidArguments)?
            .label()
            .to_string(),
        TransactionKind::Revenue if category.trim().is_empty() => {
            return Err(CommandError::InvalidArguments(
                "revenue needs a category, e.g. `Contrato`".into(),
            ))
        }
        TransactionKind::Revenue => category,
    };

    // Form defaults: first company, today.
    let mut company_id = context
        .store
        .data()
        .companies
        .first()
        .map(|company| company.id.clone())
        .unwrap_or_default();
    let mut date = context.store.today();
    let mut employee_id = None;
    let mut contract_id = None;
    let mut description = String::new();
    for (flag, value) in flags {
        match flag.as_str() {
            "company" => company_id = value.to_string(),
            "date" => date = parse_date(value)?,
            "employee" => employee_id = Some(value.to_string()),
            "contract" => contract_id = Some(value.to_string()),
            _ => description = value.to_string(),
        }
    }

    let mut draft = TransactionDraft::new(kind, category, parse_amount(amount), date, company_id)
        .with_description(description);
    draft.employee_id = employee_id;
    draft.contract_id = contract_id;

    let fmt = &context.formatters;
    // Rejected drafts are dropped without feedback.
    if let Some(transaction) = context.store.add_transaction(draft)? {
        io::print_success(format!(
            "{} {} ({}) recorded for {}.",
            transaction.kind,
            fmt.format_amount(transaction.amount),
            transaction.category,
            fmt.format_date(transaction.date)
        ));
    }
    Ok(())
}

fn list_transactions(context: &ShellContext, limit: Option<usize>) -> CommandResult {
    let limit = limit.unwrap_or(context.config.transaction_list_limit);
    let data = context.store.data();
    let fmt = &context.formatters;
    let recent = TransactionService::recent(data, context.store.scope(), limit);

    output_section(format!("Lançamentos recentes ({})", context.scope_label()));
    if recent.is_empty() {
        io::print_info("No transactions recorded.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Data"),
        TableColumn::left("Tipo"),
        TableColumn::left("Categoria"),
        TableColumn::left("Empresa"),
        TableColumn::right("Valor"),
        TableColumn::left("Por"),
    ]);
    for txn in recent {
        table.add_row(vec![
            fmt.format_date(txn.date),
            txn.kind.to_string(),
            txn.category.clone(),
            data.company(&txn.company_id)
                .map(|company| company.short_name().to_string())
                .unwrap_or_default(),
            fmt.format_amount(txn.signed_amount()),
            data.employee(&txn.created_by)
                .map(|employee| employee.name.clone())
                .unwrap_or_else(|| txn.created_by.clone()),
        ]);
    }
    table.print();
    Ok(())
}
