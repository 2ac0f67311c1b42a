use gestor_core::format::{CurrencyFormatter, DateFormatter};
use gestor_core::{AggregationService, ContractDraft};

use crate::cli::core::{parse_amount, parse_date, usage, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str =
    "contract add <client> <company> <monthly> <start YYYY-MM-DD> <end YYYY-MM-DD> [description] | contract list";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "contract",
        "Register or list recurring advisory contracts",
        USAGE,
        cmd_contract,
    )
    .with_subcommands(&["add", "list"])]
}

fn cmd_contract(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            list_contracts(context);
            Ok(())
        }
        ["add", client_id, company_id, monthly, start, end, description @ ..] => {
            let monthly_value = parse_amount(monthly).ok_or_else(|| {
                CommandError::InvalidArguments(format!("invalid monthly value `{}`", monthly))
            })?;
            let draft = ContractDraft {
                client_id: client_id.to_string(),
                company_id: company_id.to_string(),
                monthly_value,
                start_date: parse_date(start)?,
                end_date: parse_date(end)?,
                description: description.join(" "),
            };
            let contract = context.store.add_contract(draft)?;
            let id = contract.id.clone();
            io::print_success(format!("Contract {} registered.", id));
            Ok(())
        }
        _ => Err(usage(USAGE)),
    }
}

fn list_contracts(context: &ShellContext) {
    output_section("Contratos");
    let data = context.store.data();
    let scope = context.store.scope();
    let now = context.store.now();
    let threshold = context.config.urgency_threshold_days;
    let fmt = &context.formatters;

    let mut table = Table::new(vec![
        TableColumn::left("Cliente"),
        TableColumn::left("Empresa"),
        TableColumn::right("Mensal"),
        TableColumn::left("Início"),
        TableColumn::left("Fim"),
        TableColumn::right("Dias"),
    ]);
    for contract in data
        .contracts
        .iter()
        .filter(|contract| scope.includes(&contract.company_id))
    {
        let days = AggregationService::contract_days_remaining(contract, now);
        let marker = if AggregationService::is_urgent(days, threshold) {
            " !"
        } else {
            ""
        };
        table.add_row(vec![
            data.client_name(&contract.client_id).to_string(),
            data.company(&contract.company_id)
                .map(|company| company.short_name().to_string())
                .unwrap_or_default(),
            fmt.format_amount(contract.monthly_value),
            fmt.format_date(contract.start_date),
            fmt.format_date(contract.end_date),
            format!("{}{}", days, marker),
        ]);
    }
    if table.rows.is_empty() {
        io::print_info("No contracts in this scope.");
        return;
    }
    table.print();
}
