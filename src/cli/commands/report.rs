use gestor_core::format::{CurrencyFormatter, DateFormatter};
use gestor_core::{CoreError, ReportKind, ReportView};
use gestor_domain::CompanyScope;

use crate::cli::core::{usage, CommandResult};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "report <financial|contracts|employees|fleet> [company|all]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "report",
        "Show a report tab, optionally narrowed to one company",
        USAGE,
        cmd_report,
    )]
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (kind, scope) = match args {
        [kind] => (kind.parse::<ReportKind>()?, context.store.scope().clone()),
        [kind, scope] => (kind.parse::<ReportKind>()?, scope.parse().unwrap_or_default()),
        _ => return Err(usage(USAGE)),
    };
    if let CompanyScope::Company(id) = &scope {
        if context.store.data().company(id).is_none() {
            return Err(CoreError::CompanyNotFound(id.clone()).into());
        }
    }

    let view = context
        .store
        .report(kind, &scope, context.config.urgency_threshold_days);
    let scope_name = match &scope {
        CompanyScope::All => "Todas as empresas".to_string(),
        CompanyScope::Company(id) => context.store.data().company_name(id).to_string(),
    };
    output_section(format!("Relatório {} ({})", kind.title(), scope_name));
    if view.is_empty() {
        io::print_info(match view {
            ReportView::Fleet => "Módulo de frota em desenvolvimento.",
            _ => "Nenhum registro encontrado.",
        });
        return Ok(());
    }
    render(context, &view).print();
    Ok(())
}

fn render(context: &ShellContext, view: &ReportView) -> Table {
    let fmt = &context.formatters;
    match view {
        ReportView::Financial(rows) => {
            let mut table = Table::new(vec![
                TableColumn::left("Data"),
                TableColumn::left("Empresa"),
                TableColumn::left("Categoria"),
                TableColumn::left("Descrição"),
                TableColumn::right("Valor"),
            ]);
            for row in rows {
                table.add_row(vec![
                    fmt.format_date(row.transaction.date),
                    row.company_name.clone(),
                    row.transaction.category.clone(),
                    row.transaction.description.clone(),
                    fmt.format_amount(row.transaction.signed_amount()),
                ]);
            }
            table
        }
        ReportView::Contracts(rows) => {
            let mut table = Table::new(vec![
                TableColumn::left("Cliente"),
                TableColumn::right("Mensal"),
                TableColumn::left("Vigência"),
                TableColumn::left("Status"),
            ]);
            for row in rows {
                let status = if row.urgent {
                    format!("Vence em {} dias", row.days_remaining)
                } else {
                    "Regular".to_string()
                };
                table.add_row(vec![
                    row.client_name.clone(),
                    fmt.format_amount(row.contract.monthly_value),
                    format!(
                        "{} a {}",
                        fmt.format_date(row.contract.start_date),
                        fmt.format_date(row.contract.end_date)
                    ),
                    status,
                ]);
            }
            table
        }
        ReportView::Employees(rows) => {
            let mut table = Table::new(vec![
                TableColumn::left("Colaborador"),
                TableColumn::left("Cargo"),
                TableColumn::right("Despesas"),
                TableColumn::right("Lançamentos"),
            ]);
            for row in rows {
                table.add_row(vec![
                    row.employee.name.clone(),
                    row.employee.role.clone(),
                    fmt.format_amount(row.total_expense),
                    expense_entries_label(row.expense_count),
                ]);
            }
            table
        }
        ReportView::Fleet => Table::new(Vec::new()),
    }
}

fn expense_entries_label(count: usize) -> String {
    match count {
        1 => "1 lançamento".to_string(),
        n => format!("{} lançamentos", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expense_entries_label_pluralizes() {
        assert_eq!(expense_entries_label(0), "0 lançamentos");
        assert_eq!(expense_entries_label(1), "1 lançamento");
        assert_eq!(expense_entries_label(12), "12 lançamentos");
    }
}
