use gestor_core::format::CurrencyFormatter;

use crate::cli::core::CommandResult;
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "dashboard",
        "Show consolidated indicators for the active scope",
        "dashboard",
        cmd_dashboard,
    )]
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = context
        .store
        .dashboard(context.config.urgency_threshold_days);
    let fmt = &context.formatters;

    output_section(format!("Dashboard ({})", context.scope_label()));
    let mut indicators = Table::new(vec![TableColumn::left("Indicador"), TableColumn::right("Valor")]);
    indicators.add_row(vec!["Receita Total".to_string(), fmt.format_amount(summary.total_revenue)]);
    indicators.add_row(vec!["Despesas".to_string(), fmt.format_amount(summary.total_expense)]);
    indicators.add_row(vec![
        "Receita Recorrente".to_string(),
        fmt.format_amount(summary.recurring_revenue),
    ]);
    indicators.add_row(vec![
        "Contratos Vigentes".to_string(),
        fmt.format_amount(summary.active_recurring_revenue),
    ]);
    indicators.add_row(vec!["Resultado Líquido".to_string(), fmt.format_amount(summary.net_result)]);
    indicators.print();

    if summary.urgent_contracts > 0 {
        io::print_warning(format!(
            "{} contrato(s) vencendo em menos de {} dias.",
            summary.urgent_contracts, context.config.urgency_threshold_days
        ));
    }

    output_section("Despesas por Categoria");
    if summary.expense_by_category.is_empty() {
        io::print_info("Sem despesas registradas.");
    } else {
        let mut categories =
            Table::new(vec![TableColumn::left("Categoria"), TableColumn::right("Valor")]);
        for total in &summary.expense_by_category {
            categories.add_row(vec![total.category.clone(), fmt.format_amount(total.amount)]);
        }
        categories.print();
    }

    output_section("Comparativo por Empresa");
    let mut comparison = Table::new(vec![
        TableColumn::left("Empresa"),
        TableColumn::right("Receita"),
        TableColumn::right("Despesa"),
        TableColumn::right("Resultado"),
    ]);
    for row in &summary.company_comparison {
        comparison.add_row(vec![
            row.name.clone(),
            fmt.format_amount(row.revenue),
            fmt.format_amount(row.expense),
            fmt.format_amount(row.result()),
        ]);
    }
    comparison.print();
    Ok(())
}
