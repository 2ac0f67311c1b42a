use gestor_domain::CompanyScope;

use crate::cli::core::{usage, CommandResult};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "company",
        "List companies or switch the active company scope",
        "company [list|<id>|all]",
        cmd_company,
    )
    .with_subcommands(&["list", "all"])]
}

fn cmd_company(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            list_companies(context);
            Ok(())
        }
        [target] => {
            let scope: CompanyScope = target.parse().unwrap_or_default();
            context.store.set_scope(scope)?;
            io::print_success(format!("Scope set to {}.", context.scope_label()));
            Ok(())
        }
        _ => Err(usage("company [list|<id>|all]")),
    }
}

fn list_companies(context: &ShellContext) {
    output_section("Empresas");
    let active = context.store.scope();
    let mut table = Table::new(vec![
        TableColumn::left(""),
        TableColumn::left("ID"),
        TableColumn::left("Nome"),
        TableColumn::left("CNPJ"),
    ]);
    for company in &context.store.data().companies {
        let marker = if active.company_id() == Some(company.id.as_str()) {
            "*"
        } else {
            ""
        };
        table.add_row(vec![
            marker.to_string(),
            company.id.clone(),
            company.name.clone(),
            company.tax_id.clone(),
        ]);
    }
    table.print();
    io::print_info(format!("Active scope: {}", context.scope_label()));
}
