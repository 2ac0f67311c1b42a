use gestor_domain::AppData;

use crate::cli::core::{usage, CommandResult};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "client add <name> <city> | client list";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "client",
        "Register or list public-sector clients",
        USAGE,
        cmd_client,
    )
    .with_subcommands(&["add", "list"])]
}

fn cmd_client(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["list"] => {
            list_clients(context);
            Ok(())
        }
        ["add", name, city @ ..] if !city.is_empty() => {
            let client = context.store.add_client(*name, city.join(" "))?;
            io::print_success(format!("Client `{}` registered ({}).", client.name, client.id));
            Ok(())
        }
        _ => Err(usage(USAGE)),
    }
}

fn list_clients(context: &ShellContext) {
    output_section("Clientes");
    let data = context.store.data();
    if data.clients.is_empty() {
        io::print_info("No clients registered.");
        return;
    }
    clients_table(data).print();
}

fn clients_table(data: &AppData) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("ID"),
        TableColumn::left("Nome"),
        TableColumn::left("Cidade"),
        TableColumn::right("Contratos"),
    ]);
    for client in &data.clients {
        table.add_row(vec![
            client.id.clone(),
            client.name.clone(),
            client.city.clone(),
            data.contract_count(&client.id).to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gestor_domain::{Client, Contract};

    #[test]
    fn clients_table_counts_contracts_per_client() {
        let mut data = AppData::seed();
        data.clients.push(Client::new("Prefeitura de Itu", "Itu - SP"));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        data.contracts = vec![
            Contract::new("c1", "1", 1000.0, start, end),
            Contract::new("c1", "2", 2000.0, start, end),
        ];

        let table = clients_table(&data);
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows[0][3], "2");
        assert_eq!(table.rows[1][1], "Prefeitura de Itu");
        assert_eq!(table.rows[1][3], "0");
        assert!(table.lines()[0].ends_with("Contratos"));
    }
}
