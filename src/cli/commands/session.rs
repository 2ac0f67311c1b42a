use crate::cli::core::{usage, CommandResult};
use crate::cli::io;
use crate::cli::output::{section as output_section, Table, TableColumn};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Choose who is operating (lists employees without an id)",
            "login [employee]",
            cmd_login,
        )
        .public(),
        CommandEntry::new("logout", "Return to the identity picker", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the active user", "whoami", cmd_whoami),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output_section("Quem está acessando?");
            let mut table = Table::new(vec![
                TableColumn::left("ID"),
                TableColumn::left("Nome"),
                TableColumn::left("Cargo"),
            ]);
            for employee in &context.store.data().employees {
                table.add_row(vec![
                    employee.id.clone(),
                    employee.name.clone(),
                    employee.role.clone(),
                ]);
            }
            table.print();
            Ok(())
        }
        [employee_id] => context.sign_in(employee_id),
        _ => Err(usage("login [employee]")),
    }
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.store.logout();
    io::print_success("Logged out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let employee = context.require_user()?;
    let admin = if employee.is_admin { " [admin]" } else { "" };
    io::print_info(format!(
        "{} - {} ({}){}",
        employee.id, employee.name, employee.role, admin
    ));
    Ok(())
}
