use crate::cli::core::{CommandError, CommandResult};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help).public(),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version).public(),
        CommandEntry::new("status", "Show session and storage status", "status", cmd_status)
            .public(),
        CommandEntry::new(
            "warnings",
            "List records that point at missing entities",
            "warnings",
            cmd_warnings,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit).public(),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Baião Gestor {}", meta.version));
    io::print_info(format!("  Snapshot key : {}", build_info::SNAPSHOT_KEY));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let data = context.store.data();
    output_section("Status");
    let user = context
        .store
        .current_user()
        .map(|employee| format!("{} ({})", employee.name, employee.id))
        .unwrap_or_else(|| "none".to_string());
    io::print_info(format!("  User        : {}", user));
    io::print_info(format!("  Scope       : {}", context.scope_label()));
    io::print_info(format!("  Home        : {}", context.home.display()));
    io::print_info(format!(
        "  Data        : {}",
        context.config.resolve_data_root(&context.home).display()
    ));
    io::print_info(format!(
        "  Records     : {} companies, {} clients, {} employees, {} contracts, {} transactions",
        data.companies.len(),
        data.clients.len(),
        data.employees.len(),
        data.contracts.len(),
        data.transactions.len()
    ));
    if context.store.is_saving(context.store.now()) {
        io::print_info("  Saving...");
    }
    Ok(())
}

fn cmd_warnings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let warnings = context.store.warnings();
    if warnings.is_empty() {
        io::print_success("No dangling references found.");
        return Ok(());
    }
    output_section("Warnings");
    for warning in warnings {
        io::print_warning(warning);
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
