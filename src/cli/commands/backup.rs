use std::path::{Path, PathBuf};

use gestor_core::ImportOutcome;
use gestor_storage_json::{list_exports, read_import, write_export};

use crate::cli::core::{usage, CliMode, CommandError, CommandResult};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "backup export [dir] | backup import <file> [--yes] | backup list [dir]";
const IMPORT_PROMPT: &str = "Isso substituirá todos os dados atuais. Deseja continuar?";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "backup",
        "Export the full snapshot to JSON or replace it from a file",
        USAGE,
        cmd_backup,
    )
    .with_subcommands(&["export", "import", "list"])]
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["export"] => export(context, None),
        ["export", dir] => export(context, Some(PathBuf::from(*dir))),
        ["list"] => list(context, None),
        ["list", dir] => list(context, Some(PathBuf::from(*dir))),
        ["import", file] => import(context, file, false),
        ["import", file, "--yes"] | ["import", "--yes", file] => import(context, file, true),
        _ => Err(usage(USAGE)),
    }
}

fn export_dir(context: &ShellContext, dir: Option<PathBuf>) -> PathBuf {
    dir.unwrap_or_else(|| context.config.resolve_export_dir(&context.home))
}

fn export(context: &mut ShellContext, dir: Option<PathBuf>) -> CommandResult {
    let dir = export_dir(context, dir);
    let contents = context.store.export_json()?;
    let path = write_export(&dir, &contents, context.store.today())?;
    io::print_success(format!("Backup exported to {}", path.display()));
    Ok(())
}

fn list(context: &mut ShellContext, dir: Option<PathBuf>) -> CommandResult {
    let dir = export_dir(context, dir);
    let exports = list_exports(&dir)?;
    output_section("Backups");
    if exports.is_empty() {
        io::print_info(format!("No backups in {}", dir.display()));
        return Ok(());
    }
    for path in exports {
        io::print_info(format!("  {}", path.display()));
    }
    Ok(())
}

fn import(context: &mut ShellContext, file: &str, assume_yes: bool) -> CommandResult {
    let outcome = read_import(Path::new(file)).and_then(|raw| {
        let mode = context.mode;
        let theme = &context.theme;
        context.store.import_json(&raw, || {
            if assume_yes {
                return true;
            }
            // Script runs cannot answer the prompt.
            if mode == CliMode::Script {
                return false;
            }
            io::confirm_action(theme, IMPORT_PROMPT, false).unwrap_or(false)
        })
    });

    match outcome {
        Ok(ImportOutcome::Replaced) => {
            io::print_success("Dados importados com sucesso!");
            Ok(())
        }
        Ok(ImportOutcome::Cancelled) => {
            io::print_info("Importação cancelada.");
            if context.mode == CliMode::Script && !assume_yes {
                io::print_hint("Pass `--yes` to confirm imports in script mode.");
            }
            Ok(())
        }
        Err(err) => Err(CommandError::Message(format!(
            "Erro ao importar arquivo. {}",
            err
        ))),
    }
}
