use gestor_core::InsightReply;

use crate::cli::core::CommandResult;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "insight",
        "Ask the AI consultant for strategic tips on the current figures",
        "insight",
        cmd_insight,
    )]
}

fn cmd_insight(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    io::print_info("Gerando insights...");
    match context.insight.request(context.store.data()) {
        InsightReply::Text(text) => {
            output_section("Consultoria IA");
            io::print_info(text.trim());
        }
        InsightReply::Failed(message) => io::print_warning(message),
        InsightReply::Busy => io::print_info("Uma análise já está em andamento."),
    }
    Ok(())
}
