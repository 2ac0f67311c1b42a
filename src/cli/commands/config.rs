use crate::cli::core::{usage, CliMode, CommandResult};
use crate::cli::formatters::CliFormatters;
use crate::cli::io;
use crate::cli::output::{self, section as output_section, OutputPreferences};
use crate::cli::registry::CommandEntry;
use crate::cli::shell_context::ShellContext;

const USAGE: &str = "config [show|set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change shell preferences",
        USAGE,
        cmd_config,
    )
    .with_subcommands(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_config(context),
        ["set", key, value @ ..] if !value.is_empty() => {
            set_config_value(context, key, value.join(" ").trim())
        }
        _ => Err(usage(USAGE)),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!(
        "  File                   : {}",
        context.config_manager.config_path().display()
    ));
    io::print_info(format!("  locale                 : {}", config.locale));
    io::print_info(format!("  currency               : {}", config.currency));
    io::print_info(format!("  ui_color_enabled       : {}", config.ui_color_enabled));
    io::print_info(format!("  urgency_threshold_days : {}", config.urgency_threshold_days));
    io::print_info(format!("  transaction_list_limit : {}", config.transaction_list_limit));
    io::print_info(format!(
        "  data_root              : {}",
        config.resolve_data_root(&context.home).display()
    ));
    io::print_info(format!(
        "  export_dir             : {}",
        config.resolve_export_dir(&context.home).display()
    ));
    io::print_info(format!("  insight.model          : {}", config.insight.model));
    io::print_info(format!("  insight.endpoint       : {}", config.insight.endpoint));
    io::print_info(format!("  insight.api_key_env    : {}", config.insight.api_key_env));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    context.config.set(key, value)?;
    context.config_manager.save(&context.config)?;
    context.formatters = CliFormatters::from_config(&context.config);
    output::set_preferences(OutputPreferences {
        color: context.config.ui_color_enabled && context.mode == CliMode::Interactive,
    });
    io::print_success(format!("Set {} = {}", key, value));
    if key.starts_with("insight.") {
        io::print_hint("Insight settings apply after restarting the shell.");
    }
    Ok(())
}
