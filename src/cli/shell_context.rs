use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Select};
use gestor_config::{default_home, Config, ConfigManager};
use gestor_core::{AppStore, InsightService, SystemClock};
use gestor_domain::{CompanyScope, Employee};
use gestor_storage_json::JsonBlobStore;
use strsim::levenshtein;
use tracing::{debug, warn};

use crate::cli::commands;
use crate::cli::core::{CliMode, CommandError, LoopControl};
use crate::cli::formatters::CliFormatters;
use crate::cli::io as cli_io;
use crate::cli::output::{self, OutputPreferences};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::errors::CliError;
use crate::insight::GeminiProvider;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub store: AppStore,
    pub insight: InsightService,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub home: PathBuf,
    pub formatters: CliFormatters,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let home = default_home();
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let config = config_manager.load()?;
        output::set_preferences(OutputPreferences {
            color: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let blob_store = JsonBlobStore::new(config.resolve_data_root(&home))?;
        let store = AppStore::open(Box::new(blob_store), Box::new(SystemClock))?
            .with_saving_indicator_ms(config.saving_indicator_ms);
        let insight = InsightService::new(Box::new(GeminiProvider::from_settings(
            &config.insight,
        )));
        debug!(home = %home.display(), ?mode, "shell context ready");

        let mut context = ShellContext {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            store,
            insight,
            formatters: CliFormatters::from_config(&config),
            config_manager,
            config,
            home,
            last_command: None,
            running: true,
        };

        if mode == CliMode::Interactive {
            if let Err(err) = context.pick_identity() {
                warn!(error = %err, "identity picker unavailable");
                cli_io::print_warning("Use `login <employee>` to choose who is operating.");
            }
        }
        Ok(context)
    }

    /// Interactive stand-in for the identity picker shown before any other view.
    fn pick_identity(&mut self) -> Result<(), CommandError> {
        let employees = &self.store.data().employees;
        if employees.is_empty() {
            return Ok(());
        }
        let labels: Vec<String> = employees
            .iter()
            .map(|employee| format!("{} ({})", employee.name, employee.role))
            .collect();
        let default = self
            .config
            .last_user
            .as_deref()
            .and_then(|id| employees.iter().position(|employee| employee.id == id))
            .unwrap_or(0);
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Quem está acessando?")
            .items(&labels)
            .default(default)
            .interact_opt()?;
        let Some(id) = selection
            .and_then(|index| self.store.data().employees.get(index))
            .map(|employee| employee.id.clone())
        else {
            return Ok(());
        };
        self.sign_in(&id)
    }

    /// Logs `employee_id` in and remembers it for the next session.
    pub(crate) fn sign_in(&mut self, employee_id: &str) -> Result<(), CommandError> {
        let name = self.store.login(employee_id)?.name.clone();
        self.config.last_user = Some(employee_id.to_string());
        self.config_manager.save(&self.config)?;
        cli_io::print_success(format!("Logged in as {}.", name));
        Ok(())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn require_user(&self) -> Result<&Employee, CommandError> {
        self.store.current_user().ok_or(CommandError::NotLoggedIn)
    }

    pub(crate) fn scope_label(&self) -> String {
        match self.store.scope() {
            CompanyScope::All => "Consolidado".to_string(),
            CompanyScope::Company(id) => self
                .store
                .data()
                .company(id)
                .map(|company| company.short_name().to_string())
                .unwrap_or_else(|| id.clone()),
        }
    }

    pub(crate) fn prompt(&self) -> String {
        let user = self
            .store
            .current_user()
            .map(|employee| employee.name.as_str())
            .unwrap_or("-");
        let saving = if self.store.is_saving(self.store.now()) {
            " (salvando)"
        } else {
            ""
        };
        format!("baiao [{} | {}]{}> ", user, self.scope_label(), saving)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let (handler, public) = (entry.handler, entry.public);
        if !public {
            self.require_user()?;
        }
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", false)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotLoggedIn => {
                cli_io::print_error(CommandError::NotLoggedIn);
                cli_io::print_hint("Try `login e1` to operate as the administrator.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }

    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, last_command: {:?}, user: {:?}, scope: {} }}",
            self.running,
            self.last_command,
            self.store.current_user().map(|employee| employee.id.as_str()),
            self.store.scope()
        )
    }
}
