pub mod backup;
pub mod client;
pub mod company;
pub mod config;
pub mod contract;
pub mod dashboard;
pub mod insight;
pub mod report;
pub mod session;
pub mod system;
pub mod transaction;

use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(session::definitions())
        .chain(company::definitions())
        .chain(client::definitions())
        .chain(contract::definitions())
        .chain(transaction::definitions())
        .chain(dashboard::definitions())
        .chain(report::definitions())
        .chain(backup::definitions())
        .chain(insight::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}
