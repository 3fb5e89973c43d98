pub mod config;
pub mod expense;
pub mod goal;
pub mod income;
pub mod investment;
pub mod obligations;
pub mod report;
pub mod snapshot;
pub mod system;

use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in income::definitions()
        .into_iter()
        .chain(expense::definitions())
        .chain(obligations::definitions())
        .chain(investment::definitions())
        .chain(goal::definitions())
        .chain(report::definitions())
        .chain(snapshot::definitions())
        .chain(config::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}
