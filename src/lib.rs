#![doc(test(attr(deny(warnings))))]

//! Baião Gestor: consolidated financial management for the Baião consulting
//! group, exposed through an interactive and scriptable shell.

pub mod cli;
pub mod errors;
pub mod insight;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Baião Gestor tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
