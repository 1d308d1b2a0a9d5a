//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AppendAddressCommand, FixtureAppendAddressCommand, FixtureReplaceHomeAddressCommand,
    ReplaceHomeAddressCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub append: Arc<dyn AppendAddressCommand>,
    pub replace_home: Arc<dyn ReplaceHomeAddressCommand>,
}

impl HttpState {
    /// Bundle the driving ports used by the address handlers.
    pub fn new(
        append: Arc<dyn AppendAddressCommand>,
        replace_home: Arc<dyn ReplaceHomeAddressCommand>,
    ) -> Self {
        Self {
            append,
            replace_home,
        }
    }
}

impl Default for HttpState {
    /// State whose commands always succeed; useful where handlers are not
    /// under test.
    fn default() -> Self {
        Self::new(
            Arc::new(FixtureAppendAddressCommand),
            Arc::new(FixtureReplaceHomeAddressCommand),
        )
    }
}
