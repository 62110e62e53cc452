//! Shared application state.
//!
//! One instance is built at startup and cloned into every handler via Axum's
//! `State` extractor. Cloning is cheap: the pool and the processor client
//! both share their underlying connections.

use crate::db::DbPool;
use crate::services::processor::ProcessorClient;

#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: DbPool,

    /// Payment processor client
    pub processor: ProcessorClient,

    /// Currency charges are made in (ISO 4217)
    pub currency: String,
}
