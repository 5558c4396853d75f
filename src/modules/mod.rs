pub mod auth;
pub mod books;
pub mod members;

use std::fmt::Display;

use libris_http::AppError;
use libris_kernel::ModuleRegistry;

use crate::Stores;

/// Register all project modules with the registry, all sharing `stores`
pub fn register_all(registry: &mut ModuleRegistry, stores: &Stores) -> anyhow::Result<()> {
    registry.register_core(members::create_module(stores))?;
    registry.register_core(auth::create_module(stores))?;
    registry.register_custom(books::create_module(stores))?;
    Ok(())
}

/// Map an extractor rejection (bad JSON, bad query string) to a 400.
pub(crate) fn invalid_request(rejection: impl Display) -> AppError {
    AppError::bad_request(rejection.to_string()).with_code("invalid_request")
}
