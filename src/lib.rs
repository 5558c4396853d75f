//! Libris application library
//!
//! The catalog, member, and login modules, the stores they share, and the
//! server bootstrap.

use std::sync::Arc;

use libris_authz::{Clock, TokenAuthority};
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;
pub mod utils;

use modules::books::store::CatalogStore;
use modules::members::store::CredentialStore;

/// The in-memory stores, built once at startup and shared by every module.
#[derive(Clone, Default)]
pub struct Stores {
    pub catalog: Arc<CatalogStore>,
    pub members: Arc<CredentialStore>,
    pub tokens: Arc<TokenAuthority>,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores whose token expiry reads `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tokens: Arc::new(TokenAuthority::with_clock(clock)),
            ..Self::default()
        }
    }
}

/// Registry with every module wired to `stores`.
pub fn registry(stores: &Stores) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, stores)?;
    Ok(registry)
}

/// Boot the modules, serve HTTP until Ctrl-C, then stop the modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let stores = Stores::new();
    let registry = registry(&stores)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.boot(&ctx).await?;
    let served = libris_http::start_server(&registry, &settings).await;
    let stopped = registry.shutdown().await;

    served?;
    stopped
}
