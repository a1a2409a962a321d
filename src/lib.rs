//! mapper-mini - run mapper queries from a bare method reference.
//!
//! Given a callable such as `ConfigMapper::query_config_by_key`, the crate
//! works out at runtime which mapper declaration the callable belongs to,
//! asks a session for a live proxy of that mapper, invokes the callable on it
//! and closes the session again.
//!
//! # Architecture
//!
//! - `reflect::origin` extracts a callable's provenance into a descriptor
//! - `reflect::matcher` resolves the descriptor to a mapper declaration
//! - `session` is the boundary to the persistence layer
//! - `query::MapperMini` ties them together behind `query_many` / `query_one`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use mapper_mini::core::config::MiniConfig;
//! use mapper_mini::mapper::{MapperDeclaration, MapperFn};
//! use mapper_mini::query::MapperMini;
//! use mapper_mini::reflect::{Declaration, TypeRegistry};
//! use mapper_mini::session::{InMemorySessionProvider, SessionFactoryBuilder};
//!
//! struct ConfigMapper;
//!
//! impl ConfigMapper {
//!     fn query_config_by_key(&self, key: &str) -> anyhow::Result<Option<String>> {
//!         Ok((key == "mode").then(|| "strict".to_string()))
//!     }
//! }
//!
//! impl MapperDeclaration for ConfigMapper {
//!     const NAME: &'static str = "app.dao.ConfigMapper";
//!
//!     fn declaration() -> Declaration {
//!         Self::mapper_declaration("app.model.ConfigModel")
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TypeRegistry::new().with(ConfigMapper::declaration())?;
//! let provider = InMemorySessionProvider::initialized(
//!     SessionFactoryBuilder::new(MiniConfig::default()).proxy(|| ConfigMapper),
//! );
//! let mini = MapperMini::new(provider, Arc::new(registry));
//!
//! let query = MapperFn::method::<ConfigMapper, _>(
//!     "queryConfigByKey",
//!     "(Ljava/lang/String;)Lapp/model/ConfigModel;".parse()?,
//!     |m: &ConfigMapper| m.query_config_by_key("mode"),
//! );
//! assert_eq!(mini.query_one(&query)?, Some("strict".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod errors;
pub mod mapper;
pub mod query;
pub mod reflect;
pub mod session;

/// Configure structured logging with JSON output.
///
/// Installs a `tracing-subscriber` JSON formatter with targets. Calling it
/// again after a subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// mapper_mini::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
