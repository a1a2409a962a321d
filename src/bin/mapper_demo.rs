// Runs the ConfigMapper queries against the in-memory session provider.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use mapper_mini::core::config::MiniConfig;
use mapper_mini::mapper::{MapperDeclaration, MapperFn};
use mapper_mini::query::MapperMini;
use mapper_mini::reflect::{Declaration, MethodSignature, TypeDescriptor, TypeRegistry};
use mapper_mini::session::{InMemorySessionProvider, SessionFactoryBuilder};

const CONFIG_MODEL: &str = "demo.model.ConfigModel";

#[derive(Debug, Clone, Serialize)]
struct ConfigModel {
    config_key: String,
    config_value: String,
}

struct ConfigMapper {
    rows: Arc<Vec<ConfigModel>>,
}

impl ConfigMapper {
    fn query_list(&self) -> Result<Vec<ConfigModel>> {
        Ok(self.rows.to_vec())
    }

    fn query_config_by_key(&self, config_key: &str) -> Result<Option<ConfigModel>> {
        Ok(self
            .rows
            .iter()
            .find(|row| row.config_key == config_key)
            .cloned())
    }
}

impl MapperDeclaration for ConfigMapper {
    const NAME: &'static str = "demo.dao.ConfigMapper";

    fn declaration() -> Declaration {
        Self::mapper_declaration(CONFIG_MODEL)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = MiniConfig::from_env().map_err(anyhow::Error::msg)?;

    let registry = TypeRegistry::new()
        .with(ConfigMapper::declaration())?
        .with(Declaration::class(CONFIG_MODEL))?
        .with(Declaration::class("demo.service.ConfigService"))?;

    let rows = Arc::new(vec![
        ConfigModel {
            config_key: "cache.ttl".into(),
            config_value: "300".into(),
        },
        ConfigModel {
            config_key: "feature.beta".into(),
            config_value: "off".into(),
        },
    ]);
    let provider = InMemorySessionProvider::initialized(
        SessionFactoryBuilder::new(config).proxy(move || ConfigMapper {
            rows: Arc::clone(&rows),
        }),
    );
    let mini = MapperMini::new(provider, Arc::new(registry));

    let by_key = MapperFn::method::<ConfigMapper, _>(
        "queryConfigByKey",
        MethodSignature::new(
            vec![TypeDescriptor::object("java.lang.String")],
            TypeDescriptor::object(CONFIG_MODEL),
        ),
        |m: &ConfigMapper| m.query_config_by_key("cache.ttl"),
    );
    let row = mini.query_one(&by_key)?;
    info!(row = %serde_json::to_string(&row)?, "queryConfigByKey");

    let list_all = MapperFn::closure(
        "demo.service.ConfigService",
        Some("(Ldemo/dao/ConfigMapper;)Ljava/util/List;".parse()?),
        |m: &ConfigMapper| m.query_list(),
    );
    let rows = mini.query_many(&list_all)?;
    info!(count = rows.len(), rows = %serde_json::to_string(&rows)?, "queryList");

    Ok(())
}
