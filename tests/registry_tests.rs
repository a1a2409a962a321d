use mapper_mini::errors::MapperError;
use mapper_mini::mapper::{MAPPER_INTERFACE, MapperDeclaration};
use mapper_mini::reflect::registry::is_qualified_name;
use mapper_mini::reflect::{Declaration, DeclarationKind, TypeRegistry};

struct ConfigMapper;

impl MapperDeclaration for ConfigMapper {
    const NAME: &'static str = "app.dao.ConfigMapper";

    fn declaration() -> Declaration {
        Self::mapper_declaration("app.model.ConfigModel")
    }
}

#[test]
fn mapper_declaration_is_self_referential() {
    let declaration = ConfigMapper::declaration();
    assert_eq!(declaration.name, "app.dao.ConfigMapper");
    assert_eq!(declaration.kind, DeclarationKind::Interface);
    assert_eq!(
        declaration.interfaces,
        vec!["mapper_mini.Mapper<app.dao.ConfigMapper, app.model.ConfigModel>"]
    );
}

#[test]
fn registry_lookup_and_hierarchy() {
    let registry = TypeRegistry::new()
        .with(ConfigMapper::declaration())
        .and_then(|r| r.with(Declaration::class("app.dao.ConfigMapperImpl").extends("app.dao.ConfigMapper")))
        .expect("registry");

    assert_eq!(registry.len(), 2);
    assert!(registry.get("app.dao.ConfigMapper").is_some());
    assert!(registry.get("app.dao.Missing").is_none());
    assert!(registry.implements("app.dao.ConfigMapper", MAPPER_INTERFACE));
    assert!(registry.implements("app.dao.ConfigMapperImpl", MAPPER_INTERFACE));
    assert!(!registry.implements("app.dao.Missing", MAPPER_INTERFACE));
}

#[test]
fn rejects_duplicate_declarations() {
    let mut registry = TypeRegistry::new();
    registry.register(ConfigMapper::declaration()).expect("first registration");

    match registry.register(ConfigMapper::declaration()) {
        Err(MapperError::DuplicateDeclaration(name)) => assert_eq!(name, "app.dao.ConfigMapper"),
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn rejects_malformed_names() {
    for name in ["", "app/dao/ConfigMapper", "app..Config", "1app.Config", "app.Config<T>"] {
        assert!(!is_qualified_name(name), "{name:?} should be rejected");
        let result = TypeRegistry::new().with(Declaration::interface(name));
        assert!(matches!(result, Err(MapperError::InvalidDeclaration(_))));
    }
    assert!(is_qualified_name("app.dao.Config$Inner"));
    assert!(is_qualified_name("Plain"));
}
