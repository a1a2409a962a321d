use mapper_mini::errors::MapperError;
use mapper_mini::mapper::{MAPPER_INTERFACE, mapper_interface};
use mapper_mini::reflect::{
    CallableDescriptor, Declaration, ResolutionStage, TypeRegistry, resolve,
};

fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(
            Declaration::interface("app.dao.ConfigMapper")
                .extends(mapper_interface("app.dao.ConfigMapper", "app.model.ConfigModel")),
        )
        .and_then(|r| {
            r.with(
                Declaration::interface("app.dao.UserMapper")
                    .extends("java.io.Serializable")
                    .extends(mapper_interface(
                        "app.dao.UserMapper",
                        "java.util.List<app.model.User>",
                    )),
            )
        })
        .and_then(|r| {
            r.with(
                Declaration::interface("app.dao.BaseMapper")
                    .extends(format!("{MAPPER_INTERFACE}<app.dao.BaseMapper, java.lang.Object>")),
            )
        })
        .and_then(|r| {
            r.with(
                Declaration::interface("app.dao.AuditMapper")
                    .extends("app.dao.BaseMapper<app.model.Audit>"),
            )
        })
        .and_then(|r| {
            r.with(
                Declaration::interface("app.dao.TwiceMapper")
                    .extends(mapper_interface("app.dao.TwiceMapper", "app.model.A"))
                    .extends(mapper_interface("app.dao.TwiceMapper", "app.model.B")),
            )
        })
        .and_then(|r| {
            r.with(
                Declaration::interface("app.dao.BrokenMapper")
                    .extends("mapper_mini.Mapper<app.dao.BrokenMapper"),
            )
        })
        .and_then(|r| r.with(Declaration::interface("app.cycle.A").extends("app.cycle.B")))
        .and_then(|r| r.with(Declaration::interface("app.cycle.B").extends("app.cycle.A")))
        .and_then(|r| r.with(Declaration::class("app.service.ConfigService")))
        .and_then(|r| r.with(Declaration::class("app.model.ConfigModel")))
        .and_then(|r| r.with(Declaration::class("java.lang.String")))
        .expect("fixture registry")
}

fn descriptor(origin: &str, signature: Option<&str>) -> CallableDescriptor {
    CallableDescriptor::from_raw(origin, signature).expect("valid descriptor")
}

#[test]
fn method_reference_resolves_to_its_own_declaration() {
    let resolved = resolve(
        &registry(),
        &descriptor(
            "app.dao.ConfigMapper",
            Some("(Ljava/lang/String;)Lapp/model/ConfigModel;"),
        ),
    )
    .expect("resolves");

    assert_eq!(resolved.name(), "app.dao.ConfigMapper");
    assert_eq!(resolved.stage(), ResolutionStage::Direct);
}

#[test]
fn direct_stage_needs_no_signature() {
    let resolved = resolve(&registry(), &descriptor("app.dao.UserMapper", None)).expect("resolves");
    assert_eq!(resolved.name(), "app.dao.UserMapper");
}

#[test]
fn closure_falls_back_to_signature_parameter() {
    let resolved = resolve(
        &registry(),
        &descriptor(
            "app.service.ConfigService",
            Some("(Lapp/dao/UserMapper;)Ljava/util/List;"),
        ),
    )
    .expect("resolves");

    assert_eq!(resolved.name(), "app.dao.UserMapper");
    assert_eq!(resolved.stage(), ResolutionStage::Signature);
}

#[test]
fn direct_stage_wins_over_signature_stage() {
    let resolved = resolve(
        &registry(),
        &descriptor("app.dao.ConfigMapper", Some("(Lapp/dao/UserMapper;)V")),
    )
    .expect("resolves");

    assert_eq!(resolved.name(), "app.dao.ConfigMapper");
    assert_eq!(resolved.stage(), ResolutionStage::Direct);
}

#[test]
fn first_matching_parameter_wins() {
    let registry = registry();

    let resolved = resolve(
        &registry,
        &descriptor(
            "app.service.ConfigService",
            Some("(Lapp/dao/UserMapper;Lapp/dao/ConfigMapper;)V"),
        ),
    )
    .expect("resolves");
    assert_eq!(resolved.name(), "app.dao.UserMapper");

    let resolved = resolve(
        &registry,
        &descriptor(
            "app.service.ConfigService",
            Some("(Lapp/dao/ConfigMapper;Lapp/dao/UserMapper;)V"),
        ),
    )
    .expect("resolves");
    assert_eq!(resolved.name(), "app.dao.ConfigMapper");
}

#[test]
fn non_mapper_parameters_are_skipped() {
    let resolved = resolve(
        &registry(),
        &descriptor(
            "app.service.ConfigService",
            Some("(Ljava/lang/String;ILapp/model/ConfigModel;Lapp/dao/ConfigMapper;)Z"),
        ),
    )
    .expect("resolves");
    assert_eq!(resolved.name(), "app.dao.ConfigMapper");
}

#[test]
fn signature_stage_follows_interface_hierarchy() {
    let resolved = resolve(
        &registry(),
        &descriptor("app.service.ConfigService", Some("(Lapp/dao/AuditMapper;)V")),
    )
    .expect("resolves");
    assert_eq!(resolved.name(), "app.dao.AuditMapper");
    assert_eq!(resolved.stage(), ResolutionStage::Signature);
}

#[test]
fn direct_stage_only_inspects_declared_interfaces() {
    let result = resolve(&registry(), &descriptor("app.dao.AuditMapper", None));
    assert!(matches!(
        result,
        Err(MapperError::MapperClassNotResolvable { .. })
    ));
}

#[test]
fn unregistered_origin_still_uses_signature() {
    let resolved = resolve(
        &registry(),
        &descriptor("app.web.Handler", Some("(Lapp/dao/ConfigMapper;)V")),
    )
    .expect("resolves");
    assert_eq!(resolved.name(), "app.dao.ConfigMapper");
}

#[test]
fn exhaustion_reports_declaration_and_signature() {
    let err = resolve(
        &registry(),
        &descriptor("app.service.ConfigService", Some("(IJ)V")),
    )
    .expect_err("no reference parameters");

    match &err {
        MapperError::MapperClassNotResolvable {
            declaration,
            signature,
        } => {
            assert_eq!(declaration, "app.service.ConfigService");
            assert_eq!(signature.as_deref(), Some("(IJ)V"));
        }
        other => panic!("Unexpected error type: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("app.service.ConfigService"));
    assert!(message.contains("(IJ)V"));
}

#[test]
fn zero_parameter_signature_fails() {
    let result = resolve(
        &registry(),
        &descriptor("app.service.ConfigService", Some("()Lapp/dao/ConfigMapper;")),
    );
    assert!(matches!(
        result,
        Err(MapperError::MapperClassNotResolvable { .. })
    ));
}

#[test]
fn missing_signature_fails_when_direct_stage_misses() {
    let result = resolve(&registry(), &descriptor("app.service.ConfigService", None));
    assert!(matches!(
        result,
        Err(MapperError::MapperClassNotResolvable { signature: None, .. })
    ));
}

#[test]
fn array_of_mapper_is_not_a_mapper_parameter() {
    let result = resolve(
        &registry(),
        &descriptor("app.service.ConfigService", Some("([Lapp/dao/ConfigMapper;)V")),
    );
    assert!(result.is_err());
}

#[test]
fn multiple_direct_specializations_are_rejected() {
    let result = resolve(&registry(), &descriptor("app.dao.TwiceMapper", None));
    match result {
        Err(MapperError::AmbiguousMapperDeclaration {
            declaration,
            candidates,
        }) => {
            assert_eq!(declaration, "app.dao.TwiceMapper");
            assert_eq!(candidates.len(), 2);
        }
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn malformed_generic_interface_never_matches() {
    let result = resolve(&registry(), &descriptor("app.dao.BrokenMapper", None));
    assert!(matches!(
        result,
        Err(MapperError::MapperClassNotResolvable { .. })
    ));
}

#[test]
fn interface_cycles_terminate() {
    let registry = registry();
    assert!(!registry.implements("app.cycle.A", MAPPER_INTERFACE));

    let result = resolve(
        &registry,
        &descriptor("app.service.ConfigService", Some("(Lapp/cycle/A;)V")),
    );
    assert!(result.is_err());
}
