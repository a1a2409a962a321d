//! Resolves the mapper declaration a callable belongs to.
//!
//! Resolution runs in two ordered stages:
//!
//! 1. **Direct.** The origin declaration's own interfaces are scanned for a
//!    specialization of [`MAPPER_INTERFACE`]. This is the path taken by method
//!    references such as `ConfigMapper::query_config_by_key`.
//! 2. **Signature.** For closures written elsewhere, the first reference-typed
//!    parameter whose declaration implements the marker anywhere in its
//!    hierarchy is taken as the mapper.
//!
//! Stage 1 always wins over stage 2, and within stage 2 the leftmost matching
//! parameter wins.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::generics::strip_generic_suffix;
use super::origin::CallableDescriptor;
use super::registry::{Declaration, TypeRegistry};
use crate::errors::MapperError;
use crate::mapper::MAPPER_INTERFACE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    Direct,
    Signature,
}

/// Handle to the mapper declaration a callable resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedMapperClass {
    declaration: Arc<Declaration>,
    stage: ResolutionStage,
}

impl ResolvedMapperClass {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.declaration.name
    }

    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    #[must_use]
    pub fn stage(&self) -> ResolutionStage {
        self.stage
    }
}

impl fmt::Display for ResolvedMapperClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves `descriptor` against the declarations in `registry`.
///
/// # Errors
///
/// - [`MapperError::AmbiguousMapperDeclaration`] if the origin declares the
///   marker interface more than once.
/// - [`MapperError::MapperClassNotResolvable`] if neither stage matches.
pub fn resolve(
    registry: &TypeRegistry,
    descriptor: &CallableDescriptor,
) -> Result<ResolvedMapperClass, MapperError> {
    #[cfg(feature = "debug-logs")]
    debug!(?descriptor, "Resolving mapper class");
    #[cfg(not(feature = "debug-logs"))]
    debug!(origin = %descriptor.origin_declaration, "Resolving mapper class");

    if let Some(resolved) = resolve_direct(registry, &descriptor.origin_declaration)? {
        debug!(mapper = %resolved, "Mapper resolved from declared interfaces");
        return Ok(resolved);
    }

    if let Some(resolved) = resolve_from_signature(registry, descriptor) {
        debug!(mapper = %resolved, "Mapper resolved from implementation signature");
        return Ok(resolved);
    }

    let signature = descriptor
        .implementation_signature
        .as_ref()
        .map(ToString::to_string);
    error!(
        origin = %descriptor.origin_declaration,
        signature = signature.as_deref().unwrap_or("<none>"),
        "Unable to identify mapper declaration for callable"
    );
    Err(MapperError::MapperClassNotResolvable {
        declaration: descriptor.origin_declaration.clone(),
        signature,
    })
}

/// Stage 1: scans the directly declared interfaces of `origin`.
fn resolve_direct(
    registry: &TypeRegistry,
    origin: &str,
) -> Result<Option<ResolvedMapperClass>, MapperError> {
    let Some(declaration) = registry.get(origin) else {
        debug!(origin = %origin, "Origin declaration is not registered");
        return Ok(None);
    };

    let candidates: Vec<&str> = declaration
        .declared_interfaces()
        .filter(|interface| match strip_generic_suffix(interface) {
            Some(raw) => raw == MAPPER_INTERFACE,
            None => {
                warn!(origin = %origin, interface = %interface, "Skipping malformed generic interface");
                false
            }
        })
        .collect();

    match candidates.as_slice() {
        [] => Ok(None),
        [_] => Ok(Some(ResolvedMapperClass {
            declaration: Arc::clone(declaration),
            stage: ResolutionStage::Direct,
        })),
        many => {
            error!(origin = %origin, candidates = ?many, "Declaration specializes the mapper interface more than once");
            Err(MapperError::AmbiguousMapperDeclaration {
                declaration: origin.to_string(),
                candidates: many.iter().map(ToString::to_string).collect(),
            })
        }
    }
}

/// Stage 2: first reference parameter, left to right, that implements the marker.
fn resolve_from_signature(
    registry: &TypeRegistry,
    descriptor: &CallableDescriptor,
) -> Option<ResolvedMapperClass> {
    let Some(signature) = descriptor.implementation_signature.as_ref() else {
        debug!(origin = %descriptor.origin_declaration, "No implementation signature to fall back on");
        return None;
    };
    debug!(signature = %signature, "Falling back to implementation signature");

    signature
        .reference_parameters()
        .find(|param| registry.implements(param, MAPPER_INTERFACE))
        .and_then(|param| registry.get(param))
        .map(|declaration| ResolvedMapperClass {
            declaration: Arc::clone(declaration),
            stage: ResolutionStage::Signature,
        })
}
