//! Recovers where a mapper callable was written.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::descriptor::MethodSignature;
use crate::errors::MapperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallableKind {
    /// Direct reference to a named method on a mapper declaration.
    MethodReference,
    /// Hand-written closure body.
    Closure,
}

/// Provenance tag attached to a callable when it is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub kind: CallableKind,
    /// Declaration the callable was written in.
    pub declaring: String,
    /// Method name for method references.
    pub method: Option<String>,
    pub signature: Option<MethodSignature>,
}

impl Provenance {
    pub fn method_reference(
        declaring: impl Into<String>,
        method: impl Into<String>,
        signature: Option<MethodSignature>,
    ) -> Self {
        Self {
            kind: CallableKind::MethodReference,
            declaring: declaring.into(),
            method: Some(method.into()),
            signature,
        }
    }

    pub fn closure(declaring: impl Into<String>, signature: Option<MethodSignature>) -> Self {
        Self {
            kind: CallableKind::Closure,
            declaring: declaring.into(),
            method: None,
            signature,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.method) {
            (CallableKind::MethodReference, Some(method)) => {
                write!(f, "{}::{}", self.declaring, method)
            }
            _ => write!(f, "closure in {}", self.declaring),
        }
    }
}

/// A callable that can report its own provenance.
pub trait SelfDescribing {
    fn provenance(&self) -> Option<&Provenance>;
}

/// Snapshot of a callable's origin, taken once per resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallableDescriptor {
    pub origin_declaration: String,
    pub implementation_signature: Option<MethodSignature>,
}

impl CallableDescriptor {
    pub fn new(
        origin_declaration: impl Into<String>,
        implementation_signature: Option<MethodSignature>,
    ) -> Self {
        Self {
            origin_declaration: origin_declaration.into(),
            implementation_signature,
        }
    }

    /// Builds a descriptor from a legacy descriptor string.
    ///
    /// # Errors
    ///
    /// Returns [`MapperError::InvalidSignature`] if the signature does not parse.
    pub fn from_raw(
        origin_declaration: impl Into<String>,
        implementation_signature: Option<&str>,
    ) -> Result<Self, MapperError> {
        let signature = implementation_signature
            .map(str::parse::<MethodSignature>)
            .transpose()?;
        Ok(Self::new(origin_declaration, signature))
    }
}

/// Extracts the descriptor of a self-describing callable.
///
/// # Errors
///
/// Returns [`MapperError::UnintrospectableCallable`] when the callable carries
/// no provenance.
pub fn extract<C>(callable: &C) -> Result<CallableDescriptor, MapperError>
where
    C: SelfDescribing + ?Sized,
{
    let Some(provenance) = callable.provenance() else {
        error!("Callable has no provenance metadata");
        return Err(MapperError::UnintrospectableCallable);
    };

    let descriptor = CallableDescriptor::new(&provenance.declaring, provenance.signature.clone());
    debug!(
        origin = %descriptor.origin_declaration,
        signature = ?descriptor.implementation_signature.as_ref().map(ToString::to_string),
        "Extracted callable descriptor"
    );
    Ok(descriptor)
}
