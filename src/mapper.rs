//! The mapper marker interface and the self-describing callable wrapper.

use std::fmt;

use crate::reflect::descriptor::MethodSignature;
use crate::reflect::origin::{Provenance, SelfDescribing};
use crate::reflect::registry::Declaration;

/// Qualified name of the marker interface every mapper declaration specializes.
pub const MAPPER_INTERFACE: &str = "mapper_mini.Mapper";

/// A callable from a mapper `M` to a result `T` that may fail.
pub trait Mapper<M, T>: Send + Sync {
    /// # Errors
    ///
    /// Whatever the underlying query reports.
    fn apply(&self, mapper: &M) -> anyhow::Result<T>;
}

impl<M, T, F> Mapper<M, T> for F
where
    F: Fn(&M) -> anyhow::Result<T> + Send + Sync,
{
    fn apply(&self, mapper: &M) -> anyhow::Result<T> {
        self(mapper)
    }
}

/// Marker interface string for `Mapper<mapper, result>`.
#[must_use]
pub fn mapper_interface(mapper: &str, result: &str) -> String {
    format!("{MAPPER_INTERFACE}<{mapper}, {result}>")
}

/// A query interface whose proxy a session can produce.
///
/// Implementors declare `Mapper<Self, R>` among their interfaces, usually via
/// [`MapperDeclaration::mapper_declaration`].
pub trait MapperDeclaration: Send + 'static {
    /// Dotted qualified name, e.g. `app.dao.ConfigMapper`.
    const NAME: &'static str;

    fn declaration() -> Declaration;

    /// Interface declaration extending `Mapper<Self, result>`.
    fn mapper_declaration(result: &str) -> Declaration {
        Declaration::interface(Self::NAME).extends(mapper_interface(Self::NAME, result))
    }
}

/// A mapper callable paired with the provenance recorded at construction.
pub struct MapperFn<M, T> {
    provenance: Option<Provenance>,
    func: Box<dyn Mapper<M, T>>,
}

impl<M: 'static, T: 'static> MapperFn<M, T> {
    /// Direct reference to `method` on mapper declaration `D`.
    pub fn method<D, F>(method: &str, signature: MethodSignature, func: F) -> Self
    where
        D: MapperDeclaration,
        F: Fn(&M) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            provenance: Some(Provenance::method_reference(
                D::NAME,
                method,
                Some(signature),
            )),
            func: Box::new(func),
        }
    }

    /// Closure body written inside `enclosing`, with the body's own signature
    /// (the receiver is its first parameter).
    pub fn closure<F>(enclosing: &str, signature: Option<MethodSignature>, func: F) -> Self
    where
        F: Fn(&M) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            provenance: Some(Provenance::closure(enclosing, signature)),
            func: Box::new(func),
        }
    }

    /// Callable with no provenance. Resolution of it always fails.
    pub fn opaque<F>(func: F) -> Self
    where
        F: Fn(&M) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            provenance: None,
            func: Box::new(func),
        }
    }

    pub fn with_provenance<F>(provenance: Provenance, func: F) -> Self
    where
        F: Fn(&M) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self {
            provenance: Some(provenance),
            func: Box::new(func),
        }
    }
}

impl<M, T> MapperFn<M, T> {
    /// # Errors
    ///
    /// Whatever the wrapped callable reports.
    pub fn apply(&self, mapper: &M) -> anyhow::Result<T> {
        self.func.apply(mapper)
    }

    /// Human-readable label for logs and error context.
    #[must_use]
    pub fn label(&self) -> String {
        self.provenance
            .as_ref()
            .map_or_else(|| "<opaque callable>".to_string(), ToString::to_string)
    }
}

impl<M, T> SelfDescribing for MapperFn<M, T> {
    fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }
}

impl<M, T> fmt::Debug for MapperFn<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperFn")
            .field("provenance", &self.provenance)
            .finish_non_exhaustive()
    }
}
