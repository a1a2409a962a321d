//! Query entry points: open a session, resolve the mapper, invoke, close.

use std::any::type_name;
use std::sync::Arc;

use tracing::{debug, error};

use crate::errors::MapperError;
use crate::mapper::MapperFn;
use crate::reflect::{self, TypeRegistry};
use crate::session::{Session, SessionGuard, SessionProvider};

/// Runs mapper callables against sessions from `P`.
pub struct MapperMini<P: SessionProvider> {
    provider: P,
    registry: Arc<TypeRegistry>,
}

impl<P: SessionProvider> MapperMini<P> {
    pub fn new(provider: P, registry: Arc<TypeRegistry>) -> Self {
        Self { provider, registry }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Executes a query that returns many rows.
    ///
    /// # Errors
    ///
    /// Any resolution, session or query failure; the session is closed first.
    pub fn query_many<M, T>(&self, callable: &MapperFn<M, Vec<T>>) -> Result<Vec<T>, MapperError>
    where
        M: 'static,
    {
        self.execute("query_many", callable)
    }

    /// Executes a query that returns at most one row.
    ///
    /// # Errors
    ///
    /// Any resolution, session or query failure; the session is closed first.
    pub fn query_one<M, T>(
        &self,
        callable: &MapperFn<M, Option<T>>,
    ) -> Result<Option<T>, MapperError>
    where
        M: 'static,
    {
        self.execute("query_one", callable)
    }

    fn execute<M, R>(&self, operation: &'static str, callable: &MapperFn<M, R>) -> Result<R, MapperError>
    where
        M: 'static,
    {
        let session = self.provider.open_session().map_err(|source| {
            error!(operation, callable = %callable.label(), error = %source, "Failed to open session");
            MapperError::Session {
                operation,
                callable: callable.label(),
                source,
            }
        })?;
        let mut guard = SessionGuard::new(session);

        let descriptor = reflect::extract(callable)?;
        let mapper = reflect::resolve(&self.registry, &descriptor)?;

        let proxy = guard
            .session()
            .interface_proxy(&mapper)
            .map_err(|source| {
                error!(operation, mapper = %mapper, error = %source, "Failed to obtain mapper proxy");
                MapperError::Session {
                    operation,
                    callable: callable.label(),
                    source,
                }
            })?;
        let proxy = proxy.downcast::<M>().map_err(|_| {
            error!(operation, mapper = %mapper, expected = type_name::<M>(), "Proxy type mismatch");
            MapperError::ProxyTypeMismatch {
                declaration: mapper.name().to_string(),
                expected: type_name::<M>(),
            }
        })?;

        debug!(operation, mapper = %mapper, stage = ?mapper.stage(), "Invoking mapper");
        callable.apply(&proxy).map_err(|e| {
            error!(operation, mapper = %mapper, error = %e, "Mapper query failed");
            MapperError::Query(e)
        })
    }
}
