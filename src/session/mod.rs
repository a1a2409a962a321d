//! Boundary to the persistence layer that hands out mapper proxies.

pub mod memory;

use std::any::Any;

use crate::errors::SessionError;
use crate::reflect::ResolvedMapperClass;

pub use memory::{InMemorySession, InMemorySessionProvider, SessionFactory, SessionFactoryBuilder};

/// A live mapper implementation, downcast by the caller to its concrete type.
pub type Proxy = Box<dyn Any + Send>;

pub trait Session: Send {
    /// # Errors
    ///
    /// Fails if the session is closed or has no proxy for `mapper`.
    fn interface_proxy(&mut self, mapper: &ResolvedMapperClass) -> Result<Proxy, SessionError>;

    /// Releases the session. Safe to call more than once.
    fn close(&mut self);

    fn is_closed(&self) -> bool;
}

pub trait SessionProvider: Send + Sync {
    type Session: Session;

    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] if the provider was never configured,
    /// [`SessionError::Acquisition`] if no session can be handed out.
    fn open_session(&self) -> Result<Self::Session, SessionError>;
}

/// Closes the wrapped session when dropped, on every exit path.
pub(crate) struct SessionGuard<S: Session> {
    session: S,
}

impl<S: Session> SessionGuard<S> {
    pub(crate) fn new(session: S) -> Self {
        Self { session }
    }

    pub(crate) fn session(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: Session> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.close();
    }
}
