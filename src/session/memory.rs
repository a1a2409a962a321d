use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::{Proxy, Session, SessionProvider};
use crate::core::config::MiniConfig;
use crate::errors::SessionError;
use crate::mapper::MapperDeclaration;
use crate::reflect::ResolvedMapperClass;

type ProxyFactory = Arc<dyn Fn() -> Proxy + Send + Sync>;

/// Collects the proxy factories for a [`SessionFactory`].
pub struct SessionFactoryBuilder {
    config: MiniConfig,
    proxies: HashMap<String, ProxyFactory>,
}

impl SessionFactoryBuilder {
    #[must_use]
    pub fn new(config: MiniConfig) -> Self {
        Self {
            config,
            proxies: HashMap::new(),
        }
    }

    /// Registers the proxy constructor for mapper declaration `D`.
    #[must_use]
    pub fn proxy<D, F>(mut self, factory: F) -> Self
    where
        D: MapperDeclaration,
        F: Fn() -> D + Send + Sync + 'static,
    {
        self.proxies
            .insert(D::NAME.to_string(), Arc::new(move || Box::new(factory()) as Proxy));
        self
    }

    #[must_use]
    pub fn build(self) -> SessionFactory {
        SessionFactory {
            config: self.config,
            proxies: self.proxies,
            open: AtomicUsize::new(0),
            opened_total: AtomicUsize::new(0),
        }
    }
}

pub struct SessionFactory {
    config: MiniConfig,
    proxies: HashMap<String, ProxyFactory>,
    open: AtomicUsize,
    opened_total: AtomicUsize,
}

impl SessionFactory {
    #[must_use]
    pub fn config(&self) -> &MiniConfig {
        &self.config
    }

    fn acquire(&self) -> Result<usize, SessionError> {
        let open = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(max) = self.config.max_sessions {
            if open > max {
                self.open.fetch_sub(1, Ordering::SeqCst);
                warn!(max_sessions = max, "Session limit reached");
                return Err(SessionError::Acquisition(format!(
                    "all {max} sessions are in use"
                )));
            }
        }
        Ok(self.opened_total.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn release(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Session provider backed by in-process proxy factories.
///
/// The factory is set exactly once; concurrent first calls to
/// [`InMemorySessionProvider::initialize`] race safely and only one wins.
#[derive(Default)]
pub struct InMemorySessionProvider {
    factory: OnceCell<Arc<SessionFactory>>,
}

impl InMemorySessionProvider {
    /// Creates an unconfigured provider. Opening a session fails until
    /// [`InMemorySessionProvider::initialize`] is called.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initialized(builder: SessionFactoryBuilder) -> Self {
        let provider = Self::new();
        provider.initialize(builder);
        provider
    }

    /// Installs the session factory. Returns `false` if one was already
    /// installed, in which case `builder` is discarded.
    pub fn initialize(&self, builder: SessionFactoryBuilder) -> bool {
        let mut installed = false;
        self.factory.get_or_init(|| {
            installed = true;
            let factory = builder.build();
            info!(
                config_path = %factory.config.config_path.display(),
                environment = factory.config.environment.as_deref().unwrap_or("default"),
                mappers = factory.proxies.len(),
                "Session factory initialized"
            );
            Arc::new(factory)
        });
        if !installed {
            debug!("Session factory already initialized; ignoring");
        }
        installed
    }

    /// Drops the session factory. Sessions still open keep their own handle.
    pub fn shutdown(&mut self) {
        if self.factory.take().is_some() {
            info!("Session factory shut down");
        }
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.factory.get().is_some()
    }

    /// Sessions currently open.
    #[must_use]
    pub fn open_sessions(&self) -> usize {
        self.factory
            .get()
            .map_or(0, |f| f.open.load(Ordering::SeqCst))
    }

    /// Sessions handed out since initialization.
    #[must_use]
    pub fn sessions_opened(&self) -> usize {
        self.factory
            .get()
            .map_or(0, |f| f.opened_total.load(Ordering::SeqCst))
    }
}

impl SessionProvider for InMemorySessionProvider {
    type Session = InMemorySession;

    fn open_session(&self) -> Result<Self::Session, SessionError> {
        let factory = self.factory.get().ok_or(SessionError::NotInitialized)?;
        let id = factory.acquire()?;
        debug!(session = id, "Session opened");
        Ok(InMemorySession {
            id,
            factory: Arc::clone(factory),
            closed: false,
        })
    }
}

pub struct InMemorySession {
    id: usize,
    factory: Arc<SessionFactory>,
    closed: bool,
}

impl InMemorySession {
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Session for InMemorySession {
    fn interface_proxy(&mut self, mapper: &ResolvedMapperClass) -> Result<Proxy, SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        let factory = self
            .factory
            .proxies
            .get(mapper.name())
            .ok_or_else(|| SessionError::UnknownMapper(mapper.name().to_string()))?;
        debug!(session = self.id, mapper = %mapper, "Created mapper proxy");
        Ok(factory())
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.factory.release();
        debug!(session = self.id, "Session closed");
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.close();
    }
}
