//! Per-endpoint bounded connection pool.
//!
//! Each endpoint gets its own idle set and its own `Semaphore` sized to
//! `max_conns`; acquiring a permit is the single cooperative-suspension point
//! a caller hits when every connection to that endpoint is already in use.
//! The idle set and the closed flag live behind one `Mutex` per pool instance
//! (one pool for trackers, one for storages) so the
//! `idle_count + in_use_count <= max_conns` invariant always holds.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::errors::{FastDFSError, Result};
use crate::transport::Transport;

struct EndpointState {
    idle: Vec<Transport>,
    semaphore: Arc<Semaphore>,
}

impl EndpointState {
    fn new(max_conns: usize) -> Self {
        Self {
            idle: Vec::new(),
            semaphore: Arc::new(Semaphore::new(max_conns)),
        }
    }
}

struct Inner {
    closed: bool,
    endpoints: HashMap<SocketAddr, EndpointState>,
}

/// A transport on loan from the pool. Borrowers call [`Pool::release`] when
/// done; dropping a `Leased` without releasing it force-closes the transport
/// and frees its permit, so a panicking caller can never leak a pool slot.
pub struct Leased {
    transport: Option<Transport>,
    permit: Option<OwnedSemaphorePermit>,
}

impl Deref for Leased {
    type Target = Transport;
    fn deref(&self) -> &Transport {
        self.transport.as_ref().expect("transport already released")
    }
}

impl DerefMut for Leased {
    fn deref_mut(&mut self) -> &mut Transport {
        self.transport.as_mut().expect("transport already released")
    }
}

impl Drop for Leased {
    fn drop(&mut self) {
        if let Some(transport) = self.transport.take() {
            transport.force_close();
        }
    }
}

/// A bounded pool of transports, keyed by endpoint.
pub struct Pool {
    max_conns: usize,
    connect_timeout: Duration,
    idle_timeout: Duration,
    enable_pool: bool,
    inner: Arc<Mutex<Inner>>,
    sweeper: JoinHandle<()>,
}

impl Pool {
    /// Creates a new, empty pool. Endpoints are registered lazily on first borrow.
    pub fn new(max_conns: usize, connect_timeout: Duration, idle_timeout: Duration, enable_pool: bool) -> Self {
        let inner = Arc::new(Mutex::new(Inner {
            closed: false,
            endpoints: HashMap::new(),
        }));

        let sweeper = spawn_sweeper(inner.clone(), idle_timeout);

        Self {
            max_conns,
            connect_timeout,
            idle_timeout,
            enable_pool,
            inner,
            sweeper,
        }
    }

    /// Borrows a transport to `addr`: an idle healthy one if available and
    /// pooling is enabled, otherwise a freshly connected one. Blocks (without
    /// holding any lock) when `max_conns` are already in use for this endpoint.
    pub async fn borrow(&self, addr: SocketAddr) -> Result<Leased> {
        let semaphore = {
            let mut guard = self.inner.lock().await;
            if guard.closed {
                return Err(FastDFSError::ClientClosed);
            }
            guard
                .endpoints
                .entry(addr)
                .or_insert_with(|| EndpointState::new(self.max_conns))
                .semaphore
                .clone()
        };

        let permit = semaphore
            .acquire_owned()
            .await
            .map_err(|_| FastDFSError::ClientClosed)?;

        if self.enable_pool {
            let mut guard = self.inner.lock().await;
            if guard.closed {
                return Err(FastDFSError::ClientClosed);
            }
            if let Some(state) = guard.endpoints.get_mut(&addr) {
                while let Some(transport) = state.idle.pop() {
                    if transport.last_used().elapsed() < self.idle_timeout {
                        tracing::debug!(%addr, "reusing pooled transport");
                        return Ok(Leased {
                            transport: Some(transport),
                            permit: Some(permit),
                        });
                    }
                    tracing::debug!(%addr, "discarding idle transport past idle_timeout");
                }
            }
        }

        tracing::debug!(%addr, "establishing new transport");
        let transport = Transport::connect(addr, self.connect_timeout).await?;
        Ok(Leased {
            transport: Some(transport),
            permit: Some(permit),
        })
    }

    /// Returns a transport to the pool. Unhealthy transports (and all
    /// transports when `enable_pool` is false) are closed instead of pooled.
    /// Either way, the endpoint's admission permit is released.
    pub async fn release(&self, mut leased: Leased, healthy: bool) {
        let transport = leased.transport.take();
        let permit = leased.permit.take();

        if let Some(transport) = transport {
            let addr = transport.addr();
            let should_pool = healthy && self.enable_pool && !transport.is_poisoned();

            if should_pool {
                let mut guard = self.inner.lock().await;
                // If the pool closed concurrently, or this endpoint is already
                // at max_conns idle entries, `transport` is simply dropped here.
                if !guard.closed {
                    if let Some(state) = guard.endpoints.get_mut(&addr) {
                        if state.idle.len() < self.max_conns {
                            state.idle.push(transport);
                        }
                    }
                }
            }
        }

        drop(permit);
    }

    /// Marks the pool closed, drains and closes every idle transport, and
    /// causes subsequent `borrow` calls (including ones already waiting on a
    /// semaphore permit) to fail with `ClientClosed`. Safe to call more than once.
    pub async fn close(&self) {
        let mut guard = self.inner.lock().await;
        if guard.closed {
            return;
        }
        guard.closed = true;
        for state in guard.endpoints.values() {
            state.semaphore.close();
        }
        guard.endpoints.clear();
    }

    /// Total idle transport count across all endpoints, for tests and diagnostics.
    pub async fn idle_count(&self) -> usize {
        let guard = self.inner.lock().await;
        guard.endpoints.values().map(|s| s.idle.len()).sum()
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}

fn spawn_sweeper(inner: Arc<Mutex<Inner>>, idle_timeout: Duration) -> JoinHandle<()> {
    let period = (idle_timeout / 2).max(Duration::from_millis(50));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick fires immediately; skip it
        loop {
            ticker.tick().await;
            let mut guard = inner.lock().await;
            if guard.closed {
                return;
            }
            let now = Instant::now();
            for state in guard.endpoints.values_mut() {
                state
                    .idle
                    .retain(|t| now.duration_since(t.last_used()) <= idle_timeout);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn echo_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                tokio::spawn(async move {
                    use tokio::io::{AsyncReadExt, AsyncWriteExt};
                    let mut buf = [0u8; 1024];
                    while let Ok(n) = socket.read(&mut buf).await {
                        if n == 0 || socket.write_all(&buf[..n]).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });
        addr
    }

    #[tokio::test]
    async fn borrow_reuses_released_transport() {
        let addr = echo_server().await;
        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);

        let leased = pool.borrow(addr).await.unwrap();
        pool.release(leased, true).await;
        assert_eq!(pool.idle_count().await, 1);

        let _leased = pool.borrow(addr).await.unwrap();
        assert_eq!(pool.idle_count().await, 0);
    }

    #[tokio::test]
    async fn unhealthy_release_is_not_pooled() {
        let addr = echo_server().await;
        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);

        let leased = pool.borrow(addr).await.unwrap();
        pool.release(leased, false).await;
        assert_eq!(pool.idle_count().await, 0);
    }

    #[tokio::test]
    async fn disabled_pool_never_retains_idle_transports() {
        let addr = echo_server().await;
        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), false);

        let leased = pool.borrow(addr).await.unwrap();
        pool.release(leased, true).await;
        assert_eq!(pool.idle_count().await, 0);
    }

    #[tokio::test]
    async fn close_rejects_subsequent_borrows() {
        let addr = echo_server().await;
        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        pool.close().await;

        let result = pool.borrow(addr).await;
        assert!(matches!(result, Err(FastDFSError::ClientClosed)));
    }

    #[tokio::test]
    async fn at_most_max_conns_in_use_per_endpoint() {
        let addr = echo_server().await;
        let pool = Arc::new(Pool::new(1, Duration::from_secs(1), Duration::from_secs(60), true));

        let first = pool.borrow(addr).await.unwrap();

        let pool2 = pool.clone();
        let waiter = tokio::spawn(async move { pool2.borrow(addr).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished(), "second borrow should block while max_conns=1 is in use");

        pool.release(first, true).await;
        let second = waiter.await.unwrap().unwrap();
        pool.release(second, true).await;
    }
}
