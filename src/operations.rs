//! Operation orchestration: retry, tracker rotation, and failover on top of
//! [`crate::tracker::TrackerClient`] and [`crate::storage::StorageClient`].
//!
//! Every public method here takes a [`CancellationToken`]; callers that don't
//! care about cancellation pass [`CancellationToken::new()`], which is never
//! triggered. Each retry rotates to the next configured tracker and re-runs
//! the full tracker query, which is how failover onto a different storage
//! endpoint happens for free.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use futures::stream::Stream;
use tokio_util::sync::CancellationToken;

use crate::errors::{FastDFSError, Result};
use crate::pool::Pool;
use crate::protocol::{get_file_ext_name, join_file_id, read_file_content, split_file_id, write_file_content};
use crate::storage::StorageClient;
use crate::tracker::TrackerClient;
use crate::types::{FileInfo, Metadata, MetadataFlag};

/// Base retry backoff delay; the actual delay before attempt `n` (0-indexed)
/// is this scaled by `n + 1`, capped well under a `network_timeout` multiple
/// for any reasonable `retry_count`.
const RETRY_BACKOFF_BASE: Duration = Duration::from_millis(100);

/// Coordinates tracker and storage clients to implement the full file/metadata
/// operation set with retry and failover.
pub struct Operations {
    tracker_addrs: Vec<SocketAddr>,
    next_tracker: AtomicUsize,
    tracker_pool: Pool,
    storage_pool: Pool,
    network_timeout: Duration,
    retry_count: usize,
}

impl Operations {
    pub fn new(
        tracker_addrs: Vec<SocketAddr>,
        tracker_pool: Pool,
        storage_pool: Pool,
        network_timeout: Duration,
        retry_count: usize,
    ) -> Self {
        Self {
            tracker_addrs,
            next_tracker: AtomicUsize::new(0),
            tracker_pool,
            storage_pool,
            network_timeout,
            retry_count,
        }
    }

    fn next_tracker_addr(&self) -> SocketAddr {
        let i = self.next_tracker.fetch_add(1, Ordering::Relaxed) % self.tracker_addrs.len();
        self.tracker_addrs[i]
    }

    fn tracker_client(&self) -> TrackerClient<'_> {
        TrackerClient::new(&self.tracker_pool, self.network_timeout)
    }

    fn storage_client(&self) -> StorageClient<'_> {
        StorageClient::new(&self.storage_pool, self.network_timeout)
    }

    /// Races `attempt` against `cancel`; a cancellation always surfaces as
    /// [`FastDFSError::Cancelled`], which `is_retryable()` reports as false.
    async fn race<T>(
        &self,
        cancel: &CancellationToken,
        attempt: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FastDFSError::Cancelled),
            result = attempt => result,
        }
    }

    fn should_retry(&self, err: &FastDFSError, attempt: usize) -> bool {
        err.is_retryable() && attempt < self.retry_count
    }

    /// Shared retry/failover loop: on every attempt, picks the next tracker in
    /// rotation and hands it to `attempt_fn`, which is expected to re-run its
    /// own tracker query so failover lands on a fresh storage endpoint.
    async fn with_retry<T, F, Fut>(
        &self,
        op_name: &'static str,
        cancel: &CancellationToken,
        mut attempt_fn: F,
    ) -> Result<T>
    where
        F: FnMut(SocketAddr) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            let tracker_addr = self.next_tracker_addr();
            let result = self.race(cancel, attempt_fn(tracker_addr)).await;

            match result {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !self.should_retry(&err, attempt) {
                        tracing::error!(operation = op_name, error = %err, "operation failed");
                        return Err(err);
                    }
                    tracing::warn!(operation = op_name, attempt, error = %err, "retrying");
                    let backoff = RETRY_BACKOFF_BASE * (attempt as u32 + 1);
                    self.race(cancel, async {
                        tokio::time::sleep(backoff).await;
                        Ok(())
                    })
                    .await?;
                    attempt += 1;
                }
            }
        }
    }

    // -- upload ---------------------------------------------------------

    pub async fn upload_file(
        &self,
        local_filename: &str,
        metadata: Option<&Metadata>,
        is_appender: bool,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let data = read_file_content(local_filename)?;
        let ext_name = get_file_ext_name(local_filename);
        self.upload_buffer(&data, &ext_name, metadata, is_appender, cancel).await
    }

    pub async fn upload_buffer(
        &self,
        data: &[u8],
        file_ext_name: &str,
        metadata: Option<&Metadata>,
        is_appender: bool,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let file_id = self
            .with_retry("upload_buffer", cancel, |tracker_addr| {
                self.upload_buffer_once(tracker_addr, data, file_ext_name, is_appender)
            })
            .await?;

        if let Some(meta) = metadata {
            if !meta.is_empty() {
                if let Err(err) = self.set_metadata(&file_id, meta, MetadataFlag::Overwrite, cancel).await {
                    tracing::warn!(%file_id, error = %err, "post-upload set_metadata failed");
                }
            }
        }

        Ok(file_id)
    }

    async fn upload_buffer_once(
        &self,
        tracker_addr: SocketAddr,
        data: &[u8],
        file_ext_name: &str,
        is_appender: bool,
    ) -> Result<String> {
        let (group_name, storage) = self.tracker_client().query_store_without_group(tracker_addr).await?;
        tracing::debug!(%group_name, addr = %storage.addr, "routed upload");

        let remote_filename = self
            .storage_client()
            .upload(storage.addr, storage.store_path_index, file_ext_name, data, is_appender)
            .await?;

        Ok(join_file_id(&group_name, &remote_filename))
    }

    pub async fn upload_slave_file(
        &self,
        master_file_id: &str,
        local_filename: &str,
        prefix_name: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let data = read_file_content(local_filename)?;
        let ext_name = get_file_ext_name(local_filename);
        self.upload_slave_buffer(master_file_id, &data, prefix_name, &ext_name, cancel)
            .await
    }

    pub async fn upload_slave_buffer(
        &self,
        master_file_id: &str,
        data: &[u8],
        prefix_name: &str,
        file_ext_name: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        let (group_name, master_filename) = split_file_id(master_file_id)?;

        self.with_retry("upload_slave_buffer", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let master_filename = master_filename.clone();
            async move {
                let (group_name, storage) = self
                    .tracker_client()
                    .query_store_with_group(tracker_addr, &group_name)
                    .await?;

                let remote_filename = self
                    .storage_client()
                    .upload_slave(storage.addr, &master_filename, prefix_name, file_ext_name, data)
                    .await?;

                Ok(join_file_id(&group_name, &remote_filename))
            }
        })
        .await
    }

    // -- download ---------------------------------------------------------

    pub async fn download_file(
        &self,
        file_id: &str,
        offset: u64,
        length: u64,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("download_file", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_fetch(tracker_addr, &group_name, &remote_filename)
                    .await?;

                self.storage_client()
                    .download(storage_addr, &group_name, &remote_filename, offset, length)
                    .await
            }
        })
        .await
    }

    pub async fn download_to_file(
        &self,
        file_id: &str,
        local_filename: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let data = self.download_file(file_id, 0, 0, cancel).await?;
        write_file_content(local_filename, &data)?;
        Ok(())
    }

    /// Same routing as [`Operations::download_file`], but yields the body as a
    /// stream of chunks instead of buffering it. The tracker lookup is retried
    /// like every other operation; once the stream starts, cancellation is
    /// left to the caller simply dropping it, which force-closes the leased
    /// transport via `Leased`'s `Drop` impl.
    pub async fn download_stream(
        &self,
        file_id: &str,
        offset: u64,
        length: u64,
        cancel: &CancellationToken,
    ) -> Result<impl Stream<Item = Result<Bytes>> + '_> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        let storage_addr = self
            .with_retry("download_stream", cancel, |tracker_addr| {
                let group_name = group_name.clone();
                let remote_filename = remote_filename.clone();
                async move {
                    self.tracker_client()
                        .query_fetch(tracker_addr, &group_name, &remote_filename)
                        .await
                }
            })
            .await?;

        Ok(self.storage_client().download_stream(
            storage_addr,
            &group_name,
            &remote_filename,
            offset,
            length,
            crate::types::STREAM_CHUNK_SIZE,
        ))
    }

    // -- delete / append / modify / truncate -------------------------------

    pub async fn delete_file(&self, file_id: &str, cancel: &CancellationToken) -> Result<()> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("delete_file", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_update(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client().delete(storage_addr, &group_name, &remote_filename).await
            }
        })
        .await
    }

    pub async fn append_file(&self, file_id: &str, data: &[u8], cancel: &CancellationToken) -> Result<()> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("append_file", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_update(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client().append(storage_addr, &remote_filename, data).await
            }
        })
        .await
    }

    pub async fn modify_file(
        &self,
        file_id: &str,
        offset: u64,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<()> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("modify_file", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_update(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client()
                    .modify(storage_addr, &remote_filename, offset, data)
                    .await
            }
        })
        .await
    }

    pub async fn truncate_file(&self, file_id: &str, new_size: u64, cancel: &CancellationToken) -> Result<()> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("truncate_file", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_update(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client().truncate(storage_addr, &remote_filename, new_size).await
            }
        })
        .await
    }

    pub async fn set_metadata(
        &self,
        file_id: &str,
        metadata: &Metadata,
        flag: MetadataFlag,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("set_metadata", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_update(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client()
                    .set_metadata(storage_addr, &group_name, &remote_filename, metadata, flag)
                    .await
            }
        })
        .await
    }

    // -- metadata / file info ---------------------------------------------

    pub async fn get_metadata(&self, file_id: &str, cancel: &CancellationToken) -> Result<Metadata> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("get_metadata", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_fetch(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client().get_metadata(storage_addr, &group_name, &remote_filename).await
            }
        })
        .await
    }

    pub async fn get_file_info(&self, file_id: &str, cancel: &CancellationToken) -> Result<FileInfo> {
        let (group_name, remote_filename) = split_file_id(file_id)?;

        self.with_retry("get_file_info", cancel, |tracker_addr| {
            let group_name = group_name.clone();
            let remote_filename = remote_filename.clone();
            async move {
                let storage_addr = self
                    .tracker_client()
                    .query_fetch(tracker_addr, &group_name, &remote_filename)
                    .await?;
                self.storage_client()
                    .query_file_info(storage_addr, &group_name, &remote_filename)
                    .await
            }
        })
        .await
    }

    pub async fn file_exists(&self, file_id: &str, cancel: &CancellationToken) -> Result<bool> {
        match self.get_file_info(file_id, cancel).await {
            Ok(_) => Ok(true),
            Err(FastDFSError::FileNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn close(&self) {
        self.tracker_pool.close().await;
        self.storage_pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{self, TRACKER_IP_ADDR_LEN};
    use crate::types::FDFS_GROUP_NAME_MAX_LEN;
    use bytes::{BufMut, BytesMut};
    use std::io::Write as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn store_response_body(group: &str, ip: &str, port: u16, path_index: u8) -> Vec<u8> {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::pad_string(group, FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(&protocol::pad_string(ip, TRACKER_IP_ADDR_LEN));
        body.put_u64(port as u64);
        body.put_u8(path_index);
        body.to_vec()
    }

    fn upload_response_body(group: &str, remote_filename: &str) -> Vec<u8> {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::pad_string(group, FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(remote_filename.as_bytes());
        body.to_vec()
    }

    /// Binds a listener, answers exactly one request/response pair with
    /// `status`/`body`, and returns its address.
    async fn fake_server(status: u8, body: Vec<u8>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut req_header = [0u8; protocol::FDFS_PROTO_HEADER_LEN];
            socket.read_exact(&mut req_header).await.unwrap();
            let header = protocol::decode_header(&req_header).unwrap();
            let mut req_body = vec![0u8; header.length as usize];
            socket.read_exact(&mut req_body).await.unwrap();

            let mut response = Vec::new();
            let resp_header = protocol::encode_header(body.len() as u64, header.cmd, status);
            response.write_all(&resp_header).unwrap();
            response.write_all(&body).unwrap();
            socket.write_all(&response).await.unwrap();
        });
        addr
    }

    /// Binds then immediately drops a listener: connecting to the returned
    /// address fails fast with "connection refused" instead of hanging until
    /// `connect_timeout`, which keeps the unreachable-tracker test quick.
    async fn unreachable_addr() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    fn make_operations(tracker_addrs: Vec<SocketAddr>, retry_count: usize) -> Operations {
        let tracker_pool = Pool::new(4, Duration::from_millis(200), Duration::from_secs(60), true);
        let storage_pool = Pool::new(4, Duration::from_millis(200), Duration::from_secs(60), true);
        Operations::new(tracker_addrs, tracker_pool, storage_pool, Duration::from_secs(1), retry_count)
    }

    #[tokio::test]
    async fn upload_retries_onto_second_tracker_after_first_is_unreachable() {
        // S7: tracker list of length 2, first unreachable, retry_count=1 ->
        // upload succeeds by rotating onto the second tracker.
        let dead_tracker = unreachable_addr().await;

        let storage_addr = fake_server(0, upload_response_body("group1", "M00/00/00/test.jpg")).await;
        let store_body = store_response_body("group1", &storage_addr.ip().to_string(), storage_addr.port(), 0);
        let live_tracker = fake_server(0, store_body).await;

        let ops = make_operations(vec![dead_tracker, live_tracker], 1);

        let file_id = ops
            .upload_buffer(b"hello", "txt", None, false, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(file_id, "group1/M00/00/00/test.jpg");
    }

    #[tokio::test]
    async fn exhausting_retries_against_unreachable_trackers_surfaces_transport_error() {
        let dead_tracker_a = unreachable_addr().await;
        let dead_tracker_b = unreachable_addr().await;

        let ops = make_operations(vec![dead_tracker_a, dead_tracker_b], 1);

        let result = ops
            .upload_buffer(b"hello", "txt", None, false, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(FastDFSError::Transport { .. })));
    }

    #[tokio::test]
    async fn cancellation_force_closes_borrowed_transport_without_pooling() {
        // Storage accepts the connection but never replies, so the operation
        // would otherwise block for the whole network_timeout; cancellation
        // must win first and the transport must not come back to the pool.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let hanging_storage_addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let store_body = store_response_body(
            "group1",
            &hanging_storage_addr.ip().to_string(),
            hanging_storage_addr.port(),
            0,
        );
        let tracker_addr = fake_server(0, store_body).await;

        let ops = make_operations(vec![tracker_addr], 0);

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let result = ops.upload_buffer(b"hello", "txt", None, false, &cancel).await;
        assert!(matches!(result, Err(FastDFSError::Cancelled)));
        assert_eq!(ops.storage_pool.idle_count().await, 0);
    }
}
