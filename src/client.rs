//! The public client facade: one [`Client`] owns the tracker pool, the
//! storage pool, and an [`Operations`] orchestrator over both. Every
//! operation has a plain form and a `_cancellable` form; the plain form is a
//! thin wrapper that hands `Operations` a token that is never cancelled.

use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::stream::Stream;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::errors::{FastDFSError, Result};
use crate::operations::Operations;
use crate::pool::Pool;
use crate::types::{ClientConfig, FileInfo, Metadata, MetadataFlag};

/// A FastDFS-style distributed file storage client.
///
/// Meant to be constructed once and shared for the lifetime of the process;
/// it owns its own connection pools and their background idle-sweeper tasks.
pub struct Client {
    ops: Operations,
    closed: Arc<RwLock<bool>>,
}

impl Client {
    /// Builds a client from `config`, eagerly resolving and validating every
    /// tracker address. Returns an error instead of deferring failure to the
    /// first operation.
    pub fn new(config: ClientConfig) -> Result<Self> {
        validate_config(&config)?;
        let tracker_addrs = resolve_tracker_addrs(&config.tracker_addrs)?;

        let connect_timeout = Duration::from_millis(config.connect_timeout);
        let network_timeout = Duration::from_millis(config.network_timeout);
        let idle_timeout = Duration::from_millis(config.idle_timeout);

        let tracker_pool = Pool::new(config.max_conns, connect_timeout, idle_timeout, config.enable_pool);
        let storage_pool = Pool::new(config.max_conns, connect_timeout, idle_timeout, config.enable_pool);

        let ops = Operations::new(tracker_addrs, tracker_pool, storage_pool, network_timeout, config.retry_count);

        Ok(Self {
            ops,
            closed: Arc::new(RwLock::new(false)),
        })
    }

    async fn check_closed(&self) -> Result<()> {
        if *self.closed.read().await {
            return Err(FastDFSError::ClientClosed);
        }
        Ok(())
    }

    // -- upload -------------------------------------------------------------

    /// Uploads a local file's contents as a new file. Returns its file ID.
    pub async fn upload_file(&self, local_filename: &str, metadata: Option<&Metadata>) -> Result<String> {
        self.upload_file_cancellable(local_filename, metadata, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::upload_file`].
    pub async fn upload_file_cancellable(
        &self,
        local_filename: &str,
        metadata: Option<&Metadata>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops.upload_file(local_filename, metadata, false, cancel).await
    }

    /// Uploads an in-memory buffer as a new file. Returns its file ID.
    pub async fn upload_buffer(
        &self,
        data: &[u8],
        file_ext_name: &str,
        metadata: Option<&Metadata>,
    ) -> Result<String> {
        self.upload_buffer_cancellable(data, file_ext_name, metadata, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::upload_buffer`].
    pub async fn upload_buffer_cancellable(
        &self,
        data: &[u8],
        file_ext_name: &str,
        metadata: Option<&Metadata>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops.upload_buffer(data, file_ext_name, metadata, false, cancel).await
    }

    /// Uploads a local file as a new appender file (one that later accepts
    /// `append_file`/`modify_file`/`truncate_file`).
    pub async fn upload_appender_file(&self, local_filename: &str, metadata: Option<&Metadata>) -> Result<String> {
        self.upload_appender_file_cancellable(local_filename, metadata, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::upload_appender_file`].
    pub async fn upload_appender_file_cancellable(
        &self,
        local_filename: &str,
        metadata: Option<&Metadata>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops.upload_file(local_filename, metadata, true, cancel).await
    }

    /// Uploads an in-memory buffer as a new appender file.
    pub async fn upload_appender_buffer(
        &self,
        data: &[u8],
        file_ext_name: &str,
        metadata: Option<&Metadata>,
    ) -> Result<String> {
        self.upload_appender_buffer_cancellable(data, file_ext_name, metadata, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::upload_appender_buffer`].
    pub async fn upload_appender_buffer_cancellable(
        &self,
        data: &[u8],
        file_ext_name: &str,
        metadata: Option<&Metadata>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops.upload_buffer(data, file_ext_name, metadata, true, cancel).await
    }

    /// Uploads a local file as a slave file derived from `master_file_id`,
    /// sharing its group and prefixed with `prefix_name`.
    pub async fn upload_slave_file(
        &self,
        master_file_id: &str,
        local_filename: &str,
        prefix_name: &str,
    ) -> Result<String> {
        self.upload_slave_file_cancellable(master_file_id, local_filename, prefix_name, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::upload_slave_file`].
    pub async fn upload_slave_file_cancellable(
        &self,
        master_file_id: &str,
        local_filename: &str,
        prefix_name: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops
            .upload_slave_file(master_file_id, local_filename, prefix_name, cancel)
            .await
    }

    /// Uploads an in-memory buffer as a slave file derived from `master_file_id`.
    pub async fn upload_slave_buffer(
        &self,
        master_file_id: &str,
        data: &[u8],
        prefix_name: &str,
        file_ext_name: &str,
    ) -> Result<String> {
        self.upload_slave_buffer_cancellable(
            master_file_id,
            data,
            prefix_name,
            file_ext_name,
            &CancellationToken::new(),
        )
        .await
    }

    /// Cancellable form of [`Client::upload_slave_buffer`].
    pub async fn upload_slave_buffer_cancellable(
        &self,
        master_file_id: &str,
        data: &[u8],
        prefix_name: &str,
        file_ext_name: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.check_closed().await?;
        self.ops
            .upload_slave_buffer(master_file_id, data, prefix_name, file_ext_name, cancel)
            .await
    }

    // -- download -------------------------------------------------------------

    /// Downloads an entire file's contents.
    pub async fn download_file(&self, file_id: &str) -> Result<Bytes> {
        self.download_file_cancellable(file_id, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::download_file`].
    pub async fn download_file_cancellable(&self, file_id: &str, cancel: &CancellationToken) -> Result<Bytes> {
        self.check_closed().await?;
        self.ops.download_file(file_id, 0, 0, cancel).await
    }

    /// Downloads `offset..offset+length` of a file's contents. `length == 0`
    /// means "to end of file".
    pub async fn download_file_range(&self, file_id: &str, offset: u64, length: u64) -> Result<Bytes> {
        self.download_file_range_cancellable(file_id, offset, length, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::download_file_range`].
    pub async fn download_file_range_cancellable(
        &self,
        file_id: &str,
        offset: u64,
        length: u64,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        self.check_closed().await?;
        self.ops.download_file(file_id, offset, length, cancel).await
    }

    /// Downloads a file straight to `local_filename`, without holding the
    /// whole body in memory as an intermediate `Bytes`.
    pub async fn download_to_file(&self, file_id: &str, local_filename: &str) -> Result<()> {
        self.download_to_file_cancellable(file_id, local_filename, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::download_to_file`].
    pub async fn download_to_file_cancellable(
        &self,
        file_id: &str,
        local_filename: &str,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.check_closed().await?;
        self.ops.download_to_file(file_id, local_filename, cancel).await
    }

    /// Downloads `offset..offset+length` of a file as a stream of chunks
    /// instead of a single buffered `Bytes`. `length == 0` means "to end of
    /// file". There is no separate cancellable form: drop the stream to
    /// cancel it mid-transfer, which force-closes its leased transport.
    pub async fn download_stream(
        &self,
        file_id: &str,
        offset: u64,
        length: u64,
    ) -> Result<impl Stream<Item = Result<Bytes>> + '_> {
        self.check_closed().await?;
        self.ops
            .download_stream(file_id, offset, length, &CancellationToken::new())
            .await
    }

    // -- delete / append / modify / truncate -----------------------------------

    /// Deletes a file.
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        self.delete_file_cancellable(file_id, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::delete_file`].
    pub async fn delete_file_cancellable(&self, file_id: &str, cancel: &CancellationToken) -> Result<()> {
        self.check_closed().await?;
        self.ops.delete_file(file_id, cancel).await
    }

    /// Appends `data` to the end of an appender file.
    pub async fn append_file(&self, file_id: &str, data: &[u8]) -> Result<()> {
        self.append_file_cancellable(file_id, data, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::append_file`].
    pub async fn append_file_cancellable(&self, file_id: &str, data: &[u8], cancel: &CancellationToken) -> Result<()> {
        self.check_closed().await?;
        self.ops.append_file(file_id, data, cancel).await
    }

    /// Overwrites `offset..offset+data.len()` of an appender file.
    pub async fn modify_file(&self, file_id: &str, offset: u64, data: &[u8]) -> Result<()> {
        self.modify_file_cancellable(file_id, offset, data, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::modify_file`].
    pub async fn modify_file_cancellable(
        &self,
        file_id: &str,
        offset: u64,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.check_closed().await?;
        self.ops.modify_file(file_id, offset, data, cancel).await
    }

    /// Truncates (or zero-extends) an appender file to `new_size`.
    pub async fn truncate_file(&self, file_id: &str, new_size: u64) -> Result<()> {
        self.truncate_file_cancellable(file_id, new_size, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::truncate_file`].
    pub async fn truncate_file_cancellable(
        &self,
        file_id: &str,
        new_size: u64,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.check_closed().await?;
        self.ops.truncate_file(file_id, new_size, cancel).await
    }

    // -- metadata / file info ---------------------------------------------------

    /// Replaces or merges a file's metadata, per `flag`.
    pub async fn set_metadata(&self, file_id: &str, metadata: &Metadata, flag: MetadataFlag) -> Result<()> {
        self.set_metadata_cancellable(file_id, metadata, flag, &CancellationToken::new())
            .await
    }

    /// Cancellable form of [`Client::set_metadata`].
    pub async fn set_metadata_cancellable(
        &self,
        file_id: &str,
        metadata: &Metadata,
        flag: MetadataFlag,
        cancel: &CancellationToken,
    ) -> Result<()> {
        self.check_closed().await?;
        self.ops.set_metadata(file_id, metadata, flag, cancel).await
    }

    /// Fetches a file's metadata.
    pub async fn get_metadata(&self, file_id: &str) -> Result<Metadata> {
        self.get_metadata_cancellable(file_id, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::get_metadata`].
    pub async fn get_metadata_cancellable(&self, file_id: &str, cancel: &CancellationToken) -> Result<Metadata> {
        self.check_closed().await?;
        self.ops.get_metadata(file_id, cancel).await
    }

    /// Fetches a file's size, creation time, checksum, and source storage IP.
    pub async fn get_file_info(&self, file_id: &str) -> Result<FileInfo> {
        self.get_file_info_cancellable(file_id, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::get_file_info`].
    pub async fn get_file_info_cancellable(&self, file_id: &str, cancel: &CancellationToken) -> Result<FileInfo> {
        self.check_closed().await?;
        self.ops.get_file_info(file_id, cancel).await
    }

    /// Reports whether a file exists, folding `FileNotFound` into `false`
    /// instead of propagating it as an error.
    pub async fn file_exists(&self, file_id: &str) -> bool {
        self.file_exists_cancellable(file_id, &CancellationToken::new()).await
    }

    /// Cancellable form of [`Client::file_exists`].
    pub async fn file_exists_cancellable(&self, file_id: &str, cancel: &CancellationToken) -> bool {
        if self.check_closed().await.is_err() {
            return false;
        }
        self.ops.file_exists(file_id, cancel).await.unwrap_or(false)
    }

    // -- lifecycle ----------------------------------------------------------

    /// Closes the client: drains and closes every pooled connection and
    /// rejects subsequent operations with [`FastDFSError::ClientClosed`].
    /// Safe to call more than once.
    pub async fn close(&self) {
        let mut closed = self.closed.write().await;
        if *closed {
            return;
        }
        *closed = true;
        self.ops.close().await;
    }
}

fn validate_config(config: &ClientConfig) -> Result<()> {
    if config.tracker_addrs.is_empty() {
        return Err(FastDFSError::InvalidArgument(
            "tracker_addrs must not be empty".to_string(),
        ));
    }
    if config.max_conns == 0 {
        return Err(FastDFSError::InvalidArgument(
            "max_conns must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn resolve_tracker_addrs(addrs: &[String]) -> Result<Vec<SocketAddr>> {
    addrs
        .iter()
        .map(|addr| {
            addr.to_socket_addrs()
                .ok()
                .and_then(|mut resolved| resolved.next())
                .ok_or_else(|| FastDFSError::InvalidArgument(format!("invalid tracker address: {addr}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_tracker_addrs() {
        let config = ClientConfig::new(vec![]);
        let result = Client::new(config);
        assert!(matches!(result, Err(FastDFSError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_unparseable_tracker_addr() {
        let config = ClientConfig::new(vec!["invalid".to_string()]);
        let result = Client::new(config);
        assert!(matches!(result, Err(FastDFSError::InvalidArgument(_))));
    }

    #[test]
    fn accepts_valid_config() {
        let config = ClientConfig::new(vec!["127.0.0.1:22122".to_string()]);
        assert!(Client::new(config).is_ok());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let config = ClientConfig::new(vec!["127.0.0.1:22122".to_string()]);
        let client = Client::new(config).unwrap();
        client.close().await;
        client.close().await;

        let result = client.upload_buffer(b"data", "txt", None).await;
        assert!(matches!(result, Err(FastDFSError::ClientClosed)));
    }
}
