//! Storage client: encodes and executes every storage-server command.
//!
//! Each method borrows its own transport from `pool`, exactly like
//! [`crate::tracker::TrackerClient`]. Upload-family commands accept the group
//! name prefixed onto the body (per-command; see each method's wire layout
//! comment), since the storage server needs it to place the file on the
//! right store path.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::time::Duration;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use futures::stream::{self, Stream};

use crate::errors::{map_status_to_error, FastDFSError, Result};
use crate::pool::{Leased, Pool};
use crate::protocol;
use crate::types::{
    FileInfo, Metadata, MetadataFlag, StorageCommand, FDFS_FILE_EXT_NAME_MAX_LEN,
    FDFS_GROUP_NAME_MAX_LEN,
};

/// Facade over a borrowed storage transport.
pub struct StorageClient<'a> {
    pool: &'a Pool,
    network_timeout: Duration,
}

impl<'a> StorageClient<'a> {
    pub fn new(pool: &'a Pool, network_timeout: Duration) -> Self {
        Self {
            pool,
            network_timeout,
        }
    }

    /// `upload_file` / `upload_appender_file`: store a new file and return
    /// its remote filename. `group_name` and `store_path_index` come from a
    /// prior tracker store query; `appender` selects command 23 over 11.
    ///
    /// Wire body: `store_path_index(1) | file_size(8) | file_ext_name(6) | content`
    pub async fn upload(
        &self,
        addr: SocketAddr,
        store_path_index: u8,
        file_ext_name: &str,
        content: &[u8],
        appender: bool,
    ) -> Result<String> {
        let mut body = BytesMut::with_capacity(1 + 8 + FDFS_FILE_EXT_NAME_MAX_LEN + content.len());
        body.put_u8(store_path_index);
        body.put_u64(content.len() as u64);
        body.put_slice(&protocol::pad_string(file_ext_name, FDFS_FILE_EXT_NAME_MAX_LEN));
        body.put_slice(content);

        let cmd = if appender {
            StorageCommand::UploadAppenderFile
        } else {
            StorageCommand::UploadFile
        }
        .into();

        let response = self.roundtrip(addr, cmd, &body, "").await?;
        decode_upload_response(&response)
    }

    /// `upload_slave_file`: attach a derivative file to an existing master,
    /// sharing its prefix. `group_name` is the master's group.
    ///
    /// Wire body: `master_filename_len(8) | file_size(8) | prefix_name(16) |
    /// file_ext_name(6) | master_filename | content`
    pub async fn upload_slave(
        &self,
        addr: SocketAddr,
        master_filename: &str,
        prefix_name: &str,
        file_ext_name: &str,
        content: &[u8],
    ) -> Result<String> {
        const PREFIX_NAME_LEN: usize = 16;

        let mut body = BytesMut::with_capacity(
            8 + 8 + PREFIX_NAME_LEN + FDFS_FILE_EXT_NAME_MAX_LEN + master_filename.len() + content.len(),
        );
        body.put_u64(master_filename.len() as u64);
        body.put_u64(content.len() as u64);
        body.put_slice(&protocol::pad_string(prefix_name, PREFIX_NAME_LEN));
        body.put_slice(&protocol::pad_string(file_ext_name, FDFS_FILE_EXT_NAME_MAX_LEN));
        body.put_slice(master_filename.as_bytes());
        body.put_slice(content);

        let response = self
            .roundtrip(addr, StorageCommand::UploadSlaveFile.into(), &body, "")
            .await?;
        decode_upload_response(&response)
    }

    /// `download_file`: fetch `offset..offset+length` of a file's contents.
    /// `length == 0` means "to end of file".
    ///
    /// Wire body: `offset(8) | length(8) | group_name(16) | remote_filename`
    pub async fn download(
        &self,
        addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
        offset: u64,
        length: u64,
    ) -> Result<Bytes> {
        let body = encode_range_request(group_name, remote_filename, offset, length);
        self.roundtrip(addr, StorageCommand::DownloadFile.into(), &body, remote_filename)
            .await
    }

    /// `download_file`, but yielded as a stream of `chunk_size`-sized chunks
    /// instead of buffered into a single `Bytes`. Reads the body directly off
    /// the wire one chunk at a time; nothing beyond one chunk is ever held in
    /// memory at once.
    pub fn download_stream(
        &self,
        addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
        offset: u64,
        length: u64,
        chunk_size: usize,
    ) -> impl Stream<Item = Result<Bytes>> + 'a {
        let state = StreamState::Start {
            pool: self.pool,
            addr,
            network_timeout: self.network_timeout,
            group_name: group_name.to_string(),
            remote_filename: remote_filename.to_string(),
            offset,
            length,
            chunk_size,
        };
        stream::unfold(state, stream_step)
    }

    /// `delete_file`
    ///
    /// Wire body: `group_name(16) | remote_filename`
    pub async fn delete(&self, addr: SocketAddr, group_name: &str, remote_filename: &str) -> Result<()> {
        let body = encode_group_and_name(group_name, remote_filename);
        self.roundtrip(addr, StorageCommand::DeleteFile.into(), &body, remote_filename)
            .await?;
        Ok(())
    }

    /// `append_file`: appends bytes to the end of an appender file.
    ///
    /// Wire body: `master_filename_len(8) | appended_size(8) | master_filename | content`
    pub async fn append(
        &self,
        addr: SocketAddr,
        remote_filename: &str,
        content: &[u8],
    ) -> Result<()> {
        let mut body = BytesMut::with_capacity(8 + 8 + remote_filename.len() + content.len());
        body.put_u64(remote_filename.len() as u64);
        body.put_u64(content.len() as u64);
        body.put_slice(remote_filename.as_bytes());
        body.put_slice(content);

        self.roundtrip(addr, StorageCommand::AppendFile.into(), &body, remote_filename)
            .await?;
        Ok(())
    }

    /// `modify_file`: overwrites `offset..offset+content.len()` of an appender file.
    ///
    /// Wire body: `offset(8) | master_filename_len(8) | modify_size(8) |
    /// master_filename | content`
    pub async fn modify(
        &self,
        addr: SocketAddr,
        remote_filename: &str,
        offset: u64,
        content: &[u8],
    ) -> Result<()> {
        let mut body = BytesMut::with_capacity(8 + 8 + 8 + remote_filename.len() + content.len());
        body.put_u64(offset);
        body.put_u64(remote_filename.len() as u64);
        body.put_u64(content.len() as u64);
        body.put_slice(remote_filename.as_bytes());
        body.put_slice(content);

        self.roundtrip(addr, StorageCommand::ModifyFile.into(), &body, remote_filename)
            .await?;
        Ok(())
    }

    /// `truncate_file`: truncates (or zero-extends) an appender file to `new_size`.
    ///
    /// Wire body: `master_filename_len(8) | new_size(8) | master_filename`
    pub async fn truncate(&self, addr: SocketAddr, remote_filename: &str, new_size: u64) -> Result<()> {
        let mut body = BytesMut::with_capacity(8 + 8 + remote_filename.len());
        body.put_u64(remote_filename.len() as u64);
        body.put_u64(new_size);
        body.put_slice(remote_filename.as_bytes());

        self.roundtrip(addr, StorageCommand::TruncateFile.into(), &body, remote_filename)
            .await?;
        Ok(())
    }

    /// `set_metadata`: replaces or merges a file's metadata, per `flag`.
    ///
    /// Wire body: `remote_filename_len(8) | metadata_len(8) | flag(1) |
    /// group_name(16) | remote_filename | metadata`
    pub async fn set_metadata(
        &self,
        addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
        metadata: &Metadata,
        flag: MetadataFlag,
    ) -> Result<()> {
        let encoded_metadata = protocol::encode_metadata(metadata)?;

        let mut body = BytesMut::with_capacity(
            8 + 8 + 1 + FDFS_GROUP_NAME_MAX_LEN + remote_filename.len() + encoded_metadata.len(),
        );
        body.put_u64(remote_filename.len() as u64);
        body.put_u64(encoded_metadata.len() as u64);
        body.put_u8(flag.into());
        body.put_slice(&protocol::pad_string(group_name, FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(remote_filename.as_bytes());
        body.put_slice(&encoded_metadata);

        self.roundtrip(addr, StorageCommand::SetMetadata.into(), &body, remote_filename)
            .await?;
        Ok(())
    }

    /// `get_metadata`
    ///
    /// Wire body: `group_name(16) | remote_filename`
    pub async fn get_metadata(
        &self,
        addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
    ) -> Result<Metadata> {
        let body = encode_group_and_name(group_name, remote_filename);
        let response = self
            .roundtrip(addr, StorageCommand::GetMetadata.into(), &body, remote_filename)
            .await?;
        protocol::decode_metadata(&response)
    }

    /// `query_file_info`
    ///
    /// Wire body: `group_name(16) | remote_filename`
    pub async fn query_file_info(
        &self,
        addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
    ) -> Result<FileInfo> {
        let body = encode_group_and_name(group_name, remote_filename);
        let response = self
            .roundtrip(addr, StorageCommand::QueryFileInfo.into(), &body, remote_filename)
            .await?;
        protocol::decode_file_info(&response)
    }

    async fn roundtrip(
        &self,
        addr: SocketAddr,
        cmd: u8,
        body: &[u8],
        file_id_for_errors: &str,
    ) -> Result<Bytes> {
        let mut leased = self.pool.borrow(addr).await?;

        let request = protocol::encode_request(cmd, body);
        if let Err(err) = leased.write_all_deadline(&request, self.network_timeout).await {
            self.pool.release(leased, false).await;
            return Err(err);
        }

        let header_bytes = match leased
            .read_exact_deadline(protocol::FDFS_PROTO_HEADER_LEN, self.network_timeout)
            .await
        {
            Ok(bytes) => bytes,
            Err(err) => {
                self.pool.release(leased, false).await;
                return Err(err);
            }
        };
        let header = match protocol::decode_header(&header_bytes) {
            Ok(header) => header,
            Err(err) => {
                self.pool.release(leased, false).await;
                return Err(err);
            }
        };

        let body_bytes = if header.length == 0 {
            Bytes::new()
        } else {
            match leased
                .read_exact_deadline(header.length as usize, self.network_timeout)
                .await
            {
                Ok(bytes) => bytes,
                Err(err) => {
                    self.pool.release(leased, false).await;
                    return Err(err);
                }
            }
        };

        if let Some(err) = map_status_to_error(header.status, file_id_for_errors) {
            self.pool.release(leased, !err.poisons_transport()).await;
            return Err(err);
        }

        self.pool.release(leased, true).await;
        Ok(body_bytes)
    }
}

/// State threaded through `stream::unfold` for `StorageClient::download_stream`.
/// `Start` issues the request and reads the response header; `Streaming` reads
/// the body off the same leased transport `chunk_size` bytes at a time.
enum StreamState<'a> {
    Start {
        pool: &'a Pool,
        addr: SocketAddr,
        network_timeout: Duration,
        group_name: String,
        remote_filename: String,
        offset: u64,
        length: u64,
        chunk_size: usize,
    },
    Streaming {
        pool: &'a Pool,
        leased: Leased,
        network_timeout: Duration,
        remaining: u64,
        chunk_size: usize,
    },
    Done,
}

fn stream_step(
    state: StreamState<'_>,
) -> Pin<Box<dyn Future<Output = Option<(Result<Bytes>, StreamState<'_>)>> + '_>> {
    Box::pin(async move {
        match state {
            StreamState::Done => None,

            StreamState::Start {
                pool,
                addr,
                network_timeout,
                group_name,
                remote_filename,
                offset,
                length,
                chunk_size,
            } => {
                let mut leased = match pool.borrow(addr).await {
                    Ok(leased) => leased,
                    Err(err) => return Some((Err(err), StreamState::Done)),
                };

                let body = encode_range_request(&group_name, &remote_filename, offset, length);
                let request = protocol::encode_request(StorageCommand::DownloadFile.into(), &body);
                if let Err(err) = leased.write_all_deadline(&request, network_timeout).await {
                    pool.release(leased, false).await;
                    return Some((Err(err), StreamState::Done));
                }

                let header_bytes = match leased
                    .read_exact_deadline(protocol::FDFS_PROTO_HEADER_LEN, network_timeout)
                    .await
                {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        pool.release(leased, false).await;
                        return Some((Err(err), StreamState::Done));
                    }
                };
                let header = match protocol::decode_header(&header_bytes) {
                    Ok(header) => header,
                    Err(err) => {
                        pool.release(leased, false).await;
                        return Some((Err(err), StreamState::Done));
                    }
                };

                if let Some(err) = map_status_to_error(header.status, &remote_filename) {
                    let healthy = !err.poisons_transport();
                    pool.release(leased, healthy).await;
                    return Some((Err(err), StreamState::Done));
                }

                if header.length == 0 {
                    pool.release(leased, true).await;
                    return None;
                }

                stream_step(StreamState::Streaming {
                    pool,
                    leased,
                    network_timeout,
                    remaining: header.length,
                    chunk_size,
                })
                .await
            }

            StreamState::Streaming {
                pool,
                mut leased,
                network_timeout,
                remaining,
                chunk_size,
            } => {
                if remaining == 0 {
                    pool.release(leased, true).await;
                    return None;
                }

                let want = (chunk_size as u64).min(remaining) as usize;
                match leased.read_exact_deadline(want, network_timeout).await {
                    Ok(chunk) => {
                        let remaining = remaining - want as u64;
                        Some((
                            Ok(chunk),
                            StreamState::Streaming {
                                pool,
                                leased,
                                network_timeout,
                                remaining,
                                chunk_size,
                            },
                        ))
                    }
                    Err(err) => {
                        pool.release(leased, false).await;
                        Some((Err(err), StreamState::Done))
                    }
                }
            }
        }
    })
}

fn encode_group_and_name(group_name: &str, remote_filename: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(FDFS_GROUP_NAME_MAX_LEN + remote_filename.len());
    buf.put_slice(&protocol::pad_string(group_name, FDFS_GROUP_NAME_MAX_LEN));
    buf.put_slice(remote_filename.as_bytes());
    buf.freeze()
}

fn encode_range_request(group_name: &str, remote_filename: &str, offset: u64, length: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(8 + 8 + FDFS_GROUP_NAME_MAX_LEN + remote_filename.len());
    buf.put_u64(offset);
    buf.put_u64(length);
    buf.put_slice(&protocol::pad_string(group_name, FDFS_GROUP_NAME_MAX_LEN));
    buf.put_slice(remote_filename.as_bytes());
    buf.freeze()
}

/// Decodes the `group_name(16) | remote_filename` body shared by both upload
/// responses (plain and appender) and the slave-file upload response.
fn decode_upload_response(data: &[u8]) -> Result<String> {
    if data.len() < FDFS_GROUP_NAME_MAX_LEN {
        return Err(FastDFSError::Protocol(format!(
            "upload response too short: {} bytes",
            data.len()
        )));
    }
    let remote_filename = String::from_utf8(data[FDFS_GROUP_NAME_MAX_LEN..].to_vec())?;
    Ok(remote_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::io::Write as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn fake_storage(status: u8, body: Vec<u8>) -> SocketAddr {
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

    #[tokio::test]
    async fn upload_decodes_remote_filename() {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::pad_string("group1", FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(b"M00/00/00/test.jpg");
        let addr = fake_storage(0, body.to_vec()).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let remote_filename = client
            .upload(addr, 0, "jpg", b"file contents", false)
            .await
            .unwrap();
        assert_eq!(remote_filename, "M00/00/00/test.jpg");
    }

    #[tokio::test]
    async fn download_returns_body_bytes() {
        let addr = fake_storage(0, b"file contents".to_vec()).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let data = client
            .download(addr, "group1", "M00/00/00/test.jpg", 0, 0)
            .await
            .unwrap();
        assert_eq!(&data[..], b"file contents");
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let addr = fake_storage(2, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let result = client.delete(addr, "group1", "M00/00/00/missing.jpg").await;
        assert!(matches!(result, Err(FastDFSError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn get_metadata_decodes_map() {
        let encoded = protocol::encode_metadata(&{
            let mut m = HashMap::new();
            m.insert("author".to_string(), "me".to_string());
            m
        })
        .unwrap();
        let addr = fake_storage(0, encoded.to_vec()).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let metadata = client
            .get_metadata(addr, "group1", "M00/00/00/test.jpg")
            .await
            .unwrap();
        assert_eq!(metadata.get("author"), Some(&"me".to_string()));
    }

    #[tokio::test]
    async fn query_file_info_decodes_struct() {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::encode_int64(42));
        body.put_u32(1_700_000_000);
        body.put_slice(&protocol::encode_int32(0x1234));
        body.put_slice(&protocol::pad_string("10.0.0.1", crate::types::IP_ADDRESS_SIZE));
        let addr = fake_storage(0, body.to_vec()).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let info = client
            .query_file_info(addr, "group1", "M00/00/00/test.jpg")
            .await
            .unwrap();
        assert_eq!(info.file_size, 42);
        assert_eq!(info.crc32, 0x1234);
        assert_eq!(info.source_ip_addr, "10.0.0.1");
    }

    #[tokio::test]
    async fn download_stream_yields_chunked_body() {
        let body = b"0123456789".to_vec();
        let addr = fake_storage(0, body.clone()).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let chunks: Vec<Bytes> = client
            .download_stream(addr, "group1", "M00/00/00/test.jpg", 0, 0, 4)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;

        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![4, 4, 2]);
        let reassembled: Vec<u8> = chunks.iter().flat_map(|c| c.to_vec()).collect();
        assert_eq!(reassembled, body);
    }

    #[tokio::test]
    async fn download_stream_propagates_not_found() {
        let addr = fake_storage(2, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let mut stream = Box::pin(client.download_stream(addr, "group1", "M00/00/00/missing.jpg", 0, 0, 4));
        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(FastDFSError::FileNotFound(_))));
    }

    /// Like `fake_storage`, but hands the captured request body back through
    /// the returned receiver instead of discarding it, so tests can assert on
    /// the actual wire layout a command sends.
    async fn fake_storage_capture(status: u8, body: Vec<u8>) -> (SocketAddr, tokio::sync::oneshot::Receiver<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut req_header = [0u8; protocol::FDFS_PROTO_HEADER_LEN];
            socket.read_exact(&mut req_header).await.unwrap();
            let header = protocol::decode_header(&req_header).unwrap();
            let mut req_body = vec![0u8; header.length as usize];
            socket.read_exact(&mut req_body).await.unwrap();
            let _ = tx.send(req_body);

            let mut response = Vec::new();
            let resp_header = protocol::encode_header(body.len() as u64, header.cmd, status);
            response.write_all(&resp_header).unwrap();
            response.write_all(&body).unwrap();
            socket.write_all(&response).await.unwrap();
        });
        (addr, rx)
    }

    #[tokio::test]
    async fn append_encodes_filename_size_before_data_size() {
        let (addr, rx) = fake_storage_capture(0, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let remote_filename = "M00/00/00/test.jpg";
        let content = b"more data";
        client.append(addr, remote_filename, content).await.unwrap();

        let req_body = rx.await.unwrap();
        let mut expected = BytesMut::new();
        expected.put_u64(remote_filename.len() as u64);
        expected.put_u64(content.len() as u64);
        expected.put_slice(remote_filename.as_bytes());
        expected.put_slice(content);
        assert_eq!(req_body, expected.to_vec());
    }

    #[tokio::test]
    async fn modify_encodes_offset_then_filename_size_then_data_size() {
        let (addr, rx) = fake_storage_capture(0, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let remote_filename = "M00/00/00/test.jpg";
        let content = b"patched";
        let offset = 42u64;
        client.modify(addr, remote_filename, offset, content).await.unwrap();

        let req_body = rx.await.unwrap();
        let mut expected = BytesMut::new();
        expected.put_u64(offset);
        expected.put_u64(remote_filename.len() as u64);
        expected.put_u64(content.len() as u64);
        expected.put_slice(remote_filename.as_bytes());
        expected.put_slice(content);
        assert_eq!(req_body, expected.to_vec());
    }

    #[tokio::test]
    async fn truncate_encodes_filename_size_before_target_size() {
        let (addr, rx) = fake_storage_capture(0, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = StorageClient::new(&pool, Duration::from_secs(1));

        let remote_filename = "M00/00/00/test.jpg";
        let new_size = 1024u64;
        client.truncate(addr, remote_filename, new_size).await.unwrap();

        let req_body = rx.await.unwrap();
        let mut expected = BytesMut::new();
        expected.put_u64(remote_filename.len() as u64);
        expected.put_u64(new_size);
        expected.put_slice(remote_filename.as_bytes());
        assert_eq!(req_body, expected.to_vec());
    }
}
