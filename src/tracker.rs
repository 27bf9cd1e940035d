//! Tracker client: translates the four tracker queries into wire requests
//! and routes responses into [`StorageServer`] endpoints.
//!
//! The tracker protocol is stateless request/response over a borrowed
//! transport; trackers are interchangeable, so callers rotate across
//! `tracker_addrs` themselves (see `operations.rs`) rather than this module
//! picking one.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bytes::{BufMut, Bytes, BytesMut};

use crate::errors::{map_status_to_error, FastDFSError, Result};
use crate::pool::Pool;
use crate::protocol::{self, TRACKER_IP_ADDR_LEN};
use crate::types::{StorageServer, TrackerCommand, FDFS_GROUP_NAME_MAX_LEN};

/// Thin facade over a borrowed tracker transport. Holds nothing but timing
/// configuration; every call borrows its own transport from `pool`.
pub struct TrackerClient<'a> {
    pool: &'a Pool,
    network_timeout: Duration,
}

impl<'a> TrackerClient<'a> {
    pub fn new(pool: &'a Pool, network_timeout: Duration) -> Self {
        Self {
            pool,
            network_timeout,
        }
    }

    /// `query_store_without_group`: ask any tracker which group/storage/path
    /// index should receive a new file.
    pub async fn query_store_without_group(&self, tracker_addr: SocketAddr) -> Result<(String, StorageServer)> {
        let response = self
            .roundtrip(
                tracker_addr,
                TrackerCommand::ServiceQueryStoreWithoutGroupOne.into(),
                &[],
            )
            .await?;
        decode_store_response(&response)
    }

    /// `query_store_with_group`: ask the tracker for a storage server within
    /// a specific, already-known group (used by upload-slave-file).
    pub async fn query_store_with_group(
        &self,
        tracker_addr: SocketAddr,
        group_name: &str,
    ) -> Result<(String, StorageServer)> {
        let body = protocol::pad_string(group_name, FDFS_GROUP_NAME_MAX_LEN);

        let response = self
            .roundtrip(
                tracker_addr,
                TrackerCommand::ServiceQueryStoreWithGroupOne.into(),
                &body,
            )
            .await?;
        decode_store_response(&response)
    }

    /// `query_fetch`: ask the tracker which storage server holds `group/filename`
    /// for a read (download, get-metadata, query-file-info).
    pub async fn query_fetch(
        &self,
        tracker_addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
    ) -> Result<SocketAddr> {
        let body = encode_group_and_name(group_name, remote_filename);
        let response = self
            .roundtrip(tracker_addr, TrackerCommand::ServiceQueryFetchOne.into(), &body)
            .await?;
        decode_fetch_response(&response)
    }

    /// `query_update`: ask the tracker which storage server may mutate
    /// `group/filename` (delete, set-metadata, append, modify, truncate).
    pub async fn query_update(
        &self,
        tracker_addr: SocketAddr,
        group_name: &str,
        remote_filename: &str,
    ) -> Result<SocketAddr> {
        let body = encode_group_and_name(group_name, remote_filename);
        let response = self
            .roundtrip(tracker_addr, TrackerCommand::ServiceQueryUpdate.into(), &body)
            .await?;
        decode_fetch_response(&response)
    }

    async fn roundtrip(&self, tracker_addr: SocketAddr, cmd: u8, body: &[u8]) -> Result<Bytes> {
        let mut leased = self.pool.borrow(tracker_addr).await?;

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

        if let Some(err) = map_status_to_error(header.status, "") {
            self.pool.release(leased, !err.poisons_transport()).await;
            return Err(err);
        }

        self.pool.release(leased, true).await;
        Ok(body_bytes)
    }
}

fn encode_group_and_name(group_name: &str, remote_filename: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(FDFS_GROUP_NAME_MAX_LEN + remote_filename.len());
    buf.put_slice(&protocol::pad_string(group_name, FDFS_GROUP_NAME_MAX_LEN));
    buf.put_slice(remote_filename.as_bytes());
    buf.freeze()
}

/// Decodes the group-name + storage-ip + port + store-path-index body shared
/// by both store queries. The port field is `int64` (8 bytes), like every
/// other tracker response in this protocol.
fn decode_store_response(data: &[u8]) -> Result<(String, StorageServer)> {
    const EXPECTED_LEN: usize = FDFS_GROUP_NAME_MAX_LEN + TRACKER_IP_ADDR_LEN + 8 + 1;
    if data.len() != EXPECTED_LEN {
        return Err(FastDFSError::Protocol(format!(
            "store response: expected {EXPECTED_LEN} bytes, got {}",
            data.len()
        )));
    }

    let group_name = protocol::unpad_string(&data[..FDFS_GROUP_NAME_MAX_LEN]);
    let mut offset = FDFS_GROUP_NAME_MAX_LEN;
    let ip_addr = protocol::unpad_string(&data[offset..offset + TRACKER_IP_ADDR_LEN]);
    offset += TRACKER_IP_ADDR_LEN;

    let port = protocol::decode_int64(&data[offset..offset + 8]) as u16;
    offset += 8;
    let store_path_index = data[offset];

    let addr = resolve(&ip_addr, port)?;
    Ok((
        group_name,
        StorageServer {
            addr,
            store_path_index,
        },
    ))
}

/// Decodes the group-name + storage-ip + port body shared by fetch and
/// update queries. The group name is present but unused by callers (they
/// already know it); it must still be skipped to reach the ip/port fields.
fn decode_fetch_response(data: &[u8]) -> Result<SocketAddr> {
    const EXPECTED_LEN: usize = FDFS_GROUP_NAME_MAX_LEN + TRACKER_IP_ADDR_LEN + 8;
    if data.len() != EXPECTED_LEN {
        return Err(FastDFSError::Protocol(format!(
            "fetch response: expected {EXPECTED_LEN} bytes, got {}",
            data.len()
        )));
    }

    let mut offset = FDFS_GROUP_NAME_MAX_LEN;
    let ip_addr = protocol::unpad_string(&data[offset..offset + TRACKER_IP_ADDR_LEN]);
    offset += TRACKER_IP_ADDR_LEN;

    let port = protocol::decode_int64(&data[offset..offset + 8]) as u16;
    resolve(&ip_addr, port)
}

fn resolve(ip_addr: &str, port: u16) -> Result<SocketAddr> {
    let ip: IpAddr = ip_addr
        .parse()
        .map_err(|_| FastDFSError::Protocol(format!("malformed storage IP address: {ip_addr:?}")))?;
    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn fake_tracker(status: u8, body: Vec<u8>) -> SocketAddr {
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

    fn store_response_body(group: &str, ip: &str, port: u16, path_index: u8) -> Vec<u8> {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::pad_string(group, FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(&protocol::pad_string(ip, TRACKER_IP_ADDR_LEN));
        body.put_u64(port as u64);
        body.put_u8(path_index);
        body.to_vec()
    }

    fn fetch_response_body(group: &str, ip: &str, port: u16) -> Vec<u8> {
        let mut body = BytesMut::new();
        body.put_slice(&protocol::pad_string(group, FDFS_GROUP_NAME_MAX_LEN));
        body.put_slice(&protocol::pad_string(ip, TRACKER_IP_ADDR_LEN));
        body.put_u64(port as u64);
        body.to_vec()
    }

    #[tokio::test]
    async fn query_store_without_group_decodes_endpoint() {
        let body = store_response_body("group1", "127.0.0.1", 23000, 2);
        let tracker_addr = fake_tracker(0, body).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = TrackerClient::new(&pool, Duration::from_secs(1));

        let (group, storage) = client.query_store_without_group(tracker_addr).await.unwrap();
        assert_eq!(group, "group1");
        assert_eq!(storage.addr, "127.0.0.1:23000".parse().unwrap());
        assert_eq!(storage.store_path_index, 2);
    }

    #[tokio::test]
    async fn query_fetch_decodes_endpoint() {
        let body = fetch_response_body("group1", "127.0.0.1", 23001);
        let tracker_addr = fake_tracker(0, body).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = TrackerClient::new(&pool, Duration::from_secs(1));

        let addr = client
            .query_fetch(tracker_addr, "group1", "M00/00/00/file.txt")
            .await
            .unwrap();
        assert_eq!(addr, "127.0.0.1:23001".parse().unwrap());
    }

    #[tokio::test]
    async fn nonzero_status_maps_to_error() {
        let tracker_addr = fake_tracker(2, vec![]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = TrackerClient::new(&pool, Duration::from_secs(1));

        let result = client
            .query_fetch(tracker_addr, "group1", "M00/00/00/file.txt")
            .await;
        assert!(matches!(result, Err(FastDFSError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn malformed_response_length_is_protocol_error() {
        let tracker_addr = fake_tracker(0, vec![1, 2, 3]).await;

        let pool = Pool::new(4, Duration::from_secs(1), Duration::from_secs(60), true);
        let client = TrackerClient::new(&pool, Duration::from_secs(1));

        let result = client
            .query_fetch(tracker_addr, "group1", "M00/00/00/file.txt")
            .await;
        assert!(matches!(result, Err(FastDFSError::Protocol(_))));
    }
}
