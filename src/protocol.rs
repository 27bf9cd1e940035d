//! Wire codec: header framing, fixed-width fields, metadata records
//!
//! This module handles all protocol-level encoding and decoding operations
//! for communication with tracker and storage servers. Nothing in here touches
//! a socket; see `transport` and `tracker`/`storage` for that.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

use crate::errors::{FastDFSError, Result};
use crate::types::*;

/// Width of the IP-address field embedded in tracker query responses.
///
/// Distinct from [`IP_ADDRESS_SIZE`], which is the width used by the
/// query-file-info source-ip field.
pub const TRACKER_IP_ADDR_LEN: usize = 15;

/// Encodes a protocol header into a 10-byte buffer.
///
/// The header format is:
///   - Bytes 0-7: body length (8 bytes, big-endian uint64)
///   - Byte 8: command code
///   - Byte 9: status code (0 for request, error code for response)
pub fn encode_header(length: u64, cmd: u8, status: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(FDFS_PROTO_HEADER_LEN);
    buf.put_u64(length);
    buf.put_u8(cmd);
    buf.put_u8(status);
    buf.freeze()
}

/// Encodes a full request frame: a header sized to `body`, followed by `body` itself.
pub fn encode_request(cmd: u8, body: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(FDFS_PROTO_HEADER_LEN + body.len());
    buf.put_slice(&encode_header(body.len() as u64, cmd, 0));
    buf.put_slice(body);
    buf.freeze()
}

/// Decodes a protocol header from a buffer.
///
/// The header must be exactly 10 bytes long.
pub fn decode_header(data: &[u8]) -> Result<FrameHeader> {
    if data.len() < FDFS_PROTO_HEADER_LEN {
        return Err(FastDFSError::Protocol(format!(
            "header too short: {} bytes",
            data.len()
        )));
    }

    let mut buf = &data[..FDFS_PROTO_HEADER_LEN];
    let length = buf.get_u64();
    let cmd = buf.get_u8();
    let status = buf.get_u8();

    Ok(FrameHeader { length, cmd, status })
}

/// Splits a file ID into its group-name and remote-filename components.
///
/// A file ID has the format `groupName/path/to/file`, e.g.
/// `group1/M00/00/00/wKgBcFxyz.jpg`. Everything after the first `/` is an
/// opaque remote-path token, even if it itself contains slashes.
pub fn split_file_id(file_id: &str) -> Result<(String, String)> {
    if file_id.is_empty() {
        return Err(FastDFSError::InvalidFileId(file_id.to_string()));
    }

    let mut parts = file_id.splitn(2, '/');
    let group_name = parts.next().unwrap_or("");
    let remote_filename = match parts.next() {
        Some(rest) => rest,
        None => return Err(FastDFSError::InvalidFileId(file_id.to_string())),
    };

    if group_name.is_empty() || group_name.len() > FDFS_GROUP_NAME_MAX_LEN {
        return Err(FastDFSError::InvalidFileId(file_id.to_string()));
    }

    if remote_filename.is_empty() {
        return Err(FastDFSError::InvalidFileId(file_id.to_string()));
    }

    Ok((group_name.to_string(), remote_filename.to_string()))
}

/// Constructs a complete file ID from its components; the inverse of `split_file_id`.
pub fn join_file_id(group_name: &str, remote_filename: &str) -> String {
    format!("{}/{}", group_name, remote_filename)
}

/// Encodes metadata key-value pairs into the wire format.
///
/// Format: `key1<0x02>value1<0x01>key2<0x02>value2<0x01>...` with no trailing
/// separator after the last pair. Keys longer than 64 bytes or values longer
/// than 256 bytes are rejected with `InvalidArgument` rather than silently
/// truncated.
pub fn encode_metadata(metadata: &Metadata) -> Result<Bytes> {
    if metadata.is_empty() {
        return Ok(Bytes::new());
    }

    for (key, value) in metadata {
        if key.as_bytes().len() > FDFS_MAX_META_NAME_LEN {
            return Err(FastDFSError::InvalidArgument(format!(
                "metadata key {key:?} exceeds {FDFS_MAX_META_NAME_LEN} bytes"
            )));
        }
        if value.as_bytes().len() > FDFS_MAX_META_VALUE_LEN {
            return Err(FastDFSError::InvalidArgument(format!(
                "metadata value for key {key:?} exceeds {FDFS_MAX_META_VALUE_LEN} bytes"
            )));
        }
    }

    let mut buf = BytesMut::new();
    let mut remaining = metadata.len();

    for (key, value) in metadata {
        buf.put_slice(key.as_bytes());
        buf.put_u8(FDFS_FIELD_SEPARATOR);
        buf.put_slice(value.as_bytes());

        remaining -= 1;
        if remaining > 0 {
            buf.put_u8(FDFS_RECORD_SEPARATOR);
        }
    }

    Ok(buf.freeze())
}

/// Decodes wire-format metadata into a map; the inverse of `encode_metadata`.
///
/// Records are separated by `0x01` and fields within a record by `0x02`.
/// Records that do not split into exactly two fields are dropped silently,
/// matching the server's tolerance for malformed records.
pub fn decode_metadata(data: &[u8]) -> Result<Metadata> {
    if data.is_empty() {
        return Ok(HashMap::new());
    }

    let mut metadata = HashMap::new();

    for record in data.split(|&b| b == FDFS_RECORD_SEPARATOR) {
        if record.is_empty() {
            continue;
        }

        let fields: Vec<&[u8]> = record.split(|&b| b == FDFS_FIELD_SEPARATOR).collect();
        if fields.len() != 2 || fields[0].is_empty() || fields[1].is_empty() {
            continue;
        }

        let key = String::from_utf8_lossy(fields[0]).to_string();
        let value = String::from_utf8_lossy(fields[1]).to_string();
        metadata.insert(key, value);
    }

    Ok(metadata)
}

/// Extracts and validates the file extension from a filename.
///
/// The extension excludes the leading dot and is truncated to 6 characters
/// if it exceeds the protocol maximum. Unlike `Path::extension()`, a leading
/// dot with no further dots (`".hidden"`) still yields an extension here,
/// matching the server's plain last-dot-in-the-basename convention rather
/// than the Unix dotfile convention.
///
/// Examples: `"test.jpg"` -> `"jpg"`; `"file.tar.gz"` -> `"gz"`; `"noext"` -> `""`;
/// `".hidden"` -> `"hidden"`.
pub fn get_file_ext_name(filename: &str) -> String {
    let basename = Path::new(filename)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let ext = match basename.rfind('.') {
        Some(pos) if pos + 1 < basename.len() => &basename[pos + 1..],
        _ => "",
    };

    if ext.len() > FDFS_FILE_EXT_NAME_MAX_LEN {
        ext[..FDFS_FILE_EXT_NAME_MAX_LEN].to_string()
    } else {
        ext.to_string()
    }
}

/// Reads the entire contents of a local file.
pub fn read_file_content(filename: &str) -> Result<Bytes> {
    let data = std::fs::read(filename)?;
    Ok(Bytes::from(data))
}

/// Writes data to a local file, creating parent directories if needed.
///
/// If the file already exists, it is truncated.
pub fn write_file_content(filename: &str, data: &[u8]) -> Result<()> {
    let path = Path::new(filename);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(filename, data)?;
    Ok(())
}

/// Pads a string to a fixed length with null bytes (`0x00`).
///
/// Used to build fixed-width fields. Strings longer than `length` are
/// truncated; this never panics on multi-byte UTF-8 boundary violations
/// because truncation happens on raw bytes, consistent with the wire format.
pub fn pad_string(s: &str, length: usize) -> Bytes {
    let mut buf = BytesMut::with_capacity(length);
    let bytes = s.as_bytes();
    let copy_len = bytes.len().min(length);
    buf.put_slice(&bytes[..copy_len]);
    buf.resize(length, 0);
    buf.freeze()
}

/// Removes trailing null bytes from a fixed-width field; the inverse of `pad_string`.
pub fn unpad_string(data: &[u8]) -> String {
    let end = data.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
    String::from_utf8_lossy(&data[..end]).to_string()
}

/// Encodes a 64-bit integer as an 8-byte big-endian value.
pub fn encode_int64(n: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    buf.put_u64(n);
    buf.freeze()
}

/// Decodes an 8-byte big-endian value into a 64-bit integer.
///
/// Returns 0 if fewer than 8 bytes are available rather than panicking; this
/// is only used internally on slices already length-checked by the caller.
pub fn decode_int64(data: &[u8]) -> u64 {
    if data.len() < 8 {
        return 0;
    }
    let mut buf = &data[..8];
    buf.get_u64()
}

/// Encodes a 32-bit integer as a 4-byte big-endian value.
pub fn encode_int32(n: u32) -> Bytes {
    let mut buf = BytesMut::with_capacity(4);
    buf.put_u32(n);
    buf.freeze()
}

/// Decodes a 4-byte big-endian value into a 32-bit integer.
pub fn decode_int32(data: &[u8]) -> u32 {
    if data.len() < 4 {
        return 0;
    }
    let mut buf = &data[..4];
    buf.get_u32()
}

/// Decodes the fixed-width `(size, create_time, crc32, source_ip)` body of a
/// query-file-info response, per the width pinned in [`FILE_INFO_CREATE_TIME_LEN`].
pub fn decode_file_info(data: &[u8]) -> Result<FileInfo> {
    let want = 8 + FILE_INFO_CREATE_TIME_LEN + 4 + IP_ADDRESS_SIZE;
    if data.len() < want {
        return Err(FastDFSError::Protocol(format!(
            "file info response too short: got {} bytes, want at least {}",
            data.len(),
            want
        )));
    }

    let mut offset = 0;
    let file_size = decode_int64(&data[offset..offset + 8]);
    offset += 8;

    let create_timestamp =
        u32::from_be_bytes(data[offset..offset + FILE_INFO_CREATE_TIME_LEN].try_into().unwrap());
    offset += FILE_INFO_CREATE_TIME_LEN;

    let crc32 = decode_int32(&data[offset..offset + 4]);
    offset += 4;

    let source_ip_addr = unpad_string(&data[offset..offset + IP_ADDRESS_SIZE]);

    let create_time = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(create_timestamp as u64);

    Ok(FileInfo {
        file_size,
        create_time,
        crc32,
        source_ip_addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_header() {
        let length = 1024;
        let cmd = 11;
        let status = 0;

        let encoded = encode_header(length, cmd, status);
        assert_eq!(encoded.len(), FDFS_PROTO_HEADER_LEN);

        let decoded = decode_header(&encoded).unwrap();
        assert_eq!(decoded.length, length);
        assert_eq!(decoded.cmd, cmd);
        assert_eq!(decoded.status, status);
    }

    #[test]
    fn test_decode_header_short() {
        assert!(decode_header(b"short").is_err());
    }

    #[test]
    fn test_split_file_id() {
        let file_id = "group1/M00/00/00/test.jpg";
        let (group_name, remote_filename) = split_file_id(file_id).unwrap();

        assert_eq!(group_name, "group1");
        assert_eq!(remote_filename, "M00/00/00/test.jpg");
    }

    #[test]
    fn test_split_file_id_invalid() {
        for file_id in [
            "",
            "no-slash",
            "/x",
            "group1/",
            &("g".repeat(17) + "/x"),
        ] {
            assert!(split_file_id(file_id).is_err(), "{file_id:?} should be invalid");
        }
    }

    #[test]
    fn test_join_file_id() {
        let file_id = join_file_id("group1", "M00/00/00/test.jpg");
        assert_eq!(file_id, "group1/M00/00/00/test.jpg");
    }

    #[test]
    fn test_file_id_round_trip() {
        let original = "group1/M00/00/00/test.jpg";
        let (group, name) = split_file_id(original).unwrap();
        assert_eq!(join_file_id(&group, &name), original);
    }

    #[test]
    fn test_encode_decode_metadata() {
        let mut metadata = HashMap::new();
        metadata.insert("author".to_string(), "John Doe".to_string());
        metadata.insert("date".to_string(), "2025-01-15".to_string());

        let encoded = encode_metadata(&metadata).unwrap();
        assert!(!encoded.is_empty());

        let decoded = decode_metadata(&encoded).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn test_encode_metadata_empty() {
        assert!(encode_metadata(&HashMap::new()).unwrap().is_empty());
    }

    #[test]
    fn test_encode_metadata_rejects_oversized_key() {
        let mut metadata = HashMap::new();
        metadata.insert("a".repeat(FDFS_MAX_META_NAME_LEN + 1), "value".to_string());
        assert!(matches!(
            encode_metadata(&metadata),
            Err(FastDFSError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_encode_metadata_rejects_oversized_value() {
        let mut metadata = HashMap::new();
        metadata.insert("key".to_string(), "b".repeat(FDFS_MAX_META_VALUE_LEN + 1));
        assert!(matches!(
            encode_metadata(&metadata),
            Err(FastDFSError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_decode_metadata_empty() {
        assert!(decode_metadata(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_decode_metadata_malformed_record_dropped() {
        // "a\x02\x01" -> one record "a\x02" (missing value) then an empty trailing record.
        let decoded = decode_metadata(b"a\x02").unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_metadata_skips_bad_keeps_good() {
        let mut data = BytesMut::new();
        data.put_slice(b"a\x02");
        data.put_u8(FDFS_RECORD_SEPARATOR);
        data.put_slice(b"k\x02v");
        let decoded = decode_metadata(&data).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get("k"), Some(&"v".to_string()));
    }

    #[test]
    fn test_get_file_ext_name() {
        assert_eq!(get_file_ext_name("test.jpg"), "jpg");
        assert_eq!(get_file_ext_name("file.tar.gz"), "gz");
        assert_eq!(get_file_ext_name("noext"), "");
    }

    #[test]
    fn test_get_file_ext_name_truncation() {
        let ext = get_file_ext_name("file.verylongextension");
        assert_eq!(ext.len(), 6);
        assert_eq!(ext, "verylo");
    }

    #[test]
    fn test_pad_unpad_string() {
        let padded = pad_string("test", 16);
        assert_eq!(padded.len(), 16);
        assert_eq!(unpad_string(&padded), "test");
    }

    #[test]
    fn test_pad_string_truncate() {
        let padded = pad_string("verylongstringthatexceedslength", 10);
        assert_eq!(padded.len(), 10);
    }

    #[test]
    fn test_pad_empty_string() {
        let padded = pad_string("", 16);
        assert!(padded.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_encode_decode_int64() {
        for value in [0u64, 1, 1024, u32::MAX as u64, u64::MAX] {
            let encoded = encode_int64(value);
            assert_eq!(encoded.len(), 8);
            assert_eq!(decode_int64(&encoded), value);
        }
    }

    #[test]
    fn test_decode_int64_short_data() {
        assert_eq!(decode_int64(b"short"), 0);
    }

    #[test]
    fn test_encode_decode_int32() {
        for value in [0u32, 1, 1024, u32::MAX] {
            let encoded = encode_int32(value);
            assert_eq!(encoded.len(), 4);
            assert_eq!(decode_int32(&encoded), value);
        }
    }

    #[test]
    fn test_decode_file_info() {
        let mut body = BytesMut::new();
        body.put_slice(&encode_int64(5));
        body.put_u32(1_700_000_000);
        body.put_slice(&encode_int32(0xdead_beef));
        body.put_slice(&pad_string("192.168.1.10", IP_ADDRESS_SIZE));

        let info = decode_file_info(&body).unwrap();
        assert_eq!(info.file_size, 5);
        assert_eq!(info.crc32, 0xdead_beef);
        assert_eq!(info.source_ip_addr, "192.168.1.10");
    }

    #[test]
    fn test_decode_file_info_too_short() {
        assert!(decode_file_info(b"short").is_err());
    }
}
