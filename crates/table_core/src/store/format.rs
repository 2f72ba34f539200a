//! Stored snapshot layout: MessagePack (named fields), LZ4 with the size
//! prepended, then a trailing SHA-256 of the compressed payload.

use super::error::RepositoryError;
use crate::models::{MatchSnapshot, SCHEMA_VERSION};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};

const CHECKSUM_LEN: usize = 32;

pub fn serialize_and_compress(snapshot: &MatchSnapshot) -> Result<Vec<u8>, RepositoryError> {
    let msgpack = to_vec_named(snapshot)?;
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);
    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<MatchSnapshot, RepositoryError> {
    // Size header + checksum
    if bytes.len() < 4 + CHECKSUM_LEN {
        return Err(RepositoryError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let mut hasher = Sha256::new();
    hasher.update(payload);
    if hasher.finalize()[..] != *checksum_bytes {
        return Err(RepositoryError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| RepositoryError::Decompression)?;
    let snapshot: MatchSnapshot = from_slice(&msgpack)?;

    if snapshot.schema_version != SCHEMA_VERSION {
        return Err(RepositoryError::VersionMismatch {
            found: snapshot.schema_version,
            expected: SCHEMA_VERSION,
        });
    }
    Ok(snapshot)
}
