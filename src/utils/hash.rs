use sha2::{Sha256, Digest};

/// SHA-256 of an in-memory buffer as lowercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
