//! Request signature digest.

use md5::{Digest, Md5};

/// Digest used for `request_sig`.
pub trait RequestDigest: Send + Sync {
    /// Hash `data`, rendered as lowercase hexadecimal.
    fn hex_digest(&self, data: &[u8]) -> String;
}

/// The MD5 digest the API expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl RequestDigest for Md5Digest {
    fn hex_digest(&self, data: &[u8]) -> String {
        let mut hasher = Md5::new();
        hasher.update(data);
        format!("{:x}", hasher.finalize())
    }
}
