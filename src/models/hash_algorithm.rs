use serde::Deserialize;

/// Digest used for the hash part of a backup name.
///
/// Both variants produce 128 bits, rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// Keeps backup names compatible with archives made by earlier tooling.
    /// Only used for naming and deduplication, never for integrity.
    #[default]
    Md5,

    /// BLAKE2b truncated to a 16 byte output.
    Blake2b128,
}

impl HashAlgorithm {
    pub fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Blake2b128 => "blake2b128",
        }
    }
}
