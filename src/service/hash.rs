use crate::models::error::{BackupError, Result};
use crate::models::hash_algorithm::HashAlgorithm;
use blake2::digest::consts::U16;
use blake2::{Blake2b, Digest};
use std::fs;
use std::io::{BufReader, Error, Read};
use std::path::Path;

type Blake2b128 = Blake2b<U16>;

pub const HASH_HEX_LEN: usize = 32;

/// Hashes the full content of `file` and returns the lowercase hex digest.
pub fn hash_file(file: &Path, algorithm: HashAlgorithm) -> Result<String> {
    let reader = fs::File::open(file)
        .map(BufReader::new)
        .map_err(|cause| BackupError::Hash {
            path: file.to_path_buf(),
            cause,
        })?;

    let hash = hasher(reader, algorithm).map_err(|cause| BackupError::Hash {
        path: file.to_path_buf(),
        cause,
    })?;

    if !is_valid_hash(&hash) {
        return Err(BackupError::MalformedHash {
            path: file.to_path_buf(),
            hash,
        });
    }
    Ok(hash)
}

pub fn is_valid_hash(hash: &str) -> bool {
    hash.len() == HASH_HEX_LEN
        && hash
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Incremental digest over the bytes of one file.
pub enum ContentHasher {
    Md5(md5::Context),
    Blake2b128(Blake2b128),
}

impl ContentHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => ContentHasher::Md5(md5::Context::new()),
            HashAlgorithm::Blake2b128 => ContentHasher::Blake2b128(Blake2b128::new()),
        }
    }

    pub fn update(&mut self, bytes: &[u8]) {
        match self {
            ContentHasher::Md5(context) => context.consume(bytes),
            ContentHasher::Blake2b128(hasher) => hasher.update(bytes),
        }
    }

    /// Lowercase hex digest.
    pub fn finish(self) -> String {
        match self {
            ContentHasher::Md5(context) => format!("{:x}", context.compute()),
            ContentHasher::Blake2b128(hasher) => hex::encode(hasher.finalize()),
        }
    }
}

/// Reader that hashes everything read through it.
pub struct HashingReader<R> {
    inner: R,
    hasher: ContentHasher,
}

impl<R: Read> HashingReader<R> {
    pub fn new(inner: R, algorithm: HashAlgorithm) -> Self {
        Self {
            inner,
            hasher: ContentHasher::new(algorithm),
        }
    }

    pub fn finish(self) -> String {
        self.hasher.finish()
    }
}

impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let count = self.inner.read(buf)?;
        self.hasher.update(&buf[..count]);
        Ok(count)
    }
}

fn hasher<R: Read>(
    mut reader: BufReader<R>,
    algorithm: HashAlgorithm,
) -> std::result::Result<String, Error> {
    let mut hasher = ContentHasher::new(algorithm);
    let mut buffer = [0; 8192];
    loop {
        let count = reader.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }
    Ok(hasher.finish())
}
