//! Model Integrity Check
//!
//! SHA-256 of the ONNX file, compared against the configured digest before
//! the session is built.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use super::inference::InferenceError;

/// Hex SHA-256 of a file, streamed in 64 KiB chunks
pub fn sha256_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compare the file digest with `expected` (hex, case-insensitive)
pub fn verify_checksum(path: impl AsRef<Path>, expected: &str) -> Result<(), InferenceError> {
    let path = path.as_ref();
    let actual = sha256_file(path)
        .map_err(|_| InferenceError::ModelNotFound(path.display().to_string()))?;
    let expected = expected.trim().to_lowercase();

    if actual != expected {
        log::error!("Model checksum mismatch for {}", path.display());
        return Err(InferenceError::ChecksumMismatch { expected, actual });
    }

    log::info!("Model checksum verified: {}", &actual[..16]);
    Ok(())
}
