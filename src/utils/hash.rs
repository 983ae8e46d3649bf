use sha1::{Digest, Sha1};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

fn blob_header(len: u64) -> String {
    format!("blob {len}\0")
}

/// Compute the git blob hash (SHA-1 over `blob <len>\0` + bytes) of a buffer
pub fn compute_blob_hash(content: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(blob_header(content.len() as u64).as_bytes());
    hasher.update(content);
    hex::encode(hasher.finalize())
}

/// Compute the git blob hash of a file's contents.
///
/// The length in the header comes from the file's metadata; the file is then
/// streamed through the hasher so firmware images are never held in memory.
/// A file that changes length while being read is reported as an error
/// rather than producing a hash that matches neither version.
pub async fn compute_file_hash(path: &Path) -> Result<String, std::io::Error> {
    let mut file = File::open(path).await?;
    let len = file.metadata().await?.len();

    let mut hasher = Sha1::new();
    hasher.update(blob_header(len).as_bytes());

    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut read_total: u64 = 0;
    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        read_total += n as u64;
    }

    if read_total != len {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!(
                "{} changed while hashing: expected {len} bytes, read {read_total}",
                path.display()
            ),
        ));
    }

    Ok(hex::encode(hasher.finalize()))
}
