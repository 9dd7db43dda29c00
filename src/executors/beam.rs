//! `beam`: SFTP file transfer between the local filesystem (where this
//! process runs) and a single remote host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use russh_sftp::client::SftpSession;
use russh_sftp::protocol::OpenFlags;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::ScoutError;
use crate::pool::PooledConnection;

/// Which way bytes moved in a [`beam`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upload,
    Download,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Upload => "upload",
            Direction::Download => "download",
        })
    }
}

/// The caller's requested direction, including the "let the local file's
/// existence decide" sentinel from spec.md §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionRequest {
    Upload,
    Download,
    Auto,
}

impl DirectionRequest {
    pub fn parse(raw: &str) -> Result<Self, ScoutError> {
        match raw {
            "upload" => Ok(DirectionRequest::Upload),
            "download" => Ok(DirectionRequest::Download),
            "auto" => Ok(DirectionRequest::Auto),
            other => Err(ScoutError::Validation(format!(
                "unknown beam direction '{other}', expected upload|download|auto"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransferResult {
    pub direction: Direction,
    pub bytes_transferred: u64,
    pub ok: bool,
    pub message: String,
}

/// Copies a file between `local_path` (on this process's filesystem) and
/// `remote_path` (on the host behind `conn`) over the session's SFTP
/// subsystem, in the direction named by `requested` — or, for
/// [`DirectionRequest::Auto`], uploading iff `local_path` exists locally
/// and downloading otherwise.
pub async fn beam(
    conn: &PooledConnection,
    local_path: &str,
    remote_path: &str,
    requested: DirectionRequest,
) -> Result<TransferResult, ScoutError> {
    let direction = match requested {
        DirectionRequest::Upload => Direction::Upload,
        DirectionRequest::Download => Direction::Download,
        DirectionRequest::Auto => {
            if tokio::fs::metadata(local_path).await.is_ok() {
                Direction::Upload
            } else {
                Direction::Download
            }
        }
    };

    let sftp = open_sftp(conn).await?;

    let result = match direction {
        Direction::Upload => upload(&sftp, local_path, remote_path).await,
        Direction::Download => download(&sftp, remote_path, local_path).await,
    };

    Ok(match result {
        Ok(bytes_transferred) => TransferResult {
            direction,
            bytes_transferred,
            ok: true,
            message: format!("{direction}ed {bytes_transferred} bytes"),
        },
        Err(e) => TransferResult {
            direction,
            bytes_transferred: 0,
            ok: false,
            message: e.to_string(),
        },
    })
}

async fn upload(sftp: &SftpSession, local_path: &str, remote_path: &str) -> Result<u64, ScoutError> {
    let mut local_file = tokio::fs::File::open(local_path)
        .await
        .map_err(|e| ScoutError::Transfer(format!("open local {local_path}: {e}")))?;

    let mut remote_file = sftp
        .create(remote_path)
        .await
        .map_err(|e| ScoutError::Transfer(format!("create remote {remote_path}: {e}")))?;

    let transferred = copy_all(&mut local_file, &mut remote_file).await?;

    remote_file
        .shutdown()
        .await
        .map_err(|e| ScoutError::Transfer(format!("finalize remote {remote_path}: {e}")))?;

    Ok(transferred)
}

async fn download(sftp: &SftpSession, remote_path: &str, local_path: &str) -> Result<u64, ScoutError> {
    let mut remote_file = sftp
        .open_with_flags(remote_path, OpenFlags::READ)
        .await
        .map_err(|e| ScoutError::Transfer(format!("open remote {remote_path}: {e}")))?;

    let mut local_file = tokio::fs::File::create(local_path)
        .await
        .map_err(|e| ScoutError::Transfer(format!("create local {local_path}: {e}")))?;

    let transferred = copy_all(&mut remote_file, &mut local_file).await?;

    local_file
        .flush()
        .await
        .map_err(|e| ScoutError::Transfer(format!("finalize local {local_path}: {e}")))?;

    Ok(transferred)
}

async fn copy_all<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, ScoutError>
where
    R: AsyncReadExt + Unpin,
    W: AsyncWriteExt + Unpin,
{
    let mut buf = vec![0u8; 256 * 1024];
    let mut transferred: u64 = 0;
    loop {
        let n = reader
            .read(&mut buf)
            .await
            .map_err(|e| ScoutError::Transfer(format!("read: {e}")))?;
        if n == 0 {
            break;
        }
        writer
            .write_all(&buf[..n])
            .await
            .map_err(|e| ScoutError::Transfer(format!("write: {e}")))?;
        transferred += n as u64;
    }
    Ok(transferred)
}

async fn open_sftp(conn: &PooledConnection) -> Result<SftpSession, ScoutError> {
    let channel = conn
        .client
        .get_channel()
        .await
        .map_err(|e| ScoutError::Transfer(format!("open channel on {}: {e}", conn.host)))?;
    channel
        .request_subsystem(true, "sftp")
        .await
        .map_err(|e| ScoutError::Transfer(format!("request sftp subsystem on {}: {e}", conn.host)))?;
    SftpSession::new(channel.into_stream())
        .await
        .map_err(|e| ScoutError::Transfer(format!("start sftp session on {}: {e}", conn.host)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_request_parses_the_three_accepted_spellings() {
        assert_eq!(DirectionRequest::parse("upload").unwrap(), DirectionRequest::Upload);
        assert_eq!(DirectionRequest::parse("download").unwrap(), DirectionRequest::Download);
        assert_eq!(DirectionRequest::parse("auto").unwrap(), DirectionRequest::Auto);
    }

    #[test]
    fn direction_request_rejects_anything_else() {
        assert!(DirectionRequest::parse("sideways").is_err());
    }

    #[test]
    fn direction_displays_lowercase() {
        assert_eq!(Direction::Upload.to_string(), "upload");
        assert_eq!(Direction::Download.to_string(), "download");
    }
}
