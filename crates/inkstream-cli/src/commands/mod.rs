//! Command implementations.

pub mod config;
pub mod extract;
pub mod stream;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::stream::execute_stream;

use crate::error::{CliError, Result};
use std::path::Path;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Open the input source: a file, or stdin when `path` is absent or `-`.
pub(crate) async fn open_input(path: Option<&Path>) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = tokio::fs::File::open(path).await.map_err(|e| {
                CliError::InvalidInput(format!("cannot open {}: {}", path.display(), e))
            })?;
            Ok(Box::new(file))
        }
        _ => Ok(Box::new(tokio::io::stdin())),
    }
}

/// Read the whole input as text.
///
/// Invalid UTF-8 is replaced rather than rejected; model output is never
/// refused.
pub(crate) async fn read_input(path: Option<&Path>) -> Result<String> {
    let mut reader = open_input(path).await?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
