//! Stream command implementation.
//!
//! Replays model output through a [`StreamingSession`] in fixed-size byte
//! chunks, printing the partial document after each one and the final
//! document once the input ends.

use crate::cli::StreamArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use inkstream_extractor::{ExtractedDocument, Grammar, StreamingSession};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, info};

/// Pacing options for a replay.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pacing {
    pub chunk_size: usize,
    pub delay: Duration,
    pub every: usize,
}

impl Pacing {
    fn from_args(args: &StreamArgs) -> Result<Self> {
        if args.chunk_size == 0 {
            return Err(CliError::InvalidInput("--chunk-size must be at least 1".into()));
        }
        if args.every == 0 {
            return Err(CliError::InvalidInput("--every must be at least 1".into()));
        }
        Ok(Self {
            chunk_size: args.chunk_size,
            delay: Duration::from_millis(args.delay_ms),
            every: args.every,
        })
    }
}

/// What a finished replay produced.
#[derive(Debug)]
pub(crate) struct StreamSummary {
    pub chunks: usize,
    pub updates: usize,
    pub grammar: Option<Grammar>,
    pub document: ExtractedDocument,
}

/// Execute the stream command.
pub async fn execute_stream(args: StreamArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pacing = Pacing::from_args(&args)?;
    let reader = super::open_input(args.file.as_deref()).await?;
    let session = StreamingSession::with_config(config.extractor.clone());

    let summary = replay(reader, session, pacing, |seq, doc| {
        println!("{}", formatter.format_update(seq, doc)?);
        Ok(())
    })
    .await?;

    if !formatter.is_json() {
        println!(
            "{}",
            formatter.success(&format!(
                "Finalized after {} chunks ({} updates shown)",
                summary.chunks, summary.updates
            ))
        );
        println!("{}", formatter.grammar(summary.grammar));
    }
    println!("{}", formatter.format_document(&summary.document)?);
    Ok(())
}

/// Feed `reader` into `session` chunk by chunk, calling `emit` for every
/// `pacing.every`-th partial document, then finalize.
pub(crate) async fn replay<R, F>(
    mut reader: R,
    mut session: StreamingSession,
    pacing: Pacing,
    mut emit: F,
) -> Result<StreamSummary>
where
    R: AsyncRead + Unpin,
    F: FnMut(usize, &ExtractedDocument) -> Result<()>,
{
    let mut buf = vec![0u8; pacing.chunk_size];
    let mut updates = 0;

    loop {
        let n = read_chunk(&mut reader, &mut buf).await?;
        if n == 0 {
            break;
        }

        let partial = session.on_bytes(&buf[..n])?;
        let seq = session.chunk_count();
        debug!("Read chunk {} ({} bytes)", seq, n);

        if seq % pacing.every == 0 {
            emit(seq, &partial)?;
            updates += 1;
        }

        if !pacing.delay.is_zero() {
            tokio::time::sleep(pacing.delay).await;
        }
    }

    let document = session.finalize()?;
    info!(
        "Replay finished: {} chunks, {} updates emitted",
        session.chunk_count(),
        updates
    );

    Ok(StreamSummary {
        chunks: session.chunk_count(),
        updates,
        grammar: session.grammar(),
        document,
    })
}

/// Fill `buf` as far as the reader allows, so chunk sizes stay fixed
/// regardless of how the underlying source splits its reads.
async fn read_chunk<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkstream_extractor::{ExtractorConfig, ExtractorError};

    fn pacing(chunk_size: usize, every: usize) -> Pacing {
        Pacing {
            chunk_size,
            delay: Duration::ZERO,
            every,
        }
    }

    #[tokio::test]
    async fn test_replay_collects_updates() {
        let input = "title: Streams\nkeywords: rust, async\ncontent: Body text".as_bytes();
        let mut seen = Vec::new();

        let summary = replay(input, StreamingSession::new(), pacing(8, 1), |seq, doc| {
            seen.push((seq, doc.title.clone()));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(summary.chunks, input.len().div_ceil(8));
        assert_eq!(summary.updates, summary.chunks);
        assert_eq!(seen.len(), summary.chunks);
        assert_eq!(summary.grammar, Some(Grammar::Sections));
        assert_eq!(summary.document.title.as_deref(), Some("Streams"));
        assert_eq!(summary.document.content.as_deref(), Some("Body text"));
        assert_eq!(
            summary.document.keywords,
            Some(vec!["rust".to_string(), "async".to_string()])
        );
    }

    #[tokio::test]
    async fn test_every_skips_updates() {
        let input = "# Title\n\nSome body text here.".as_bytes();
        let mut seqs = Vec::new();

        let summary = replay(input, StreamingSession::new(), pacing(4, 3), |seq, _| {
            seqs.push(seq);
            Ok(())
        })
        .await
        .unwrap();

        assert!(seqs.iter().all(|seq| seq % 3 == 0));
        assert_eq!(summary.updates, seqs.len());
        assert_eq!(summary.document.title.as_deref(), Some("Title"));
    }

    #[tokio::test]
    async fn test_split_multibyte_characters() {
        let input = "title: Café ☕ crème".as_bytes();
        let summary = replay(input, StreamingSession::new(), pacing(1, 1), |_, _| Ok(()))
            .await
            .unwrap();

        assert_eq!(summary.chunks, input.len());
        assert_eq!(summary.document.title.as_deref(), Some("Café ☕ crème"));
    }

    #[tokio::test]
    async fn test_empty_input_finalizes() {
        let summary = replay(&b""[..], StreamingSession::new(), pacing(16, 1), |_, _| Ok(()))
            .await
            .unwrap();

        assert_eq!(summary.chunks, 0);
        assert_eq!(summary.grammar, None);
        assert!(summary.document.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_input_is_error() {
        let session = StreamingSession::with_config(ExtractorConfig {
            max_text_length: 10,
            ..ExtractorConfig::default()
        });
        let result = replay(
            "title: far too long for the limit".as_bytes(),
            session,
            pacing(8, 1),
            |_, _| Ok(()),
        )
        .await;

        assert!(matches!(
            result,
            Err(CliError::Extractor(ExtractorError::TextTooLong(_, 10)))
        ));
    }

    #[test]
    fn test_pacing_rejects_zero() {
        let args = StreamArgs {
            file: None,
            chunk_size: 0,
            delay_ms: 0,
            every: 1,
        };
        assert!(matches!(Pacing::from_args(&args), Err(CliError::InvalidInput(_))));

        let args = StreamArgs {
            chunk_size: 4,
            every: 0,
            ..args
        };
        assert!(matches!(Pacing::from_args(&args), Err(CliError::InvalidInput(_))));
    }
}
