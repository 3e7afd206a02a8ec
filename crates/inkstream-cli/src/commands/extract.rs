//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use inkstream_extractor::{ExtractMode, Extractor};
use tracing::debug;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = super::read_input(args.file.as_deref()).await?;
    let extractor = Extractor::new(config.extractor.clone());
    println!(
        "{}",
        render_extract(&extractor, &text, args.partial, args.show_grammar, formatter)?
    );
    Ok(())
}

/// Run one extraction and format the result.
pub(crate) fn render_extract(
    extractor: &Extractor,
    text: &str,
    partial: bool,
    show_grammar: bool,
    formatter: &Formatter,
) -> Result<String> {
    let mode = if partial {
        ExtractMode::Partial
    } else {
        ExtractMode::Final
    };

    let limit = extractor.config().max_text_length;
    if text.len() > limit {
        return Err(inkstream_extractor::ExtractorError::TextTooLong(text.len(), limit).into());
    }

    let extraction = extractor.extract_detailed(text, mode);
    debug!("Extracted {:?} document via {:?}", mode, extraction.grammar);

    let mut output = formatter.format_document(&extraction.document)?;
    // The grammar line would break JSON consumers
    if show_grammar && !formatter.is_json() {
        output = format!("{}\n{}", formatter.grammar(extraction.grammar), output);
    }
    Ok(output)
}
