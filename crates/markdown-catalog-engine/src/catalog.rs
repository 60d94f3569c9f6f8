use crate::io::{DocumentSource, FetchError};
use crate::models::Document;
use crate::parsing::{ParseError, ParseOptions, Parser};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] ParseError),
}

/// Fetches a catalog document from a source and parses it.
pub struct Catalog<S: DocumentSource> {
    source: S,
    parser: Parser,
}

impl<S: DocumentSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    pub fn with_options(source: S, options: ParseOptions) -> Self {
        Self {
            source,
            parser: Parser::new(options),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the document, then parses it.
    ///
    /// Fetch failures are returned as-is without attempting a parse, and are
    /// never retried.
    pub fn get_data(&self) -> Result<Document, CatalogError> {
        let text = self.source.fetch().inspect_err(|e| {
            log::warn!("failed to fetch {}: {e}", self.source.location());
        })?;
        log::info!(
            "fetched {} bytes from {}",
            text.len(),
            self.source.location()
        );
        Ok(self.parser.parse(&text)?)
    }
}
