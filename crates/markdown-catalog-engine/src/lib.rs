pub mod catalog;
pub mod io;
pub mod models;
pub mod parsing;
pub mod tokens;


// Re-export key types for easier usage
pub use catalog::{Catalog, CatalogError};
pub use io::{DocumentSource, FetchError, FileSource, HttpSource, Source, is_url};
pub use models::{Document, Link, LinkKind, Section};
pub use parsing::{ParseError, ParseOptions, Parser, parse, parse_tokens};
pub use tokens::{Attrs, PulldownTokenizer, Tag, Token, Tokenizer};
