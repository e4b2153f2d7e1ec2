//! Lint implementations.

mod text_encoding_identifier_case;

pub use self::text_encoding_identifier_case::TextEncodingIdentifierCaseLint;
