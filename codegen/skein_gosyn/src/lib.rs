//! Validation of rendered source fragments against the target language's
//! top-level grammar.
//!
//! A fragment is conceptually wrapped in a minimal synthetic compilation
//! unit in which only top-level declarations are legal. [`parse_fragment`]
//! tokenizes the text, splits it into declarations, classifies each one
//! (import / type / const / var / func / method), and extracts the
//! collision keys the package symbol table needs. Anything that is not a
//! supported top-level construct rejects the whole fragment.
//!
//! The scanner is byte-oriented with explicit bracket-depth tracking, so
//! string literals, runes, and comments inside declaration bodies never
//! confuse the splitter.

mod error;
mod parse;
mod scan;

pub use error::CompileError;
pub use parse::parse_fragment;
