//! Config document model, parser, formatter and editor.
//!
//! Documents are UTF-8 text made of top-level `name: { ... }` blocks whose
//! fields are named entries:
//!
//! ```text
//! // roles installed by assetctl.
//! roles: {
//! 	"golang/assistant": {
//! 		origin: "github.com/acme/assets/roles/golang/assistant@v0.2.1"
//! 		description: "Go programming expert"
//! 		tags: ["golang", "programming"]
//! 		prompt: """
//! 			You are a Go expert.
//! 			"""
//! 	}
//! }
//! ```
//!
//! Parsing builds a tree, edits are applied to the tree, and the tree is
//! written back with a canonical formatter. Formatting is idempotent but does
//! not reproduce the original bytes.

pub mod editor;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod value;

pub use editor::{Document, Upsert};
pub use lexer::ScanState;
pub use value::{Field, FieldValue, Member, StructValue};
