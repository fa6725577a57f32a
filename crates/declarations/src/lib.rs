//! # Impact Declarations
//!
//! Tree-sitter based extraction of the members of a Java source file.
//!
//! ## Architecture
//!
//! ```text
//! Java source
//!     │
//!     ├──> Tree-sitter parse (any error node → UnparsableSource)
//!     │
//!     ├──> Member collection
//!     │    ├─> methods (any depth, constructors excluded)
//!     │    ├─> fields (one entry per declarator)
//!     │    └─> top-level types (header, constructors, initializers, nested types)
//!     │
//!     └──> DeclarationSnapshot
//!          └─> keyed by (kind, name), overloads folded into one slot
//! ```
//!
//! Every declaration carries a canonical rendering: tokens re-joined with a fixed
//! spacing rule and comments removed. Two versions of a member are equal exactly
//! when their canonical renderings are equal, so whitespace and comment edits never
//! show up as changes.
//!
//! ## Example
//!
//! ```rust
//! use impact_declarations::{DeclarationExtractor, MemberKind};
//!
//! let mut extractor = DeclarationExtractor::new().unwrap();
//! let snapshot = extractor
//!     .snapshot("class A { String generateData() { return \"x\"; } }")
//!     .unwrap();
//!
//! let method = snapshot.get(MemberKind::Method, "generateData").unwrap();
//! assert_eq!(method.signature, "String generateData()");
//! ```

mod error;
mod extractor;
mod fqcn;
mod grammar;
mod render;
mod types;

pub use error::{DeclarationError, Result};
pub use extractor::DeclarationExtractor;
pub use fqcn::extract_fqcn;
pub use impact_protocol::MemberKind;
pub use types::{Declaration, DeclarationSnapshot, MemberKey};
