//! The registration side of a radix tree URL router.
//!
//! Routes are stored in a compressing dynamic trie (radix tree): nodes with a
//! common prefix share a parent, and children are ordered by priority so that
//! the branches with the most routes are tried first. The finished tree is
//! meant to be handed to a matcher, which walks it read-only.
//!
//! ```rust
//! use routetrie::Node;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = Node::new();
//! tree.insert("/", "index")?;
//! tree.insert("/blog/:category/:post", "post")?;
//! tree.insert("/files/*filepath", "files")?;
//!
//! assert_eq!(tree.get("/blog/:category/:post"), Some(&"post"));
//! # Ok(())
//! # }
//! ```
//!
//! Routes can contain two types of parameters:
//!
//! ```text
//!  Syntax    Type
//!  :name     named parameter
//!  *name     catch-all parameter
//! ```
//!
//! Named parameters are dynamic path segments. They match anything until the
//! next '/' or the path end:
//!
//! ```text
//!  Path: /blog/:category/:post
//! ```
//!
//! Catch-all parameters match anything until the path end, including the
//! directory index (the '/' before the catch-all). Since they match anything
//! until the end, catch-all parameters must always be the final path element:
//!
//! ```text
//!  Path: /files/*filepath
//! ```
//!
//! Registration fails with an [`InsertError`] when a route is malformed or
//! would make matching ambiguous, such as two parameters with different
//! names at the same position, or the same route registered twice.

#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod error;
mod router;
mod tree;

pub use error::InsertError;
pub use router::Router;
pub use tree::{Node, NodeType};
