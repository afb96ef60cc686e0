//! Project scanning: Go files → packages → package forest
//!
//! - **unit**: parse one `.go` file (package clause, imports, build constraints)
//! - **package**: merge one directory's files into a [`Package`]
//! - **tree**: walk the project and assemble the [`ProjectTree`]

pub mod package;
pub mod tree;
pub mod unit;

pub use package::{ENTRY_POINT_NAME, Package};
pub use tree::{ProjectTree, TreeBuilder};
