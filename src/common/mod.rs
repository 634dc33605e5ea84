pub mod frontmatter;

pub use frontmatter::{parse_document, render_document, Document, FrontmatterError};
