mod snippet;

pub use snippet::{Snippet, SnippetInput, SnippetPatch};
