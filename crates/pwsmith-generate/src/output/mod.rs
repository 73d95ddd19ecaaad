//! Output writers for generated corpora.

pub mod lines;

pub use lines::CountingWriter;
