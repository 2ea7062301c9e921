mod error;
mod input;
mod metadata;

pub use error::OppmError;
pub use input::{
    classify_file_name, supported_extensions, ArchiveType, FileKind, EXECUTABLE_EXTENSIONS,
};
pub use metadata::{AppEntry, Metadata};

#[cfg(test)]
mod tests;
