mod error;
mod reader;
mod snapshot;
mod version_file;
mod writer;

pub use error::ManifestError;
pub use reader::{read_document, read_version};
pub use snapshot::FileSnapshot;
pub use version_file::{render_version_file, write_version_file};
pub use writer::{verify_version, write_version};
