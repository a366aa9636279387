pub mod atomic_writer;
pub mod board_store;
pub mod json_file_store;

pub use atomic_writer::AtomicWriter;
pub use board_store::BoardStore;
pub use json_file_store::{JsonEnvelope, JsonFileStore};
