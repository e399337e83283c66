//! File-backed repositories
//!
//! Both files are rewritten as a whole through [`atomic::write_atomic`], so a
//! crash mid-write leaves either the previous or the new contents on disk.

pub mod atomic;
pub mod block_list_file;
pub mod encrypted_records;

pub use block_list_file::JsonBlockListRepository;
pub use encrypted_records::EncryptedFileRecordRepository;
