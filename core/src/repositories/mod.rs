pub mod block_list;
pub mod record;

pub use block_list::{BlockListRepository, MockBlockListRepository};
pub use record::{MockRecordRepository, RecordRepository};
