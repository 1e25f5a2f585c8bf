pub mod hub;
pub mod jsonl;
pub mod pixels;

pub use hub::HubParquetSource;
pub use jsonl::JsonlRecordSource;
