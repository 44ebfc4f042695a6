pub mod csv_records;
pub mod format;
pub mod json_records;

pub use csv_records::{read_csv_path, read_csv_records, read_csv_str};
pub use format::{InputFormat, read_records_path};
pub use json_records::{read_json_path, read_json_records, read_json_str};
