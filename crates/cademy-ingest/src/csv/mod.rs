//! CSV reading utilities.

mod reader;

pub use reader::{
    MAX_CSV_FILE_SIZE, check_file_size, check_file_size_with_limit, read_csv_headers,
    read_student_table, validate_encoding,
};
