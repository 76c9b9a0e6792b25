pub mod item_reader;
pub mod receipt_writer;
