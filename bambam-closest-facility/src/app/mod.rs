pub mod table_reader;
pub mod workflow;
pub mod writers;
