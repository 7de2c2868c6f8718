pub mod record_writer;
pub mod schedule_writer;
pub mod submission_reader;
