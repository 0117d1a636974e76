pub mod memory_writer;
pub mod postgres_writer;
pub mod sink;

pub use memory_writer::MemorySink;
pub use postgres_writer::PostgresWriter;
pub use sink::WeatherSink;
