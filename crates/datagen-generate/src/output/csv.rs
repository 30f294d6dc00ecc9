use std::io::Write;

use datagen_core::{Record, RecordSchema, Value};

use crate::errors::GenerationError;
use crate::output::{CountingWriter, RecordSink};

/// CSV with a header row from the schema; nulls are empty cells.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<CountingWriter<W>>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: CountingWriter<W>, schema: &RecordSchema) -> Result<Self, GenerationError> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(schema.field_names())?;
        Ok(Self { writer })
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write(&mut self, record: &Record) -> Result<(), GenerationError> {
        self.writer
            .write_record(record.values().iter().map(to_csv))?;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        Ok(self.writer.get_ref().bytes_written())
    }
}

pub fn to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Int(value) => value.to_string(),
        Value::Long(value) | Value::Timestamp(value) => value.to_string(),
        Value::Double(value) => value.to_string(),
        Value::String(value) => value.clone(),
        Value::Bytes(value) => hex::encode(value),
    }
}
