use std::io::Write;

use datagen_core::{Record, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::errors::GenerationError;
use crate::output::{CountingWriter, RecordSink};

/// One JSON object per line, keys in schema order.
pub struct NdjsonSink<W: Write> {
    writer: CountingWriter<W>,
}

impl<W: Write> NdjsonSink<W> {
    pub fn new(writer: CountingWriter<W>) -> Self {
        Self { writer }
    }
}

impl<W: Write> RecordSink for NdjsonSink<W> {
    fn write(&mut self, record: &Record) -> Result<(), GenerationError> {
        serde_json::to_writer(&mut self.writer, &JsonRecord(record))?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<u64, GenerationError> {
        self.writer.flush()?;
        Ok(self.writer.bytes_written())
    }
}

/// Serializes a record as a JSON object without re-sorting its keys.
pub struct JsonRecord<'a>(pub &'a Record);

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0.iter() {
            map.serialize_entry(name, &JsonValue(value))?;
        }
        map.end()
    }
}

struct JsonValue<'a>(&'a Value);

impl Serialize for JsonValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_none(),
            Value::Int(value) => serializer.serialize_i32(*value),
            Value::Long(value) | Value::Timestamp(value) => serializer.serialize_i64(*value),
            Value::Double(value) => serializer.serialize_f64(*value),
            Value::String(value) => serializer.serialize_str(value),
            Value::Bytes(value) => serializer.serialize_str(&hex::encode(value)),
        }
    }
}
