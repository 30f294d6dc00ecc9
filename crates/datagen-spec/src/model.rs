use std::fmt;
use std::sync::{Arc, OnceLock};

use datagen_core::{DEFAULT_SCHEMA_NAME, FieldSchema, FieldType, RecordSchema, validate_schema};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{Result, SpecError};

/// Generator whose `to` bound defaults to the current time.
const TIMESTAMP_TAG: &str = "timestamp";

/// Resolves a generator tag to the value type it produces.
///
/// Implemented by the generator catalog so schemas can be derived without
/// constructing any generator.
pub trait ValueTypeResolver {
    fn value_type(&self, tag: &str) -> Option<FieldType>;
}

/// Declarative description of a dataset: volume, seed and ordered fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatasetSpec {
    /// Number of independent splits.
    #[schemars(range(min = 1))]
    num_splits: u32,
    /// Records produced by each split.
    #[schemars(range(min = 1))]
    records_per_split: u64,
    /// Global seed; absent means non-reproducible output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
    /// Output record name (`custom` when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema_name: Option<String>,
    /// Rich-data locale (`en_US` when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    /// Fields in generation order.
    fields: Vec<FieldSpec>,
    #[serde(skip)]
    #[schemars(skip)]
    schema: OnceLock<Arc<RecordSchema>>,
}

impl PartialEq for DatasetSpec {
    fn eq(&self, other: &Self) -> bool {
        self.num_splits == other.num_splits
            && self.records_per_split == other.records_per_split
            && self.seed == other.seed
            && self.schema_name == other.schema_name
            && self.locale == other.locale
            && self.fields == other.fields
    }
}

impl DatasetSpec {
    pub fn new(
        num_splits: u32,
        records_per_split: u64,
        fields: Vec<FieldSpec>,
        schema_name: Option<String>,
        seed: Option<i64>,
    ) -> Self {
        let mut spec = Self {
            num_splits,
            records_per_split,
            seed,
            schema_name,
            locale: None,
            fields,
            schema: OnceLock::new(),
        };
        spec.pin_clock_defaults();
        spec
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self.schema = OnceLock::new();
        self
    }

    /// Parse a specification from its JSON interchange form.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut spec: Self = serde_json::from_str(text)?;
        spec.pin_clock_defaults();
        Ok(spec)
    }

    /// Write the current time into every `timestamp` field that leaves `to`
    /// open, so all splits of this spec share one window and the fingerprint
    /// records it.
    pub(crate) fn pin_clock_defaults(&mut self) {
        let now_millis = chrono::Utc::now().timestamp_millis();
        for field in &mut self.fields {
            field.pin_open_upper_bound(now_millis);
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn num_splits(&self) -> u32 {
        self.num_splits
    }

    pub fn records_per_split(&self) -> u64 {
        self.records_per_split
    }

    pub fn seed(&self) -> Option<i64> {
        self.seed
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn schema_name(&self) -> &str {
        self.schema_name.as_deref().unwrap_or(DEFAULT_SCHEMA_NAME)
    }

    /// Raw locale string as declared, if any.
    pub fn locale_name(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Parsed locale; unknown names are rejected by `validate_spec`.
    pub fn locale(&self) -> Result<Locale> {
        match self.locale.as_deref() {
            None => Ok(Locale::default()),
            Some(value) => Locale::parse(value)
                .ok_or_else(|| SpecError::InvalidSpec(format!("unsupported locale '{value}'"))),
        }
    }

    pub fn total_records(&self) -> Result<u64> {
        self.records_per_split
            .checked_mul(u64::from(self.num_splits))
            .ok_or_else(|| SpecError::Overflow("total record count exceeds u64".to_string()))
    }

    /// Derive the output schema, computing it once and caching the result.
    pub fn schema(&self, resolver: &dyn ValueTypeResolver) -> Result<Arc<RecordSchema>> {
        if let Some(schema) = self.schema.get() {
            return Ok(Arc::clone(schema));
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let field_type = resolver
                .value_type(&field.generator)
                .ok_or_else(|| SpecError::UnknownGeneratorType(field.generator.clone()))?;
            fields.push(FieldSchema::new(
                field.name.clone(),
                field_type,
                field.is_nullable(),
            ));
        }

        let derived = RecordSchema::new(self.schema_name(), fields);
        validate_schema(&derived)?;
        let derived = Arc::new(derived);
        // A concurrent caller may have won the race; both derived the same value.
        Ok(Arc::clone(self.schema.get_or_init(|| derived)))
    }

    /// Global position of the first record of split `index`.
    pub fn split_offset(&self, index: u32) -> Result<u64> {
        u64::from(index)
            .checked_mul(self.records_per_split)
            .ok_or_else(|| {
                SpecError::Overflow(format!(
                    "offset of split {index} with {} records per split",
                    self.records_per_split
                ))
            })
    }

    /// Enumerate one descriptor per split, in index order.
    pub fn splits(self: &Arc<Self>) -> Vec<SplitDescriptor> {
        (0..self.num_splits)
            .map(|split_index| SplitDescriptor::new(Arc::clone(self), split_index))
            .collect()
    }

    /// Lowercase hex SHA-256 of the canonical JSON form.
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_vec(self)?;
        let digest = Sha256::digest(&canonical);
        Ok(hex::encode(digest))
    }
}

/// One field of a dataset specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    /// Generator tag, matched case-insensitively by the catalog.
    #[serde(rename = "type")]
    pub generator: String,
    /// Percent chance in `[0, 100]` that the value is null.
    #[serde(default)]
    #[schemars(range(max = 100))]
    pub null_chance: u8,
    /// Generator-specific arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<serde_json::Value>,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        generator: impl Into<String>,
        null_chance: u8,
        args: Option<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            generator: generator.into(),
            null_chance,
            args,
        }
    }

    pub fn is_nullable(&self) -> bool {
        self.null_chance > 0
    }

    fn pin_open_upper_bound(&mut self, now_millis: i64) {
        if !self.generator.eq_ignore_ascii_case(TIMESTAMP_TAG) {
            return;
        }
        if matches!(self.args, Some(serde_json::Value::Null)) {
            self.args = None;
        }
        let args = self
            .args
            .get_or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
        if let serde_json::Value::Object(map) = args {
            let always_now = map
                .get("isAlwaysNow")
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false);
            if !always_now && !map.contains_key("to") {
                map.insert("to".to_string(), serde_json::Value::from(now_millis));
            }
        }
    }
}

/// Payload of the `custom` dataset: a field list plus an optional name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldsSpecification {
    pub fields: Vec<FieldSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
}

/// Everything a remote worker needs to reproduce one split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitDescriptor {
    pub spec: Arc<DatasetSpec>,
    pub split_index: u32,
}

impl SplitDescriptor {
    pub fn new(spec: Arc<DatasetSpec>, split_index: u32) -> Self {
        Self { spec, split_index }
    }

    pub fn offset(&self) -> Result<u64> {
        self.spec.split_offset(self.split_index)
    }
}

/// Locales supported by the rich-data facility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    EnUs,
    PtBr,
}

impl Locale {
    pub const SUPPORTED: &'static [Locale] = &[Locale::EnUs, Locale::PtBr];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "en_US" => Some(Self::EnUs),
            "pt_BR" => Some(Self::PtBr),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en_US",
            Self::PtBr => "pt_BR",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
