use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SpecError};
use crate::model::{DatasetSpec, FieldsSpecification};
use crate::presets::{PurchasesPreset, UsersPreset};

/// Which dataset a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSelector {
    Users,
    Purchases,
    Custom,
}

impl DatasetSelector {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "users" => Ok(Self::Users),
            "purchases" => Ok(Self::Purchases),
            "custom" => Ok(Self::Custom),
            other => Err(SpecError::UnknownDataset(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Purchases => "purchases",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for DatasetSelector {
    type Err = SpecError;

    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

/// Flat dataset configuration, as read from a TOML or JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub dataset: String,
    pub num_splits: u32,
    pub records_per_split: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,

    pub users_num_skewed_ids: i64,
    pub users_skewed_id_chance: u8,
    #[serde(rename = "usersPayloadSizeKB")]
    pub users_payload_size_kb: u32,
    pub users_payload_type: String,
    pub users_null_chance: u8,

    pub purchases_num_skewed_user_ids: i64,
    pub purchases_skewed_user_id_chance: u8,
    pub purchases_max_user_id: i64,
    #[serde(rename = "purchasesPayloadSizeKB")]
    pub purchases_payload_size_kb: u32,
    pub purchases_payload_type: String,
    pub purchases_null_chance: u8,

    /// `FieldsSpecification`, either as JSON text or as an inline table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_config: Option<serde_json::Value>,

    pub pause_millis_per_batch: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let users = UsersPreset::default();
        let purchases = PurchasesPreset::default();
        Self {
            dataset: String::new(),
            num_splits: 10,
            records_per_split: 1000,
            seed: None,
            locale: None,
            users_num_skewed_ids: users.num_skewed_ids,
            users_skewed_id_chance: users.skewed_id_chance,
            users_payload_size_kb: users.payload_size_kb,
            users_payload_type: "RANDOM_BYTES".to_string(),
            users_null_chance: users.null_chance,
            purchases_num_skewed_user_ids: purchases.num_skewed_user_ids,
            purchases_skewed_user_id_chance: purchases.skewed_user_id_chance,
            purchases_max_user_id: purchases.max_user_id,
            purchases_payload_size_kb: purchases.payload_size_kb,
            purchases_payload_type: "RANDOM_BYTES".to_string(),
            purchases_null_chance: purchases.null_chance,
            custom_config: None,
            pause_millis_per_batch: 1000,
        }
    }
}

impl DatasetConfig {
    pub fn selector(&self) -> Result<DatasetSelector> {
        DatasetSelector::parse(&self.dataset)
    }

    /// Build the dataset specification this configuration describes.
    pub fn to_spec(&self) -> Result<DatasetSpec> {
        let spec = match self.selector()? {
            DatasetSelector::Users => UsersPreset {
                num_splits: self.num_splits,
                records_per_split: self.records_per_split,
                num_skewed_ids: self.users_num_skewed_ids,
                skewed_id_chance: self.users_skewed_id_chance,
                payload_type: self.users_payload_type.clone(),
                payload_size_kb: self.users_payload_size_kb,
                null_chance: self.users_null_chance,
                seed: self.seed,
            }
            .build(),
            DatasetSelector::Purchases => PurchasesPreset {
                num_splits: self.num_splits,
                records_per_split: self.records_per_split,
                num_skewed_user_ids: self.purchases_num_skewed_user_ids,
                skewed_user_id_chance: self.purchases_skewed_user_id_chance,
                max_user_id: self.purchases_max_user_id,
                payload_type: self.purchases_payload_type.clone(),
                payload_size_kb: self.purchases_payload_size_kb,
                null_chance: self.purchases_null_chance,
                seed: self.seed,
            }
            .build(),
            DatasetSelector::Custom => {
                let custom = self.custom_fields()?;
                DatasetSpec::new(
                    self.num_splits,
                    self.records_per_split,
                    custom.fields,
                    custom.schema_name,
                    self.seed,
                )
            }
        };

        Ok(match &self.locale {
            Some(locale) => spec.with_locale(locale.clone()),
            None => spec,
        })
    }

    fn custom_fields(&self) -> Result<FieldsSpecification> {
        let raw = self.custom_config.as_ref().ok_or_else(|| {
            SpecError::InvalidCustomConfig("customConfig is required for the custom dataset".into())
        })?;
        let parsed = match raw {
            serde_json::Value::String(text) => serde_json::from_str(text),
            other => serde_json::from_value(other.clone()),
        };
        parsed.map_err(|err| SpecError::InvalidCustomConfig(err.to_string()))
    }
}

/// Load a dataset configuration; `.toml` files are TOML, anything else JSON.
pub fn load_config(path: &Path) -> Result<DatasetConfig> {
    let text = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Ok(toml::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}
