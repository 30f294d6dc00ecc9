//! Canned dataset builders.
//!
//! Field lists and generator arguments here are part of the public contract:
//! changing them changes every dataset built from a preset.

use serde_json::json;

use crate::model::{DatasetSpec, FieldSpec};

/// 2020-01-01T00:00:00Z in epoch milliseconds.
const PURCHASES_FROM_MILLIS: i64 = 1_577_836_800_000;
/// 2020-04-01T00:00:00Z in epoch milliseconds.
const PURCHASES_TO_MILLIS: i64 = 1_585_699_200_000;

/// Parameters of the `users` dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct UsersPreset {
    pub num_splits: u32,
    pub records_per_split: u64,
    pub num_skewed_ids: i64,
    pub skewed_id_chance: u8,
    pub payload_type: String,
    pub payload_size_kb: u32,
    pub null_chance: u8,
    pub seed: Option<i64>,
}

impl Default for UsersPreset {
    fn default() -> Self {
        Self {
            num_splits: 10,
            records_per_split: 1000,
            num_skewed_ids: 0,
            skewed_id_chance: 0,
            payload_type: "random_bytes".to_string(),
            payload_size_kb: 1,
            null_chance: 10,
            seed: None,
        }
    }
}

impl UsersPreset {
    pub fn build(&self) -> DatasetSpec {
        let skew_chance = if self.num_skewed_ids < 1 {
            0
        } else {
            self.skewed_id_chance
        };
        let n = self.null_chance;

        let fields = vec![
            FieldSpec::new(
                "id",
                "sequential_long_skewed",
                0,
                Some(json!({
                    "start": 1,
                    "step": 1,
                    "skewMin": 1,
                    "skewMax": self.num_skewed_ids,
                    "skewChance": skew_chance,
                })),
            ),
            FieldSpec::new("first_name", "name", n, Some(json!({ "type": "first" }))),
            FieldSpec::new("last_name", "name", n, Some(json!({ "type": "last" }))),
            FieldSpec::new("email", "email", n, None),
            FieldSpec::new("phone", "phone_number", n, None),
            FieldSpec::new("profession", "profession", n, None),
            FieldSpec::new("age", "random_int", n, Some(json!({ "min": 18, "max": 100 }))),
            FieldSpec::new("address", "address", n, None),
            FieldSpec::new("score", "gaussian", n, None),
            payload_field(&self.payload_type, self.payload_size_kb),
        ];

        DatasetSpec::new(
            self.num_splits,
            self.records_per_split,
            fields,
            Some("user".to_string()),
            self.seed,
        )
    }
}

/// Parameters of the `purchases` dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchasesPreset {
    pub num_splits: u32,
    pub records_per_split: u64,
    pub num_skewed_user_ids: i64,
    pub skewed_user_id_chance: u8,
    pub max_user_id: i64,
    pub payload_type: String,
    pub payload_size_kb: u32,
    pub null_chance: u8,
    pub seed: Option<i64>,
}

impl Default for PurchasesPreset {
    fn default() -> Self {
        Self {
            num_splits: 10,
            records_per_split: 1000,
            num_skewed_user_ids: 0,
            skewed_user_id_chance: 0,
            max_user_id: 1_000_000,
            payload_type: "random_bytes".to_string(),
            payload_size_kb: 1,
            null_chance: 10,
            seed: None,
        }
    }
}

impl PurchasesPreset {
    pub fn build(&self) -> DatasetSpec {
        let skew_chance = if self.num_skewed_user_ids < 1 {
            0
        } else {
            self.skewed_user_id_chance
        };
        let n = self.null_chance;

        let fields = vec![
            FieldSpec::new("id", "uuid", 0, None),
            FieldSpec::new(
                "user_id",
                "random_long_skewed",
                0,
                Some(json!({
                    "min": 1,
                    "max": self.max_user_id,
                    "skewMin": 1,
                    "skewMax": self.num_skewed_user_ids,
                    "skewChance": skew_chance,
                })),
            ),
            FieldSpec::new(
                "ts",
                "timestamp",
                n,
                Some(json!({ "from": PURCHASES_FROM_MILLIS, "to": PURCHASES_TO_MILLIS })),
            ),
            FieldSpec::new("price", "random_int", n, Some(json!({ "min": 99, "max": 10_000 }))),
            FieldSpec::new("credit_card", "credit_card", n, None),
            payload_field(&self.payload_type, self.payload_size_kb),
        ];

        DatasetSpec::new(
            self.num_splits,
            self.records_per_split,
            fields,
            Some("purchase".to_string()),
            self.seed,
        )
    }
}

fn payload_field(payload_type: &str, size_kb: u32) -> FieldSpec {
    FieldSpec::new(
        "payload",
        payload_type.to_ascii_lowercase(),
        0,
        Some(json!({ "size": u64::from(size_kb) * 1024 })),
    )
}
