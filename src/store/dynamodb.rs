use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tracing::debug;

use super::RecordStore;
use crate::feedback::{AttrValue, RawRecord};

/// Reads feedback from a DynamoDB table with a filtered, paginated `Scan`.
pub struct DynamoDbStore {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbStore {
    /// Creates a store using the ambient AWS configuration already loaded by
    /// `aws_config::load_from_env`.
    pub fn new(config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_dynamodb::Client::new(config),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl RecordStore for DynamoDbStore {
    #[tracing::instrument(skip(self), fields(table = %self.table_name))]
    async fn records_since(&self, cutoff: &str) -> Result<Vec<RawRecord>> {
        let mut items = self
            .client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("#submitted_at > :cutoff")
            .expression_attribute_names("#submitted_at", "submitted_at")
            .expression_attribute_values(":cutoff", AttributeValue::S(cutoff.to_string()))
            .into_paginator()
            .items()
            .send();

        let mut records = Vec::new();
        while let Some(item) = items.next().await {
            let item = item.with_context(|| format!("scan of '{}' failed", self.table_name))?;
            records.push(to_raw_record(item));
        }

        debug!(count = records.len(), "Scan complete");
        Ok(records)
    }
}

fn to_raw_record(item: HashMap<String, AttributeValue>) -> RawRecord {
    item.into_iter()
        .map(|(name, value)| (name, to_attr_value(value)))
        .collect()
}

fn to_attr_value(value: AttributeValue) -> AttrValue {
    match value {
        AttributeValue::S(s) => AttrValue::Text(s),
        AttributeValue::N(n) => AttrValue::Number(n),
        AttributeValue::B(_) => AttrValue::Unsupported("binary"),
        AttributeValue::Bool(_) => AttrValue::Unsupported("bool"),
        AttributeValue::Null(_) => AttrValue::Unsupported("null"),
        AttributeValue::L(_) => AttrValue::Unsupported("list"),
        AttributeValue::M(_) => AttrValue::Unsupported("map"),
        AttributeValue::Ss(_) | AttributeValue::Ns(_) | AttributeValue::Bs(_) => {
            AttrValue::Unsupported("set")
        }
        _ => AttrValue::Unsupported("unknown"),
    }
}
