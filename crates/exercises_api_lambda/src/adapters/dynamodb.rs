use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use exercises_api_core::entity::{RawRow, EXERCISE_ID_ATTRIBUTE};
use serde_json::{Map, Number, Value};

use crate::adapters::table_store::ExerciseTable;

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

pub struct DynamoDbExerciseTable {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbExerciseTable {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn scan_page(&self, exclusive_start_key: Option<Item>) -> Result<ScanPage, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .scan()
                    .table_name(table_name)
                    .set_exclusive_start_key(exclusive_start_key)
                    .send()
                    .await
                    .map(|output| ScanPage {
                        items: output.items.unwrap_or_default(),
                        last_evaluated_key: output.last_evaluated_key,
                    })
                    .map_err(|error| format!(
                        "failed to scan exercises table: {}",
                        DisplayErrorContext(&error)
                    ))
            })
        })
    }
}

impl ExerciseTable for DynamoDbExerciseTable {
    fn scan_all(&self) -> Result<Vec<RawRow>, String> {
        collect_scan_pages(|start_key| self.scan_page(start_key))
    }

    fn get_item(&self, exercise_id: &str) -> Result<Option<RawRow>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();
        let key = AttributeValue::S(exercise_id.to_string());

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_item()
                    .table_name(table_name)
                    .key(EXERCISE_ID_ATTRIBUTE, key)
                    .send()
                    .await
                    .map(|output| output.item.map(item_to_row))
                    .map_err(|error| format!(
                        "failed to read exercise from table: {}",
                        DisplayErrorContext(&error)
                    ))
            })
        })
    }
}

/// Drives a scan until the backend stops returning a continuation key.
pub fn collect_scan_pages(
    mut fetch_page: impl FnMut(Option<Item>) -> Result<ScanPage, String>,
) -> Result<Vec<RawRow>, String> {
    let mut rows = Vec::new();
    let mut start_key = None;
    let mut pages = 0usize;

    loop {
        let page = fetch_page(start_key.take())?;
        pages += 1;
        rows.extend(page.items.into_iter().map(item_to_row));

        match page.last_evaluated_key {
            Some(key) if !key.is_empty() => start_key = Some(key),
            _ => break,
        }
    }

    tracing::debug!(
        component = "dynamodb_table",
        event = "scan_pages_collected",
        pages,
        rows = rows.len()
    );
    Ok(rows)
}

pub fn item_to_row(item: Item) -> RawRow {
    item.into_iter()
        .map(|(name, value)| (name, attribute_to_json(value)))
        .collect()
}

pub fn attribute_to_json(value: AttributeValue) -> Value {
    match value {
        AttributeValue::S(text) => Value::String(text),
        AttributeValue::N(number) => number_to_json(number),
        AttributeValue::Bool(flag) => Value::Bool(flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Ss(values) => Value::Array(values.into_iter().map(Value::String).collect()),
        AttributeValue::Ns(values) => Value::Array(values.into_iter().map(number_to_json).collect()),
        AttributeValue::L(values) => Value::Array(values.into_iter().map(attribute_to_json).collect()),
        AttributeValue::M(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(name, value)| (name, attribute_to_json(value)))
                .collect::<Map<String, Value>>(),
        ),
        // Binary attributes are not part of the exercise schema.
        _ => Value::Null,
    }
}

fn number_to_json(number: String) -> Value {
    number
        .parse::<Number>()
        .map(Value::Number)
        .unwrap_or(Value::String(number))
}
