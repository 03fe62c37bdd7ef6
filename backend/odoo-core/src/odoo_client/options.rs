use crate::codec::Value;

use std::collections::BTreeMap;

const DEFAULT_LIMIT: u32 = 80;
const DEFAULT_ORDER: &str = "id desc";

/// Paging, ordering and context for `search_read`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub limit: u32,
    pub offset: Option<u32>,
    pub order: String,
    pub context: BTreeMap<String, Value>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: None,
            order: DEFAULT_ORDER.to_string(),
            context: BTreeMap::new(),
        }
    }
}

impl QueryOptions {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub(crate) fn keywords(&self, fields: &[&str]) -> Value {
        let mut keywords = BTreeMap::new();
        keywords.insert(
            String::from("fields"),
            Value::Array(fields.iter().map(|f| Value::from(*f)).collect()),
        );
        keywords.insert(String::from("limit"), Value::from(self.limit));
        keywords.insert(String::from("order"), Value::from(self.order.as_str()));
        if let Some(offset) = self.offset {
            keywords.insert(String::from("offset"), Value::from(offset));
        }
        if !self.context.is_empty() {
            keywords.insert(String::from("context"), Value::Struct(self.context.clone()));
        }
        Value::Struct(keywords)
    }
}

/// Context for `create`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateOptions {
    pub context: BTreeMap<String, Value>,
}

impl CreateOptions {
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// `None` when there is nothing to send, so the call carries no keyword struct.
    pub(crate) fn keywords(&self) -> Option<Value> {
        if self.context.is_empty() {
            return None;
        }
        Some(Value::from([(
            "context",
            Value::Struct(self.context.clone()),
        )]))
    }
}
