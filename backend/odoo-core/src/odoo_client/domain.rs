use crate::codec::Value;

/// Filter expression in the ERP's prefix notation.
///
/// ```
/// use odoo_core::Domain;
///
/// // type = product AND (name ilike x OR default_code ilike x)
/// let domain = Domain::new()
///     .leaf("type", "=", "product")
///     .or()
///     .leaf("name", "ilike", "x")
///     .leaf("default_code", "ilike", "x");
/// assert_eq!(domain.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    terms: Vec<Value>,
}

impl Domain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.terms.push(Value::Array(vec![
            Value::from(field),
            Value::from(operator),
            value.into(),
        ]));
        self
    }

    /// Prefix `|` applying to the next two terms.
    pub fn or(mut self) -> Self {
        self.terms.push(Value::from("|"));
        self
    }

    /// Prefix `&` applying to the next two terms.
    pub fn and(mut self) -> Self {
        self.terms.push(Value::from("&"));
        self
    }

    /// Prefix `!` applying to the next term.
    pub fn negate(mut self) -> Self {
        self.terms.push(Value::from("!"));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl From<Domain> for Value {
    fn from(domain: Domain) -> Self {
        Value::Array(domain.terms)
    }
}
