//! Grocery Form Schema
//!
//! Validation shared by the inline add form and the edit dialog.

use crate::models::NewGroceryItem;

pub const NAME_MIN_CHARS: usize = 2;

/// Raw text of the two inputs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroceryFormValues {
    pub name: String,
    pub amount: String,
}

impl GroceryFormValues {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self { name: name.into(), amount: amount.into() }
    }

    /// Prefill from an existing item, e.g. `2` rather than `2.0`
    pub fn from_item(name: &str, amount: f64) -> Self {
        Self::new(name, format_amount(amount))
    }
}

/// Field-scoped error messages; `None` means the field is valid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub name: Option<String>,
    pub amount: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.amount.is_none()
    }
}

pub fn validate_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        Err("Name is required".to_string())
    } else if name.chars().count() < NAME_MIN_CHARS {
        Err(format!("Name must be at least {} characters", NAME_MIN_CHARS))
    } else {
        Ok(name.to_string())
    }
}

pub fn validate_amount(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Amount is required".to_string());
    }
    let amount: f64 = raw
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())
        .ok_or_else(|| "Amount should be a number".to_string())?;
    if amount <= 0.0 {
        return Err("Amount must be positive".to_string());
    }
    Ok(amount)
}

/// Convert raw values into a payload, or report every failing field
pub fn validate(values: &GroceryFormValues) -> Result<NewGroceryItem, FieldErrors> {
    match (validate_name(&values.name), validate_amount(&values.amount)) {
        (Ok(name), Ok(amount)) => Ok(NewGroceryItem { name, amount }),
        (name, amount) => Err(FieldErrors {
            name: name.err(),
            amount: amount.err(),
        }),
    }
}

/// Render an amount without a trailing `.0`
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}
