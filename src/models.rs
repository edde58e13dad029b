//! Frontend Models
//!
//! Data structures matching the grocery REST resource.

use serde::{Deserialize, Serialize};

/// Grocery item as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub is_bought: bool,
}

/// Payload for creating an item (name + amount)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGroceryItem {
    pub name: String,
    pub amount: f64,
}

impl NewGroceryItem {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self { name: name.into(), amount }
    }
}

/// Partial update; `None` fields are left out of the PATCH body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_bought: Option<bool>,
}

impl GroceryUpdate {
    pub fn bought(is_bought: bool) -> Self {
        Self { is_bought: Some(is_bought), ..Default::default() }
    }

    /// Apply the set fields to an item
    #[cfg(test)]
    pub fn apply_to(&self, item: &mut GroceryItem) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(amount) = self.amount {
            item.amount = amount;
        }
        if let Some(is_bought) = self.is_bought {
            item.is_bought = is_bought;
        }
    }
}

impl From<NewGroceryItem> for GroceryUpdate {
    fn from(payload: NewGroceryItem) -> Self {
        Self {
            name: Some(payload.name),
            amount: Some(payload.amount),
            is_bought: None,
        }
    }
}

/// Body sent on POST; new items always start unbought
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateGroceryBody<'a> {
    pub name: &'a str,
    pub amount: f64,
    pub is_bought: bool,
}

impl<'a> From<&'a NewGroceryItem> for CreateGroceryBody<'a> {
    fn from(item: &'a NewGroceryItem) -> Self {
        Self { name: &item.name, amount: item.amount, is_bought: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_uses_camel_case() {
        let item: GroceryItem = serde_json::from_str(
            r#"{"id":"7","name":"Milk","amount":2,"isBought":true}"#,
        )
        .unwrap();
        assert_eq!(item.id, "7");
        assert_eq!(item.amount, 2.0);
        assert!(item.is_bought);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isBought"], serde_json::json!(true));
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let json = serde_json::to_string(&GroceryUpdate::bought(false)).unwrap();
        assert_eq!(json, r#"{"isBought":false}"#);
    }

    #[test]
    fn test_create_body_starts_unbought() {
        let payload = NewGroceryItem::new("Eggs", 12.0);
        let json = serde_json::to_value(CreateGroceryBody::from(&payload)).unwrap();
        assert_eq!(json, serde_json::json!({"name": "Eggs", "amount": 12.0, "isBought": false}));
    }
}
