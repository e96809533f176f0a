use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A single stock-keeping record.
///
/// Serialized as the persisted JSON record: optional fields are omitted when
/// absent, and an empty string read back from storage is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub amount: u32,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub code: Option<String>,
}

/// Payload for adding a product. The store assigns the id.
#[derive(Debug, Clone, Default)]
pub struct ProductCreate {
    pub name: String,
    pub amount: u32,
    pub description: Option<String>,
    pub code: Option<String>,
}

/// Partial product record overlaid onto a stored product.
///
/// `id` is accepted so a full record can be passed straight through, but it is
/// always discarded. A present-but-empty `description` or `code` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, amount: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            amount,
            description: None,
            code: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = normalize(Some(description.into()));
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = normalize(Some(code.into()));
        self
    }

    /// Overlays every present patch field except `id`.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        let ProductPatch {
            id: _discarded,
            name,
            amount,
            description,
            code,
        } = patch;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(amount) = amount {
            self.amount = amount;
        }
        if description.is_some() {
            self.description = normalize(description);
        }
        if code.is_some() {
            self.code = normalize(code);
        }
    }
}

impl ProductCreate {
    pub fn new(name: impl Into<String>, amount: u32) -> Self {
        Self {
            name: name.into(),
            amount,
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl ProductPatch {
    pub fn amount(amount: u32) -> Self {
        Self {
            amount: Some(amount),
            ..Self::default()
        }
    }
}

/// A full record as an edit form submits it: every field present, absent
/// optionals as empty text. Applied to the product it came from, it is a no-op.
impl From<Product> for ProductPatch {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: Some(product.name),
            amount: Some(product.amount),
            description: Some(product.description.unwrap_or_default()),
            code: Some(product.code.unwrap_or_default()),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (qty {}) [code: {}] {}",
            self.name,
            self.amount,
            self.code.as_deref().unwrap_or("N/A"),
            self.description.as_deref().unwrap_or("no description"),
        )
    }
}

/// Empty optional text is stored as absent.
pub(crate) fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(normalize(Option::<String>::deserialize(deserializer)?))
}
