use crate::actor_framework::Entity;
use crate::domain::product::normalize;
use crate::domain::{Product, ProductCreate, ProductPatch};

impl Entity for Product {
    type Id = String;
    type CreatePayload = ProductCreate;
    type Patch = ProductPatch;

    fn id(&self) -> &String {
        &self.id
    }

    /// Creates a new Product from the add payload.
    ///
    /// Empty description or code are stored as absent.
    fn from_create(id: String, payload: ProductCreate) -> Self {
        Self {
            id,
            name: payload.name,
            amount: payload.amount,
            description: normalize(payload.description),
            code: normalize(payload.code),
        }
    }

    /// Overlays the patch; the patch's `id` is discarded.
    fn on_update(&mut self, patch: ProductPatch) {
        self.apply_patch(patch);
    }
}

/// Generates a product id: a random UUID v4 in hyphenated form.
pub fn new_product_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn from_create_drops_empty_optionals() {
        let payload = ProductCreate::new("Widget", 10).description("").code("W-1");
        let product = Product::from_create("p-1".into(), payload);
        assert_eq!(product.description, None);
        assert_eq!(product.code.as_deref(), Some("W-1"));
    }

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| new_product_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
