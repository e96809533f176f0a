use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::product_actor::StockError;

/// Handle to the stock actor. Cheap to clone; hand one to every consumer.
#[derive(Clone)]
pub struct StockClient {
    inner: ResourceClient<Product>,
}

crate::impl_basic_client!(StockClient, Product, StockError, product);

impl StockClient {
    /// Loads the persisted list. Only the first call is accepted.
    #[instrument(skip(self))]
    pub async fn hydrate(&self) -> Result<usize, StockError> {
        debug!("Sending request");
        Ok(self.inner.hydrate().await?)
    }

    /// Appends a new product with a freshly generated id.
    ///
    /// No validation happens here; see [`crate::domain::validate_new_product`].
    #[instrument(skip(self, description, code))]
    pub async fn add_product(
        &self,
        name: &str,
        amount: u32,
        description: Option<&str>,
        code: Option<&str>,
    ) -> Result<Product, StockError> {
        debug!("Sending request");
        let payload = ProductCreate {
            name: name.to_string(),
            amount,
            description: description.map(str::to_string),
            code: code.map(str::to_string),
        };
        let product = self.inner.create(payload).await?;
        info!(product_id = %product.id, "Product added");
        Ok(product)
    }

    /// Overlays `patch` onto the product with `id`. The patch's own id is ignored.
    #[instrument(skip(self, patch))]
    pub async fn update_product(&self, id: String, patch: ProductPatch) -> Result<Product, StockError> {
        debug!("Sending request");
        let product = self.inner.update(id, patch).await?;
        info!(product_name = %product.name, amount = product.amount, "Product updated");
        Ok(product)
    }
}
