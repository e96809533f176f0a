use tracing::{error, info, Instrument};

use stock_keeper::{setup_tracing, validate_new_product, FileStorage, ProductPatch, StockConfig, StockSystem};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = StockConfig::default();

    info!(data_dir = %config.data_dir.display(), "Starting stock keeper");
    let storage = FileStorage::new(&config.data_dir);
    let system = StockSystem::start(&config, storage).await;
    let stock = system.client();

    let (name, amount) = ("Widget", 10);
    validate_new_product(name, amount).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("product_creation");
    let widget = async {
        info!("Adding demo product");
        stock.add_product(name, amount, None, Some("W-1")).await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    info!(product = %widget, "Product created successfully");

    // Edit form: pre-filled from the stored record, quantity changed, whole record submitted.
    if let Some(current) = stock.get_product(widget.id.clone()).await.map_err(|e| e.to_string())? {
        let mut form = ProductPatch::from(current);
        form.amount = Some(7);
        match stock.update_product(widget.id.clone(), form).await {
            Ok(product) => info!(product = %product, "Product updated"),
            Err(e) => error!(error = %e, "Update failed"),
        }
    }

    if let Err(e) = stock.remove_product("nonexistent-id".to_string()).await {
        info!(error = %e, "Removing an unknown product is reported, not fatal");
    }

    let products = stock.list().await.map_err(|e| e.to_string())?;
    for product in &products {
        info!(id = %product.id, "{}", product);
    }

    drop(stock);
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
