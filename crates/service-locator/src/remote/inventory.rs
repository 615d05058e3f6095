use async_trait::async_trait;
use contracts::v1::inventory::{CreateProductArgs, SkuArgs, StockArgs, methods};
use contracts::wire::NoArgs;
use contracts::{InventoryService, NewProduct, ProductDto, Result};

use crate::RemoteClient;

/// [`InventoryService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteInventoryService {
    client: RemoteClient,
}

impl RemoteInventoryService {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InventoryService for RemoteInventoryService {
    async fn all(&self) -> Result<Vec<ProductDto>> {
        self.client.call(methods::ALL, &NoArgs {}).await
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<ProductDto>> {
        let args = SkuArgs {
            sku: sku.to_string(),
        };
        self.client.call(methods::FIND_BY_SKU, &args).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<ProductDto> {
        self.client
            .call(methods::CREATE_PRODUCT, &CreateProductArgs { product })
            .await
    }

    async fn reserve(&self, sku: &str, quantity: u32) -> Result<ProductDto> {
        let args = StockArgs {
            sku: sku.to_string(),
            quantity,
        };
        self.client.call(methods::RESERVE, &args).await
    }

    async fn release(&self, sku: &str, quantity: u32) -> Result<ProductDto> {
        let args = StockArgs {
            sku: sku.to_string(),
            quantity,
        };
        self.client.call(methods::RELEASE, &args).await
    }
}
