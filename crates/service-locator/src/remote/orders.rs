use async_trait::async_trait;
use common::OrderId;
use contracts::v1::orders::{CreateArgs, CreateFromUserArgs, OrderIdArgs, methods};
use contracts::wire::NoArgs;
use contracts::{NewOrder, OrderDto, OrderService, Result, UserDto};

use crate::RemoteClient;

/// [`OrderService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteOrderService {
    client: RemoteClient,
}

impl RemoteOrderService {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderService for RemoteOrderService {
    async fn list(&self) -> Result<Vec<OrderDto>> {
        self.client.call(methods::LIST, &NoArgs {}).await
    }

    async fn create(&self, order: NewOrder) -> Result<OrderDto> {
        self.client.call(methods::CREATE, &CreateArgs { order }).await
    }

    async fn create_from_user(&self, user: UserDto) -> Result<OrderDto> {
        self.client
            .call(methods::CREATE_FROM_USER, &CreateFromUserArgs { user })
            .await
    }

    async fn mark_as_paid(&self, order_id: OrderId) -> Result<()> {
        self.client
            .call(methods::MARK_AS_PAID, &OrderIdArgs { order_id })
            .await
    }

    async fn find(&self, order_id: OrderId) -> Result<OrderDto> {
        self.client
            .call(methods::FIND, &OrderIdArgs { order_id })
            .await
    }
}
