use async_trait::async_trait;
use common::{OrderId, PaymentId};
use contracts::v1::payments::{OrderIdArgs, PaymentIdArgs, ProcessArgs, methods};
use contracts::wire::NoArgs;
use contracts::{NewPayment, PaymentDto, PaymentService, Result};

use crate::RemoteClient;

/// [`PaymentService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemotePaymentService {
    client: RemoteClient,
}

impl RemotePaymentService {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PaymentService for RemotePaymentService {
    async fn list(&self) -> Result<Vec<PaymentDto>> {
        self.client.call(methods::LIST, &NoArgs {}).await
    }

    async fn process(&self, payment: NewPayment) -> Result<PaymentDto> {
        self.client
            .call(methods::PROCESS, &ProcessArgs { payment })
            .await
    }

    async fn complete(&self, payment_id: PaymentId) -> Result<PaymentDto> {
        self.client
            .call(methods::COMPLETE, &PaymentIdArgs { payment_id })
            .await
    }

    async fn find(&self, payment_id: PaymentId) -> Result<PaymentDto> {
        self.client
            .call(methods::FIND, &PaymentIdArgs { payment_id })
            .await
    }

    async fn find_by_order(&self, order_id: OrderId) -> Result<Option<PaymentDto>> {
        self.client
            .call(methods::FIND_BY_ORDER, &OrderIdArgs { order_id })
            .await
    }
}
