use async_trait::async_trait;
use common::UserId;
use contracts::v1::users::{CreateArgs, UserIdArgs, methods};
use contracts::wire::NoArgs;
use contracts::{NewUser, Result, UserDto, UserService};

use crate::RemoteClient;

/// [`UserService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteUserService {
    client: RemoteClient,
}

impl RemoteUserService {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserService for RemoteUserService {
    async fn list(&self) -> Result<Vec<UserDto>> {
        self.client.call(methods::LIST, &NoArgs {}).await
    }

    async fn create(&self, user: NewUser) -> Result<UserDto> {
        self.client.call(methods::CREATE, &CreateArgs { user }).await
    }

    async fn find(&self, user_id: UserId) -> Result<UserDto> {
        self.client
            .call(methods::FIND, &UserIdArgs { user_id })
            .await
    }
}
