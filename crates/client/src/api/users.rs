use pineapple_auth::User;

use crate::client::PineappleClient;
use crate::error::ClientResult;
use crate::request::ApiRequest;
use crate::types::UpdateProfileRequest;

pub struct UsersApi<'a> {
    client: &'a PineappleClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a PineappleClient) -> Self {
        Self { client }
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.client.fetch(ApiRequest::get("/users/me")).await
    }

    pub async fn update_me(&self, update: &UpdateProfileRequest) -> ClientResult<User> {
        self.client
            .fetch(ApiRequest::patch("/users/me").json(update)?)
            .await
    }

    pub async fn delete_me(&self) -> ClientResult<()> {
        self.client.execute(ApiRequest::delete("/users/me")).await
    }

    /// Look up users by email, e.g. to pick someone to share with.
    pub async fn search(&self, email: &str) -> ClientResult<Vec<User>> {
        self.client
            .fetch(ApiRequest::get("/users/search").query("email", email))
            .await
    }
}
