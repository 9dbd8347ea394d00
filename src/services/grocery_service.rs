use serde_json::Value;

use crate::auth::AuthContext;
use crate::error::ClientError;
use crate::gateway::{Gateway, RequestOptions};
use crate::models::grocery::GroceryBody;
use crate::models::{ExpirationReport, GroceryInput, GroceryItem, GroceryList, RecordId};

pub struct GroceryService<'a> {
    gateway: &'a Gateway,
    auth: &'a AuthContext,
}

impl<'a> GroceryService<'a> {
    pub fn new(gateway: &'a Gateway, auth: &'a AuthContext) -> Self {
        Self { gateway, auth }
    }

    /// Fetches the whole inventory. `search` is forwarded as a query parameter when non-blank.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<GroceryItem>, ClientError> {
        let mut options = RequestOptions::get();
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            options = options.query("search", term);
        }

        let list: GroceryList = self.gateway.request(self.auth, "/groceries", options).await?;
        Ok(list.groceries)
    }

    pub async fn create(&self, input: &GroceryInput) -> Result<GroceryItem, ClientError> {
        input.validate()?;
        let options = RequestOptions::post().json(input)?;
        let body: GroceryBody = self.gateway.request(self.auth, "/groceries", options).await?;
        Ok(body.into_item())
    }

    /// Full-record replace.
    pub async fn update(&self, id: &RecordId, input: &GroceryInput) -> Result<GroceryItem, ClientError> {
        input.validate()?;
        let options = RequestOptions::put().json(input)?;
        let path = format!("/groceries/{}", id);
        let body: GroceryBody = self.gateway.request(self.auth, &path, options).await?;
        Ok(body.into_item())
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        let path = format!("/groceries/{}", id);
        let _: Value = self.gateway.request(self.auth, &path, RequestOptions::delete()).await?;
        Ok(())
    }

    pub async fn check_expirations(&self) -> Result<ExpirationReport, ClientError> {
        self.gateway
            .request(self.auth, "/groceries/check-expirations", RequestOptions::get())
            .await
    }
}
