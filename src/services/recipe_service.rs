use serde_json::Value;

use crate::auth::AuthContext;
use crate::error::ClientError;
use crate::gateway::{Gateway, RequestOptions};
use crate::models::recipe::RecipeBody;
use crate::models::{Recipe, RecipeInput, RecipeList, RecordId};

pub struct RecipeService<'a> {
    gateway: &'a Gateway,
    auth: &'a AuthContext,
}

impl<'a> RecipeService<'a> {
    pub fn new(gateway: &'a Gateway, auth: &'a AuthContext) -> Self {
        Self { gateway, auth }
    }

    pub async fn list(&self) -> Result<Vec<Recipe>, ClientError> {
        let list: RecipeList = self.gateway.request(self.auth, "/recipes", RequestOptions::get()).await?;
        Ok(list.recipes)
    }

    pub async fn create(&self, input: &RecipeInput) -> Result<Recipe, ClientError> {
        input.validate()?;
        let options = RequestOptions::post().json(input)?;
        let body: RecipeBody = self.gateway.request(self.auth, "/recipes", options).await?;
        Ok(body.into_recipe())
    }

    pub async fn update(&self, id: &RecordId, input: &RecipeInput) -> Result<Recipe, ClientError> {
        input.validate()?;
        let options = RequestOptions::put().json(input)?;
        let path = format!("/recipes/{}", id);
        let body: RecipeBody = self.gateway.request(self.auth, &path, options).await?;
        Ok(body.into_recipe())
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), ClientError> {
        let path = format!("/recipes/{}", id);
        let _: Value = self.gateway.request(self.auth, &path, RequestOptions::delete()).await?;
        Ok(())
    }
}
