use async_trait::async_trait;
use boh_models::{Allergen, DeletedDish, Dish, Menu, NewDish, UpdateDish};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ClientError;
use crate::ports::{DishRepository, ReferenceData};

/// HTTP client for the back-of-house API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: String,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        debug!(%url, "calling api");
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(ClientError::Status {
                url,
                status,
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        self.send(url.clone(), self.client.get(&url)).await
    }
}

#[async_trait]
impl ReferenceData for ApiClient {
    async fn food_menus(&self) -> Result<Vec<Menu>, ClientError> {
        self.get("/menus/food").await
    }

    async fn allergens(&self) -> Result<Vec<Allergen>, ClientError> {
        self.get("/allergens").await
    }
}

#[async_trait]
impl DishRepository for ApiClient {
    async fn active_dishes(&self) -> Result<Vec<Dish>, ClientError> {
        self.get("/dishes").await
    }

    async fn create_dish(&self, dish: NewDish) -> Result<Dish, ClientError> {
        let url = self.url("/dishes");
        self.send(url.clone(), self.client.post(&url).json(&dish))
            .await
    }

    async fn update_dish(&self, id: &str, dish: UpdateDish) -> Result<Dish, ClientError> {
        let url = self.url(&format!("/dishes/{id}"));
        self.send(url.clone(), self.client.put(&url).json(&dish))
            .await
    }

    async fn delete_dish(&self, id: &str) -> Result<DeletedDish, ClientError> {
        let url = self.url(&format!("/dishes/{id}"));
        self.send(url.clone(), self.client.delete(&url)).await
    }
}
