use std::time::Duration;

use axum::async_trait;
use serde::Deserialize;
use tracing::{error, warn};

use crate::config::NutritionixConfig;

const NATURAL_NUTRIENTS_URL: &str = "https://trackapi.nutritionix.com/v2/natural/nutrients";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Nutrition facts for one resolved food, taken from the first entry of the
/// upstream `foods` array. Remaining entries are discarded on purpose: a query
/// like "apple and rice" logs only the apple, matching the original behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionFacts {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

/// Outcome of a nutrition lookup. Callers must treat `NotFound` and `Failed`
/// identically as a "no data" result; `Failed` carries detail for the log only.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(NutritionFacts),
    NotFound,
    Failed(String),
}

#[async_trait]
pub trait NutritionResolver: Send + Sync {
    async fn resolve(&self, query: &str) -> Lookup;
}

#[derive(Debug, Deserialize)]
struct NaturalNutrientsResponse {
    #[serde(default)]
    foods: Vec<FoodItem>,
}

#[derive(Debug, Deserialize)]
struct FoodItem {
    food_name: String,
    nf_calories: f64,
    nf_protein: f64,
    nf_total_fat: f64,
    nf_total_carbohydrate: f64,
}

fn classify(resp: NaturalNutrientsResponse) -> Lookup {
    match resp.foods.into_iter().next() {
        Some(food) => Lookup::Found(NutritionFacts {
            name: food.food_name,
            calories: food.nf_calories,
            protein: food.nf_protein,
            fat: food.nf_total_fat,
            carbs: food.nf_total_carbohydrate,
        }),
        None => Lookup::NotFound,
    }
}

/// Client for the Nutritionix natural-language nutrients endpoint.
#[derive(Clone)]
pub struct NutritionixClient {
    http: reqwest::Client,
    base_url: String,
    app_id: String,
    api_key: String,
}

impl NutritionixClient {
    pub fn new(config: &NutritionixConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            base_url: NATURAL_NUTRIENTS_URL.into(),
            app_id: config.app_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl NutritionResolver for NutritionixClient {
    async fn resolve(&self, query: &str) -> Lookup {
        // The query text goes out unvalidated; Nutritionix decides what it means.
        let response = self
            .http
            .post(&self.base_url)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.api_key)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "nutritionix request failed");
                return Lookup::Failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "nutritionix returned an error status");
            return Lookup::Failed(format!("upstream status {status}"));
        }

        match response.json::<NaturalNutrientsResponse>().await {
            Ok(parsed) => classify(parsed),
            Err(e) => {
                error!(error = %e, "nutritionix response did not parse");
                Lookup::Failed(e.to_string())
            }
        }
    }
}
