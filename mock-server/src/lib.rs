use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{
    de::{value::StringDeserializer, IntoDeserializer},
    Deserialize, Serialize,
};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Standard,
    Budget,
    Premium,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

/// Body of POST and PUT. `id` is accepted so PUT can echo the full product,
/// but POST refuses it and PUT ignores it in favour of the path.
#[derive(Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub id: Option<u32>,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Default)]
pub struct Store {
    last_id: u32,
    products: BTreeMap<u32, Product>,
}

impl Store {
    /// Stores `input` under the next id. `None` once the id space is used up.
    fn insert(&mut self, input: ProductInput) -> Option<Product> {
        let id = self.last_id.checked_add(1)?;
        self.last_id = id;
        let product = Product {
            id,
            name: input.name,
            product_type: input.product_type,
            price: input.price,
        };
        self.products.insert(id, product.clone());
        Some(product)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Collects every `type` value from decoded query pairs; other keys are ignored.
fn requested_types(pairs: Vec<(String, String)>) -> Result<Vec<ProductType>, StatusCode> {
    pairs
        .into_iter()
        .filter(|(key, _)| key == "type")
        .map(|(_, value)| {
            let de: StringDeserializer<serde::de::value::Error> = value.into_deserializer();
            ProductType::deserialize(de).map_err(|_| StatusCode::BAD_REQUEST)
        })
        .collect()
}

async fn list_products(
    State(db): State<Db>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Product>>, StatusCode> {
    let types = requested_types(pairs)?;
    let store = db.read().await;
    let products: Vec<Product> = store
        .products
        .values()
        .filter(|p| types.is_empty() || types.contains(&p.product_type))
        .cloned()
        .collect();
    debug!(count = products.len(), ?types, "listed products");
    Ok(Json(products))
}

async fn create_product(
    State(db): State<Db>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), StatusCode> {
    if input.id.is_some() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let product = db
        .write()
        .await
        .insert(input)
        .ok_or(StatusCode::INSUFFICIENT_STORAGE)?;
    info!(id = product.id, "created product");
    Ok((StatusCode::CREATED, Json(product)))
}

async fn get_product(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<Json<Product>, StatusCode> {
    let store = db.read().await;
    store.products.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_product(
    State(db): State<Db>,
    Path(id): Path<u32>,
    Json(input): Json<ProductInput>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let product = store.products.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    product.name = input.name;
    product.product_type = input.product_type;
    product.price = input.price;
    info!(id, "updated product");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_product(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let removed = store.products.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    info!(id = removed.id, "deleted product");
    Ok(StatusCode::NO_CONTENT)
}
