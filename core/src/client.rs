//! Stateless HTTP request builder and response parser for the product API.
//!
//! # Design
//! `ProductClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The round-trip in between belongs to an `HttpTransport`.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ServerAddress;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Product, ProductId, ProductType};

const PRODUCTS_PATH: &str = "products";
const TYPE_PARAM: &str = "type";
const JSON: &str = "application/json";

/// Synchronous, stateless client for the product API.
#[derive(Debug, Clone)]
pub struct ProductClient {
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn for_address(address: &ServerAddress) -> Self {
        Self::new(&address.base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_retrieve_all_products(&self) -> HttpRequest {
        self.request(HttpMethod::Get, self.collection_url())
    }

    /// Lists products whose type is in `types`. Each distinct type becomes
    /// one `type` query parameter, in `ProductType` order; an empty set sends
    /// no query at all.
    pub fn build_retrieve_products<I>(&self, types: I) -> HttpRequest
    where
        I: IntoIterator<Item = ProductType>,
    {
        let types: BTreeSet<ProductType> = types.into_iter().collect();
        let mut req = self.request(HttpMethod::Get, self.collection_url());
        req.query = types
            .iter()
            .map(|ty| (TYPE_PARAM.to_string(), ty.as_str().to_string()))
            .collect();
        req
    }

    pub fn build_retrieve_product(&self, id: ProductId) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url(id))
    }

    /// The product must not carry an id yet; the server assigns one.
    pub fn build_store_new_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        if let Some(id) = product.id {
            return Err(ApiError::InvalidProduct(format!(
                "new product already has id {id}"
            )));
        }
        self.json_request(HttpMethod::Post, self.collection_url(), product)
    }

    pub fn build_update_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        let id = stored_id(product, "update")?;
        self.json_request(HttpMethod::Put, self.item_url(id), product)
    }

    pub fn build_delete_product(&self, product: &Product) -> Result<HttpRequest, ApiError> {
        let id = stored_id(product, "delete")?;
        Ok(self.request(HttpMethod::Delete, self.item_url(id)))
    }

    /// Parses the response to either list request.
    pub fn parse_retrieve_products(&self, response: HttpResponse) -> Result<Vec<Product>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_retrieve_product(&self, response: HttpResponse) -> Result<Product, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    /// Returns the id the server assigned to the new product.
    pub fn parse_store_new_product(&self, response: HttpResponse) -> Result<ProductId, ApiError> {
        check_status(&response, 201)?;
        let created: Product = decode(&response.body)?;
        created
            .id
            .ok_or_else(|| ApiError::DeserializationError("created product has no id".to_string()))
    }

    pub fn parse_update_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_success(&response)
    }

    pub fn parse_delete_product(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_success(&response)
    }

    fn collection_url(&self) -> String {
        format!("{}/{PRODUCTS_PATH}", self.base_url)
    }

    fn item_url(&self, id: ProductId) -> String {
        format!("{}/{PRODUCTS_PATH}/{id}", self.base_url)
    }

    fn request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            query: Vec::new(),
            headers: vec![("accept".to_string(), JSON.to_string())],
            body: None,
        }
    }

    fn json_request(&self, method: HttpMethod, url: String, product: &Product) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(product).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(method, url);
        req.headers.push(("content-type".to_string(), JSON.to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

fn stored_id(product: &Product, operation: &str) -> Result<ProductId, ApiError> {
    product
        .id
        .ok_or_else(|| ApiError::InvalidProduct(format!("cannot {operation} a product without an id")))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Require exactly `expected`; 404 maps to `NotFound`.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(status_error(response))
}

/// Accept any 2xx; 404 maps to `NotFound`.
fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(status_error(response))
}

fn status_error(response: &HttpResponse) -> ApiError {
    if response.status == 404 {
        return ApiError::NotFound;
    }
    warn!(status = response.status, "unexpected response status");
    ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ProductClient {
        ProductClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
        req.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn build_retrieve_all_products_produces_correct_request() {
        let req = client().build_retrieve_all_products();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/products");
        assert!(req.query.is_empty());
        assert!(req.body.is_none());
        assert_eq!(header(&req, "accept"), Some("application/json"));
        assert_eq!(header(&req, "content-type"), None);
    }

    #[test]
    fn build_retrieve_products_sends_one_param_per_type_in_order() {
        let req = client().build_retrieve_products([
            ProductType::Premium,
            ProductType::Standard,
            ProductType::Premium,
        ]);
        assert_eq!(req.url, "http://localhost:3000/products");
        assert_eq!(
            req.query,
            vec![
                ("type".to_string(), "STANDARD".to_string()),
                ("type".to_string(), "PREMIUM".to_string()),
            ]
        );
    }

    #[test]
    fn build_retrieve_products_with_no_types_lists_everything() {
        let req = client().build_retrieve_products(Vec::<ProductType>::new());
        assert_eq!(req, client().build_retrieve_all_products());
    }

    #[test]
    fn build_retrieve_product_uses_item_path() {
        let req = client().build_retrieve_product(ProductId(42));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/products/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_store_new_product_produces_correct_request() {
        let product = Product::new("Desk", ProductType::Standard).with_price(120.0);
        let req = client().build_store_new_product(&product).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/products");
        assert_eq!(header(&req, "content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Desk");
        assert_eq!(body["type"], "STANDARD");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_store_new_product_rejects_product_with_id() {
        let product = Product::new("Desk", ProductType::Standard).with_id(3);
        let err = client().build_store_new_product(&product).unwrap_err();
        assert!(matches!(err, ApiError::InvalidProduct(_)));
    }

    #[test]
    fn build_update_product_produces_correct_request() {
        let product = Product::new("Desk", ProductType::Premium).with_id(5);
        let req = client().build_update_product(&product).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/products/5");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 5);
        assert_eq!(body["type"], "PREMIUM");
    }

    #[test]
    fn build_update_product_requires_id() {
        let product = Product::new("Desk", ProductType::Premium);
        let err = client().build_update_product(&product).unwrap_err();
        assert!(matches!(err, ApiError::InvalidProduct(_)));
    }

    #[test]
    fn build_delete_product_produces_correct_request() {
        let product = Product::new("Desk", ProductType::Budget).with_id(9);
        let req = client().build_delete_product(&product).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/products/9");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_delete_product_requires_id() {
        let err = client()
            .build_delete_product(&Product::new("Desk", ProductType::Budget))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidProduct(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ProductClient::new("http://localhost:3000/");
        assert_eq!(client.build_retrieve_all_products().url, "http://localhost:3000/products");
    }

    #[test]
    fn client_for_address_uses_host_and_port() {
        let client = ProductClient::for_address(&ServerAddress::new("example.org", 8080));
        assert_eq!(client.base_url(), "http://example.org:8080");
    }

    #[test]
    fn parse_retrieve_products_success() {
        let resp = response(200, r#"[{"id":1,"name":"Desk","type":"STANDARD","price":99.0}]"#);
        let products = client().parse_retrieve_products(resp).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, Some(ProductId(1)));
        assert_eq!(products[0].price, Some(99.0));
    }

    #[test]
    fn parse_retrieve_products_empty_list() {
        let products = client().parse_retrieve_products(response(200, "[]")).unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn parse_retrieve_products_bad_json() {
        let err = client().parse_retrieve_products(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_retrieve_products_not_found() {
        let err = client().parse_retrieve_products(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_retrieve_products_server_error() {
        let err = client().parse_retrieve_products(response(500, "boom")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_retrieve_product_not_found() {
        let err = client().parse_retrieve_product(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_retrieve_product_server_error() {
        let err = client().parse_retrieve_product(response(500, "boom")).unwrap_err();
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_store_new_product_returns_assigned_id() {
        let resp = response(201, r#"{"id":12,"name":"Desk","type":"BUDGET"}"#);
        assert_eq!(client().parse_store_new_product(resp).unwrap(), ProductId(12));
    }

    #[test]
    fn parse_store_new_product_requires_201() {
        let resp = response(200, r#"{"id":12,"name":"Desk","type":"BUDGET"}"#);
        let err = client().parse_store_new_product(resp).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 200, .. }));
    }

    #[test]
    fn parse_store_new_product_without_id_in_body() {
        let resp = response(201, r#"{"name":"Desk","type":"BUDGET"}"#);
        let err = client().parse_store_new_product(resp).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_update_product_accepts_any_2xx() {
        assert!(client().parse_update_product(response(200, "{}")).is_ok());
        assert!(client().parse_update_product(response(204, "")).is_ok());
    }

    #[test]
    fn parse_update_product_not_found() {
        let err = client().parse_update_product(response(404, "")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn parse_update_product_conflict() {
        let err = client().parse_update_product(response(409, "stale")).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 409, .. }));
    }

    #[test]
    fn parse_delete_product_success() {
        assert!(client().parse_delete_product(response(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_product_not_found() {
        let err = client().parse_delete_product(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }
}
