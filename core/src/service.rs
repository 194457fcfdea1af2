//! Blocking product service: one `ProductClient` plus an injected transport.
//!
//! Every operation is build → execute → parse with no retries.

use tracing::debug;

use crate::client::ProductClient;
use crate::config::ServerAddress;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport, UreqTransport};
use crate::types::{Product, ProductId, ProductType};

#[derive(Clone)]
pub struct ProductService<T = UreqTransport> {
    client: ProductClient,
    transport: T,
}

impl ProductService<UreqTransport> {
    /// Service talking to `address` over a fresh ureq agent.
    pub fn with_ureq(address: &ServerAddress) -> Self {
        Self::connect(address, UreqTransport::new())
    }
}

impl<T: HttpTransport> ProductService<T> {
    pub fn new(client: ProductClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn connect(address: &ServerAddress, transport: T) -> Self {
        Self::new(ProductClient::for_address(address), transport)
    }

    pub fn client(&self) -> &ProductClient {
        &self.client
    }

    /// All products known to the server. Possibly empty.
    pub fn retrieve_all_products(&self) -> Result<Vec<Product>, ApiError> {
        let req = self.client.build_retrieve_all_products();
        self.client.parse_retrieve_products(self.send(&req)?)
    }

    /// Products of any of the given types. Possibly empty.
    pub fn retrieve_products<I>(&self, types: I) -> Result<Vec<Product>, ApiError>
    where
        I: IntoIterator<Item = ProductType>,
    {
        let req = self.client.build_retrieve_products(types);
        self.client.parse_retrieve_products(self.send(&req)?)
    }

    /// Fails with `ApiError::NotFound` if no product has this id.
    pub fn retrieve_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let req = self.client.build_retrieve_product(id);
        self.client.parse_retrieve_product(self.send(&req)?)
    }

    /// Stores a product that has no id yet and returns the id the server
    /// assigned to it.
    pub fn store_new_product(&self, product: &Product) -> Result<ProductId, ApiError> {
        let req = self.client.build_store_new_product(product)?;
        self.client.parse_store_new_product(self.send(&req)?)
    }

    pub fn update_product(&self, product: &Product) -> Result<(), ApiError> {
        let req = self.client.build_update_product(product)?;
        self.client.parse_update_product(self.send(&req)?)
    }

    pub fn delete_product(&self, product: &Product) -> Result<(), ApiError> {
        let req = self.client.build_delete_product(product)?;
        self.client.parse_delete_product(self.send(&req)?)
    }

    fn send(&self, req: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = req.method.as_str(), url = %req.url, query = ?req.query, "sending request");
        let response = self.transport.execute(req)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
