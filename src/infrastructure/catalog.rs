use crate::domain::Product;

pub struct ApiCatalog;

impl ApiCatalog {
    /// Fetches the product catalog from `{base_url}/products`.
    ///
    /// The endpoint returns a JSON array of products.
    pub fn fetch(base_url: &str) -> Result<Vec<Product>, String> {
        let url = format!("{}/products", base_url.trim_end_matches('/'));

        let response = reqwest::blocking::get(&url).map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("Server returned {}", response.status()));
        }

        response
            .json::<Vec<Product>>()
            .map_err(|e| format!("Invalid catalog response - {}", e))
    }
}
