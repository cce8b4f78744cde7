//! CSV interchange for the storefront.
//!
//! Catalogs can be loaded from CSV files as an alternative to the
//! marketplace API, and the current cart can be written out as a CSV
//! shopping list.

use super::models::{CartItem, Product};

/// CSV import/export for catalog and cart data.
///
/// Catalog files carry one product per row with an
/// `id,title,image_url,price` header. Cart exports carry the same columns
/// plus `quantity`.
pub struct CsvCatalog;

impl CsvCatalog {
    /// Loads a product catalog from a CSV file.
    ///
    /// # Arguments
    ///
    /// * `filename` - Path of the CSV file to read
    ///
    /// # Returns
    ///
    /// The parsed products, or an error message when the file cannot be
    /// read or a row does not match the expected columns.
    pub fn import_from_csv(filename: &str) -> Result<Vec<Product>, String> {
        let mut reader = csv::Reader::from_path(filename).map_err(|e| e.to_string())?;

        let mut products = Vec::new();
        for record in reader.deserialize() {
            let product: Product = record.map_err(|e| format!("Invalid catalog row - {}", e))?;
            products.push(product);
        }

        Ok(products)
    }

    /// Writes the cart out as a CSV shopping list.
    ///
    /// Zero-quantity entries are written too; the export mirrors the cart
    /// exactly.
    ///
    /// # Arguments
    ///
    /// * `items` - Cart entries to write
    /// * `filename` - Path of the CSV file to create
    ///
    /// # Returns
    ///
    /// The filename on success, or an error message.
    pub fn export_cart_to_csv(items: &[CartItem], filename: &str) -> Result<String, String> {
        let mut writer = csv::Writer::from_path(filename).map_err(|e| e.to_string())?;

        for item in items {
            writer
                .serialize(item)
                .map_err(|e| format!("Export failed on {} - {}", item.id, e))?;
        }

        writer.flush().map_err(|e| e.to_string())?;
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_import_catalog() {
        let file = write_temp_csv(
            "id,title,image_url,price\n\
             1,Cadeira Rustes,https://example.com/chair.jpg,57.8\n\
             2,Poltrona Lila,https://example.com/sofa.jpg,386.9\n",
        );

        let products = CsvCatalog::import_from_csv(file.path().to_str().unwrap()).unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "1");
        assert_eq!(products[0].title, "Cadeira Rustes");
        assert_eq!(products[1].price, 386.9);
    }

    #[test]
    fn test_import_missing_file() {
        let result = CsvCatalog::import_from_csv("no-such-catalog.csv");
        assert!(result.is_err());
    }

    #[test]
    fn test_import_malformed_row() {
        let file = write_temp_csv(
            "id,title,image_url,price\n\
             1,Cadeira Rustes,https://example.com/chair.jpg,not-a-price\n",
        );

        let result = CsvCatalog::import_from_csv(file.path().to_str().unwrap());

        assert!(result.unwrap_err().contains("Invalid catalog row"));
    }

    #[test]
    fn test_export_cart() {
        let items = vec![CartItem {
            id: "1".to_string(),
            title: "Cadeira Rustes".to_string(),
            image_url: "https://example.com/chair.jpg".to_string(),
            price: 57.8,
            quantity: 2,
        }];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.csv");
        let path_str = path.to_str().unwrap();

        let written = CsvCatalog::export_cart_to_csv(&items, path_str).unwrap();

        assert_eq!(written, path_str);
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("id,title,image_url,price,quantity"));
        assert!(contents.contains("Cadeira Rustes"));
    }
}
