use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn from_product(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity: 1,
        }
    }
}

/// Ordered list of cart entries. Insertion order is add order and duplicate
/// ids are allowed to accumulate.
///
/// Serializes as a bare JSON array of entries, which is the storage value
/// format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities across all entries.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of quantities across entries with the given id.
    pub fn quantity_of(&self, id: &str) -> u32 {
        self.items
            .iter()
            .filter(|item| item.id == id)
            .map(|item| item.quantity)
            .sum()
    }

    /// Appends a new entry with quantity 1, even when an entry with the same
    /// id already exists. The cart never merges.
    pub fn add(&mut self, product: Product) {
        self.items.push(CartItem::from_product(product));
    }

    /// Adds 1 to the quantity of every entry whose id matches. No-op when
    /// nothing matches.
    pub fn increment(&mut self, id: &str) {
        for item in &mut self.items {
            if item.id == id {
                item.quantity += 1;
            }
        }
    }

    /// Subtracts 1 from the quantity of every entry whose id matches,
    /// stopping at 0. Entries are never removed, even at quantity 0. No-op
    /// when nothing matches.
    pub fn decrement(&mut self, id: &str) {
        for item in &mut self.items {
            if item.id == id {
                item.quantity = if item.quantity == 1 {
                    0
                } else {
                    item.quantity.saturating_sub(1)
                };
            }
        }
    }
}
