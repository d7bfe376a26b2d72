//! The module contains the `Product` record and the `Catalog` store.
//!
//! The catalog owns every product for the lifetime of the session. Products
//! are appended by registration and mutated in place by field edits and by
//! sales; nothing is ever removed in-session.

use serde::Serialize;

use crate::{EngineError, MoneyCents, ResultEngine};

/// A product on the shelf.
///
/// `id` is unique across the catalog. It is either a plain decimal numeral
/// or a legacy single-letter-prefixed numeral such as `P12`; newly assigned
/// ids are always plain decimals. `name` is unique case-insensitively.
///
/// Serializes in the persisted column order `id,name,price,stock`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: MoneyCents,
    pub stock: u32,
}

/// The complete set of product records, in file order.
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from records already coerced at the load boundary.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Exact-id lookup. A miss is an empty result, not an error.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Product> {
        let id = id.trim();
        self.products.iter().find(|product| product.id == id)
    }

    pub(crate) fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Product> {
        let id = id.trim();
        self.products.iter_mut().find(|product| product.id == id)
    }

    /// Case-insensitive substring match against product names.
    ///
    /// A blank query matches nothing; "match everything" would make partial
    /// name prompts dangerous in the modification flow.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.products
            .iter()
            .filter(|product| product.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Enumerates the products an id-or-name query could mean.
    ///
    /// An exact id hit wins outright; otherwise every substring name match
    /// is a candidate. Choosing among multiple candidates belongs to the
    /// interactive shell, not the engine.
    #[must_use]
    pub fn find_candidates(&self, query: &str) -> Vec<&Product> {
        if let Some(product) = self.find_by_id(query) {
            return vec![product];
        }
        self.find_by_name(query)
    }

    /// Generates the next product id.
    ///
    /// Two recognizer rules are tried per existing id, in order: a pure
    /// decimal numeral, then a single letter (case-insensitive) followed by
    /// a numeral. Ids matching neither rule are ignored. The result is the
    /// highest recognized value plus one, as a plain digit string; the
    /// letter-prefixed rule only recognizes legacy ids, it never produces
    /// new ones.
    #[must_use]
    pub fn next_id(&self) -> String {
        let highest = self
            .products
            .iter()
            .filter_map(|product| {
                let id = product.id.trim();
                plain_numeral(id).or_else(|| prefixed_numeral(id))
            })
            .max()
            .unwrap_or(0);

        (highest + 1).to_string()
    }

    /// Registers a new product under a generated id and appends it.
    pub fn register(&mut self, name: &str, price: MoneyCents, stock: i64) -> ResultEngine<&Product> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::InvalidName(
                "product name is required".to_string(),
            ));
        }
        if self
            .products
            .iter()
            .any(|product| product.name.eq_ignore_ascii_case(name))
        {
            return Err(EngineError::DuplicateName(name.to_string()));
        }
        if !price.is_positive() {
            return Err(EngineError::InvalidPrice(format!(
                "price must be positive, got {price}"
            )));
        }
        let stock = validate_stock(stock)?;

        let product = Product {
            id: self.next_id(),
            name: name.to_string(),
            price,
            stock,
        };
        self.products.push(product);

        Ok(&self.products[self.products.len() - 1])
    }

    /// Updates price and/or stock of an existing product.
    ///
    /// Each supplied field is validated independently: an invalid value
    /// leaves that field untouched and is reported in the returned
    /// [`UpdateReport`], without aborting the change to the other field.
    pub fn update_fields(
        &mut self,
        id: &str,
        new_price: Option<MoneyCents>,
        new_stock: Option<i64>,
    ) -> ResultEngine<UpdateReport> {
        let product = self
            .find_by_id_mut(id)
            .ok_or_else(|| EngineError::NotFound(id.trim().to_string()))?;

        let price = new_price.map(|price| {
            if price.is_positive() {
                product.price = price;
                Ok(price)
            } else {
                Err(EngineError::InvalidPrice(format!(
                    "price must be positive, got {price}"
                )))
            }
        });

        let stock = new_stock.map(|stock| {
            let stock = validate_stock(stock)?;
            product.stock = stock;
            Ok(stock)
        });

        Ok(UpdateReport { price, stock })
    }
}

/// Per-field outcome of [`Catalog::update_fields`].
///
/// `None` means the field was not supplied; `Some(Ok(value))` the applied
/// value; `Some(Err(..))` the specific validation failure for that field.
#[derive(Debug)]
pub struct UpdateReport {
    pub price: Option<ResultEngine<MoneyCents>>,
    pub stock: Option<ResultEngine<u32>>,
}

fn validate_stock(stock: i64) -> ResultEngine<u32> {
    u32::try_from(stock)
        .map_err(|_| EngineError::InvalidStock(format!("stock must be >= 0, got {stock}")))
}

fn plain_numeral(id: &str) -> Option<u64> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

fn prefixed_numeral(id: &str) -> Option<u64> {
    let (first, digits) = id.split_at_checked(1)?;
    if !first.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    plain_numeral(digits)
}
