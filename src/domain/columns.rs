// ============================================================
// Layer 3 — Column Names
// ============================================================
// The core never hardcodes column names. Every operation takes
// a ColumnSpec and checks that the names it needs exist before
// looking at a single row.

use serde::{Deserialize, Serialize};

use crate::domain::dataset::Dataset;
use crate::domain::error::Result;

pub const DEFAULT_USER_COL:    &str = "user_id";
pub const DEFAULT_BASKET_COL:  &str = "order_number";
pub const DEFAULT_PRODUCT_COL: &str = "product_id";

/// Fallback names checked by statistics when the configured
/// product column is absent.
pub const PRODUCT_COL_ALIASES: [&str; 4] = ["product_id", "item_id", "productId", "itemId"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub user:    String,
    pub basket:  String,
    pub product: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            user:    DEFAULT_USER_COL.to_string(),
            basket:  DEFAULT_BASKET_COL.to_string(),
            product: DEFAULT_PRODUCT_COL.to_string(),
        }
    }
}

impl ColumnSpec {
    pub fn new(
        user:    impl Into<String>,
        basket:  impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            user:    user.into(),
            basket:  basket.into(),
            product: product.into(),
        }
    }

    pub fn require_user(&self, dataset: &Dataset) -> Result<()> {
        dataset.require(&self.user)
    }

    /// The (user, basket) pair that identifies a basket.
    pub fn require_basket(&self, dataset: &Dataset) -> Result<()> {
        dataset.require(&self.user)?;
        dataset.require(&self.basket)
    }

    pub fn require_product(&self, dataset: &Dataset) -> Result<()> {
        dataset.require(&self.product)
    }

    /// The configured product column if present, otherwise the first
    /// alias that exists in the dataset.
    pub fn find_product<'a>(&'a self, dataset: &Dataset) -> Option<&'a str> {
        if dataset.has_column(&self.product) {
            return Some(&self.product);
        }
        PRODUCT_COL_ALIASES
            .iter()
            .copied()
            .find(|alias| dataset.has_column(alias))
    }
}
