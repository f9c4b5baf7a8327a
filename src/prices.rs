//! Per-product price vectors.
//!
//! Prices are stored densely in a `DVector<f64>` whose positions follow a
//! sorted product key list. Vectors derived from the same table share that
//! list through an `Arc`, so cloning a snapshot copies only the values.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::DVector;

use crate::error::{LaborValueError, Result};
use crate::table::ProductKey;

/// Labor-time price per unit for each product.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceVector {
    products: Arc<[ProductKey]>,
    prices: DVector<f64>,
}

impl PriceVector {
    /// Assembles a vector from a strictly ascending key list and matching prices.
    pub fn new(products: Arc<[ProductKey]>, prices: DVector<f64>) -> Result<Self> {
        if products.len() != prices.len() {
            return Err(LaborValueError::dimension_mismatch(
                "price vector length",
                products.len(),
                prices.len(),
            ));
        }
        debug_assert!(products.windows(2).all(|pair| pair[0] < pair[1]));
        Ok(Self { products, prices })
    }

    /// Vector with no products.
    pub fn empty() -> Self {
        Self {
            products: Vec::new().into(),
            prices: DVector::zeros(0),
        }
    }

    /// Builds a vector from arbitrary `(product, price)` pairs; later pairs win.
    pub fn from_pairs<I: IntoIterator<Item = (ProductKey, f64)>>(pairs: I) -> Self {
        let map: BTreeMap<ProductKey, f64> = pairs.into_iter().collect();
        let products: Arc<[ProductKey]> = map.keys().copied().collect::<Vec<_>>().into();
        let prices = DVector::from_iterator(map.len(), map.values().copied());
        Self { products, prices }
    }

    /// Number of priced products.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Whether no product is priced.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Shared key list backing this vector.
    pub fn products(&self) -> &Arc<[ProductKey]> {
        &self.products
    }

    /// Dense price values in key order.
    pub fn values(&self) -> &DVector<f64> {
        &self.prices
    }

    /// Whether `other` is laid out over the same keys, position by position.
    pub fn same_layout(&self, other: &PriceVector) -> bool {
        Arc::ptr_eq(&self.products, &other.products) || self.products == other.products
    }

    /// Position of `product` in the dense layout.
    pub fn index_of(&self, product: ProductKey) -> Option<usize> {
        self.products.binary_search(&product).ok()
    }

    /// Price of `product`, if it is priced.
    pub fn get(&self, product: ProductKey) -> Option<f64> {
        self.index_of(product).map(|index| self.prices[index])
    }

    /// Iterates over `(product, price)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductKey, f64)> + '_ {
        self.products.iter().copied().zip(self.prices.iter().copied())
    }

    /// Copies the prices into an ordered map.
    pub fn to_map(&self) -> BTreeMap<ProductKey, f64> {
        self.iter().collect()
    }

    /// Whether every price is finite.
    pub fn is_finite(&self) -> bool {
        self.prices.iter().all(|price| price.is_finite())
    }

    pub(crate) fn into_parts(self) -> (Arc<[ProductKey]>, DVector<f64>) {
        (self.products, self.prices)
    }
}
