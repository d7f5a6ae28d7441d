//! Per-inlet time series as produced by the model post-processing.
//!
//! A [`QuantityTable`] holds the named daily series of one inlet, a
//! [`LayerRecords`] groups those tables for every inlet of a layer, and an
//! [`InletDataset`] bundles the layers with the static inlet dimensions.
//! All of it is read-only input to the analyses.

use crate::errors::{InletError, InletResult};
use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

pub type FloatValue = f64;

/// Named series for a single inlet.
///
/// Missing samples are stored as NaN. When read from JSON, `null` entries
/// become NaN and NaN is written back out as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Vec<Option<FloatValue>>>",
    into = "BTreeMap<String, Vec<Option<FloatValue>>>"
)]
pub struct QuantityTable {
    series: BTreeMap<String, Array1<FloatValue>>,
}

impl QuantityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, quantity: &str, values: impl Into<Array1<FloatValue>>) -> Self {
        self.insert(quantity, values);
        self
    }

    /// Insert or replace a series.
    pub fn insert(&mut self, quantity: &str, values: impl Into<Array1<FloatValue>>) {
        self.series.insert(quantity.to_string(), values.into());
    }

    pub fn get(&self, quantity: &str) -> Option<ArrayView1<'_, FloatValue>> {
        self.series.get(quantity).map(|s| s.view())
    }

    pub fn contains(&self, quantity: &str) -> bool {
        self.series.contains_key(quantity)
    }

    pub fn quantities(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(|k| k.as_str())
    }
}

impl From<BTreeMap<String, Vec<Option<FloatValue>>>> for QuantityTable {
    fn from(raw: BTreeMap<String, Vec<Option<FloatValue>>>) -> Self {
        let series = raw
            .into_iter()
            .map(|(name, values)| {
                let values: Array1<FloatValue> =
                    values.into_iter().map(|v| v.unwrap_or(FloatValue::NAN)).collect();
                (name, values)
            })
            .collect();
        Self { series }
    }
}

impl From<QuantityTable> for BTreeMap<String, Vec<Option<FloatValue>>> {
    fn from(table: QuantityTable) -> Self {
        table
            .series
            .into_iter()
            .map(|(name, values)| {
                let values = values
                    .iter()
                    .map(|v| if v.is_nan() { None } else { Some(*v) })
                    .collect();
                (name, values)
            })
            .collect()
    }
}

/// Which group of records a [`LayerRecords`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    Deep,
    Shallow,
    Concentration,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Deep => write!(f, "deep layer"),
            Layer::Shallow => write!(f, "shallow layer"),
            Layer::Concentration => write!(f, "DO concentration"),
        }
    }
}

/// Quantity tables for every inlet of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRecords {
    layer: Layer,
    inlets: BTreeMap<String, QuantityTable>,
}

impl LayerRecords {
    pub fn new(layer: Layer) -> Self {
        Self {
            layer,
            inlets: BTreeMap::new(),
        }
    }

    pub fn from_tables(layer: Layer, inlets: BTreeMap<String, QuantityTable>) -> Self {
        Self { layer, inlets }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn insert(&mut self, inlet: &str, table: QuantityTable) {
        self.inlets.insert(inlet.to_string(), table);
    }

    pub fn inlets(&self) -> impl Iterator<Item = &str> {
        self.inlets.keys().map(|k| k.as_str())
    }

    /// The quantity table of an inlet.
    pub fn table(&self, inlet: &str) -> InletResult<&QuantityTable> {
        self.inlets
            .get(inlet)
            .ok_or_else(|| InletError::MissingInlet(inlet.to_string(), self.layer.to_string()))
    }

    /// A single series of an inlet.
    ///
    /// Fails with [`InletError::MissingInlet`] or [`InletError::MissingQuantity`]
    /// rather than returning an empty series.
    pub fn series(&self, inlet: &str, quantity: &str) -> InletResult<ArrayView1<'_, FloatValue>> {
        self.table(inlet)?
            .get(quantity)
            .ok_or_else(|| InletError::MissingQuantity {
                inlet: inlet.to_string(),
                quantity: quantity.to_string(),
            })
    }
}

/// Static dimensions of an inlet's deep layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InletDimensions {
    /// unit: m^3
    pub inlet_volume: FloatValue,
    /// unit: m
    pub mean_depth: FloatValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawDataset {
    deep: BTreeMap<String, QuantityTable>,
    shallow: BTreeMap<String, QuantityTable>,
    concentrations: BTreeMap<String, QuantityTable>,
    dimensions: BTreeMap<String, InletDimensions>,
}

/// Everything the analyses read: deep and shallow layer budget terms,
/// DO concentrations and inlet dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDataset", into = "RawDataset")]
pub struct InletDataset {
    pub deep: LayerRecords,
    pub shallow: LayerRecords,
    pub concentrations: LayerRecords,
    pub dimensions: BTreeMap<String, InletDimensions>,
}

impl Default for InletDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl InletDataset {
    pub fn new() -> Self {
        Self {
            deep: LayerRecords::new(Layer::Deep),
            shallow: LayerRecords::new(Layer::Shallow),
            concentrations: LayerRecords::new(Layer::Concentration),
            dimensions: BTreeMap::new(),
        }
    }

    pub fn from_json_str(json: &str) -> InletResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> InletResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn dimensions(&self, inlet: &str) -> InletResult<&InletDimensions> {
        self.dimensions
            .get(inlet)
            .ok_or_else(|| InletError::MissingInlet(inlet.to_string(), "dimensions".to_string()))
    }

    /// Inlet names with deep layer records, in name order.
    pub fn inlets(&self) -> Vec<String> {
        self.deep.inlets().map(String::from).collect()
    }
}

impl From<RawDataset> for InletDataset {
    fn from(raw: RawDataset) -> Self {
        Self {
            deep: LayerRecords::from_tables(Layer::Deep, raw.deep),
            shallow: LayerRecords::from_tables(Layer::Shallow, raw.shallow),
            concentrations: LayerRecords::from_tables(Layer::Concentration, raw.concentrations),
            dimensions: raw.dimensions,
        }
    }
}

impl From<InletDataset> for RawDataset {
    fn from(dataset: InletDataset) -> Self {
        Self {
            deep: dataset.deep.inlets,
            shallow: dataset.shallow.inlets,
            concentrations: dataset.concentrations.inlets,
            dimensions: dataset.dimensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantities::{DEEP_LAYER_DO, VOLUME};

    #[test]
    fn test_missing_quantity_names_inlet_and_quantity() {
        let mut deep = LayerRecords::new(Layer::Deep);
        deep.insert("penn", QuantityTable::new().with(VOLUME, vec![1.0, 2.0]));

        let err = deep.series("penn", DEEP_LAYER_DO).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Quantity 'Deep Layer DO' is missing for inlet 'penn'"
        );

        let err = deep.series("case", VOLUME).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Inlet 'case' is not present in the deep layer records"
        );
    }

    #[test]
    fn test_json_nulls_become_nan() {
        let json = r#"{
            "deep": {"dabob": {"Volume": [1.0, null, 3.0]}},
            "shallow": {},
            "concentrations": {},
            "dimensions": {"dabob": {"inlet_volume": 5.0e8, "mean_depth": 90.0}}
        }"#;
        let dataset = InletDataset::from_json_str(json).unwrap();

        let volume = dataset.deep.series("dabob", VOLUME).unwrap();
        assert_eq!(volume.len(), 3);
        assert!(volume[1].is_nan());
        assert_eq!(dataset.deep.layer(), Layer::Deep);
        assert_eq!(dataset.dimensions("dabob").unwrap().mean_depth, 90.0);
        assert_eq!(dataset.inlets(), vec!["dabob".to_string()]);
    }

    #[test]
    fn test_json_rejects_malformed_input() {
        let err = InletDataset::from_json_str("{\"deep\": 3}").unwrap_err();
        assert!(matches!(err, InletError::Dataset(_)));
    }

    #[test]
    fn test_nan_serialises_as_null() {
        let table = QuantityTable::new().with(VOLUME, vec![1.0, f64::NAN]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"Volume":[1.0,null]}"#);
    }
}
