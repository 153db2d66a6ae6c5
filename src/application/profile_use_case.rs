// ============================================================
// Layer 2 — Profile Use Cases
// ============================================================
// The "analyse first, restrict later" workflow:
//
//   1. discover_datasets   find <name>_history.csv files
//   2. analyze             measure what each limitation type
//                          has available (DatasetAnalysis)
//   3. RestrictionProfile  the chosen thresholds + the analysis,
//                          validated and saved as JSON (Layer 6)
//   4. apply               turn a saved profile back into a
//                          RestrictPlan and run it
//
// The five limitation types:
//   1. Customer count      how many users to keep
//   2. Shopping frequency  minimum baskets per user
//   3. Basket depth        minimum items per basket
//   4. Product variety     size of the product assortment
//   5. Temporal depth      how many recent periods to keep

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::application::restrict_use_case::RestrictPlan;
use crate::application::session::Step;
use crate::data::{
    loader::CsvLoader,
    merger::merge,
    stats::{analyze, DatasetAnalysis},
};
use crate::domain::{
    columns::ColumnSpec,
    dataset::Dataset,
    error::RestrictError,
    traits::DatasetSource,
};

const HISTORY_SUFFIX: &str = "_history.csv";
const FUTURE_SUFFIX:  &str = "_future.csv";

/// Names `X` for which `<dir>/X_history.csv` exists, sorted.
pub fn discover_datasets(input_dir: &Path) -> Result<Vec<String>> {
    if !input_dir.exists() {
        tracing::warn!("Input directory '{}' does not exist", input_dir.display());
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(input_dir)
        .with_context(|| format!("Cannot read directory '{}'", input_dir.display()))?
    {
        let entry = entry?;
        if let Some(name) = entry
            .file_name()
            .to_str()
            .and_then(|f| f.strip_suffix(HISTORY_SUFFIX))
        {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

pub fn history_file(input_dir: &Path, dataset: &str) -> PathBuf {
    input_dir.join(format!("{dataset}{HISTORY_SUFFIX}"))
}

pub fn future_file(input_dir: &Path, dataset: &str) -> PathBuf {
    input_dir.join(format!("{dataset}{FUTURE_SUFFIX}"))
}

/// Load and merge `<dataset>_history.csv` and the optional
/// `<dataset>_future.csv` from `input_dir`.
pub fn load_named(input_dir: &Path, dataset: &str, delimiter: u8) -> Result<Dataset> {
    let history = CsvLoader::new(history_file(input_dir, dataset))
        .with_delimiter(delimiter)
        .load()?;
    let future  = CsvLoader::new(future_file(input_dir, dataset))
        .with_delimiter(delimiter)
        .optional()
        .load()?;
    Ok(merge(history, future)?)
}

pub fn analyze_named(input_dir: &Path, dataset: &str, columns: &ColumnSpec, delimiter: u8) -> Result<DatasetAnalysis> {
    tracing::info!("Analyzing dataset '{}'", dataset);
    let table = load_named(input_dir, dataset, delimiter)?;
    Ok(analyze(&table, columns)?)
}

// ─── Restrictions ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restrictions {
    pub max_customers:           usize,
    pub min_orders_per_customer: usize,
    pub min_basket_items:        usize,
    pub max_products:            usize,
    pub max_temporal_periods:    usize,
}

impl Restrictions {
    /// Restrictions that keep everything the analysis found.
    pub fn unrestricted(a: &DatasetAnalysis) -> Self {
        Self {
            max_customers:           a.max_customers,
            min_orders_per_customer: a.min_orders_per_customer,
            min_basket_items:        a.min_basket_depth,
            max_products:            a.max_products,
            max_temporal_periods:    a.max_temporal_periods,
        }
    }

    /// Every threshold must lie inside what the analysis found.
    pub fn validate(&self, a: &DatasetAnalysis) -> std::result::Result<(), RestrictError> {
        let checks = [
            ("max_customers",           self.max_customers,           1,                         a.max_customers),
            ("min_orders_per_customer", self.min_orders_per_customer, a.min_orders_per_customer, a.max_orders_per_customer),
            ("min_basket_items",        self.min_basket_items,        a.min_basket_depth,        a.max_basket_depth),
            ("max_products",            self.max_products,            1,                         a.max_products),
            ("max_temporal_periods",    self.max_temporal_periods,    1,                         a.max_temporal_periods),
        ];
        for (name, value, min, max) in checks {
            if !(min..=max).contains(&value) {
                return Err(RestrictError::InvalidRestriction { name, value, min, max });
            }
        }
        Ok(())
    }

    /// The fixed order in which a profile is applied.
    pub fn to_steps(&self) -> Vec<Step> {
        vec![
            Step::SampleUsers   { n: self.max_customers },
            Step::BasketCount   { min: self.min_orders_per_customer, max: usize::MAX },
            Step::BasketDepth   { min: self.min_basket_items, max: usize::MAX },
            Step::Assortment    { n: self.max_products },
            Step::TemporalDepth { n: self.max_temporal_periods },
        ]
    }
}

// ─── Restriction Profile ──────────────────────────────────────────────────────
// The JSON document stored by infra::config_store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictionProfile {
    pub dataset:          String,
    pub timestamp:        String,
    pub original_stats:   DatasetAnalysis,
    pub restrictions:     Restrictions,
    pub limitation_types: BTreeMap<String, String>,
    pub description:      String,
}

impl RestrictionProfile {
    /// Validate `restrictions` against `analysis` and stamp the profile.
    pub fn new(
        dataset:      impl Into<String>,
        analysis:     DatasetAnalysis,
        restrictions: Restrictions,
    ) -> Result<Self> {
        restrictions.validate(&analysis)?;

        let limitation_types = [
            ("1", "Customer Count"),
            ("2", "Shopping Frequency"),
            ("3", "Basket Depth"),
            ("4", "Product Variety"),
            ("5", "Temporal Depth"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Ok(Self {
            dataset:        dataset.into(),
            timestamp:      chrono::Local::now().to_rfc3339(),
            original_stats: analysis,
            restrictions,
            limitation_types,
            description:    "NBR data limitations configuration for Next Basket Prediction".to_string(),
        })
    }

    /// Percentage of the original kept by a "max" style limit.
    pub fn share(kept: usize, available: usize) -> f64 {
        if available == 0 {
            0.0
        } else {
            100.0 * kept as f64 / available as f64
        }
    }

    /// A plan that re-applies this profile to the same named dataset.
    pub fn to_plan(
        &self,
        input_dir:  &Path,
        output_dir: &Path,
        name:       Option<String>,
        columns:    ColumnSpec,
        delimiter:  u8,
        seed:       u64,
    ) -> RestrictPlan {
        RestrictPlan {
            history_file: history_file(input_dir, &self.dataset),
            future_file:  future_file(input_dir, &self.dataset),
            output_dir:   output_dir.to_path_buf(),
            name:         name.unwrap_or_else(|| format!("{}_restricted", self.dataset)),
            columns,
            delimiter,
            seed,
            min_users:    1,
            steps:        self.restrictions.to_steps(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> DatasetAnalysis {
        DatasetAnalysis {
            max_customers:           10,
            max_orders_per_customer: 8,
            min_orders_per_customer: 2,
            avg_orders_per_customer: 4.0,
            max_basket_depth:        12,
            min_basket_depth:        1,
            avg_basket_depth:        3.5,
            max_products:            100,
            max_temporal_periods:    8,
            total_transactions:      500,
            total_orders:            40,
        }
    }

    #[test]
    fn test_unrestricted_is_valid() {
        let a = analysis();
        assert!(Restrictions::unrestricted(&a).validate(&a).is_ok());
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let a = analysis();
        let r = Restrictions { min_orders_per_customer: 1, ..Restrictions::unrestricted(&a) };
        let err = r.validate(&a).unwrap_err();
        assert!(matches!(
            err,
            RestrictError::InvalidRestriction { name: "min_orders_per_customer", value: 1, min: 2, max: 8 }
        ));
    }

    #[test]
    fn test_profile_carries_all_five_limitations() {
        let a = analysis();
        let p = RestrictionProfile::new("tafeng", a.clone(), Restrictions::unrestricted(&a)).unwrap();
        assert_eq!(p.limitation_types.len(), 5);
        assert_eq!(p.restrictions.to_steps().len(), 5);
    }

    #[test]
    fn test_profile_json_field_names() {
        let a    = analysis();
        let p    = RestrictionProfile::new("tafeng", a.clone(), Restrictions::unrestricted(&a)).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        for key in ["dataset", "timestamp", "original_stats", "restrictions"] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let r = &json["restrictions"];
        for key in [
            "max_customers",
            "min_orders_per_customer",
            "min_basket_items",
            "max_products",
            "max_temporal_periods",
        ] {
            assert!(r.get(key).is_some(), "missing restrictions.{key}");
        }
    }

    #[test]
    fn test_plan_uses_dataset_file_names() {
        let a    = analysis();
        let p    = RestrictionProfile::new("tafeng", a.clone(), Restrictions::unrestricted(&a)).unwrap();
        let plan = p.to_plan(Path::new("in"), Path::new("out"), None, ColumnSpec::default(), b',', 42);
        assert_eq!(plan.history_file, Path::new("in").join("tafeng_history.csv"));
        assert_eq!(plan.future_file, Path::new("in").join("tafeng_future.csv"));
        assert_eq!(plan.name, "tafeng_restricted");
    }

    #[test]
    fn test_discover_datasets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("tafeng_history.csv"), "user_id\n").unwrap();
        fs::write(dir.path().join("tafeng_future.csv"), "user_id\n").unwrap();
        fs::write(dir.path().join("instacart_history.csv"), "user_id\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        assert_eq!(discover_datasets(dir.path()).unwrap(), vec!["instacart", "tafeng"]);
    }
}
