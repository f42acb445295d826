//! OLM document schema: package descriptors and ClusterServiceVersions

mod csv;
mod package;

pub use csv::*;
pub use package::*;

/// Identifier of the CSV for a given operator version, e.g. `my-operator.v1.2.0`
pub fn csv_name(operator_name: &str, version: &str) -> String {
    format!("{}.v{}", operator_name, version)
}
