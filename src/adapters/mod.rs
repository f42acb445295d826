//! Adapters turning operator manifests into OLM bundle content

pub mod csv_builder;
pub mod permissions;
