//! Tax table configuration for the payroll engine.
//!
//! Bracket and rate tables are configuration inputs loaded from YAML files,
//! never module-level constants, so the same engine can evaluate multiple
//! tax years concurrently.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FederalTaxTables, FicaConfig, FilingStatus, GarnishmentLimits, StateTaxTables,
    SupplementalRates, TaxBracket, TaxTables,
};
