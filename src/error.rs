use thiserror::Error;

/// Engine error taxonomy. Every error is terminal for the current
/// calculation attempt; nothing is retried internally.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Catalog load failed or has not completed; no partial catalog is
    /// ever exposed. Callers may re-invoke the load.
    #[error("catalog data unavailable: {0}")]
    DataUnavailable(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No catalog inverter satisfies the 15% headroom sizing rule.
    #[error("no suitable inverter for {target_kw} kW system (need >= {min_kw} kW rated)")]
    NoSuitableInverter { target_kw: f64, min_kw: f64 },

    /// Manual (brand, rated power) lookup found no exact match.
    #[error("no inverter found for brand {brand} at {rated_power_kw} kW")]
    InverterNotFound { brand: String, rated_power_kw: f64 },

    /// A required cost-rate key is absent from the catalog settings.
    #[error("missing rate data: {0}")]
    MissingRateData(String),

    #[error("invalid loan principal: {0}")]
    InvalidPrincipal(f64),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
