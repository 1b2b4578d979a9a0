//! Curation services for the reference data
//!
//! Publisher enrichment (alternate titles, country, registry id) and
//! journal pricing normalization. Both run on every save, invoked
//! explicitly by the admin handlers around the data-layer write.

pub mod enrichment;
pub mod exchange;
pub mod pricing;

pub use enrichment::{EnrichedPublisher, PublisherDraft, PublisherEnricher};
pub use pricing::{normalize_usd, validate_apc_prices, ApcPrice};
