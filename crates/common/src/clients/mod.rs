//! Typed clients for the external services the back-office talks to
//!
//! Read-only lookups (Wikidata, ROR) return `Option`: `None` covers any
//! non-2xx status, transport failure or missing field, and callers treat
//! it as "unknown", never as fatal. The read-write clients (Zendesk,
//! Heroku) bucket write results into success/failure instead of raising.
//! No client retries; every call is best-effort, once.

pub mod heroku;
pub mod ror;
pub mod wikidata;
pub mod zendesk;

pub use heroku::{HerokuClient, PlatformConfig};
pub use ror::{RegistryLookup, RorClient, RorCountry, RorLabel, RorRecord};
pub use wikidata::{normalize_wikidata_id, WikidataClient, WikidataLookup};
pub use zendesk::{NewSupportDeskUser, SupportDesk, SupportDeskUser, ZendeskClient};
