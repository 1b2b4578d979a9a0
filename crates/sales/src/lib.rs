//! Sales services
//!
//! API-key issuing defaults, support-desk synchronization and the
//! rate-limit allow-list push. All side effects run explicitly after the
//! data-layer write, invoked by the admin handlers.

pub mod keys;
pub mod ratelimit;
pub mod support_desk;

pub use ratelimit::{join_exempt, push_exempt_list, ExemptPush};
pub use support_desk::{sync_api_key, SyncReport};
