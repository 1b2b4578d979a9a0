//! SeaORM entity models
//!
//! Reference data lives in the warehouse/reference databases; the sales
//! entities (api_key, ratelimit_exempt) live in the api-keys database.

mod api_key;
mod concept;
mod journal;
mod publisher;
mod ratelimit_exempt;

pub use concept::{
    Entity as ConceptEntity,
    Model as Concept,
    ActiveModel as ConceptActiveModel,
    Column as ConceptColumn,
};

pub use publisher::{
    Entity as PublisherEntity,
    Model as Publisher,
    ActiveModel as PublisherActiveModel,
    Column as PublisherColumn,
};

pub use journal::{
    Entity as JournalEntity,
    Model as Journal,
    ActiveModel as JournalActiveModel,
    Column as JournalColumn,
};

pub use api_key::{
    Entity as ApiKeyEntity,
    Model as ApiKey,
    ActiveModel as ApiKeyActiveModel,
    Column as ApiKeyColumn,
};

pub use ratelimit_exempt::{
    Entity as RatelimitExemptEntity,
    Model as RatelimitExempt,
    ActiveModel as RatelimitExemptActiveModel,
    Column as RatelimitExemptColumn,
};
