//! Repository pattern for database operations
//!
//! Provides a clean interface for all data access operations across the
//! three logical databases. Derived fields (alternate titles, country
//! code, normalized APC) are computed by the callers; the repository only
//! persists what it is given.

use crate::db::models::*;
use crate::db::DbPools;
use crate::errors::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set, Statement,
};

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pools: DbPools,
}

/// Caller-supplied publisher fields for a save, derived fields included
#[derive(Debug, Clone)]
pub struct PublisherRecord {
    pub display_name: String,
    pub alternate_titles: Option<String>,
    pub wikidata_id: Option<String>,
    pub country_code: Option<String>,
    pub parent_publisher_id: Option<i64>,
    pub ror_id: Option<String>,
    pub hierarchy_level: i32,
    pub is_approved: bool,
}

/// Caller-supplied journal fields for a save, derived fields included
#[derive(Debug, Clone)]
pub struct JournalRecord {
    pub display_name: String,
    pub publisher_id: Option<i64>,
    pub issns: Option<serde_json::Value>,
    pub webpage: Option<String>,
    pub apc_prices: Option<serde_json::Value>,
    pub apc_usd: Option<i64>,
    pub is_oa: bool,
    pub is_in_doaj: bool,
    pub journal_type: Option<String>,
    pub wikidata_id: Option<String>,
}

/// Caller-supplied API key fields for a save
#[derive(Debug, Clone)]
pub struct ApiKeyRecord {
    pub email: String,
    pub key: String,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub expires: Option<chrono::NaiveDate>,
    pub active: bool,
    pub is_demo: bool,
    pub notes: Option<String>,
    pub premium_domain: Option<String>,
    pub zendesk_organization_id: Option<i64>,
}

/// Caller-supplied rate-limit exemption fields for a save
#[derive(Debug, Clone)]
pub struct RatelimitExemptRecord {
    pub email: String,
    pub active: bool,
    pub expires: Option<chrono::NaiveDate>,
    pub notes: Option<String>,
    pub ticket: Option<String>,
}

impl Repository {
    /// Create a new repository over the given pools
    pub fn new(pools: DbPools) -> Self {
        Self { pools }
    }

    fn reference(&self) -> &DatabaseConnection {
        &self.pools.reference
    }

    fn api_keys(&self) -> &DatabaseConnection {
        &self.pools.api_keys
    }

    fn warehouse(&self) -> &DatabaseConnection {
        &self.pools.warehouse
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping all databases
    pub async fn ping(&self) -> Result<()> {
        self.pools.ping().await
    }

    // ========================================================================
    // Concept Operations
    // ========================================================================

    /// Find concept by ID
    pub async fn find_concept_by_id(&self, id: i64) -> Result<Option<Concept>> {
        ConceptEntity::find_by_id(id)
            .one(self.reference())
            .await
            .map_err(Into::into)
    }

    /// List concepts with pagination, newest first, optionally filtered
    /// by display name
    pub async fn list_concepts(
        &self,
        offset: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<(Vec<Concept>, u64)> {
        let mut query = ConceptEntity::find();
        if let Some(search) = search {
            query = query.filter(ConceptColumn::DisplayName.contains(search));
        }

        let paginator = query
            .order_by_desc(ConceptColumn::UpdatedDate)
            .paginate(self.reference(), limit);

        let total = paginator.num_items().await?;
        let page = if limit == 0 { 0 } else { offset / limit };
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// Privileged concept edit: display name and level only. The cached
    /// JSON columns are never writable through this service.
    pub async fn update_concept(
        &self,
        id: i64,
        display_name: String,
        level: i32,
    ) -> Result<Concept> {
        let concept = ConceptActiveModel {
            field_of_study_id: Set(id),
            display_name: Set(display_name),
            level: Set(level),
            updated_date: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        concept.update(self.reference()).await.map_err(Into::into)
    }

    // ========================================================================
    // Publisher Operations
    // ========================================================================

    /// Find publisher by ID
    pub async fn find_publisher_by_id(&self, id: i64) -> Result<Option<Publisher>> {
        PublisherEntity::find_by_id(id)
            .one(self.reference())
            .await
            .map_err(Into::into)
    }

    /// List publishers with pagination
    pub async fn list_publishers(&self, offset: u64, limit: u64) -> Result<(Vec<Publisher>, u64)> {
        let paginator = PublisherEntity::find()
            .order_by_asc(PublisherColumn::PublisherId)
            .paginate(self.reference(), limit);

        let total = paginator.num_items().await?;
        let page = if limit == 0 { 0 } else { offset / limit };
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// Insert a new publisher with its derived fields
    pub async fn create_publisher(&self, record: PublisherRecord) -> Result<Publisher> {
        let now = chrono::Utc::now();

        let publisher = PublisherActiveModel {
            publisher_id: NotSet,
            display_name: Set(record.display_name),
            alternate_titles: Set(record.alternate_titles),
            wikidata_id: Set(record.wikidata_id),
            country_code: Set(record.country_code),
            parent_publisher_id: Set(record.parent_publisher_id),
            ror_id: Set(record.ror_id),
            hierarchy_level: Set(record.hierarchy_level),
            is_approved: Set(record.is_approved),
            created_date: Set(now.into()),
            updated_date: Set(now.into()),
        };

        publisher.insert(self.reference()).await.map_err(Into::into)
    }

    /// Overwrite an existing publisher. All fields are written, derived
    /// ones included: the save path always refreshes from source of truth.
    pub async fn update_publisher(&self, id: i64, record: PublisherRecord) -> Result<Publisher> {
        let publisher = PublisherActiveModel {
            publisher_id: Set(id),
            display_name: Set(record.display_name),
            alternate_titles: Set(record.alternate_titles),
            wikidata_id: Set(record.wikidata_id),
            country_code: Set(record.country_code),
            parent_publisher_id: Set(record.parent_publisher_id),
            ror_id: Set(record.ror_id),
            hierarchy_level: Set(record.hierarchy_level),
            is_approved: Set(record.is_approved),
            updated_date: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        publisher.update(self.reference()).await.map_err(Into::into)
    }

    // ========================================================================
    // Journal Operations
    // ========================================================================

    /// Find journal by ID
    pub async fn find_journal_by_id(&self, id: i64) -> Result<Option<Journal>> {
        JournalEntity::find_by_id(id)
            .one(self.reference())
            .await
            .map_err(Into::into)
    }

    /// List journals with pagination
    pub async fn list_journals(&self, offset: u64, limit: u64) -> Result<(Vec<Journal>, u64)> {
        let paginator = JournalEntity::find()
            .order_by_asc(JournalColumn::JournalId)
            .paginate(self.reference(), limit);

        let total = paginator.num_items().await?;
        let page = if limit == 0 { 0 } else { offset / limit };
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// Insert a new journal with its derived `apc_usd`
    pub async fn create_journal(&self, record: JournalRecord) -> Result<Journal> {
        let now = chrono::Utc::now();

        let journal = JournalActiveModel {
            journal_id: NotSet,
            display_name: Set(record.display_name),
            publisher_id: Set(record.publisher_id),
            issns: Set(record.issns),
            webpage: Set(record.webpage),
            apc_prices: Set(record.apc_prices),
            apc_usd: Set(record.apc_usd),
            is_oa: Set(record.is_oa),
            is_in_doaj: Set(record.is_in_doaj),
            journal_type: Set(record.journal_type),
            wikidata_id: Set(record.wikidata_id),
            paper_count: NotSet,
            created_date: Set(now.into()),
            updated_date: Set(now.into()),
        };

        journal.insert(self.reference()).await.map_err(Into::into)
    }

    /// Overwrite an existing journal, derived `apc_usd` included
    pub async fn update_journal(&self, id: i64, record: JournalRecord) -> Result<Journal> {
        let journal = JournalActiveModel {
            journal_id: Set(id),
            display_name: Set(record.display_name),
            publisher_id: Set(record.publisher_id),
            issns: Set(record.issns),
            webpage: Set(record.webpage),
            apc_prices: Set(record.apc_prices),
            apc_usd: Set(record.apc_usd),
            is_oa: Set(record.is_oa),
            is_in_doaj: Set(record.is_in_doaj),
            journal_type: Set(record.journal_type),
            wikidata_id: Set(record.wikidata_id),
            updated_date: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        journal.update(self.reference()).await.map_err(Into::into)
    }

    /// Look up a journal's paper count in the warehouse (read-only)
    pub async fn warehouse_paper_count(&self, journal_id: i64) -> Result<Option<i64>> {
        use sea_orm::ConnectionTrait;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT paper_count FROM mid.journal WHERE journal_id = $1",
            [journal_id.into()],
        );

        let row = self.warehouse().query_one(stmt).await?;
        match row {
            Some(row) => Ok(row.try_get::<Option<i64>>("", "paper_count")?),
            None => Ok(None),
        }
    }

    // ========================================================================
    // API Key Operations
    // ========================================================================

    /// Find API key by ID
    pub async fn find_api_key_by_id(&self, id: i64) -> Result<Option<ApiKey>> {
        ApiKeyEntity::find_by_id(id)
            .one(self.api_keys())
            .await
            .map_err(Into::into)
    }

    /// Find API key by customer email
    pub async fn find_api_key_by_email(&self, email: &str) -> Result<Option<ApiKey>> {
        ApiKeyEntity::find()
            .filter(ApiKeyColumn::Email.eq(email))
            .one(self.api_keys())
            .await
            .map_err(Into::into)
    }

    /// List API keys with pagination, newest first
    pub async fn list_api_keys(&self, offset: u64, limit: u64) -> Result<(Vec<ApiKey>, u64)> {
        let paginator = ApiKeyEntity::find()
            .order_by_desc(ApiKeyColumn::Created)
            .paginate(self.api_keys(), limit);

        let total = paginator.num_items().await?;
        let page = if limit == 0 { 0 } else { offset / limit };
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// Insert a new API key
    pub async fn create_api_key(&self, record: ApiKeyRecord) -> Result<ApiKey> {
        let api_key = ApiKeyActiveModel {
            id: NotSet,
            email: Set(record.email),
            key: Set(record.key),
            name: Set(record.name),
            organization: Set(record.organization),
            created: Set(chrono::Utc::now().into()),
            expires: Set(record.expires),
            active: Set(record.active),
            is_demo: Set(record.is_demo),
            notes: Set(record.notes),
            premium_domain: Set(record.premium_domain),
            zendesk_organization_id: Set(record.zendesk_organization_id),
        };

        api_key.insert(self.api_keys()).await.map_err(Into::into)
    }

    /// Overwrite an existing API key
    pub async fn update_api_key(&self, id: i64, record: ApiKeyRecord) -> Result<ApiKey> {
        let api_key = ApiKeyActiveModel {
            id: Set(id),
            email: Set(record.email),
            key: Set(record.key),
            name: Set(record.name),
            organization: Set(record.organization),
            expires: Set(record.expires),
            active: Set(record.active),
            is_demo: Set(record.is_demo),
            notes: Set(record.notes),
            premium_domain: Set(record.premium_domain),
            zendesk_organization_id: Set(record.zendesk_organization_id),
            ..Default::default()
        };

        api_key.update(self.api_keys()).await.map_err(Into::into)
    }

    // ========================================================================
    // Rate-limit Exemption Operations
    // ========================================================================

    /// Find exemption by ID
    pub async fn find_exempt_by_id(&self, id: i64) -> Result<Option<RatelimitExempt>> {
        RatelimitExemptEntity::find_by_id(id)
            .one(self.api_keys())
            .await
            .map_err(Into::into)
    }

    /// List exemptions with pagination
    pub async fn list_exempts(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<(Vec<RatelimitExempt>, u64)> {
        let paginator = RatelimitExemptEntity::find()
            .order_by_asc(RatelimitExemptColumn::Id)
            .paginate(self.api_keys(), limit);

        let total = paginator.num_items().await?;
        let page = if limit == 0 { 0 } else { offset / limit };
        let items = paginator.fetch_page(page).await?;
        Ok((items, total))
    }

    /// All active exempt emails, storage default order (primary key)
    pub async fn active_exempt_emails(&self) -> Result<Vec<String>> {
        let rows = RatelimitExemptEntity::find()
            .filter(RatelimitExemptColumn::Active.eq(true))
            .order_by_asc(RatelimitExemptColumn::Id)
            .all(self.api_keys())
            .await?;

        Ok(rows.into_iter().map(|r| r.email).collect())
    }

    /// Insert a new exemption
    pub async fn create_exempt(&self, record: RatelimitExemptRecord) -> Result<RatelimitExempt> {
        let exempt = RatelimitExemptActiveModel {
            id: NotSet,
            email: Set(record.email),
            active: Set(record.active),
            expires: Set(record.expires),
            notes: Set(record.notes),
            ticket: Set(record.ticket),
        };

        exempt.insert(self.api_keys()).await.map_err(Into::into)
    }

    /// Overwrite an existing exemption
    pub async fn update_exempt(
        &self,
        id: i64,
        record: RatelimitExemptRecord,
    ) -> Result<RatelimitExempt> {
        let exempt = RatelimitExemptActiveModel {
            id: Set(id),
            email: Set(record.email),
            active: Set(record.active),
            expires: Set(record.expires),
            notes: Set(record.notes),
            ticket: Set(record.ticket),
        };

        exempt.update(self.api_keys()).await.map_err(Into::into)
    }
}
