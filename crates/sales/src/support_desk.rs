//! Support-desk synchronization for API keys
//!
//! Mirrors every API-key save into Zendesk: the customer's contact is
//! created or updated and always carries the premium tag. Write failures
//! land in the report messages; only the ambiguous-search case is an
//! error.

use backoffice_common::clients::{NewSupportDeskUser, SupportDesk};
use backoffice_common::db::models::ApiKey;
use backoffice_common::errors::Result;

/// Human-readable outcome of one sync pass, shown to the operator
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub messages: Vec<String>,

    /// Whether a new contact was created (vs. updated)
    pub created: bool,
}

/// Push one API key's contact data to the support desk.
///
/// Existing contact: update the display name when one is provided and
/// ensure the premium tag. No contact: create one (name defaults to the
/// email), attaching an organization by name only when no external
/// organization id is known yet.
pub async fn sync_api_key(desk: &dyn SupportDesk, api_key: &ApiKey) -> Result<SyncReport> {
    let mut report = SyncReport::default();

    match desk.find_user_by_email(&api_key.email).await? {
        Some(user) => {
            if let Some(ref name) = api_key.name {
                if desk.update_user_name(user.id, name).await? {
                    report.messages.push(format!(
                        "Updated user in Zendesk: {} ({})",
                        api_key.email, user.id
                    ));
                } else {
                    report
                        .messages
                        .push("Error encountered updating user in Zendesk.".to_string());
                }
            }

            if desk.add_premium_tag(user.id).await? {
                report.messages.push(format!(
                    "Added premium tag to Zendesk user: {} ({})",
                    api_key.email, user.id
                ));
            } else {
                report
                    .messages
                    .push("Error encountered adding premium tag in Zendesk.".to_string());
            }
        }
        None => {
            let name = api_key
                .name
                .clone()
                .unwrap_or_else(|| api_key.email.clone());

            let organization_name = if api_key.zendesk_organization_id.is_none() {
                api_key.organization.clone()
            } else {
                None
            };

            let new_user = NewSupportDeskUser {
                email: api_key.email.clone(),
                name,
                organization_name,
            };

            match desk.create_user(&new_user).await? {
                Some(user) => {
                    report.created = true;
                    report.messages.push(format!(
                        "Added new user in Zendesk: {} ({})",
                        api_key.email, user.id
                    ));
                }
                None => {
                    report
                        .messages
                        .push("Error adding new user in Zendesk.".to_string());
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backoffice_common::clients::SupportDeskUser;
    use backoffice_common::errors::AppError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockDesk {
        existing: Option<SupportDeskUser>,
        ambiguous: bool,
        fail_writes: bool,
        created: Mutex<Vec<NewSupportDeskUser>>,
        tagged: Mutex<Vec<i64>>,
        renamed: Mutex<Vec<(i64, String)>>,
    }

    #[async_trait]
    impl SupportDesk for MockDesk {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<SupportDeskUser>> {
            if self.ambiguous {
                return Err(AppError::MultipleUsersFound {
                    email: email.to_string(),
                    count: 2,
                });
            }
            Ok(self.existing.clone())
        }

        async fn create_user(
            &self,
            user: &NewSupportDeskUser,
        ) -> Result<Option<SupportDeskUser>> {
            if self.fail_writes {
                return Ok(None);
            }
            self.created.lock().unwrap().push(user.clone());
            Ok(Some(SupportDeskUser {
                id: 900,
                name: Some(user.name.clone()),
                email: Some(user.email.clone()),
                organization_id: None,
            }))
        }

        async fn update_user_name(&self, user_id: i64, name: &str) -> Result<bool> {
            if self.fail_writes {
                return Ok(false);
            }
            self.renamed.lock().unwrap().push((user_id, name.to_string()));
            Ok(true)
        }

        async fn add_premium_tag(&self, user_id: i64) -> Result<bool> {
            if self.fail_writes {
                return Ok(false);
            }
            self.tagged.lock().unwrap().push(user_id);
            Ok(true)
        }
    }

    fn existing_user(id: i64) -> SupportDeskUser {
        SupportDeskUser {
            id,
            name: Some("Old Name".to_string()),
            email: Some("dev@example.com".to_string()),
            organization_id: None,
        }
    }

    fn api_key(name: Option<&str>, organization: Option<&str>, org_id: Option<i64>) -> ApiKey {
        ApiKey {
            id: 1,
            email: "dev@example.com".to_string(),
            key: "abc123".to_string(),
            name: name.map(String::from),
            organization: organization.map(String::from),
            created: chrono::Utc::now().into(),
            expires: None,
            active: true,
            is_demo: false,
            notes: None,
            premium_domain: None,
            zendesk_organization_id: org_id,
        }
    }

    #[tokio::test]
    async fn test_existing_user_renamed_and_tagged() {
        let desk = MockDesk {
            existing: Some(existing_user(55)),
            ..Default::default()
        };

        let report = sync_api_key(&desk, &api_key(Some("Ada"), None, None))
            .await
            .unwrap();

        assert!(!report.created);
        assert_eq!(desk.renamed.lock().unwrap().as_slice(), &[(55, "Ada".to_string())]);
        assert_eq!(desk.tagged.lock().unwrap().as_slice(), &[55]);
        assert_eq!(report.messages.len(), 2);
        assert!(report.messages[0].contains("Updated user"));
        assert!(report.messages[1].contains("premium tag"));
    }

    #[tokio::test]
    async fn test_existing_user_without_name_only_tagged() {
        let desk = MockDesk {
            existing: Some(existing_user(55)),
            ..Default::default()
        };

        let report = sync_api_key(&desk, &api_key(None, None, None)).await.unwrap();

        assert!(desk.renamed.lock().unwrap().is_empty());
        assert_eq!(report.messages.len(), 1);
        assert!(report.messages[0].contains("premium tag"));
    }

    #[tokio::test]
    async fn test_new_user_created_with_org_by_name() {
        let desk = MockDesk::default();

        let report = sync_api_key(&desk, &api_key(None, Some("Acme U"), None))
            .await
            .unwrap();

        assert!(report.created);
        let created = desk.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        // name defaults to the email
        assert_eq!(created[0].name, "dev@example.com");
        assert_eq!(created[0].organization_name.as_deref(), Some("Acme U"));
        assert!(report.messages[0].contains("Added new user"));
    }

    #[tokio::test]
    async fn test_known_org_id_skips_org_by_name() {
        let desk = MockDesk::default();

        sync_api_key(&desk, &api_key(None, Some("Acme U"), Some(77)))
            .await
            .unwrap();

        let created = desk.created.lock().unwrap();
        assert_eq!(created[0].organization_name, None);
    }

    #[tokio::test]
    async fn test_write_failures_become_messages() {
        let desk = MockDesk {
            existing: Some(existing_user(55)),
            fail_writes: true,
            ..Default::default()
        };

        let report = sync_api_key(&desk, &api_key(Some("Ada"), None, None))
            .await
            .unwrap();

        assert_eq!(
            report.messages,
            vec![
                "Error encountered updating user in Zendesk.".to_string(),
                "Error encountered adding premium tag in Zendesk.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_ambiguous_search_propagates() {
        let desk = MockDesk {
            ambiguous: true,
            ..Default::default()
        };

        let err = sync_api_key(&desk, &api_key(None, None, None)).await.unwrap_err();
        assert!(matches!(err, AppError::MultipleUsersFound { .. }));
    }
}
