//! Rate-limit allow-list push
//!
//! After every exemption save the full active allow-list is recomputed
//! and pushed as a single config var to the API proxy app. The platform's
//! status code is surfaced to the operator, not checked here.

use backoffice_common::clients::PlatformConfig;
use backoffice_common::errors::Result;
use std::collections::HashMap;

/// Outcome of one allow-list push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExemptPush {
    /// Raw platform response status
    pub status: u16,

    /// Number of exempt emails pushed
    pub count: usize,
}

/// Join the allow-list into the single config-var value
pub fn join_exempt(emails: &[String]) -> String {
    emails.join(";")
}

/// Push the active allow-list to the platform app's config var
pub async fn push_exempt_list(
    platform: &dyn PlatformConfig,
    app_name: &str,
    config_var: &str,
    emails: Vec<String>,
) -> Result<ExemptPush> {
    let count = emails.len();
    let value = join_exempt(&emails);

    let vars = HashMap::from([(config_var.to_string(), value)]);
    let status = platform.update_config_vars(app_name, &vars).await?;

    tracing::info!(app = app_name, count, status, "Pushed rate-limit allow-list");

    Ok(ExemptPush { status, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockPlatform {
        status: u16,
        patched: Mutex<Vec<(String, HashMap<String, String>)>>,
    }

    #[async_trait]
    impl PlatformConfig for MockPlatform {
        async fn config_vars(&self, _app_name: &str) -> Result<HashMap<String, String>> {
            Ok(HashMap::new())
        }

        async fn update_config_vars(
            &self,
            app_name: &str,
            vars: &HashMap<String, String>,
        ) -> Result<u16> {
            self.patched
                .lock()
                .unwrap()
                .push((app_name.to_string(), vars.clone()));
            Ok(self.status)
        }
    }

    #[test]
    fn test_join_exempt() {
        let emails = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        assert_eq!(join_exempt(&emails), "a@x.com;b@x.com");
        assert_eq!(join_exempt(&[]), "");
    }

    #[tokio::test]
    async fn test_push_sends_joined_list() {
        let platform = MockPlatform {
            status: 200,
            patched: Mutex::new(Vec::new()),
        };

        let emails = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let push = push_exempt_list(&platform, "openalex-api-proxy", "RATE_LIMIT_EXEMPTIONS", emails)
            .await
            .unwrap();

        assert_eq!(push, ExemptPush { status: 200, count: 2 });

        let patched = platform.patched.lock().unwrap();
        assert_eq!(patched.len(), 1);
        assert_eq!(patched[0].0, "openalex-api-proxy");
        assert_eq!(
            patched[0].1.get("RATE_LIMIT_EXEMPTIONS").map(String::as_str),
            Some("a@x.com;b@x.com")
        );
    }

    #[tokio::test]
    async fn test_push_surfaces_platform_status_unchecked() {
        let platform = MockPlatform {
            status: 503,
            patched: Mutex::new(Vec::new()),
        };

        // a failing status is reported, never an error
        let push = push_exempt_list(&platform, "app", "VAR", vec![])
            .await
            .unwrap();
        assert_eq!(push.status, 503);
        assert_eq!(push.count, 0);
    }
}
