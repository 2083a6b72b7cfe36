//! Endpoint probing.
//!
//! The backend's profile route is not fixed, so reads and updates walk an
//! ordered list of candidate URLs until one answers with JSON.
//!
//! # Design Decisions
//! - 404 and transport failures move on to the next candidate
//! - Any other non-2xx stops probing: the route exists and refused us
//! - A 2xx without a JSON body is treated like a miss

use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use crate::api::fetch::{read_json, HttpFetcher};
use crate::auth::Role;
use crate::error::{ClientError, Result};
use crate::observability::metrics;

/// Expand `{base}`, `{role}` and `{id}` in each template.
///
/// Templates that need `{id}` are skipped when no id is known.
pub fn expand_templates(templates: &[String], base: &str, role: Role, id: Option<&str>) -> Vec<String> {
    let base = base.trim_end_matches('/');
    let id = id.filter(|i| !i.is_empty());

    templates
        .iter()
        .filter_map(|template| {
            let expanded = template
                .replace("{base}", base)
                .replace("{role}", role.as_str());
            match (expanded.contains("{id}"), id) {
                (false, _) => Some(expanded),
                (true, Some(id)) => Some(expanded.replace("{id}", id)),
                (true, None) => None,
            }
        })
        .collect()
}

/// Try each candidate in order and return the first `(url, json)` hit.
///
/// `build` turns a candidate URL into a request. `fallback` is the error
/// message used when a refusing endpoint sends none. When every candidate
/// misses, the last error is returned.
pub async fn probe_json<F>(
    fetcher: &HttpFetcher,
    operation: &'static str,
    candidates: &[String],
    fallback: &str,
    build: F,
) -> Result<(String, Value)>
where
    F: Fn(&str) -> RequestBuilder,
{
    if candidates.is_empty() {
        return Err(ClientError::NoCandidates(operation));
    }

    let mut last_error = None;

    for (i, url) in candidates.iter().enumerate() {
        let outcome = match build(url).build() {
            Ok(request) => match fetcher.execute(request).await {
                Ok(response) if response.status() == StatusCode::NOT_FOUND => {
                    Err(ClientError::Status {
                        status: 404,
                        message: format!("Not found: {url}"),
                    })
                }
                Ok(response) => read_json(url, response, fallback).await,
                Err(e) => Err(e),
            },
            Err(e) => Err(ClientError::from_reqwest(url, e)),
        };

        match outcome {
            Ok(json) => {
                metrics::record_probe_candidate(operation, "hit");
                tracing::info!(operation, candidate_idx = i, url = %url, "Endpoint answered");
                return Ok((url.clone(), json));
            }
            Err(e) if e.status().is_some_and(|s| s != 404) => {
                metrics::record_probe_candidate(operation, "rejected");
                tracing::warn!(operation, candidate_idx = i, url = %url, error = %e, "Endpoint rejected request");
                return Err(e);
            }
            Err(e) => {
                metrics::record_probe_candidate(operation, "miss");
                tracing::warn!(
                    operation,
                    candidate_idx = i,
                    url = %url,
                    error = %e,
                    "Endpoint candidate failed, trying next"
                );
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or(ClientError::NoCandidates(operation)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;

    #[test]
    fn test_expand_read_templates() {
        let defaults = EndpointConfig::default();
        let urls = expand_templates(&defaults.profile_read, "http://h/api/", Role::Scout, Some("7"));
        assert_eq!(
            urls,
            vec![
                "http://h/api/scout/profile",
                "http://h/api/scout/profile/7",
                "http://h/api/scouts/7",
                "http://h/api/users/7",
            ]
        );
    }

    #[test]
    fn test_expand_skips_id_templates_without_id() {
        let defaults = EndpointConfig::default();
        let urls = expand_templates(&defaults.profile_update, "http://h/api", Role::Coach, None);
        assert_eq!(
            urls,
            vec!["http://h/api/coach/profile", "http://h/api/coach/update-profile"]
        );
        let urls = expand_templates(&defaults.profile_read, "http://h/api", Role::Coach, Some(""));
        assert_eq!(urls, vec!["http://h/api/coach/profile"]);
    }

    #[tokio::test]
    async fn test_empty_candidates_is_config_error() {
        let fetcher = HttpFetcher::new(&Default::default()).unwrap();
        let client = fetcher.client().clone();
        let err = probe_json(&fetcher, "profile_read", &[], "Request failed", |url| client.get(url))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NoCandidates("profile_read")));
    }
}
