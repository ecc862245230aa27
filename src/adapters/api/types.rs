//! Remote API Request/Response Types
//!
//! Serialization types for the mock posts endpoint. Only `title` is
//! used when mapping to quotes; the other fields are kept so unknown
//! payloads still parse.

use serde::{Deserialize, Serialize};

/// One item of the `GET /posts` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
  /// Author id on the remote.
  #[serde(default)]
  pub user_id: Option<u64>,
  /// Remote item id.
  #[serde(default)]
  pub id: Option<u64>,
  /// Title, mapped to the quote text.
  #[serde(default)]
  pub title: Option<String>,
  /// Body, unused.
  #[serde(default)]
  pub body: Option<String>,
}

/// Payload of `POST /posts`.
#[derive(Debug, Clone, Serialize)]
pub struct NewQuoteRequest<'a> {
  /// Quote text.
  pub text: &'a str,
  /// Quote category.
  pub category: &'a str,
}

/// Response of `POST /posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedResponse {
  /// Identifier assigned by the remote.
  #[serde(default)]
  pub id: Option<u64>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_remote_post_parses_jsonplaceholder_shape() {
    let raw = r#"[{"userId":1,"id":1,"title":"sunt aut facere","body":"quia"}]"#;
    let posts: Vec<RemotePost> = serde_json::from_str(raw).unwrap();
    assert_eq!(posts[0].user_id, Some(1));
    assert_eq!(posts[0].title.as_deref(), Some("sunt aut facere"));
  }

  #[test]
  fn test_remote_post_tolerates_missing_fields() {
    let posts: Vec<RemotePost> = serde_json::from_str(r#"[{"id":4}]"#).unwrap();
    assert!(posts[0].title.is_none());
  }
}
