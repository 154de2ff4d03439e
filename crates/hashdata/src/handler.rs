//! The request handler: the one externally callable operation.
//!
//! The handler owns no state of its own. It is parameterized by a
//! [`ContentResolver`] and a [`Ledger`], both constructed once at startup and
//! shared by reference across concurrent calls.

use std::sync::Arc;

use hashdata_core::{validate_key, Data, ObjectKey};
use hashdata_store::{ContentResolver, Ledger};

use crate::error::{HandlerError, Result};

/// Fetch-or-confirm handler over a resolver and a ledger.
///
/// Each call:
/// - decodes the request envelope and applies key defaults
/// - loads the object's content
/// - records it in the ledger, which computes the digest
/// - returns the digest, plus the content unless the caller already holds it
///
/// A key is recorded on its first successful call. Every later call for that
/// key fails with [`HandlerError::AlreadyExists`], so each object can be
/// served through this path exactly once.
pub struct Handler<R, L> {
    /// Where object content comes from.
    resolver: Arc<R>,
    /// Where each served object is recorded.
    ledger: Arc<L>,
}

impl<R, L> Clone for Handler<R, L> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<R: ContentResolver, L: Ledger> Handler<R, L> {
    /// Create a handler that owns its collaborators.
    pub fn new(resolver: R, ledger: L) -> Self {
        Self::from_shared(Arc::new(resolver), Arc::new(ledger))
    }

    /// Create a handler over collaborators shared with other owners.
    pub fn from_shared(resolver: Arc<R>, ledger: Arc<L>) -> Self {
        Self { resolver, ledger }
    }

    /// Get the resolver reference.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Get the ledger reference.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle a JSON `read_data` payload and return the JSON response.
    pub async fn handle(&self, payload: &str) -> Result<String> {
        // A bare `null` payload is an empty request.
        let request: Data = serde_json::from_str::<Option<Data>>(payload)
            .map_err(HandlerError::Unmarshal)?
            .unwrap_or_default();
        let response = self.read_data(request).await?;
        serde_json::to_string(&response).map_err(HandlerError::Marshal)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed surface
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle an already-decoded request.
    ///
    /// `request.content` is ignored. `request.hash` only decides whether the
    /// response carries content; it is never stored.
    pub async fn read_data(&self, request: Data) -> Result<Data> {
        let key = request.key();
        tracing::debug!(key = %key, claimed = %request.hash, "read_data request");

        validate_key(&key).map_err(HandlerError::InvalidKey)?;

        let content = self.resolver.resolve(&key).await.map_err(|e| {
            let e = HandlerError::from(e);
            log_failure(&key, &e);
            e
        })?;

        let hash = self.ledger.record(&key, &content).await.map_err(|e| {
            let e = HandlerError::from(e);
            log_failure(&key, &e);
            e
        })?;

        tracing::info!(
            object_type = %key.object_type,
            version = %key.version,
            hash = %hash,
            bytes = content.len(),
            "recorded object"
        );

        Ok(Data::response(&key, &hash, &request.hash, &content))
    }
}

fn log_failure(key: &ObjectKey, err: &HandlerError) {
    match err {
        HandlerError::AlreadyExists(_) => tracing::warn!(key = %key, "object already recorded"),
        HandlerError::NotFound(_) => tracing::debug!(key = %key, "object not found"),
        _ => tracing::error!(key = %key, error = %err, "read_data failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashdata_core::{ErrorKind, Sha256Hash};
    use hashdata_store::{MemoryLedger, MemoryResolver};

    fn handler() -> Handler<MemoryResolver, MemoryLedger> {
        let resolver = MemoryResolver::new()
            .with_object(ObjectKey::new("guild", "2.0.0"), "{\"x\":1}")
            .with_object(ObjectKey::new("core", "1.0.0"), "{\"core\":true}");
        Handler::new(resolver, MemoryLedger::new())
    }

    #[tokio::test]
    async fn test_first_read_returns_content() {
        let handler = handler();
        let response = handler
            .handle(r#"{"type":"guild","version":"2.0.0"}"#)
            .await
            .unwrap();

        let data: Data = serde_json::from_str(&response).unwrap();
        assert_eq!(data.object_type, "guild");
        assert_eq!(data.version, "2.0.0");
        assert_eq!(data.hash, Sha256Hash::hash(b"{\"x\":1}").to_hex());
        assert_eq!(data.content, "{\"x\":1}");
    }

    #[tokio::test]
    async fn test_matching_claim_omits_content() {
        let handler = handler();
        let claim = Sha256Hash::hash(b"{\"x\":1}").to_hex();
        let payload = format!(r#"{{"type":"guild","version":"2.0.0","hash":"{claim}"}}"#);

        let data: Data = serde_json::from_str(&handler.handle(&payload).await.unwrap()).unwrap();
        assert_eq!(data.hash, claim);
        assert_eq!(data.content, "");
    }

    #[tokio::test]
    async fn test_stale_claim_returns_content() {
        let handler = handler();
        let request = Data {
            object_type: "guild".into(),
            version: "2.0.0".into(),
            hash: Sha256Hash::hash(b"{\"x\":0}").to_hex(),
            content: "ignored".into(),
        };

        let data = handler.read_data(request).await.unwrap();
        assert_eq!(data.content, "{\"x\":1}");
    }

    #[tokio::test]
    async fn test_defaults_apply_before_resolution() {
        let handler = handler();
        let data = handler.read_data(Data::default()).await.unwrap();
        assert_eq!(data.object_type, "core");
        assert_eq!(data.version, "1.0.0");

        let row = handler
            .ledger()
            .get(&ObjectKey::new("core", "1.0.0"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.hash.to_hex(), data.hash);
    }

    #[tokio::test]
    async fn test_null_fields_take_defaults() {
        let handler = handler();
        let response = handler
            .handle(r#"{"type":null,"version":null,"hash":null}"#)
            .await
            .unwrap();

        let data: Data = serde_json::from_str(&response).unwrap();
        assert_eq!(data.object_type, "core");
        assert_eq!(data.version, "1.0.0");
        assert_eq!(data.content, "{\"core\":true}");
    }

    #[tokio::test]
    async fn test_null_payload_is_empty_request() {
        let handler = handler();
        let data: Data = serde_json::from_str(&handler.handle("null").await.unwrap()).unwrap();
        assert_eq!(data.key(), ObjectKey::new("core", "1.0.0"));
        assert_eq!(handler.ledger().len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_second_read_already_exists() {
        let handler = handler();
        let payload = r#"{"type":"guild","version":"2.0.0"}"#;

        handler.handle(payload).await.unwrap();
        let err = handler.handle(payload).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        let key = ObjectKey::new("guild", "2.0.0");
        assert_eq!(handler.ledger().count(&key).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let handler = handler();
        let err = handler.handle("{not json").await.unwrap_err();
        assert!(matches!(err, HandlerError::Unmarshal(_)));
        assert_eq!(handler.ledger().len().await.unwrap(), 0);

        let err = handler.handle(r#"{"type":7}"#).await.unwrap_err();
        assert!(matches!(err, HandlerError::Unmarshal(_)));
    }

    #[tokio::test]
    async fn test_missing_object_records_nothing() {
        let handler = handler();
        let err = handler
            .handle(r#"{"type":"guild","version":"9.9.9"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, HandlerError::NotFound(_)));
        assert_eq!(handler.ledger().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let handler = handler();
        let err = handler
            .handle(r#"{"type":"..","version":"passwd"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert!(matches!(err, HandlerError::InvalidKey(_)));
    }
}
