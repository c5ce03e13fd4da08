//! Accepts export requests and hands them to the broker

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::{DomainError, MessageBroker};
use crate::services::access_control::AccessControl;

/// Message body on the export queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub playlist_id: String,
    pub target_email: String,
}

#[derive(Clone)]
pub struct ExportGateway {
    access: AccessControl,
    broker: Arc<dyn MessageBroker>,
    queue: String,
}

impl ExportGateway {
    pub fn new(access: AccessControl, broker: Arc<dyn MessageBroker>, queue: impl Into<String>) -> Self {
        Self {
            access,
            broker,
            queue: queue.into(),
        }
    }

    /// Only the owner may export. Returns once the broker has accepted the
    /// message; the mail goes out later, from the worker.
    pub async fn request_export(
        &self,
        playlist_id: &str,
        requester_id: &str,
        target_email: &str,
    ) -> Result<(), DomainError> {
        if target_email.parse::<lettre::Address>().is_err() {
            return Err(DomainError::Validation(
                "\"targetEmail\" must be a valid email".to_string(),
            ));
        }

        self.access.verify_owner(playlist_id, requester_id).await?;

        let payload = serde_json::to_vec(&ExportRequest {
            playlist_id: playlist_id.to_string(),
            target_email: target_email.to_string(),
        })?;

        self.broker.declare_queue(&self.queue).await?;
        self.broker.publish(&self.queue, &payload).await?;

        tracing::info!("Export of playlist {} queued on {}", playlist_id, self.queue);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EXPORT_PLAYLIST_QUEUE, MessageBroker};
    use crate::infrastructure::broker::DatabaseBroker;
    use crate::services::test_support::Fixture;
    use std::time::Duration;

    async fn setup() -> (Fixture, ExportGateway, Arc<DatabaseBroker>) {
        let fx = Fixture::new().await;
        let broker = Arc::new(DatabaseBroker::new(fx.db.clone(), Duration::from_secs(60)));
        let access = AccessControl::new(fx.playlists.clone(), fx.collaborations.clone());
        let gateway = ExportGateway::new(access, broker.clone(), EXPORT_PLAYLIST_QUEUE);
        (fx, gateway, broker)
    }

    #[tokio::test]
    async fn test_owner_request_is_published() {
        let (fx, gateway, broker) = setup().await;
        let owner = fx.user("owner").await;
        let playlist = fx.playlists.create("Road trip", &owner).await.unwrap();

        gateway
            .request_export(&playlist, &owner, "listener@example.com")
            .await
            .unwrap();

        let delivery = broker.receive(EXPORT_PLAYLIST_QUEUE).await.unwrap().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&delivery.payload).unwrap();
        assert_eq!(body["playlistId"], playlist.as_str());
        assert_eq!(body["targetEmail"], "listener@example.com");
    }

    #[tokio::test]
    async fn test_collaborator_cannot_export() {
        let (fx, gateway, broker) = setup().await;
        let owner = fx.user("owner").await;
        let guest = fx.user("guest").await;
        let playlist = fx.playlists.create("Road trip", &owner).await.unwrap();
        fx.collaborations.create(&playlist, &guest).await.unwrap();

        let err = gateway
            .request_export(&playlist, &guest, "guest@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
        assert_eq!(broker.pending_count(EXPORT_PLAYLIST_QUEUE).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_playlist_and_bad_email() {
        let (fx, gateway, _) = setup().await;
        let owner = fx.user("owner").await;

        let err = gateway
            .request_export("playlist-missing", &owner, "a@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        let err = gateway
            .request_export("playlist-missing", &owner, "not-an-email")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
