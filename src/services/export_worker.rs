//! Consumes export requests and mails the playlist as JSON
//!
//! Each message moves through parse, fetch and send. A failure at any stage
//! is logged with the stage name and the message is dropped; nothing is
//! retried or parked. Handling the same message twice sends the mail twice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    Delivery, DomainError, MailSender, MessageHandler, OutgoingMail, PlaylistRepository,
    SongSummary,
};
use crate::services::export_gateway::ExportRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Parse,
    Fetch,
    Send,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Parse => "parse",
            ExportStage::Fetch => "fetch",
            ExportStage::Send => "send",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Sent {
        playlist_id: String,
        target_email: String,
    },
    Failed {
        stage: ExportStage,
        error: DomainError,
    },
}

/// Playlist as written into `playlist.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPlaylist {
    pub id: String,
    pub name: String,
    pub songs: Vec<SongSummary>,
}

#[derive(Serialize, Deserialize)]
struct ExportDocument {
    playlist: ExportedPlaylist,
}

pub struct ExportWorker {
    playlists: Arc<dyn PlaylistRepository>,
    mailer: Arc<dyn MailSender>,
}

impl ExportWorker {
    pub fn new(playlists: Arc<dyn PlaylistRepository>, mailer: Arc<dyn MailSender>) -> Self {
        Self { playlists, mailer }
    }

    pub async fn process(&self, payload: &[u8]) -> ExportOutcome {
        let request: ExportRequest = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(e) => {
                return ExportOutcome::Failed {
                    stage: ExportStage::Parse,
                    error: DomainError::Validation(format!("malformed export message: {}", e)),
                };
            }
        };

        // Reads persistence directly; the export never goes through the cache
        let document = match self.fetch(&request.playlist_id).await {
            Ok(document) => document,
            Err(error) => {
                return ExportOutcome::Failed {
                    stage: ExportStage::Fetch,
                    error,
                };
            }
        };

        let sent = match serde_json::to_string(&document) {
            Ok(content) => {
                self.mailer
                    .send(OutgoingMail::export_playlist(&request.target_email, content))
                    .await
            }
            Err(e) => Err(DomainError::from(e)),
        };

        match sent {
            Ok(()) => ExportOutcome::Sent {
                playlist_id: request.playlist_id,
                target_email: request.target_email,
            },
            Err(error) => ExportOutcome::Failed {
                stage: ExportStage::Send,
                error,
            },
        }
    }

    async fn fetch(&self, playlist_id: &str) -> Result<ExportDocument, DomainError> {
        let header = self
            .playlists
            .find_header(playlist_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Playlist not found"))?;
        let songs = self.playlists.find_songs(playlist_id).await?;

        Ok(ExportDocument {
            playlist: ExportedPlaylist {
                id: header.id,
                name: header.name,
                songs,
            },
        })
    }
}

#[async_trait::async_trait]
impl MessageHandler for ExportWorker {
    async fn handle(&self, delivery: &Delivery) {
        if delivery.redelivered() {
            tracing::warn!(
                "Message {} delivered {} times, a duplicate mail may follow",
                delivery.id,
                delivery.attempts
            );
        }

        match self.process(&delivery.payload).await {
            ExportOutcome::Sent {
                playlist_id,
                target_email,
            } => {
                tracing::info!("Exported playlist {} to {}", playlist_id, target_email);
            }
            ExportOutcome::Failed { stage, error } => {
                tracing::error!(
                    "Export message {} dropped at {} stage: {}",
                    delivery.id,
                    stage,
                    error
                );
            }
        }
    }
}
