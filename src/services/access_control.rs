//! Playlist authorization: owner or collaborator

use std::sync::Arc;

use crate::domain::{CollaborationRepository, DomainError, PlaylistRepository};

/// Outcome of resolving a caller against a playlist, evaluated in order:
/// absent playlist first, then ownership, then collaboration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    NotFound,
    Owner,
    Collaborator,
    Denied,
}

#[derive(Clone)]
pub struct AccessControl {
    playlists: Arc<dyn PlaylistRepository>,
    collaborations: Arc<dyn CollaborationRepository>,
}

fn playlist_not_found() -> DomainError {
    DomainError::not_found("Playlist not found")
}

fn forbidden() -> DomainError {
    DomainError::forbidden("Sorry you cannot access this resource")
}

impl AccessControl {
    pub fn new(
        playlists: Arc<dyn PlaylistRepository>,
        collaborations: Arc<dyn CollaborationRepository>,
    ) -> Self {
        Self {
            playlists,
            collaborations,
        }
    }

    /// The collaborator lookup only runs once the playlist is known to
    /// exist and the caller is not its owner.
    pub async fn resolve(&self, playlist_id: &str, user_id: &str) -> Result<Access, DomainError> {
        let Some(playlist) = self.playlists.find_by_id(playlist_id).await? else {
            return Ok(Access::NotFound);
        };

        if playlist.owner == user_id {
            return Ok(Access::Owner);
        }

        if self.collaborations.exists(playlist_id, user_id).await? {
            Ok(Access::Collaborator)
        } else {
            Ok(Access::Denied)
        }
    }

    /// `NotFound` if the playlist is absent, `Forbidden` unless the caller owns it
    pub async fn verify_owner(&self, playlist_id: &str, user_id: &str) -> Result<(), DomainError> {
        let Some(playlist) = self.playlists.find_by_id(playlist_id).await? else {
            return Err(playlist_not_found());
        };

        if playlist.owner != user_id {
            return Err(forbidden());
        }
        Ok(())
    }

    /// Grants owners and collaborators. `NotFound` wins over `Forbidden`.
    pub async fn verify_access(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<Access, DomainError> {
        match self.resolve(playlist_id, user_id).await? {
            Access::NotFound => Err(playlist_not_found()),
            Access::Denied => Err(forbidden()),
            granted => Ok(granted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::services::test_support::Fixture;

    /// Collaboration lookups answered from a fixed flag, counting each call
    struct CountingCollaborations {
        member: bool,
        lookups: AtomicUsize,
    }

    impl CountingCollaborations {
        fn new(member: bool) -> Arc<Self> {
            Arc::new(Self {
                member,
                lookups: AtomicUsize::new(0),
            })
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CollaborationRepository for CountingCollaborations {
        async fn create(&self, _playlist_id: &str, _user_id: &str) -> Result<String, DomainError> {
            unreachable!("access checks never write collaborations")
        }

        async fn delete(&self, _playlist_id: &str, _user_id: &str) -> Result<(), DomainError> {
            unreachable!("access checks never write collaborations")
        }

        async fn exists(&self, _playlist_id: &str, _user_id: &str) -> Result<bool, DomainError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.member)
        }
    }

    #[tokio::test]
    async fn test_missing_playlist_skips_collaborator_lookup() {
        let fx = Fixture::new().await;
        let collaborations = CountingCollaborations::new(true);
        let access = AccessControl::new(fx.playlists.clone(), collaborations.clone());
        let stranger = fx.user("stranger").await;

        assert_eq!(
            access.resolve("playlist-missing123", &stranger).await.unwrap(),
            Access::NotFound
        );
        assert_eq!(
            access
                .verify_access("playlist-missing123", &stranger)
                .await
                .unwrap_err(),
            DomainError::not_found("Playlist not found")
        );
        assert_eq!(
            access
                .verify_owner("playlist-missing123", &stranger)
                .await
                .unwrap_err(),
            DomainError::not_found("Playlist not found")
        );
        assert_eq!(collaborations.lookups(), 0);
    }

    #[tokio::test]
    async fn test_owner_is_granted_without_collaborator_lookup() {
        let fx = Fixture::new().await;
        let collaborations = CountingCollaborations::new(false);
        let access = AccessControl::new(fx.playlists.clone(), collaborations.clone());
        let owner = fx.user("owner").await;
        let playlist = fx.playlists.create("Mine", &owner).await.unwrap();

        assert_eq!(access.verify_access(&playlist, &owner).await.unwrap(), Access::Owner);
        access.verify_owner(&playlist, &owner).await.unwrap();
        assert_eq!(collaborations.lookups(), 0);
    }

    #[tokio::test]
    async fn test_collaborator_and_stranger() {
        let fx = Fixture::new().await;
        let owner = fx.user("owner").await;
        let guest = fx.user("guest").await;
        let playlist = fx.playlists.create("Shared", &owner).await.unwrap();

        let member = CountingCollaborations::new(true);
        let access = AccessControl::new(fx.playlists.clone(), member.clone());
        assert_eq!(
            access.verify_access(&playlist, &guest).await.unwrap(),
            Access::Collaborator
        );
        assert_eq!(
            access.verify_owner(&playlist, &guest).await.unwrap_err(),
            DomainError::forbidden("Sorry you cannot access this resource")
        );
        assert_eq!(member.lookups(), 1);

        let outsider = CountingCollaborations::new(false);
        let access = AccessControl::new(fx.playlists.clone(), outsider.clone());
        assert_eq!(access.resolve(&playlist, &guest).await.unwrap(), Access::Denied);
        assert!(matches!(
            access.verify_access(&playlist, &guest).await.unwrap_err(),
            DomainError::Forbidden(_)
        ));
        assert_eq!(outsider.lookups(), 2);
    }
}
