//! Cache of the signed-in user's land parcels.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::domain::ports::{
    DocumentUploadError, DocumentUploader, LandCommand, LandRepository, LandRepositoryError,
    OwnedLandsQuery, upload_document,
};
use crate::domain::store_state::{StateCell, StoreState};
use crate::domain::{DocumentCategory, DocumentFile, Error, Land, NewLand, ParcelId, UserId};

/// Land records and registration operations.
pub struct LandStore<R: ?Sized = dyn LandRepository, U: ?Sized = dyn DocumentUploader> {
    repository: Arc<R>,
    uploader: Arc<U>,
    state: StateCell<Vec<Land>>,
}

impl<R: ?Sized, U: ?Sized> LandStore<R, U> {
    /// Create an empty store.
    pub fn new(repository: Arc<R>, uploader: Arc<U>) -> Self {
        Self {
            repository,
            uploader,
            state: StateCell::new(),
        }
    }

    /// Loaded land records, newest first.
    pub fn lands(&self) -> Vec<Land> {
        self.state.read(Clone::clone)
    }

    pub fn state(&self) -> StoreState<Vec<Land>> {
        self.state.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Vec<Land>>> {
        self.state.subscribe()
    }

    pub fn clear_error(&self) {
        self.state.clear_error();
    }
}

pub(crate) fn map_upload_error(error: DocumentUploadError) -> Error {
    match error {
        err @ DocumentUploadError::MissingConfiguration { .. } => Error::internal(err.to_string()),
        err @ DocumentUploadError::Transport { .. } => Error::service_unavailable(err.to_string()),
        err => Error::upload_failed(err.to_string()),
    }
}

impl<R, U> LandStore<R, U>
where
    R: LandRepository + ?Sized,
    U: DocumentUploader + ?Sized,
{
    fn map_repository_error(error: LandRepositoryError) -> Error {
        match error {
            LandRepositoryError::Rejected { message } => Error::invalid_request(message),
            LandRepositoryError::Connection { message } => Error::service_unavailable(message),
            err @ LandRepositoryError::Decode { .. } => Error::internal(err.to_string()),
        }
    }

    /// Replace the cache with the parcels owned by `owner`.
    pub async fn fetch_user_lands(&self, owner: &UserId) -> Result<Vec<Land>, Error> {
        let call = async {
            self.repository
                .list_by_owner(owner)
                .await
                .map_err(Self::map_repository_error)
        };
        let lands = self
            .state
            .track(call, |cached, fetched: &Vec<Land>| cached.clone_from(fetched))
            .await?;
        info!(owner_id = %owner, count = lands.len(), "fetched lands");
        Ok(lands)
    }

    /// Insert a registration and prepend it to the cache.
    pub async fn register_land(&self, land: NewLand) -> Result<Land, Error> {
        let call = async {
            self.repository
                .insert(&land)
                .await
                .map_err(Self::map_repository_error)
        };
        let stored = self
            .state
            .track(call, |cached, stored: &Land| cached.insert(0, stored.clone()))
            .await?;
        info!(land_id = %stored.id, parcel_id = %stored.parcel_id, "registered land");
        Ok(stored)
    }

    /// Host a supporting document. Failures are recorded on the store but do
    /// not toggle `loading`.
    pub async fn upload_supporting_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error> {
        match upload_document(self.uploader.as_ref(), file, owner, DocumentCategory::Supporting)
            .await
        {
            Ok(url) => Ok(url),
            Err(err) => {
                let err = map_upload_error(err);
                warn!(owner_id = %owner, error = %err, "supporting document upload failed");
                self.state.record_error(err.message());
                Err(err)
            }
        }
    }
}

impl<R, U> OwnedLandsQuery for LandStore<R, U>
where
    R: Send + Sync + ?Sized,
    U: Send + Sync + ?Sized,
{
    fn owned_parcels(&self, owner: &UserId) -> Vec<ParcelId> {
        self.state.read(|lands| {
            lands
                .iter()
                .filter(|land| &land.owner_id == owner)
                .map(|land| land.parcel_id)
                .collect()
        })
    }
}

#[async_trait]
impl<R, U> LandCommand for LandStore<R, U>
where
    R: LandRepository + ?Sized,
    U: DocumentUploader + ?Sized,
{
    async fn upload_supporting_document(
        &self,
        file: &DocumentFile,
        owner: &UserId,
    ) -> Result<String, Error> {
        LandStore::upload_supporting_document(self, file, owner).await
    }

    async fn register_land(&self, land: NewLand) -> Result<Land, Error> {
        LandStore::register_land(self, land).await
    }
}

#[cfg(test)]
mod tests {
    //! Store behaviour over a mocked repository and uploader.
    use super::*;
    use crate::domain::ports::{MockDocumentUploader, MockLandRepository};
    use crate::domain::{ErrorCode, LandId, LandStatus};
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    fn land(id: &str, parcel: i64, owner: &UserId) -> Land {
        Land {
            id: LandId::new(id),
            parcel_id: ParcelId::new(parcel).expect("parcel"),
            size: 1000.0,
            ownership_type: "Individual".to_owned(),
            supporting_document_url: Some("https://example.com/doc1.pdf".to_owned()),
            status: LandStatus::Pending,
            owner_id: owner.clone(),
            created_at: Utc
                .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                .single()
                .expect("timestamp"),
        }
    }

    #[fixture]
    fn owner() -> UserId {
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("owner")
    }

    fn store(
        repository: MockLandRepository,
        uploader: MockDocumentUploader,
    ) -> LandStore<MockLandRepository, MockDocumentUploader> {
        LandStore::new(Arc::new(repository), Arc::new(uploader))
    }

    #[rstest]
    #[tokio::test]
    async fn fetch_replaces_the_cache(owner: UserId) {
        let mut repository = MockLandRepository::new();
        let rows = vec![land("2", 222, &owner), land("1", 111, &owner)];
        let returned = rows.clone();
        repository
            .expect_list_by_owner()
            .withf(|owner| owner.as_ref() == "3fa85f64-5717-4562-b3fc-2c963f66afa6")
            .times(1)
            .return_once(move |_| Ok(returned));
        let store = store(repository, MockDocumentUploader::new());

        let fetched = store.fetch_user_lands(&owner).await.expect("fetch");

        assert_eq!(fetched, rows);
        assert_eq!(store.lands(), rows);
        assert_eq!(
            store.owned_parcels(&owner),
            vec![ParcelId::new(222).expect("parcel"), ParcelId::new(111).expect("parcel")]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn register_prepends_the_stored_row(owner: UserId) {
        let mut repository = MockLandRepository::new();
        let existing = land("1", 111, &owner);
        let stored = land("2", 222, &owner);
        let first = vec![existing.clone()];
        repository
            .expect_list_by_owner()
            .return_once(move |_| Ok(first));
        let inserted = stored.clone();
        repository
            .expect_insert()
            .withf(|new| new.parcel_id.get() == 222 && new.status == LandStatus::Pending)
            .times(1)
            .return_once(move |_| Ok(inserted));
        let store = store(repository, MockDocumentUploader::new());
        store.fetch_user_lands(&owner).await.expect("fetch");

        let new_land = NewLand::pending(
            ParcelId::new(222).expect("parcel"),
            1000.0,
            "Individual",
            "https://example.com/doc1.pdf".to_owned(),
            owner.clone(),
        )
        .expect("registration");
        store.register_land(new_land).await.expect("register");

        assert_eq!(store.lands(), vec![stored, existing]);
    }

    #[rstest]
    #[tokio::test]
    async fn repository_failures_are_recorded(owner: UserId) {
        let mut repository = MockLandRepository::new();
        repository
            .expect_list_by_owner()
            .return_once(|_| Err(LandRepositoryError::connection("Network timeout")));
        let store = store(repository, MockDocumentUploader::new());

        let err = store.fetch_user_lands(&owner).await.expect_err("fetch fails");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
        let state = store.state();
        assert_eq!(state.error.as_deref(), Some("Network timeout"));
        assert!(!state.loading);
        assert!(state.data.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn upload_failures_set_error_without_loading(owner: UserId) {
        let mut uploader = MockDocumentUploader::new();
        uploader
            .expect_upload()
            .withf(|_, folder| folder.starts_with("land-management/supporting-documents/"))
            .times(1)
            .return_once(|_, _| Err(DocumentUploadError::status("Bad Request")));
        let store = store(MockLandRepository::new(), uploader);
        let mut rx = store.subscribe();
        let file = DocumentFile::with_inferred_type("deed.pdf", b"%PDF".to_vec());

        let err = store
            .upload_supporting_document(&file, &owner)
            .await
            .expect_err("upload fails");

        assert_eq!(err.code(), ErrorCode::UploadFailed);
        assert_eq!(err.message(), "Upload failed: Bad Request");
        let state = rx.borrow_and_update().clone();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("Upload failed: Bad Request"));
    }

    #[rstest]
    fn owned_parcels_ignore_other_owners(owner: UserId) {
        let store = store(MockLandRepository::new(), MockDocumentUploader::new());
        assert!(store.owned_parcels(&owner).is_empty());
    }
}
