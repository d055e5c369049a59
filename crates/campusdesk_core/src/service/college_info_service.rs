//! College profile flow: one document, read and overwritten as a whole.

use crate::model::college_info::{CollegeInfo, COLLEGE_INFO_DOC_ID};
use crate::model::now_epoch_ms;
use crate::repo::record_repo::RecordRepository;
use crate::service::ServiceResult;
use crate::store::DocumentStore;
use log::info;

pub struct CollegeInfoService<S: DocumentStore> {
    repo: RecordRepository<S>,
    current: Option<CollegeInfo>,
}

impl<S: DocumentStore> CollegeInfoService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: RecordRepository::new(store),
            current: None,
        }
    }

    /// Fetches the profile; `None` until one has been saved.
    pub fn load(&mut self) -> ServiceResult<Option<&CollegeInfo>> {
        self.current = self.repo.get::<CollegeInfo>(COLLEGE_INFO_DOC_ID)?;
        Ok(self.current.as_ref())
    }

    pub fn current(&self) -> Option<&CollegeInfo> {
        self.current.as_ref()
    }

    /// Overwrites the profile document.
    pub fn save(&mut self, info: CollegeInfo) -> ServiceResult<CollegeInfo> {
        let mut info = info;
        info.id = COLLEGE_INFO_DOC_ID.to_string();
        info.updated_at = now_epoch_ms();
        self.repo.put(&info)?;
        info!("event=record_update module=service kind=college_info");
        self.current = Some(info.clone());
        Ok(info)
    }
}
