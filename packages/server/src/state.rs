use std::sync::Arc;

use common::storage::BlobStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::grievance::{DashboardAggregator, GrievanceStateMachine, GrievanceStore};
use crate::officer::{OfficerDirectory, ProfileUpdater, SessionAuthenticator};
use crate::store::StorePolicy;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub policy: StorePolicy,
    pub photos: Arc<dyn BlobStore>,
}

impl AppState {
    pub fn grievance_store(&self) -> GrievanceStore<'_, DatabaseConnection> {
        GrievanceStore::new(&self.db, &self.policy)
    }

    pub fn officers(&self) -> OfficerDirectory<'_, DatabaseConnection> {
        OfficerDirectory::new(&self.db, &self.policy)
    }

    pub fn grievances(&self) -> GrievanceStateMachine<'_, DatabaseConnection> {
        GrievanceStateMachine::new(self.grievance_store(), self.officers())
    }

    pub fn dashboard(&self) -> DashboardAggregator<'_, DatabaseConnection> {
        DashboardAggregator::new(self.grievance_store())
    }

    pub fn sessions(&self) -> SessionAuthenticator<'_, DatabaseConnection> {
        SessionAuthenticator::new(self.officers(), &self.config.auth)
    }

    pub fn profiles(&self) -> ProfileUpdater<'_, DatabaseConnection> {
        ProfileUpdater::new(self.officers(), &*self.photos)
    }
}
