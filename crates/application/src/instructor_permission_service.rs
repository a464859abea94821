use std::sync::Arc;

use crate::InstructorPermissionRepository;

mod grants;
mod lookup;


/// Application service for instructor permission workflows.
#[derive(Clone)]
pub struct InstructorPermissionService {
    repository: Arc<dyn InstructorPermissionRepository>,
}

impl InstructorPermissionService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn InstructorPermissionRepository>) -> Self {
        Self { repository }
    }
}
