//! Application services and ports.

#![forbid(unsafe_code)]

mod instructor_permission_ports;
mod instructor_permission_service;

pub use instructor_permission_ports::{
    InstructorPermissionRepository, UpdateInstructorPermissionInput, permission_already_exists,
    permission_not_found,
};
pub use instructor_permission_service::InstructorPermissionService;
