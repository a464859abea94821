//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod course;
mod instructor;
mod permission;
mod privileges;
mod role;

pub use course::{COURSE_ID_MAX_LENGTH, CourseId};
pub use instructor::{EMAIL_MAX_LENGTH, EmailAddress};
pub use permission::{InstructorPermission, InstructorPermissionKey};
pub use privileges::{InstructorPrivileges, Privilege, PrivilegeScope, PrivilegeTarget};
pub use role::InstructorRole;
