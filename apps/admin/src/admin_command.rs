use std::str::FromStr;

use serde::Serialize;

use tutorium_application::{InstructorPermissionService, UpdateInstructorPermissionInput};
use tutorium_core::{AppError, AppResult};
use tutorium_domain::{InstructorPrivileges, InstructorRole, Privilege, PrivilegeTarget};

pub const USAGE: &str = "\
usage: tutorium-admin <command>

commands:
  migrate
  grant <course-id> <email> <role>
  show <course-id> <email>
  list-course <course-id>
  list-email <email>
  set-role <course-id> <email> <role>
  revoke <course-id> <email>
  revoke-course <course-id>
  check <course-id> <email> <privilege> [section [session]]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    Migrate,
    Grant {
        course_id: String,
        email: String,
        role: InstructorRole,
    },
    Show {
        course_id: String,
        email: String,
    },
    ListCourse {
        course_id: String,
    },
    ListEmail {
        email: String,
    },
    SetRole {
        course_id: String,
        email: String,
        role: InstructorRole,
    },
    Revoke {
        course_id: String,
        email: String,
    },
    RevokeCourse {
        course_id: String,
    },
    Check {
        course_id: String,
        email: String,
        privilege: Privilege,
        target: PrivilegeTarget,
    },
}

impl AdminCommand {
    pub fn parse(args: &[String]) -> AppResult<Self> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match args.as_slice() {
            ["migrate"] => Ok(Self::Migrate),
            ["grant", course_id, email, role] => Ok(Self::Grant {
                course_id: (*course_id).to_owned(),
                email: (*email).to_owned(),
                role: InstructorRole::from_str(role)?,
            }),
            ["show", course_id, email] => Ok(Self::Show {
                course_id: (*course_id).to_owned(),
                email: (*email).to_owned(),
            }),
            ["list-course", course_id] => Ok(Self::ListCourse {
                course_id: (*course_id).to_owned(),
            }),
            ["list-email", email] => Ok(Self::ListEmail {
                email: (*email).to_owned(),
            }),
            ["set-role", course_id, email, role] => Ok(Self::SetRole {
                course_id: (*course_id).to_owned(),
                email: (*email).to_owned(),
                role: InstructorRole::from_str(role)?,
            }),
            ["revoke", course_id, email] => Ok(Self::Revoke {
                course_id: (*course_id).to_owned(),
                email: (*email).to_owned(),
            }),
            ["revoke-course", course_id] => Ok(Self::RevokeCourse {
                course_id: (*course_id).to_owned(),
            }),
            ["check", course_id, email, privilege, scope @ ..] if scope.len() <= 2 => {
                let target = match scope {
                    [] => PrivilegeTarget::Course,
                    [section] => PrivilegeTarget::Section {
                        section: (*section).to_owned(),
                    },
                    [section, session, ..] => PrivilegeTarget::Session {
                        section: (*section).to_owned(),
                        session: (*session).to_owned(),
                    },
                };

                Ok(Self::Check {
                    course_id: (*course_id).to_owned(),
                    email: (*email).to_owned(),
                    privilege: Privilege::from_str(privilege)?,
                    target,
                })
            }
            _ => Err(AppError::InvalidParameters(USAGE.to_owned())),
        }
    }

    /// Runs a command against the service and returns the text to print.
    pub async fn execute(self, service: &InstructorPermissionService) -> AppResult<String> {
        match self {
            Self::Migrate => Ok("migrations applied".to_owned()),
            Self::Grant {
                course_id,
                email,
                role,
            } => {
                let created = service
                    .add_instructor_permission(
                        course_id.as_str(),
                        email.as_str(),
                        role,
                        InstructorPrivileges::for_role(role),
                    )
                    .await?;
                render(&created)
            }
            Self::Show { course_id, email } => {
                match service
                    .get_instructor_permission_for_email(course_id.as_str(), email.as_str())
                    .await?
                {
                    Some(permission) => render(&permission),
                    None => Ok(format!("no instructor permission for {email}, {course_id}")),
                }
            }
            Self::ListCourse { course_id } => render(
                &service
                    .get_instructor_permissions_for_course(course_id.as_str())
                    .await?,
            ),
            Self::ListEmail { email } => render(
                &service
                    .get_instructor_permissions_for_email(email.as_str())
                    .await?,
            ),
            Self::SetRole {
                course_id,
                email,
                role,
            } => {
                let updated = service
                    .update_instructor_permission_by_email(
                        course_id.as_str(),
                        email.as_str(),
                        UpdateInstructorPermissionInput {
                            role: Some(role),
                            privileges: None,
                        },
                    )
                    .await?;
                render(&updated)
            }
            Self::Revoke { course_id, email } => {
                let removed = service
                    .delete_instructor_permission(course_id.as_str(), email.as_str())
                    .await?;
                Ok(if removed {
                    format!("revoked {email}, {course_id}")
                } else {
                    format!("nothing to revoke for {email}, {course_id}")
                })
            }
            Self::RevokeCourse { course_id } => {
                let removed = service
                    .delete_instructor_permissions_for_course(course_id.as_str())
                    .await?;
                Ok(format!("revoked {removed} permission(s) in {course_id}"))
            }
            Self::Check {
                course_id,
                email,
                privilege,
                target,
            } => {
                let allowed = service
                    .is_instructor_allowed(course_id.as_str(), email.as_str(), privilege, &target)
                    .await?;
                Ok(if allowed { "allowed" } else { "denied" }.to_owned())
            }
        }
    }
}

fn render<T: Serialize + ?Sized>(value: &T) -> AppResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|error| AppError::Internal(format!("failed to render output: {error}")))
}
