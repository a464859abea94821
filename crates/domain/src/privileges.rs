//! Instructor privilege flags and their scoped resolution rules.
//!
//! Privileges resolve from the most specific scope available: a session
//! override wins over a section override, which wins over the course flag.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tutorium_core::{AppError, AppResult, NonEmptyString};

use crate::InstructorRole;

/// Scope at which a privilege value may be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivilegeScope {
    /// Whole-course flag.
    Course,
    /// Override for one section.
    Section,
    /// Override for one session inside one section.
    Session,
}

/// Fine-grained instructor privileges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Privilege {
    /// Allows editing course details and deleting the course.
    #[serde(rename = "canmodifycourse")]
    ModifyCourse,
    /// Allows adding, editing and removing instructors.
    #[serde(rename = "canmodifyinstructor")]
    ModifyInstructor,
    /// Allows creating and editing sessions.
    #[serde(rename = "canmodifysession")]
    ModifySession,
    /// Allows enrolling and editing students.
    #[serde(rename = "canmodifystudent")]
    ModifyStudent,
    /// Allows viewing student details in a section.
    #[serde(rename = "canviewstudentinsection")]
    ViewStudentInSection,
    /// Allows viewing session results in a section.
    #[serde(rename = "canviewsessioninsection")]
    ViewSessionInSection,
    /// Allows submitting sessions on behalf of a section.
    #[serde(rename = "cansubmitsessioninsection")]
    SubmitSessionInSection,
    /// Allows moderating session comments in a section.
    #[serde(rename = "canmodifysessioncommentinsection")]
    ModifySessionCommentInSection,
}

impl Privilege {
    /// Returns a stable storage value for this privilege.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModifyCourse => "canmodifycourse",
            Self::ModifyInstructor => "canmodifyinstructor",
            Self::ModifySession => "canmodifysession",
            Self::ModifyStudent => "canmodifystudent",
            Self::ViewStudentInSection => "canviewstudentinsection",
            Self::ViewSessionInSection => "canviewsessioninsection",
            Self::SubmitSessionInSection => "cansubmitsessioninsection",
            Self::ModifySessionCommentInSection => "canmodifysessioncommentinsection",
        }
    }

    /// Returns all known privileges.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Privilege] = &[
            Privilege::ModifyCourse,
            Privilege::ModifyInstructor,
            Privilege::ModifySession,
            Privilege::ModifyStudent,
            Privilege::ViewStudentInSection,
            Privilege::ViewSessionInSection,
            Privilege::SubmitSessionInSection,
            Privilege::ModifySessionCommentInSection,
        ];

        ALL
    }

    /// Returns whether this privilege can be recorded at the given scope.
    #[must_use]
    pub fn supports_scope(&self, scope: PrivilegeScope) -> bool {
        match scope {
            PrivilegeScope::Course => true,
            PrivilegeScope::Section => matches!(
                self,
                Self::ViewStudentInSection
                    | Self::ViewSessionInSection
                    | Self::SubmitSessionInSection
                    | Self::ModifySessionCommentInSection
            ),
            PrivilegeScope::Session => matches!(
                self,
                Self::ViewSessionInSection
                    | Self::SubmitSessionInSection
                    | Self::ModifySessionCommentInSection
            ),
        }
    }

    fn granted_to(&self, role: InstructorRole) -> bool {
        match role {
            InstructorRole::CoOwner => true,
            InstructorRole::Manager => !matches!(self, Self::ModifyCourse),
            InstructorRole::Observer => {
                matches!(self, Self::ViewStudentInSection | Self::ViewSessionInSection)
            }
            InstructorRole::Tutor => matches!(
                self,
                Self::ViewStudentInSection
                    | Self::ViewSessionInSection
                    | Self::SubmitSessionInSection
            ),
            InstructorRole::Custom => false,
        }
    }
}

impl Display for Privilege {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|privilege| privilege.as_str() == value.trim())
            .ok_or_else(|| AppError::InvalidParameters(format!("unknown privilege '{value}'")))
    }
}

/// Where a privilege check applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegeTarget {
    /// The course as a whole.
    Course,
    /// One section of the course.
    Section {
        /// Section name.
        section: String,
    },
    /// One session as seen from one section.
    Session {
        /// Section name.
        section: String,
        /// Session name.
        session: String,
    },
}

/// Privilege set attached to an instructor permission record.
///
/// Decoding replays every entry through the validating setters, so a stored
/// payload can never hold an override at a scope its privilege does not
/// support, or under a blank section or session name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "InstructorPrivilegesPayload")]
pub struct InstructorPrivileges {
    course_level: BTreeMap<Privilege, bool>,
    #[serde(default)]
    section_level: BTreeMap<String, BTreeMap<Privilege, bool>>,
    #[serde(default)]
    session_level: BTreeMap<String, BTreeMap<String, BTreeMap<Privilege, bool>>>,
}

impl InstructorPrivileges {
    /// Returns the default privileges implied by a role.
    #[must_use]
    pub fn for_role(role: InstructorRole) -> Self {
        Self {
            course_level: Privilege::all()
                .iter()
                .map(|privilege| (*privilege, privilege.granted_to(role)))
                .collect(),
            section_level: BTreeMap::new(),
            session_level: BTreeMap::new(),
        }
    }

    /// Sets a course-level privilege.
    pub fn set_course_privilege(&mut self, privilege: Privilege, allowed: bool) {
        self.course_level.insert(privilege, allowed);
    }

    /// Sets a section-level override.
    pub fn set_section_privilege(
        &mut self,
        section: &str,
        privilege: Privilege,
        allowed: bool,
    ) -> AppResult<()> {
        ensure_scope(privilege, PrivilegeScope::Section)?;
        let section = scope_name("section", section)?;

        self.section_level
            .entry(section)
            .or_default()
            .insert(privilege, allowed);
        Ok(())
    }

    /// Sets a session-level override inside a section.
    pub fn set_session_privilege(
        &mut self,
        section: &str,
        session: &str,
        privilege: Privilege,
        allowed: bool,
    ) -> AppResult<()> {
        ensure_scope(privilege, PrivilegeScope::Session)?;
        let section = scope_name("section", section)?;
        let session = scope_name("session", session)?;

        self.session_level
            .entry(section)
            .or_default()
            .entry(session)
            .or_default()
            .insert(privilege, allowed);
        Ok(())
    }

    /// Removes every override recorded for a section, including its sessions.
    ///
    /// Returns whether anything was removed.
    pub fn remove_section_overrides(&mut self, section: &str) -> bool {
        let section = section.trim();
        let removed_section = self.section_level.remove(section).is_some();
        let removed_sessions = self.session_level.remove(section).is_some();
        removed_section || removed_sessions
    }

    /// Removes the overrides recorded for one session in a section.
    ///
    /// Returns whether anything was removed.
    pub fn remove_session_overrides(&mut self, section: &str, session: &str) -> bool {
        let section = section.trim();
        let Some(sessions) = self.session_level.get_mut(section) else {
            return false;
        };

        let removed = sessions.remove(session.trim()).is_some();
        if sessions.is_empty() {
            self.session_level.remove(section);
        }
        removed
    }

    /// Returns the course-level value of a privilege.
    #[must_use]
    pub fn is_allowed_for_course(&self, privilege: Privilege) -> bool {
        self.course_level.get(&privilege).copied().unwrap_or(false)
    }

    /// Resolves a privilege for a section, falling back to the course flag.
    #[must_use]
    pub fn is_allowed_in_section(&self, section: &str, privilege: Privilege) -> bool {
        self.section_level
            .get(section.trim())
            .and_then(|privileges| privileges.get(&privilege))
            .copied()
            .unwrap_or_else(|| self.is_allowed_for_course(privilege))
    }

    /// Resolves a privilege for a session, falling back to the section and
    /// then the course.
    #[must_use]
    pub fn is_allowed_in_session(
        &self,
        section: &str,
        session: &str,
        privilege: Privilege,
    ) -> bool {
        self.session_level
            .get(section.trim())
            .and_then(|sessions| sessions.get(session.trim()))
            .and_then(|privileges| privileges.get(&privilege))
            .copied()
            .unwrap_or_else(|| self.is_allowed_in_section(section, privilege))
    }

    /// Resolves a privilege for any target.
    #[must_use]
    pub fn is_allowed(&self, privilege: Privilege, target: &PrivilegeTarget) -> bool {
        match target {
            PrivilegeTarget::Course => self.is_allowed_for_course(privilege),
            PrivilegeTarget::Section { section } => self.is_allowed_in_section(section, privilege),
            PrivilegeTarget::Session { section, session } => {
                self.is_allowed_in_session(section, session, privilege)
            }
        }
    }

    /// Returns the privileges granted at course level.
    pub fn granted_course_privileges(&self) -> impl Iterator<Item = Privilege> + '_ {
        self.course_level
            .iter()
            .filter_map(|(privilege, allowed)| allowed.then_some(*privilege))
    }

    /// Returns section names that carry overrides.
    pub fn sections_with_overrides(&self) -> impl Iterator<Item = &str> + '_ {
        let mut sections: Vec<&str> = self
            .section_level
            .keys()
            .chain(self.session_level.keys())
            .map(String::as_str)
            .collect();
        sections.sort_unstable();
        sections.dedup();
        sections.into_iter()
    }
}

#[derive(Deserialize)]
struct InstructorPrivilegesPayload {
    #[serde(default)]
    course_level: BTreeMap<Privilege, bool>,
    #[serde(default)]
    section_level: BTreeMap<String, BTreeMap<Privilege, bool>>,
    #[serde(default)]
    session_level: BTreeMap<String, BTreeMap<String, BTreeMap<Privilege, bool>>>,
}

impl TryFrom<InstructorPrivilegesPayload> for InstructorPrivileges {
    type Error = AppError;

    fn try_from(payload: InstructorPrivilegesPayload) -> Result<Self, Self::Error> {
        let mut privileges = Self {
            course_level: Privilege::all()
                .iter()
                .map(|privilege| (*privilege, false))
                .collect(),
            section_level: BTreeMap::new(),
            session_level: BTreeMap::new(),
        };

        for (privilege, allowed) in payload.course_level {
            privileges.set_course_privilege(privilege, allowed);
        }
        for (section, flags) in payload.section_level {
            for (privilege, allowed) in flags {
                privileges.set_section_privilege(&section, privilege, allowed)?;
            }
        }
        for (section, sessions) in payload.session_level {
            for (session, flags) in sessions {
                for (privilege, allowed) in flags {
                    privileges.set_session_privilege(&section, &session, privilege, allowed)?;
                }
            }
        }

        Ok(privileges)
    }
}

fn ensure_scope(privilege: Privilege, scope: PrivilegeScope) -> AppResult<()> {
    if privilege.supports_scope(scope) {
        return Ok(());
    }

    Err(AppError::InvalidParameters(format!(
        "privilege '{privilege}' cannot be set at {} level",
        match scope {
            PrivilegeScope::Course => "course",
            PrivilegeScope::Section => "section",
            PrivilegeScope::Session => "session",
        }
    )))
}

fn scope_name(kind: &str, value: &str) -> AppResult<String> {
    NonEmptyString::new(value)
        .map(String::from)
        .map_err(|_| AppError::InvalidParameters(format!("{kind} name must not be empty")))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;
    use tutorium_core::AppError;

    use super::{InstructorPrivileges, Privilege, PrivilegeScope, PrivilegeTarget};
    use crate::InstructorRole;

    #[test]
    fn co_owner_holds_every_privilege() {
        let privileges = InstructorPrivileges::for_role(InstructorRole::CoOwner);
        assert!(
            Privilege::all()
                .iter()
                .all(|privilege| privileges.is_allowed_for_course(*privilege))
        );
    }

    #[test]
    fn manager_cannot_modify_course() {
        let privileges = InstructorPrivileges::for_role(InstructorRole::Manager);
        assert!(!privileges.is_allowed_for_course(Privilege::ModifyCourse));
        assert!(privileges.is_allowed_for_course(Privilege::ModifyInstructor));
        assert_eq!(privileges.granted_course_privileges().count(), 7);
    }

    #[test]
    fn observer_and_tutor_defaults() {
        let observer = InstructorPrivileges::for_role(InstructorRole::Observer);
        assert_eq!(
            observer.granted_course_privileges().collect::<Vec<_>>(),
            vec![
                Privilege::ViewStudentInSection,
                Privilege::ViewSessionInSection
            ]
        );

        let tutor = InstructorPrivileges::for_role(InstructorRole::Tutor);
        assert!(tutor.is_allowed_for_course(Privilege::SubmitSessionInSection));
        assert!(!tutor.is_allowed_for_course(Privilege::ModifySessionCommentInSection));
    }

    #[test]
    fn custom_role_starts_empty() {
        let privileges = InstructorPrivileges::for_role(InstructorRole::Custom);
        assert_eq!(privileges.granted_course_privileges().count(), 0);
    }

    #[test]
    fn same_role_builds_equal_privileges() {
        assert_eq!(
            InstructorPrivileges::for_role(InstructorRole::Manager),
            InstructorPrivileges::for_role(InstructorRole::Manager)
        );
        assert_ne!(
            InstructorPrivileges::for_role(InstructorRole::Manager),
            InstructorPrivileges::for_role(InstructorRole::CoOwner)
        );
    }

    #[test]
    fn section_override_beats_course_flag() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::Observer);
        let result =
            privileges.set_section_privilege("Section A", Privilege::ViewStudentInSection, false);
        assert!(result.is_ok());

        assert!(!privileges.is_allowed_in_section("Section A", Privilege::ViewStudentInSection));
        assert!(privileges.is_allowed_in_section("Section B", Privilege::ViewStudentInSection));
    }

    #[test]
    fn session_override_beats_section_override() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::Tutor);
        assert!(
            privileges
                .set_section_privilege("Section A", Privilege::SubmitSessionInSection, false)
                .is_ok()
        );
        assert!(
            privileges
                .set_session_privilege(
                    "Section A",
                    "Week 1",
                    Privilege::SubmitSessionInSection,
                    true
                )
                .is_ok()
        );

        assert!(privileges.is_allowed_in_session(
            "Section A",
            "Week 1",
            Privilege::SubmitSessionInSection
        ));
        assert!(!privileges.is_allowed_in_session(
            "Section A",
            "Week 2",
            Privilege::SubmitSessionInSection
        ));
        assert!(privileges.is_allowed(
            Privilege::SubmitSessionInSection,
            &PrivilegeTarget::Section {
                section: "Section B".to_owned()
            }
        ));
    }

    #[test]
    fn course_only_privileges_reject_scoped_overrides() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::Manager);

        let section = privileges.set_section_privilege("A", Privilege::ModifyCourse, true);
        assert!(matches!(section, Err(AppError::InvalidParameters(_))));

        let session =
            privileges.set_session_privilege("A", "Week 1", Privilege::ViewStudentInSection, true);
        assert!(matches!(session, Err(AppError::InvalidParameters(_))));

        let blank = privileges.set_section_privilege("  ", Privilege::ViewSessionInSection, true);
        assert!(matches!(blank, Err(AppError::InvalidParameters(_))));
    }

    #[test]
    fn removing_section_drops_its_sessions() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::CoOwner);
        assert!(
            privileges
                .set_session_privilege("A", "Week 1", Privilege::ViewSessionInSection, false)
                .is_ok()
        );
        assert_eq!(privileges.sections_with_overrides().collect::<Vec<_>>(), vec!["A"]);

        assert!(privileges.remove_section_overrides("A"));
        assert!(!privileges.remove_section_overrides("A"));
        assert_eq!(
            privileges,
            InstructorPrivileges::for_role(InstructorRole::CoOwner)
        );
    }

    #[test]
    fn removing_last_session_cleans_up_section_entry() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::Tutor);
        assert!(
            privileges
                .set_session_privilege("A", "Week 1", Privilege::ViewSessionInSection, false)
                .is_ok()
        );

        assert!(privileges.remove_session_overrides("A", "Week 1"));
        assert!(!privileges.remove_session_overrides("A", "Week 1"));
        assert_eq!(privileges.sections_with_overrides().count(), 0);
    }

    #[test]
    fn serializes_privileges_with_storage_names() {
        let mut privileges = InstructorPrivileges::for_role(InstructorRole::Observer);
        assert!(
            privileges
                .set_section_privilege("A", Privilege::ViewStudentInSection, false)
                .is_ok()
        );

        let json = serde_json::to_value(&privileges).unwrap_or_else(|_| unreachable!());
        assert_eq!(json["course_level"]["canviewstudentinsection"], true);
        assert_eq!(json["course_level"]["canmodifycourse"], false);
        assert_eq!(json["section_level"]["A"]["canviewstudentinsection"], false);

        let restored: InstructorPrivileges =
            serde_json::from_value(json).unwrap_or_else(|_| unreachable!());
        assert_eq!(restored, privileges);
    }

    #[test]
    fn decoding_rejects_overrides_the_setters_would_refuse() {
        let course_only_in_section = serde_json::json!({
            "course_level": {},
            "section_level": { "A": { "canmodifycourse": true } }
        });
        assert!(serde_json::from_value::<InstructorPrivileges>(course_only_in_section).is_err());

        let blank_section = serde_json::json!({
            "course_level": {},
            "section_level": { "  ": { "canviewstudentinsection": true } }
        });
        assert!(serde_json::from_value::<InstructorPrivileges>(blank_section).is_err());

        let section_only_in_session = serde_json::json!({
            "course_level": {},
            "session_level": { "A": { "Week 1": { "canviewstudentinsection": true } } }
        });
        assert!(serde_json::from_value::<InstructorPrivileges>(section_only_in_session).is_err());
    }

    #[test]
    fn decoding_fills_missing_course_flags_with_false() {
        let partial = serde_json::json!({
            "section_level": { "A": { "canviewstudentinsection": true } }
        });
        let decoded: InstructorPrivileges =
            serde_json::from_value(partial).unwrap_or_else(|_| unreachable!());

        assert!(
            Privilege::all()
                .iter()
                .all(|privilege| !decoded.is_allowed_for_course(*privilege))
        );
        assert!(decoded.is_allowed_in_section("A", Privilege::ViewStudentInSection));
        assert_eq!(
            serde_json::to_value(&decoded).unwrap_or_else(|_| unreachable!())["course_level"]
                ["canmodifycourse"],
            false
        );
    }

    #[test]
    fn unknown_privilege_is_rejected() {
        assert!(Privilege::from_str("canfly").is_err());
        assert_eq!(
            Privilege::from_str("canmodifystudent").ok(),
            Some(Privilege::ModifyStudent)
        );
        assert_eq!(
            Privilege::from_str("  canviewsessioninsection\n").ok(),
            Some(Privilege::ViewSessionInSection)
        );
    }

    fn any_role() -> impl Strategy<Value = InstructorRole> {
        prop::sample::select(InstructorRole::all().to_vec())
    }

    fn section_privilege() -> impl Strategy<Value = Privilege> {
        prop::sample::select(
            Privilege::all()
                .iter()
                .copied()
                .filter(|privilege| privilege.supports_scope(PrivilegeScope::Section))
                .collect::<Vec<_>>(),
        )
    }

    proptest! {
        #[test]
        fn unrelated_sections_fall_back_to_course_flag(
            role in any_role(),
            privilege in section_privilege(),
            allowed in any::<bool>(),
        ) {
            let mut privileges = InstructorPrivileges::for_role(role);
            prop_assert!(privileges.set_section_privilege("A", privilege, allowed).is_ok());

            prop_assert_eq!(privileges.is_allowed_in_section("A", privilege), allowed);
            prop_assert_eq!(
                privileges.is_allowed_in_section("B", privilege),
                privileges.is_allowed_for_course(privilege)
            );
            prop_assert_eq!(
                privileges.is_allowed_in_session("A", "any session", privilege),
                allowed
            );
        }
    }
}
