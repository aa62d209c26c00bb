use serde::{Deserialize, Serialize};

use crate::roles::Role;

/// Something a view may offer to the current user.
///
/// Views ask [`Role::can`] instead of re-implementing the role matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageStudents,
    ManageTrainers,
    ManageCourses,
    ManageEnrollments,
    AssignGrades,
    ViewCourseCatalog,
    ViewTeachingSchedule,
    ViewOwnGrades,
    ViewOwnSchedule,
    DownloadOwnReport,
}

const ADMIN: &[Capability] = &[
    Capability::ManageStudents,
    Capability::ManageTrainers,
    Capability::ManageCourses,
    Capability::ManageEnrollments,
    Capability::AssignGrades,
    Capability::ViewCourseCatalog,
    Capability::ViewTeachingSchedule,
    Capability::ViewOwnGrades,
    Capability::ViewOwnSchedule,
    Capability::DownloadOwnReport,
];

const TRAINER: &[Capability] = &[
    Capability::AssignGrades,
    Capability::ViewCourseCatalog,
    Capability::ViewTeachingSchedule,
];

const STUDENT: &[Capability] = &[
    Capability::ViewCourseCatalog,
    Capability::ViewOwnGrades,
    Capability::ViewOwnSchedule,
    Capability::DownloadOwnReport,
];

/// Capability set per role.
///
/// ADMIN holds every capability, matching its access to every role's routes.
pub fn capabilities_for(role: Role) -> &'static [Capability] {
    match role {
        Role::Admin => ADMIN,
        Role::Trainer => TRAINER,
        Role::Student => STUDENT,
    }
}

impl Role {
    pub fn can(&self, capability: Capability) -> bool {
        capabilities_for(*self).contains(&capability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_is_a_superset_of_every_role() {
        for role in Role::ALL {
            for cap in capabilities_for(role) {
                assert!(Role::Admin.can(*cap), "admin lacks {cap:?} held by {role}");
            }
        }
    }

    #[test]
    fn trainers_grade_and_students_do_not() {
        assert!(Role::Trainer.can(Capability::AssignGrades));
        assert!(!Role::Student.can(Capability::AssignGrades));
        assert!(!Role::Trainer.can(Capability::ManageStudents));
        assert!(Role::Student.can(Capability::DownloadOwnReport));
    }
}
