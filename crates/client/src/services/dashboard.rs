//! Per-role landing summaries, assembled from several services at once.

use chrono::NaiveDate;

use academia_academics::{Course, Enrollment, Grade, ScheduledSession, compute_gpa, gpa_progress, upcoming_schedule};
use academia_auth::{AuthzError, Identity, Role};

use super::{Api, CourseService, EnrollmentService, GradeService, PlanningService};
use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq)]
pub struct StudentDashboard {
    pub enrollments: Vec<Enrollment>,
    pub grades: Vec<Grade>,
    pub gpa: f64,
    pub upcoming: Vec<ScheduledSession>,
    pub passing_count: usize,
}

impl StudentDashboard {
    /// GPA as a `[0, 1]` fraction of the scale.
    pub fn gpa_progress(&self) -> f64 {
        gpa_progress(self.gpa)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerDashboard {
    pub courses: Vec<Course>,
    pub upcoming: Vec<ScheduledSession>,
}

#[derive(Debug, Clone)]
pub struct DashboardService {
    courses: CourseService,
    enrollments: EnrollmentService,
    grades: GradeService,
    planning: PlanningService,
}

impl DashboardService {
    pub fn new(api: Api) -> Self {
        Self {
            courses: CourseService::new(api.clone()),
            enrollments: EnrollmentService::new(api.clone()),
            grades: GradeService::new(api.clone()),
            planning: PlanningService::new(api),
        }
    }

    pub async fn student_dashboard(&self, identity: &Identity, as_of: NaiveDate) -> Result<StudentDashboard, ClientError> {
        require_role(identity, Role::Student)?;
        let student = identity.student_ref().ok_or(ClientError::MissingReference("studentId"))?;

        let (enrollments, grades, schedule) = tokio::try_join!(
            self.enrollments.for_student(student),
            self.grades.for_student(student),
            self.planning.my_schedule(),
        )?;

        let gpa = compute_gpa(&grades);
        let passing_count = grades.iter().filter(|g| g.is_passing()).count();
        Ok(StudentDashboard {
            enrollments,
            gpa,
            passing_count,
            grades,
            upcoming: upcoming_schedule(&schedule, as_of),
        })
    }

    pub async fn trainer_dashboard(&self, identity: &Identity, as_of: NaiveDate) -> Result<TrainerDashboard, ClientError> {
        require_role(identity, Role::Trainer)?;
        let trainer = identity.trainer_ref().ok_or(ClientError::MissingReference("trainerId"))?;

        let (courses, schedule) = tokio::try_join!(
            self.courses.list_by_trainer(trainer),
            self.planning.trainer_schedule(trainer),
        )?;

        Ok(TrainerDashboard {
            courses,
            upcoming: upcoming_schedule(&schedule, as_of),
        })
    }
}

fn require_role(identity: &Identity, role: Role) -> Result<(), ClientError> {
    if identity.role() == role {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(identity.role()).into())
    }
}
