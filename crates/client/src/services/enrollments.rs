use academia_academics::{Enrollment, EnrollmentRequest};
use academia_core::{CourseId, EnrollmentId, StudentId};

use super::Api;
use crate::error::{ClientError, ErrorBody};
use crate::transport::ApiRequest;

const ENROLLMENTS: &str = "/api/enrollments";

#[derive(Debug, Clone)]
pub struct EnrollmentService {
    api: Api,
}

impl EnrollmentService {
    pub fn new(api: Api) -> Self {
        Self { api }
    }

    /// Enroll a student in a course.
    ///
    /// Both references are checked before anything is sent. A duplicate is
    /// reported as [`ClientError::AlreadyEnrolled`], whether the server says
    /// so with a 409 or only in its error message.
    pub async fn enroll(
        &self,
        student: Option<StudentId>,
        course: Option<CourseId>,
    ) -> Result<Enrollment, ClientError> {
        let request = EnrollmentRequest::new(student, course)?;
        self.submit(request).await
    }

    /// [`EnrollmentService::enroll`] from raw form selections.
    pub async fn enroll_selection(&self, student: &str, course: &str) -> Result<Enrollment, ClientError> {
        let request = EnrollmentRequest::from_selection(student, course)?;
        self.submit(request).await
    }

    pub async fn cancel(&self, id: EnrollmentId) -> Result<(), ClientError> {
        self.api.delete(format!("{ENROLLMENTS}/{id}")).await
    }

    pub async fn for_student(&self, student: StudentId) -> Result<Vec<Enrollment>, ClientError> {
        self.api.get(format!("{ENROLLMENTS}/student/{student}")).await
    }

    async fn submit(&self, request: EnrollmentRequest) -> Result<Enrollment, ClientError> {
        let response = self.api.exchange(ApiRequest::post(ENROLLMENTS).json(&request)?).await?;
        if response.is_success() {
            tracing::info!(student = %request.student_id, course = %request.course_id, "student enrolled");
            return response.decode();
        }

        let body = ErrorBody::parse(&response);
        if response.status == 409 || body.mentions("already enrolled") {
            tracing::info!(student = %request.student_id, course = %request.course_id, "duplicate enrollment");
            return Err(ClientError::AlreadyEnrolled {
                message: body.message_or("Student is already enrolled in this course"),
            });
        }
        Err(ClientError::from_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::{Method, TransportError};

    fn service(transport: &std::sync::Arc<ScriptedTransport>) -> EnrollmentService {
        EnrollmentService::new(Api::new(transport.clone()))
    }

    #[tokio::test]
    async fn missing_reference_never_reaches_the_network() {
        let transport = ScriptedTransport::new();
        let service = service(&transport);

        assert_eq!(
            service.enroll(None, Some(CourseId::new(1))).await,
            Err(ClientError::MissingReference("studentId"))
        );
        assert_eq!(
            service.enroll_selection("4", "").await,
            Err(ClientError::MissingReference("courseId"))
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn successful_enrollment_posts_both_ids() {
        let transport = ScriptedTransport::new();
        transport.reply_json(
            Method::Post,
            ENROLLMENTS,
            201,
            json!({"id": 10, "enrollmentDate": "2024-09-02", "studentId": 4, "courseId": 2}),
        );
        let service = service(&transport);

        let enrollment = service.enroll(Some(StudentId::new(4)), Some(CourseId::new(2))).await.unwrap();

        assert_eq!(enrollment.id, Some(EnrollmentId::new(10)));
        assert_eq!(transport.requests()[0].body, Some(json!({"studentId": 4, "courseId": 2})));
    }

    #[tokio::test]
    async fn conflict_status_is_already_enrolled() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Post, ENROLLMENTS, 409, json!({"message": "duplicate"}));

        let err = service(&transport)
            .enroll(Some(StudentId::new(4)), Some(CourseId::new(2)))
            .await
            .unwrap_err();

        assert_eq!(err, ClientError::AlreadyEnrolled { message: "duplicate".into() });
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn server_error_mentioning_duplicate_is_already_enrolled() {
        let transport = ScriptedTransport::new();
        transport.reply_json(
            Method::Post,
            ENROLLMENTS,
            500,
            json!({"message": "Student is already enrolled in this course"}),
        );

        let err = service(&transport)
            .enroll(Some(StudentId::new(4)), Some(CourseId::new(2)))
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::AlreadyEnrolled { .. }));
    }

    #[tokio::test]
    async fn other_failures_keep_their_kind() {
        let transport = ScriptedTransport::new();
        transport.reply_json(Method::Post, ENROLLMENTS, 500, json!({"message": "Course not found"}));
        transport.fail(Method::Post, ENROLLMENTS, TransportError::new("timeout"));
        let service = service(&transport);

        let server = service.enroll(Some(StudentId::new(4)), Some(CourseId::new(99))).await.unwrap_err();
        let network = service.enroll(Some(StudentId::new(4)), Some(CourseId::new(2))).await.unwrap_err();

        assert_eq!(
            server,
            ClientError::ValidationFailed { message: "Course not found".into(), fields: vec![] }
        );
        assert!(!server.is_retryable());
        assert!(matches!(network, ClientError::TransportFailure(_)));
        assert!(network.is_retryable());
    }
}
