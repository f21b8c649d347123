//! Behaviour coverage for the enrollment services.
//!
//! Two layers of tests: mock-based checks that repository failures map onto
//! the stable error taxonomy, and an in-memory repository honouring the
//! port's serialisation contract so the capacity and unique-active
//! invariants can be exercised under real task concurrency.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{Duration, TimeZone, Utc};
use rstest::rstest;
use uuid::Uuid;

use super::*;
use crate::domain::EnrollmentStatus;
use crate::domain::ports::MockEnrollmentRepository;

fn service_with_mock<F>(configure: F) -> EnrollmentCommandService<MockEnrollmentRepository>
where
    F: FnOnce(&mut MockEnrollmentRepository),
{
    let mut repo = MockEnrollmentRepository::new();
    configure(&mut repo);
    EnrollmentCommandService::new(Arc::new(repo))
}

#[rstest]
#[case(EnrollmentRepositoryError::already_enrolled(), EnrollmentError::AlreadyEnrolled)]
#[case(EnrollmentRepositoryError::course_full(), EnrollmentError::CourseFull)]
#[case(EnrollmentRepositoryError::course_not_found(), EnrollmentError::CourseNotFound)]
#[tokio::test]
async fn enroll_maps_business_outcomes(
    #[case] repo_error: EnrollmentRepositoryError,
    #[case] expected: EnrollmentError,
) {
    let service = service_with_mock(|repo| {
        repo.expect_enroll()
            .return_once(move |_, _| Err(repo_error));
    });

    let outcome = service
        .enroll(&UserId::random(), Uuid::new_v4())
        .await
        .expect_err("repository outcome propagates");
    assert_eq!(outcome, expected);
}

#[tokio::test]
async fn enroll_maps_connection_failures_to_transaction_failure() {
    let service = service_with_mock(|repo| {
        repo.expect_enroll()
            .return_once(|_, _| Err(EnrollmentRepositoryError::connection("pool exhausted")));
    });

    let outcome = service
        .enroll(&UserId::random(), Uuid::new_v4())
        .await
        .expect_err("connection failure propagates");
    assert!(matches!(
        outcome,
        EnrollmentError::TransactionFailure { message } if message.contains("pool exhausted")
    ));
}

#[tokio::test]
async fn unenroll_maps_missing_enrollment() {
    let service = service_with_mock(|repo| {
        repo.expect_mark_dropped()
            .return_once(|_, _| Err(EnrollmentRepositoryError::enrollment_not_found()));
    });

    let outcome = service
        .unenroll(&UserId::random(), Uuid::new_v4())
        .await
        .expect_err("missing enrollment propagates");
    assert_eq!(outcome, EnrollmentError::EnrollmentNotFound);
}

#[tokio::test]
async fn list_maps_query_failures() {
    let mut repo = MockEnrollmentRepository::new();
    repo.expect_list_active_for_student()
        .return_once(|_| Err(EnrollmentRepositoryError::query("relation missing")));
    let service = EnrollmentQueryService::new(Arc::new(repo));

    let outcome = service
        .list_enrollments(&UserId::random())
        .await
        .expect_err("query failure propagates");
    assert!(matches!(
        outcome,
        EnrollmentError::TransactionFailure { .. }
    ));
}

// ---------------------------------------------------------------------------
// In-memory repository honouring the port contract
// ---------------------------------------------------------------------------

struct CourseFixture {
    capacity: i32,
    code: &'static str,
    name: &'static str,
}

/// In-memory stand-in that serialises the whole check-then-insert sequence
/// behind one lock, the same contract the Diesel adapter provides with its
/// per-course row lock.
struct InMemoryEnrollmentRepository {
    courses: HashMap<Uuid, CourseFixture>,
    rows: tokio::sync::Mutex<Vec<Enrollment>>,
    ticks: AtomicI64,
}

impl InMemoryEnrollmentRepository {
    fn new(courses: HashMap<Uuid, CourseFixture>) -> Self {
        Self {
            courses,
            rows: tokio::sync::Mutex::new(Vec::new()),
            ticks: AtomicI64::new(0),
        }
    }

    fn next_date(&self) -> chrono::DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
            + Duration::seconds(tick)
    }

    async fn active_count(&self, course_id: Uuid) -> usize {
        let rows = self.rows.lock().await;
        rows.iter()
            .filter(|row| {
                row.course_id == course_id && row.status == EnrollmentStatus::Enrolled
            })
            .count()
    }
}

#[async_trait::async_trait]
impl EnrollmentRepository for InMemoryEnrollmentRepository {
    async fn enroll(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<Enrollment, EnrollmentRepositoryError> {
        // Holding the lock across every read and the write below mirrors the
        // adapter's transactional isolation.
        let mut rows = self.rows.lock().await;

        let Some(course) = self.courses.get(&course_id) else {
            return Err(EnrollmentRepositoryError::course_not_found());
        };

        let already_active = rows.iter().any(|row| {
            row.student_id == *student_id
                && row.course_id == course_id
                && row.status == EnrollmentStatus::Enrolled
        });
        if already_active {
            return Err(EnrollmentRepositoryError::already_enrolled());
        }

        let active = rows
            .iter()
            .filter(|row| {
                row.course_id == course_id && row.status == EnrollmentStatus::Enrolled
            })
            .count();
        if active >= usize::try_from(course.capacity).expect("non-negative capacity") {
            return Err(EnrollmentRepositoryError::course_full());
        }

        let enrollment = Enrollment {
            id: Uuid::new_v4(),
            student_id: *student_id,
            course_id,
            status: EnrollmentStatus::Enrolled,
            enrollment_date: self.next_date(),
        };
        rows.push(enrollment.clone());
        Ok(enrollment)
    }

    async fn mark_dropped(
        &self,
        student_id: &UserId,
        course_id: Uuid,
    ) -> Result<(), EnrollmentRepositoryError> {
        let mut rows = self.rows.lock().await;
        let active = rows.iter_mut().find(|row| {
            row.student_id == *student_id
                && row.course_id == course_id
                && row.status == EnrollmentStatus::Enrolled
        });
        match active {
            Some(row) => {
                row.status = EnrollmentStatus::Dropped;
                Ok(())
            }
            None => Err(EnrollmentRepositoryError::enrollment_not_found()),
        }
    }

    async fn list_active_for_student(
        &self,
        student_id: &UserId,
    ) -> Result<Vec<EnrollmentView>, EnrollmentRepositoryError> {
        let rows = self.rows.lock().await;
        let mut views: Vec<EnrollmentView> = rows
            .iter()
            .filter(|row| {
                row.student_id == *student_id && row.status == EnrollmentStatus::Enrolled
            })
            .map(|row| {
                let course = self
                    .courses
                    .get(&row.course_id)
                    .expect("fixture course exists");
                EnrollmentView {
                    id: row.id,
                    course_id: row.course_id,
                    course_code: course.code.to_owned(),
                    course_name: course.name.to_owned(),
                    description: None,
                    enrollment_date: row.enrollment_date,
                }
            })
            .collect();
        views.sort_by(|a, b| b.enrollment_date.cmp(&a.enrollment_date));
        Ok(views)
    }
}

fn single_course(capacity: i32) -> (Uuid, Arc<InMemoryEnrollmentRepository>) {
    let course_id = Uuid::new_v4();
    let mut courses = HashMap::new();
    courses.insert(
        course_id,
        CourseFixture {
            capacity,
            code: "CS-240",
            name: "Programming in Rust",
        },
    );
    (course_id, Arc::new(InMemoryEnrollmentRepository::new(courses)))
}

#[tokio::test]
async fn concurrent_enrolls_never_exceed_capacity() {
    let (course_id, repo) = single_course(3);
    let service = Arc::new(EnrollmentCommandService::new(Arc::clone(&repo)));

    let attempts = (0..16).map(|_| {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.enroll(&UserId::random(), course_id).await })
    });
    let outcomes = futures::future::join_all(attempts).await;

    let mut successes = 0;
    let mut full = 0;
    for outcome in outcomes {
        match outcome.expect("task completes") {
            Ok(_) => successes += 1,
            Err(EnrollmentError::CourseFull) => full += 1,
            Err(other) => panic!("unexpected outcome: {other:?}"),
        }
    }
    assert_eq!(successes, 3);
    assert_eq!(full, 13);
    assert_eq!(repo.active_count(course_id).await, 3);
}

#[tokio::test]
async fn capacity_one_race_admits_exactly_one_student() {
    let (course_id, repo) = single_course(1);
    let service = Arc::new(EnrollmentCommandService::new(Arc::clone(&repo)));

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.enroll(&UserId::random(), course_id).await })
    };
    let second = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.enroll(&UserId::random(), course_id).await })
    };
    let outcomes = [
        first.await.expect("task completes"),
        second.await.expect("task completes"),
    ];

    let successes = outcomes.iter().filter(|o| o.is_ok()).count();
    let full = outcomes
        .iter()
        .filter(|o| matches!(o, Err(EnrollmentError::CourseFull)))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(full, 1);
}

#[tokio::test]
async fn double_enroll_reports_already_enrolled() {
    let (course_id, repo) = single_course(10);
    let service = EnrollmentCommandService::new(repo);
    let student = UserId::random();

    service
        .enroll(&student, course_id)
        .await
        .expect("first enroll succeeds");
    let second = service
        .enroll(&student, course_id)
        .await
        .expect_err("second enroll fails");
    assert_eq!(second, EnrollmentError::AlreadyEnrolled);
}

#[tokio::test]
async fn dropped_enrollment_does_not_block_re_enrollment() {
    let (course_id, repo) = single_course(10);
    let service = EnrollmentCommandService::new(repo);
    let student = UserId::random();

    service
        .enroll(&student, course_id)
        .await
        .expect("first enroll succeeds");
    service
        .unenroll(&student, course_id)
        .await
        .expect("unenroll succeeds");
    service
        .enroll(&student, course_id)
        .await
        .expect("re-enroll succeeds after drop");
}

#[tokio::test]
async fn unenroll_without_active_enrollment_reports_not_found() {
    let (course_id, repo) = single_course(10);
    let service = EnrollmentCommandService::new(repo);

    let outcome = service
        .unenroll(&UserId::random(), course_id)
        .await
        .expect_err("nothing to drop");
    assert_eq!(outcome, EnrollmentError::EnrollmentNotFound);
}

#[tokio::test]
async fn listing_skips_dropped_courses_and_orders_recent_first() {
    let first_course = Uuid::new_v4();
    let second_course = Uuid::new_v4();
    let third_course = Uuid::new_v4();
    let mut courses = HashMap::new();
    for (id, code) in [
        (first_course, "CS-240"),
        (second_course, "CS-250"),
        (third_course, "CS-260"),
    ] {
        courses.insert(
            id,
            CourseFixture {
                capacity: 10,
                code,
                name: "Fixture course",
            },
        );
    }
    let repo = Arc::new(InMemoryEnrollmentRepository::new(courses));
    let commands = EnrollmentCommandService::new(Arc::clone(&repo));
    let queries = EnrollmentQueryService::new(repo);
    let student = UserId::random();

    for course_id in [first_course, second_course, third_course] {
        commands
            .enroll(&student, course_id)
            .await
            .expect("enroll succeeds");
    }
    commands
        .unenroll(&student, second_course)
        .await
        .expect("unenroll succeeds");

    let listed = queries
        .list_enrollments(&student)
        .await
        .expect("list succeeds");
    let course_ids: Vec<Uuid> = listed.iter().map(|view| view.course_id).collect();
    assert_eq!(course_ids, vec![third_course, first_course]);
}
