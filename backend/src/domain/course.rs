//! Course catalogue entities.
//!
//! A course carries the capacity (`max_students`) consulted by the
//! enrollment core. The course row itself is never written by enrollment
//! operations; only instructors create courses.

use std::fmt;

use uuid::Uuid;

use super::UserId;

const COURSE_CODE_MAX: usize = 16;
const COURSE_NAME_MAX: usize = 128;

/// Validation errors returned by [`Course::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Course code was empty after trimming.
    EmptyCode,
    /// Course code exceeded the maximum length.
    CodeTooLong { max: usize },
    /// Course code contained characters outside `A-Z`, `0-9`, and `-`.
    CodeInvalidCharacters,
    /// Course name was empty after trimming.
    EmptyName,
    /// Course name exceeded the maximum length.
    NameTooLong { max: usize },
    /// Capacity must admit at least one student.
    NonPositiveCapacity,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "course code must not be empty"),
            Self::CodeTooLong { max } => {
                write!(f, "course code must be at most {max} characters")
            }
            Self::CodeInvalidCharacters => write!(
                f,
                "course code may only contain uppercase letters, digits, or dashes",
            ),
            Self::EmptyName => write!(f, "course name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "course name must be at most {max} characters")
            }
            Self::NonPositiveCapacity => {
                write!(f, "max students must admit at least one student")
            }
        }
    }
}

impl std::error::Error for CourseValidationError {}

/// Unvalidated course fields supplied by adapters.
#[derive(Debug, Clone)]
pub struct CourseDraft {
    pub id: Uuid,
    pub department_id: Option<Uuid>,
    pub course_code: String,
    pub course_name: String,
    pub description: Option<String>,
    pub instructor_id: UserId,
    pub max_students: i32,
}

/// A catalogue course with validated code, name, and capacity.
///
/// ## Invariants
/// - `course_code` is trimmed, non-empty, at most 16 characters, and uses
///   only uppercase ASCII letters, digits, and dashes.
/// - `course_name` is trimmed, non-empty, and at most 128 characters.
/// - `max_students >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: Uuid,
    department_id: Option<Uuid>,
    course_code: String,
    course_name: String,
    description: Option<String>,
    instructor_id: UserId,
    max_students: i32,
}

impl Course {
    /// Validate a draft into a course.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Course, CourseDraft, UserId};
    /// use uuid::Uuid;
    ///
    /// let course = Course::new(CourseDraft {
    ///     id: Uuid::new_v4(),
    ///     department_id: None,
    ///     course_code: "CS-240".to_owned(),
    ///     course_name: "Programming in Rust".to_owned(),
    ///     description: None,
    ///     instructor_id: UserId::random(),
    ///     max_students: 30,
    /// })
    /// .expect("valid draft");
    /// assert_eq!(course.course_code(), "CS-240");
    /// ```
    pub fn new(draft: CourseDraft) -> Result<Self, CourseValidationError> {
        let CourseDraft {
            id,
            department_id,
            course_code,
            course_name,
            description,
            instructor_id,
            max_students,
        } = draft;

        let course_code = course_code.trim().to_owned();
        if course_code.is_empty() {
            return Err(CourseValidationError::EmptyCode);
        }
        if course_code.chars().count() > COURSE_CODE_MAX {
            return Err(CourseValidationError::CodeTooLong {
                max: COURSE_CODE_MAX,
            });
        }
        if !course_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(CourseValidationError::CodeInvalidCharacters);
        }

        let course_name = course_name.trim().to_owned();
        if course_name.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        if course_name.chars().count() > COURSE_NAME_MAX {
            return Err(CourseValidationError::NameTooLong {
                max: COURSE_NAME_MAX,
            });
        }

        if max_students < 1 {
            return Err(CourseValidationError::NonPositiveCapacity);
        }

        Ok(Self {
            id,
            department_id,
            course_code,
            course_name,
            description,
            instructor_id,
            max_students,
        })
    }

    /// Course identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning department, if assigned.
    #[must_use]
    pub fn department_id(&self) -> Option<Uuid> {
        self.department_id
    }

    /// Unique course code, e.g. `CS-240`.
    #[must_use]
    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    /// Human-readable course name.
    #[must_use]
    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    /// Optional free-form description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Instructor owning the course.
    #[must_use]
    pub fn instructor_id(&self) -> &UserId {
        &self.instructor_id
    }

    /// Enrollment capacity.
    #[must_use]
    pub fn max_students(&self) -> i32 {
        self.max_students
    }
}

/// A course joined with its live active-enrollment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    /// The course record.
    pub course: Course,
    /// Number of active enrollments at read time.
    pub enrolled_count: i64,
}

impl CourseSummary {
    /// Remaining seats, saturating at zero.
    #[must_use]
    pub fn seats_remaining(&self) -> i64 {
        let capacity = i64::from(self.course.max_students());
        (capacity - self.enrolled_count).max(0)
    }
}
