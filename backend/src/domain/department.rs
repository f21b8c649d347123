//! Department entities managed by administrators.

use std::fmt;

use uuid::Uuid;

const DEPARTMENT_CODE_MAX: usize = 8;
const DEPARTMENT_NAME_MAX: usize = 128;

/// Validation errors returned by [`Department::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentValidationError {
    /// Department code was empty after trimming.
    EmptyCode,
    /// Department code exceeded the maximum length.
    CodeTooLong { max: usize },
    /// Department code contained characters outside `A-Z`.
    CodeInvalidCharacters,
    /// Department name was empty after trimming.
    EmptyName,
    /// Department name exceeded the maximum length.
    NameTooLong { max: usize },
}

impl fmt::Display for DepartmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "department code must not be empty"),
            Self::CodeTooLong { max } => {
                write!(f, "department code must be at most {max} characters")
            }
            Self::CodeInvalidCharacters => {
                write!(f, "department code may only contain uppercase letters")
            }
            Self::EmptyName => write!(f, "department name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "department name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for DepartmentValidationError {}

/// Unvalidated department fields supplied by adapters.
#[derive(Debug, Clone)]
pub struct DepartmentDraft {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// An academic department grouping courses.
///
/// ## Invariants
/// - `code` is trimmed, non-empty, at most 8 uppercase ASCII letters.
/// - `name` is trimmed, non-empty, and at most 128 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    id: Uuid,
    code: String,
    name: String,
}

impl Department {
    /// Validate a draft into a department.
    pub fn new(draft: DepartmentDraft) -> Result<Self, DepartmentValidationError> {
        let DepartmentDraft { id, code, name } = draft;

        let code = code.trim().to_owned();
        if code.is_empty() {
            return Err(DepartmentValidationError::EmptyCode);
        }
        if code.chars().count() > DEPARTMENT_CODE_MAX {
            return Err(DepartmentValidationError::CodeTooLong {
                max: DEPARTMENT_CODE_MAX,
            });
        }
        if !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DepartmentValidationError::CodeInvalidCharacters);
        }

        let name = name.trim().to_owned();
        if name.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        if name.chars().count() > DEPARTMENT_NAME_MAX {
            return Err(DepartmentValidationError::NameTooLong {
                max: DEPARTMENT_NAME_MAX,
            });
        }

        Ok(Self { id, code, name })
    }

    /// Department identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Unique department code, e.g. `CS`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable department name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(code: &str, name: &str) -> DepartmentDraft {
        DepartmentDraft {
            id: Uuid::new_v4(),
            code: code.to_owned(),
            name: name.to_owned(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let dept = Department::new(draft("CS", "Computer Science")).expect("valid draft");
        assert_eq!(dept.code(), "CS");
        assert_eq!(dept.name(), "Computer Science");
    }

    #[rstest]
    #[case("", DepartmentValidationError::EmptyCode)]
    #[case("cs", DepartmentValidationError::CodeInvalidCharacters)]
    #[case("C-S", DepartmentValidationError::CodeInvalidCharacters)]
    #[case("LONGCODES", DepartmentValidationError::CodeTooLong { max: 8 })]
    fn rejects_invalid_codes(#[case] code: &str, #[case] expected: DepartmentValidationError) {
        assert_eq!(
            Department::new(draft(code, "Computer Science")).unwrap_err(),
            expected
        );
    }

    #[test]
    fn rejects_blank_name() {
        assert_eq!(
            Department::new(draft("CS", "  ")).unwrap_err(),
            DepartmentValidationError::EmptyName
        );
    }
}
