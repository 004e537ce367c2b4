//! University and specialty records
//!
//! A university owns zero or more specialties; removing a university removes
//! its specialties through the `ON DELETE CASCADE` foreign key.

use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::error::{AppError, AppResult};
use crate::storage::dao::{Fields, Insertable, Record};

/// Structure representing a university row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct University {
    /// Unique ID assigned by the store
    pub id: i64,
    pub name: String,
    /// City or address
    pub location: String,
    pub count_students: i64,
    pub count_campus: i64,
    pub count_branches: i64,
}

impl Record for University {
    const TABLE: &'static str = "universities";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "location",
        "count_students",
        "count_campus",
        "count_branches",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            location: row.get(2)?,
            count_students: row.get(3)?,
            count_campus: row.get(4)?,
            count_branches: row.get(5)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Parameters for inserting a university
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUniversity {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub count_students: i64,
    #[serde(default)]
    pub count_campus: i64,
    #[serde(default)]
    pub count_branches: i64,
}

impl Insertable for NewUniversity {
    type Record = University;

    fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("university name must not be empty".to_string()));
        }
        for (field, value) in [
            ("count_students", self.count_students),
            ("count_campus", self.count_campus),
            ("count_branches", self.count_branches),
        ] {
            if value < 0 {
                return Err(AppError::Validation(format!(
                    "university {}: {} must not be negative",
                    self.name, field
                )));
            }
        }
        Ok(())
    }

    fn fields(&self) -> Fields {
        Fields::new()
            .eq("name", self.name.clone())
            .eq("location", self.location.clone())
            .eq("count_students", self.count_students)
            .eq("count_campus", self.count_campus)
            .eq("count_branches", self.count_branches)
    }
}

/// Structure representing a specialty (study program) row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Specialty {
    pub id: i64,
    pub name: String,
    /// Institute or faculty inside the university
    pub institute: String,
    pub description: String,
    /// Tuition in roubles per year
    pub cost_of_education: i64,
    pub total_hours: i64,
    /// Subset of `total_hours`
    pub practical_hours: i64,
    /// Average weekly hours
    pub average_hours: i64,
    pub count_exams: i64,
    pub count_coursework: i64,
    /// Budget-funded seats
    pub count_budget: i64,
    pub min_mark: i64,
    pub average_mark: i64,
    pub university_id: i64,
}

impl Record for Specialty {
    const TABLE: &'static str = "specialties";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "institute",
        "description",
        "cost_of_education",
        "total_hours",
        "practical_hours",
        "average_hours",
        "count_exams",
        "count_coursework",
        "count_budget",
        "min_mark",
        "average_mark",
        "university_id",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            institute: row.get(2)?,
            description: row.get(3)?,
            cost_of_education: row.get(4)?,
            total_hours: row.get(5)?,
            practical_hours: row.get(6)?,
            average_hours: row.get(7)?,
            count_exams: row.get(8)?,
            count_coursework: row.get(9)?,
            count_budget: row.get(10)?,
            min_mark: row.get(11)?,
            average_mark: row.get(12)?,
            university_id: row.get(13)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl Specialty {
    /// Whether `query` (already lowercased) occurs in the name or institute.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.institute.to_lowercase().contains(query)
    }
}

/// Parameters for inserting a specialty
///
/// `university_id` is not part of the data files; the loader resolves it from
/// the university name before inserting.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewSpecialty {
    pub name: String,
    pub institute: String,
    pub description: String,
    pub cost_of_education: i64,
    pub total_hours: i64,
    pub practical_hours: i64,
    pub average_hours: i64,
    pub count_exams: i64,
    pub count_coursework: i64,
    pub count_budget: i64,
    pub min_mark: i64,
    pub average_mark: i64,
    #[serde(skip)]
    pub university_id: i64,
}

impl NewSpecialty {
    /// Data-quality check that is reported but never enforced.
    pub fn marks_consistent(&self) -> bool {
        self.min_mark <= self.average_mark
    }
}

impl Insertable for NewSpecialty {
    type Record = Specialty;

    fn validate(&self) -> AppResult<()> {
        let fail = |reason: &str| Err(AppError::Validation(format!("specialty {}: {}", self.name, reason)));

        if self.name.trim().is_empty() {
            return Err(AppError::Validation("specialty name must not be empty".to_string()));
        }
        if self.cost_of_education <= 0 {
            return fail("cost_of_education must be positive");
        }
        if self.practical_hours > self.total_hours {
            return fail("practical_hours exceed total_hours");
        }
        for (field, value) in [
            ("total_hours", self.total_hours),
            ("practical_hours", self.practical_hours),
            ("average_hours", self.average_hours),
            ("count_exams", self.count_exams),
            ("count_coursework", self.count_coursework),
            ("count_budget", self.count_budget),
        ] {
            if value < 0 {
                return fail(&format!("{} must not be negative", field));
            }
        }
        if self.university_id <= 0 {
            return fail("owning university is not resolved");
        }
        Ok(())
    }

    fn fields(&self) -> Fields {
        Fields::new()
            .eq("name", self.name.clone())
            .eq("institute", self.institute.clone())
            .eq("description", self.description.clone())
            .eq("cost_of_education", self.cost_of_education)
            .eq("total_hours", self.total_hours)
            .eq("practical_hours", self.practical_hours)
            .eq("average_hours", self.average_hours)
            .eq("count_exams", self.count_exams)
            .eq("count_coursework", self.count_coursework)
            .eq("count_budget", self.count_budget)
            .eq("min_mark", self.min_mark)
            .eq("average_mark", self.average_mark)
            .eq("university_id", self.university_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn economics() -> NewSpecialty {
        NewSpecialty {
            name: "Экономика".to_string(),
            institute: "Экономический факультет".to_string(),
            description: "Экономическая теория и анализ".to_string(),
            cost_of_education: 390_000,
            total_hours: 8_640,
            practical_hours: 2_100,
            average_hours: 36,
            count_exams: 32,
            count_coursework: 4,
            count_budget: 120,
            min_mark: 280,
            average_mark: 295,
            university_id: 1,
        }
    }

    #[test]
    fn test_valid_specialty_passes() {
        assert!(economics().validate().is_ok());
        assert!(economics().marks_consistent());
    }

    #[test]
    fn test_practical_hours_cannot_exceed_total() {
        let spec = NewSpecialty {
            practical_hours: 9_000,
            ..economics()
        };
        assert!(matches!(spec.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_cost_must_be_positive() {
        let spec = NewSpecialty {
            cost_of_education: 0,
            ..economics()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_unresolved_university_rejected() {
        let spec = NewSpecialty {
            university_id: 0,
            ..economics()
        };
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_inverted_marks_are_only_a_warning() {
        let spec = NewSpecialty {
            min_mark: 300,
            average_mark: 250,
            ..economics()
        };
        assert!(spec.validate().is_ok());
        assert!(!spec.marks_consistent());
    }

    #[test]
    fn test_fields_cover_every_non_id_column() {
        let fields = economics().fields();
        assert_eq!(fields.len(), Specialty::COLUMNS.len() - 1);

        let uni = NewUniversity {
            name: "МГУ".to_string(),
            location: "Москва".to_string(),
            count_students: 47_000,
            count_campus: 3,
            count_branches: 5,
        };
        assert_eq!(uni.fields().len(), University::COLUMNS.len() - 1);
    }

    #[test]
    fn test_negative_university_counts_rejected() {
        let uni = NewUniversity {
            name: "МГУ".to_string(),
            location: "Москва".to_string(),
            count_students: -1,
            count_campus: 0,
            count_branches: 0,
        };
        assert!(uni.validate().is_err());
    }

    #[test]
    fn test_specialty_matches_is_case_insensitive() {
        let spec = Specialty {
            id: 1,
            name: "Экономика".to_string(),
            institute: "Высшая школа бизнеса".to_string(),
            description: String::new(),
            cost_of_education: 1,
            total_hours: 0,
            practical_hours: 0,
            average_hours: 0,
            count_exams: 0,
            count_coursework: 0,
            count_budget: 0,
            min_mark: 0,
            average_mark: 0,
            university_id: 1,
        };
        assert!(spec.matches("эконом"));
        assert!(spec.matches("бизнес"));
        assert!(!spec.matches("физика"));
    }
}
