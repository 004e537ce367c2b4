//! Bulk loading of reference data from JSON files
//!
//! Two files are read:
//!
//! - universities: `{"university": [{"name": ..., "location": ..., ...}]}`
//! - specialties: `{"spec": [{"name": ..., "university": "<university name>", ...}]}`
//!
//! Loading is idempotent. A university whose name is already stored is reused
//! and a specialty with the same name under the same university is skipped,
//! so running the loader twice inserts nothing the second time.

use std::path::Path;

use serde::Deserialize;

use crate::core::error::{AppError, AppResult};
use crate::storage::dao::{Criteria, Dao};
use crate::storage::models::{NewSpecialty, NewUniversity, Specialty, University};

#[derive(Debug, Deserialize)]
struct UniversityFile {
    university: Vec<NewUniversity>,
}

#[derive(Debug, Deserialize)]
struct SpecialtyFile {
    spec: Vec<SpecialtyEntry>,
}

/// A specialty as it appears in the data file: the owning university is
/// referenced by name.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtyEntry {
    pub university: String,
    #[serde(flatten)]
    pub specialty: NewSpecialty,
}

/// Outcome of a load run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub universities_inserted: usize,
    pub universities_skipped: usize,
    pub specialties_inserted: usize,
    pub specialties_skipped: usize,
    /// Specialties inserted with `min_mark > average_mark`
    pub mark_warnings: usize,
}

impl LoadReport {
    pub fn inserted(&self) -> usize {
        self.universities_inserted + self.specialties_inserted
    }
}

pub fn parse_universities(json: &str) -> AppResult<Vec<NewUniversity>> {
    let file: UniversityFile = serde_json::from_str(json)?;
    Ok(file.university)
}

pub fn parse_specialties(json: &str) -> AppResult<Vec<SpecialtyEntry>> {
    let file: SpecialtyFile = serde_json::from_str(json)?;
    Ok(file.spec)
}

/// Inserts universities that are not stored yet.
pub async fn load_universities(
    dao: &Dao<University>,
    universities: &[NewUniversity],
    report: &mut LoadReport,
) -> AppResult<()> {
    for university in universities {
        let existing = dao
            .find_first(Criteria::new().eq("name", university.name.clone()))
            .await?;
        if let Some(existing) = existing {
            log::debug!("University {} already stored as #{}", university.name, existing.id);
            report.universities_skipped += 1;
            continue;
        }

        let id = dao.insert(university).await?;
        log::info!("Added university #{}: {}", id, university.name);
        report.universities_inserted += 1;
    }
    Ok(())
}

/// Resolves each entry's university by name and inserts new specialties.
///
/// An entry that references an unknown university fails the whole load.
pub async fn load_specialties(
    universities: &Dao<University>,
    specialties: &Dao<Specialty>,
    entries: &[SpecialtyEntry],
    report: &mut LoadReport,
) -> AppResult<()> {
    for entry in entries {
        let university = universities
            .find_one(Criteria::new().eq("name", entry.university.clone()))
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "specialty {} references unknown university {}",
                    entry.specialty.name, entry.university
                ))
            })?;

        let duplicate = specialties
            .find_first(
                Criteria::new()
                    .eq("name", entry.specialty.name.clone())
                    .eq("university_id", university.id),
            )
            .await?;
        if duplicate.is_some() {
            log::debug!("Specialty {} already stored for {}", entry.specialty.name, university.name);
            report.specialties_skipped += 1;
            continue;
        }

        let new = NewSpecialty {
            university_id: university.id,
            ..entry.specialty.clone()
        };
        if !new.marks_consistent() {
            log::warn!(
                "Specialty {} ({}): min_mark {} is above average_mark {}",
                new.name,
                university.name,
                new.min_mark,
                new.average_mark
            );
            report.mark_warnings += 1;
        }

        let id = specialties.insert(&new).await?;
        log::info!("Added specialty #{}: {} ({})", id, new.name, university.name);
        report.specialties_inserted += 1;
    }
    Ok(())
}

/// Reads both data files and loads them, universities first.
pub async fn load_files(
    universities: &Dao<University>,
    specialties: &Dao<Specialty>,
    universities_path: &Path,
    specialties_path: &Path,
) -> AppResult<LoadReport> {
    let university_rows = parse_universities(&std::fs::read_to_string(universities_path)?)?;
    let specialty_rows = parse_specialties(&std::fs::read_to_string(specialties_path)?)?;
    log::info!(
        "Loading {} universities from {} and {} specialties from {}",
        university_rows.len(),
        universities_path.display(),
        specialty_rows.len(),
        specialties_path.display()
    );

    let mut report = LoadReport::default();
    load_universities(universities, &university_rows, &mut report).await?;
    load_specialties(universities, specialties, &specialty_rows, &mut report).await?;
    Ok(report)
}

/// Plain-text listing of every stored row, grouped by university.
pub async fn render_dump(universities: &Dao<University>, specialties: &Dao<Specialty>) -> AppResult<String> {
    let all = universities.get_all(Criteria::new()).await?;
    let mut lines = vec![format!("Universities: {}", all.len())];

    for university in &all {
        lines.push(format!(
            "\n#{} {} ({}) students={} campus={} branches={}",
            university.id,
            university.name,
            university.location,
            university.count_students,
            university.count_campus,
            university.count_branches
        ));
        let owned = specialties
            .get_all(Criteria::new().eq("university_id", university.id))
            .await?;
        lines.extend(owned.iter().map(|specialty| {
            format!(
                "  #{} {} [{}] cost={} hours={}/{} budget={} marks={}/{}",
                specialty.id,
                specialty.name,
                specialty.institute,
                specialty.cost_of_education,
                specialty.practical_hours,
                specialty.total_hours,
                specialty.count_budget,
                specialty.min_mark,
                specialty.average_mark
            )
        }));
    }
    Ok(lines.into_iter().map(|line| line + "\n").collect())
}
