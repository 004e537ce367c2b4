//! Shared fixtures for integration tests
//!
//! Every test gets its own SQLite file in a temporary directory; the
//! directory lives as long as the returned `TestDb`.

#![allow(dead_code)]

use std::sync::Arc;

use abiturbot::storage::{create_pool, Dao, DbPool, NewSpecialty, NewUniversity, Specialty, University};
use tempfile::TempDir;

pub struct TestDb {
    pub pool: Arc<DbPool>,
    pub universities: Dao<University>,
    pub specialties: Dao<Specialty>,
    _dir: TempDir,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let pool = Arc::new(create_pool(path.to_str().unwrap()).unwrap());

        Self {
            universities: Dao::new(Arc::clone(&pool)),
            specialties: Dao::new(Arc::clone(&pool)),
            pool,
            _dir: dir,
        }
    }

    pub async fn add_university(&self, name: &str) -> i64 {
        self.universities.insert(&university(name)).await.unwrap()
    }

    pub async fn add_specialty(&self, name: &str, university_id: i64) -> i64 {
        self.specialties
            .insert(&specialty(name, university_id))
            .await
            .unwrap()
    }
}

pub fn university(name: &str) -> NewUniversity {
    NewUniversity {
        name: name.to_string(),
        location: "Москва, Ленинские горы, 1".to_string(),
        count_students: 47_000,
        count_campus: 3,
        count_branches: 5,
    }
}

pub fn specialty(name: &str, university_id: i64) -> NewSpecialty {
    NewSpecialty {
        name: name.to_string(),
        institute: "Институт прикладных наук".to_string(),
        description: "Подготовка специалистов".to_string(),
        cost_of_education: 390_000,
        total_hours: 8_640,
        practical_hours: 2_100,
        average_hours: 36,
        count_exams: 32,
        count_coursework: 4,
        count_budget: 120,
        min_mark: 280,
        average_mark: 295,
        university_id,
    }
}
