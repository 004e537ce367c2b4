//! Integration tests for the generic DAO against a real SQLite file
//!
//! Run with: cargo test --test dao_test

#![allow(clippy::unwrap_used)]

mod common;

use abiturbot::storage::{Criteria, Fields, Match, Specialty};
use abiturbot::AppError;
use common::{specialty, TestDb};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_find_by_id_returns_matching_record_only() {
    let db = TestDb::new();
    let id = db.add_university("МГУ").await;

    let found = db.universities.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "МГУ");

    assert!(db.universities.find_by_id(id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_add_then_find_round_trip() {
    let db = TestDb::new();
    let uni = db.add_university("МГУ").await;
    let new = specialty("Экономика", uni);

    let id = db.specialties.insert(&new).await.unwrap();
    let stored = db.specialties.find_by_id(id).await.unwrap().unwrap();

    assert_eq!(
        stored,
        Specialty {
            id,
            name: new.name.clone(),
            institute: new.institute.clone(),
            description: new.description.clone(),
            cost_of_education: new.cost_of_education,
            total_hours: new.total_hours,
            practical_hours: new.practical_hours,
            average_hours: new.average_hours,
            count_exams: new.count_exams,
            count_coursework: new.count_coursework,
            count_budget: new.count_budget,
            min_mark: new.min_mark,
            average_mark: new.average_mark,
            university_id: uni,
        }
    );
}

#[tokio::test]
async fn test_get_all_filters_by_university_in_id_order() {
    let db = TestDb::new();
    let mgu = db.add_university("МГУ").await;
    let spbu = db.add_university("СПбГУ").await;

    let a = db.add_specialty("Механика", mgu).await;
    db.add_specialty("Филология", spbu).await;
    let b = db.add_specialty("Экономика", mgu).await;

    let owned = db
        .specialties
        .get_all(Criteria::new().eq("university_id", mgu))
        .await
        .unwrap();
    let ids: Vec<i64> = owned.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![a, b]);
    assert!(owned.iter().all(|s| s.university_id == mgu));

    let everything = db.specialties.get_all(Criteria::new()).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn test_find_one_fails_on_several_matches() {
    let db = TestDb::new();
    db.add_university("МГУ").await;
    db.add_university("МГУ").await;

    let err = db
        .universities
        .find_one(Criteria::new().eq("name", "МГУ".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AmbiguousMatch { table: "universities", count: 2 }));
}

#[tokio::test]
async fn test_find_one_stops_after_second_match() {
    let db = TestDb::new();
    for _ in 0..3 {
        db.add_university("МГУ").await;
    }

    let err = db
        .universities
        .find_one(Criteria::new().eq("name", "МГУ".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AmbiguousMatch { count: 2, .. }));
}

#[tokio::test]
async fn test_find_first_returns_lowest_id() {
    let db = TestDb::new();
    let first = db.add_university("МГУ").await;
    db.add_university("МГУ").await;

    let found = db
        .universities
        .find_by_filter(Criteria::new().eq("name", "МГУ".to_string()), Match::First)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, first);
}

#[tokio::test]
async fn test_find_one_with_no_match_is_none() {
    let db = TestDb::new();
    let found = db
        .universities
        .find_one(Criteria::new().eq("name", "нет такого".to_string()))
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_unknown_filter_column_rejected() {
    let db = TestDb::new();
    let err = db
        .universities
        .get_all(Criteria::new().eq("rating", 5_i64))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnknownColumn { .. }));
}

#[tokio::test]
async fn test_delete_university_cascades_to_specialties() {
    let db = TestDb::new();
    let mgu = db.add_university("МГУ").await;
    db.add_specialty("Механика", mgu).await;
    db.add_specialty("Экономика", mgu).await;

    assert!(db.universities.delete_by_id(mgu).await.unwrap());
    assert_eq!(db.specialties.count(Criteria::new()).await.unwrap(), 0);
    assert!(!db.universities.delete_by_id(mgu).await.unwrap());
}

#[tokio::test]
async fn test_specialty_requires_existing_university() {
    let db = TestDb::new();
    let err = db.specialties.insert(&specialty("Сирота", 999)).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}

#[tokio::test]
async fn test_invalid_specialty_rejected_before_insert() {
    let db = TestDb::new();
    let mgu = db.add_university("МГУ").await;
    let mut bad = specialty("Перегруз", mgu);
    bad.practical_hours = bad.total_hours + 1;

    let err = db.specialties.insert(&bad).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(db.specialties.count(Criteria::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_raw_add_surfaces_constraint_violation() {
    let db = TestDb::new();
    let mgu = db.add_university("МГУ").await;

    let fields = Fields::new()
        .eq("name", "Бесплатная".to_string())
        .eq("institute", "И".to_string())
        .eq("description", "Д".to_string())
        .eq("cost_of_education", 0_i64)
        .eq("total_hours", 10_i64)
        .eq("practical_hours", 1_i64)
        .eq("average_hours", 1_i64)
        .eq("count_exams", 0_i64)
        .eq("count_coursework", 0_i64)
        .eq("count_budget", 0_i64)
        .eq("min_mark", 0_i64)
        .eq("average_mark", 0_i64)
        .eq("university_id", mgu);
    let err = db.specialties.add(fields).await.unwrap_err();
    assert!(matches!(err, AppError::Database(_)));
}
