//! Inline keyboards for every screen

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::action::{
    apply_payload, specialty_payload, university_payload, university_specialties_payload, MAIN_MENU,
    SHOW_PAYMENT, SHOW_SEARCH, SHOW_SPECIALTIES, SHOW_SUPPORT, SHOW_UNIVERSITIES,
};
use crate::storage::models::{Specialty, University};

/// Callback button shorthand
pub fn cb(text: impl Into<String>, payload: impl Into<String>) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text.into(), payload.into())
}

fn main_menu_row() -> Vec<InlineKeyboardButton> {
    vec![cb("🏠 Главное меню", MAIN_MENU)]
}

pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            cb("🏛️ Выбрать вуз", SHOW_UNIVERSITIES),
            cb("📚 Специальности", SHOW_SPECIALTIES),
        ],
        vec![
            cb("💳 Стоимость обучения", SHOW_PAYMENT),
            cb("🛟 Поддержка", SHOW_SUPPORT),
        ],
        vec![cb("🔍 Поиск", SHOW_SEARCH)],
    ])
}

pub fn back_to_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![main_menu_row()])
}

/// One button per university, `per_row` to a row, followed by the main menu.
pub fn universities_keyboard(universities: &[University], per_row: usize) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = universities
        .chunks(per_row.max(1))
        .map(|chunk| {
            chunk
                .iter()
                .map(|university| cb(university.name.clone(), university_payload(university.id)))
                .collect()
        })
        .collect();
    rows.push(main_menu_row());
    InlineKeyboardMarkup::new(rows)
}

/// One specialty per row, followed by the main menu.
pub fn specialties_keyboard(specialties: &[Specialty]) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = specialties
        .iter()
        .map(|specialty| vec![cb(specialty.name.clone(), specialty_payload(specialty.id))])
        .collect();
    rows.push(main_menu_row());
    InlineKeyboardMarkup::new(rows)
}

pub fn university_actions_keyboard(university_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("📚 Специальности вуза", university_specialties_payload(university_id))],
        vec![cb("📝 Подать документы", apply_payload(university_id))],
        vec![
            cb("🏛️ Другие вузы", SHOW_UNIVERSITIES),
            cb("🏠 Главное меню", MAIN_MENU),
        ],
    ])
}

pub fn specialty_actions_keyboard(university_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("🏛️ О вузе", university_payload(university_id))],
        vec![
            cb("📚 Все специальности", SHOW_SPECIALTIES),
            cb("🏠 Главное меню", MAIN_MENU),
        ],
    ])
}

/// Shown after the application info: back to the university or the menu.
pub fn apply_keyboard(university_id: i64) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![cb("⬅️ К вузу", university_payload(university_id))],
        main_menu_row(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use teloxide::types::InlineKeyboardButtonKind;

    fn payloads(keyboard: &InlineKeyboardMarkup) -> Vec<Vec<String>> {
        keyboard
            .inline_keyboard
            .iter()
            .map(|row| {
                row.iter()
                    .map(|button| match &button.kind {
                        InlineKeyboardButtonKind::CallbackData(data) => data.clone(),
                        other => panic!("unexpected button kind {:?}", other),
                    })
                    .collect()
            })
            .collect()
    }

    fn university(id: i64) -> University {
        University {
            id,
            name: format!("Вуз {}", id),
            location: "Москва".to_string(),
            count_students: 0,
            count_campus: 0,
            count_branches: 0,
        }
    }

    #[test]
    fn test_main_menu_layout() {
        let keyboard = main_menu_keyboard();
        assert_eq!(
            payloads(&keyboard),
            vec![
                vec!["show_universities", "show_specialties"],
                vec!["show_payment", "show_support"],
                vec!["show_search"],
            ]
        );
    }

    #[test]
    fn test_universities_rows_respect_per_row() {
        let list: Vec<University> = (1..=3).map(university).collect();
        let keyboard = universities_keyboard(&list, 2);
        assert_eq!(
            payloads(&keyboard),
            vec![
                vec!["university_1", "university_2"],
                vec!["university_3"],
                vec!["main_menu"],
            ]
        );
    }

    #[test]
    fn test_empty_universities_still_offers_menu() {
        let keyboard = universities_keyboard(&[], 2);
        assert_eq!(payloads(&keyboard), vec![vec!["main_menu"]]);
    }

    #[test]
    fn test_university_actions() {
        let keyboard = university_actions_keyboard(4);
        assert_eq!(
            payloads(&keyboard),
            vec![
                vec!["uni_specs_4"],
                vec!["apply_4"],
                vec!["show_universities", "main_menu"],
            ]
        );
    }

    #[test]
    fn test_specialty_actions_link_back_to_university() {
        let keyboard = specialty_actions_keyboard(4);
        assert_eq!(payloads(&keyboard)[0], vec!["university_4"]);
    }
}
