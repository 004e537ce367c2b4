//! Message texts
//!
//! All texts are HTML (`ParseMode::Html`); anything that comes from the
//! database or from the user is escaped before it is embedded.

use indoc::{formatdoc, indoc};
use itertools::Itertools;
use teloxide::utils::html::escape;

use crate::core::config::SupportConfig;
use crate::storage::models::{Specialty, University};

/// Formats an integer with space-separated thousands: `250000` -> `250 000`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let head = digits.len() % 3;
    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&digits[..head]);
    }
    groups.extend((head..digits.len()).step_by(3).map(|start| &digits[start..start + 3]));

    let sign = if value < 0 { "-" } else { "" };
    format!("{}{}", sign, groups.join(" "))
}

/// Longest user query echoed back in a reply, in chars.
pub const QUERY_ECHO_LIMIT: usize = 100;

/// Trims `text` to at most `max_chars` chars, marking a cut with `…`.
fn clip(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", truncated)
}

/// The user's query as it is quoted back: clipped, then escaped.
fn quoted(query: &str) -> String {
    escape(&clip(query, QUERY_ECHO_LIMIT))
}

pub fn welcome_text() -> String {
    indoc! {"
        🎉 <b>Добро пожаловать в бот-помощник для абитуриентов!</b>

        Я помогу вам:
        • 🏛️ Найти подходящий университет
        • 📚 Выбрать специальность
        • 💳 Узнать стоимость обучения
        • 🎯 Оценить свои шансы по проходным баллам

        Выберите действие в меню ниже 👇"}
    .to_string()
}

pub fn main_menu_text() -> String {
    "🏠 <b>Главное меню</b>\n\nВыберите интересующий вас раздел:".to_string()
}

pub fn help_text(support: &SupportConfig) -> String {
    formatdoc! {"
        ❓ <b>Справка по использованию бота</b>

        <b>Команды:</b>
        /start - главное меню
        /universities - список университетов
        /specs - список специальностей
        /search &lt;запрос&gt; - поиск специальности
        /help - эта справка

        <b>Как пользоваться:</b>
        1. Используйте кнопки для навигации
        2. Напишите «поиск экономика», чтобы найти специальность
        3. Откройте вуз, чтобы увидеть его специальности

        Техническая поддержка: {phone}, {email}",
        phone = escape(&support.phone),
        email = escape(&support.email),
    }
}

pub fn payment_text(support: &SupportConfig) -> String {
    formatdoc! {"
        💳 <b>Информация об оплате обучения</b>

        Стоимость обучения указана в карточке каждой специальности (руб/год).

        <b>Способы оплаты:</b>
        • Банковской картой онлайн
        • Банковский перевод
        • Наличными в кассе университета

        <b>Контакты бухгалтерии:</b>
        Телефон: {phone}
        Email: {email}
        График: Пн-Пт 9:00-18:00",
        phone = escape(&support.phone),
        email = escape(&support.finance_email),
    }
}

pub fn support_text(support: &SupportConfig) -> String {
    formatdoc! {"
        🛟 <b>Служба поддержки</b>

        Горячая линия: {phone}
        Email: {email}

        <b>График работы:</b>
        Пн-Пт: 9:00-18:00
        Сб: 10:00-16:00
        Вс: выходной

        Мы всегда рады помочь с выбором университета и подачей документов!",
        phone = escape(&support.phone),
        email = escape(&support.email),
    }
}

pub fn search_prompt_text() -> String {
    indoc! {"
        🔍 <b>Поиск специальности</b>

        Напишите запрос в чат, например:
        <code>поиск экономика</code>

        или воспользуйтесь командой <code>/search информатика</code>.
        Ищу по названию специальности и института."}
    .to_string()
}

pub fn empty_search_text() -> String {
    "🔍 Укажите, что искать: например, <code>поиск экономика</code>.".to_string()
}

pub fn unrecognized_text(query: &str) -> String {
    formatdoc! {"
        🤔 Не понял запрос: «{query}»

        Используйте кнопки ниже или напишите:
        • <code>поиск</code> и название специальности
        • /start для главного меню
        • /help для справки",
        query = quoted(query),
    }
}

pub fn university_not_found_text() -> String {
    "😕 Университет не найден. Возможно, он был удалён из базы.".to_string()
}

pub fn specialty_not_found_text() -> String {
    "😕 Специальность не найдена. Возможно, она была удалена из базы.".to_string()
}

pub fn error_text() -> String {
    "⚠️ Произошла ошибка при обработке запроса. Попробуйте позже.".to_string()
}

/// One line in a university list: name and the first part of the location.
pub fn university_short(university: &University) -> String {
    let city = university.location.split(',').next().unwrap_or_default().trim();
    format!("🎓 {} | 📍 {}", escape(&university.name), escape(city))
}

pub fn university_card(university: &University, specialty_count: usize) -> String {
    formatdoc! {"
        🎓 <b>{name}</b>

        📍 <b>Расположение:</b> {location}
        👥 <b>Студентов:</b> {students}
        🏘️ <b>Кампусов:</b> {campus}
        🌐 <b>Филиалов:</b> {branches}
        📚 <b>Специальностей в базе:</b> {specialties}

        Выберите действие:",
        name = escape(&university.name),
        location = escape(&university.location),
        students = group_thousands(university.count_students),
        campus = university.count_campus,
        branches = university.count_branches,
        specialties = specialty_count,
    }
}

/// One line in a specialty list: name, minimum mark and tuition.
pub fn specialty_short(specialty: &Specialty) -> String {
    format!(
        "📚 {} | 🎯 {} | 💵 {} руб",
        escape(&specialty.name),
        specialty.min_mark,
        group_thousands(specialty.cost_of_education)
    )
}

/// Full specialty card. The owning university is shown when it was loaded.
pub fn specialty_card(specialty: &Specialty, university: Option<&University>) -> String {
    let university = university.map_or_else(|| "не указан".to_string(), |u| escape(&u.name));

    formatdoc! {"
        📚 <b>{name}</b>

        🏛️ <b>Университет:</b> {university}
        🏫 <b>Институт:</b> {institute}
        💵 <b>Стоимость обучения:</b> {cost} руб/год
        🎯 <b>Минимальный балл:</b> {min_mark}
        ⭐ <b>Средний балл:</b> {average_mark}
        🎓 <b>Бюджетные места:</b> {budget}

        ⏰ <b>Нагрузка:</b>
           • Всего часов: {total_hours}
           • Практические часы: {practical_hours}
           • В среднем в неделю: {average_hours}

        📊 <b>Аттестация:</b>
           • Экзамены: {exams}
           • Курсовые работы: {coursework}

        📖 <b>Описание:</b>
        {description}",
        name = escape(&specialty.name),
        university = university,
        institute = escape(&specialty.institute),
        cost = group_thousands(specialty.cost_of_education),
        min_mark = specialty.min_mark,
        average_mark = specialty.average_mark,
        budget = group_thousands(specialty.count_budget),
        total_hours = group_thousands(specialty.total_hours),
        practical_hours = group_thousands(specialty.practical_hours),
        average_hours = specialty.average_hours,
        exams = specialty.count_exams,
        coursework = specialty.count_coursework,
        description = escape(&specialty.description),
    }
}

fn numbered<T>(items: &[T], line: impl Fn(&T) -> String) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, line(item)))
        .join("\n")
}

fn shown_of_total(shown: usize, total: usize) -> String {
    if shown < total {
        format!("\n\nПоказаны первые {} из {}.", shown, total)
    } else {
        String::new()
    }
}

/// University list; `shown` is already capped, `total` is the full count.
pub fn universities_list(shown: &[University], total: usize) -> String {
    if shown.is_empty() {
        return "🏛️ <b>Доступные вузы</b>\n\nПока нет данных об университетах.".to_string();
    }
    format!(
        "🏛️ <b>Доступные вузы</b>\n\n{}{}\n\nНажмите на кнопку, чтобы узнать подробнее:",
        numbered(shown, university_short),
        shown_of_total(shown.len(), total)
    )
}

/// Specialty list, optionally scoped to one university.
pub fn specialties_list(university: Option<&University>, shown: &[Specialty], total: usize) -> String {
    let header = match university {
        Some(university) => format!("📚 <b>Специальности: {}</b>", escape(&university.name)),
        None => "📚 <b>Доступные специальности</b>".to_string(),
    };
    if shown.is_empty() {
        return format!("{}\n\nПока нет данных о специальностях.", header);
    }
    format!(
        "{}\n\n{}{}",
        header,
        numbered(shown, specialty_short),
        shown_of_total(shown.len(), total)
    )
}

/// Search results with the total number of hits.
pub fn search_results(query: &str, shown: &[Specialty], total: usize) -> String {
    let query = quoted(query);
    if total == 0 {
        return format!(
            "🔍 По запросу «{}» ничего не найдено.\n\nПопробуйте другое слово или откройте список специальностей.",
            query
        );
    }
    format!(
        "🔍 <b>Результаты поиска:</b> «{}»\nНайдено: {}\n\n{}{}",
        query,
        total,
        numbered(shown, specialty_short),
        shown_of_total(shown.len(), total)
    )
}

pub fn apply_text(university: &University, support: &SupportConfig) -> String {
    formatdoc! {"
        📝 <b>Подача документов: {name}</b>

        Для поступления подготовьте:
        • паспорт
        • аттестат или диплом
        • результаты ЕГЭ
        • СНИЛС
        • фотографии 3x4

        Документы принимаются онлайн через Госуслуги или лично в приёмной комиссии ({location}).

        Вопросы по поступлению: {phone}, {email}",
        name = escape(&university.name),
        location = escape(&university.location),
        phone = escape(&support.phone),
        email = escape(&support.email),
    }
}
