//! Stateless dialog router
//!
//! Turns one inbound `Input` into one `Reply`. Each call resolves an
//! `Action`, loads at most a handful of rows through the DAOs and renders
//! text plus a keyboard. Nothing is remembered between calls.

use std::sync::Arc;

use teloxide::types::InlineKeyboardMarkup;

use super::action::Action;
use super::format;
use super::keyboards;
use crate::core::config::Config;
use crate::core::error::AppResult;
use crate::storage::dao::{Criteria, Dao};
use crate::storage::models::{Specialty, University};
use crate::telegram::bot::Command;

/// Inbound event, already stripped of transport details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A new chat with the bot
    Started,
    Command(Command),
    /// Callback data of a pressed button
    Payload(String),
    /// Free text typed by the user
    Text(String),
}

/// Text and keyboard to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: InlineKeyboardMarkup,
}

impl Reply {
    pub fn new(text: String, keyboard: InlineKeyboardMarkup) -> Self {
        Self { text, keyboard }
    }

    fn with_back(text: String) -> Self {
        Self::new(text, keyboards::back_to_menu_keyboard())
    }

    fn with_main_menu(text: String) -> Self {
        Self::new(text, keyboards::main_menu_keyboard())
    }
}

pub struct Router {
    config: Arc<Config>,
    universities: Dao<University>,
    specialties: Dao<Specialty>,
}

impl Router {
    pub fn new(config: Arc<Config>, universities: Dao<University>, specialties: Dao<Specialty>) -> Self {
        Self {
            config,
            universities,
            specialties,
        }
    }

    /// Produces the reply for `input`. Never fails: store errors are logged
    /// and answered with an apology and the main menu.
    pub async fn handle(&self, input: Input) -> Reply {
        match self.try_handle(input).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Failed to build reply: {}", e);
                Reply::with_main_menu(format::error_text())
            }
        }
    }

    async fn try_handle(&self, input: Input) -> AppResult<Reply> {
        let action = match input {
            Input::Started | Input::Command(Command::Start) => {
                return Ok(Reply::with_main_menu(format::welcome_text()));
            }
            Input::Command(Command::Universities) => Action::Universities,
            Input::Command(Command::Specs) => Action::Specialties,
            Input::Command(Command::Help) => Action::Help,
            Input::Command(Command::Search(term)) => Action::Search(term),
            Input::Payload(token) => match Action::parse(&token) {
                Action::Unknown => {
                    log::warn!("Unknown payload: {}", token);
                    return Ok(Reply::with_main_menu(format::unrecognized_text(&token)));
                }
                action => action,
            },
            Input::Text(text) => match Action::from_text(&text) {
                Some(action) => action,
                None => return Ok(Reply::with_main_menu(format::unrecognized_text(&text))),
            },
        };

        log::debug!("Dispatching action {}", action.name());
        self.dispatch(action).await
    }

    async fn dispatch(&self, action: Action) -> AppResult<Reply> {
        let support = &self.config.support;

        let reply = match action {
            Action::MainMenu => Reply::with_main_menu(format::main_menu_text()),
            Action::Universities => self.universities_list().await?,
            Action::Specialties => self.specialties_list().await?,
            Action::Payment => Reply::with_back(format::payment_text(support)),
            Action::Support => Reply::with_back(format::support_text(support)),
            Action::SearchHelp => Reply::with_back(format::search_prompt_text()),
            Action::Help => Reply::with_back(format::help_text(support)),
            Action::University(id) => self.university_detail(id).await?,
            Action::UniversitySpecialties(id) => self.university_specialties(id).await?,
            Action::Specialty(id) => self.specialty_detail(id).await?,
            Action::Apply(id) => self.apply_info(id).await?,
            Action::Search(term) => self.search(&term).await?,
            Action::Unknown => Reply::with_main_menu(format::unrecognized_text("")),
        };
        Ok(reply)
    }

    async fn universities_list(&self) -> AppResult<Reply> {
        let display = &self.config.display;
        let mut universities = self.universities.get_all(Criteria::new()).await?;
        let total = universities.len();
        universities.truncate(display.max_list_items);

        Ok(Reply::new(
            format::universities_list(&universities, total),
            keyboards::universities_keyboard(&universities, display.buttons_per_row),
        ))
    }

    async fn specialties_list(&self) -> AppResult<Reply> {
        let mut specialties = self.specialties.get_all(Criteria::new()).await?;
        let total = specialties.len();
        specialties.truncate(self.config.display.max_list_items);

        Ok(Reply::new(
            format::specialties_list(None, &specialties, total),
            keyboards::specialties_keyboard(&specialties),
        ))
    }

    async fn university_detail(&self, id: i64) -> AppResult<Reply> {
        let Some(university) = self.universities.find_by_id(id).await? else {
            return Ok(Reply::with_back(format::university_not_found_text()));
        };
        let specialty_count = self
            .specialties
            .count(Criteria::new().eq("university_id", id))
            .await?;

        Ok(Reply::new(
            format::university_card(&university, usize::try_from(specialty_count).unwrap_or_default()),
            keyboards::university_actions_keyboard(university.id),
        ))
    }

    async fn university_specialties(&self, id: i64) -> AppResult<Reply> {
        let Some(university) = self.universities.find_by_id(id).await? else {
            return Ok(Reply::with_back(format::university_not_found_text()));
        };
        let mut specialties = self
            .specialties
            .get_all(Criteria::new().eq("university_id", id))
            .await?;
        let total = specialties.len();
        specialties.truncate(self.config.display.max_list_items);

        Ok(Reply::new(
            format::specialties_list(Some(&university), &specialties, total),
            keyboards::specialties_keyboard(&specialties),
        ))
    }

    async fn specialty_detail(&self, id: i64) -> AppResult<Reply> {
        let Some(specialty) = self.specialties.find_by_id(id).await? else {
            return Ok(Reply::with_back(format::specialty_not_found_text()));
        };
        let university = self.universities.find_by_id(specialty.university_id).await?;

        Ok(Reply::new(
            format::specialty_card(&specialty, university.as_ref()),
            keyboards::specialty_actions_keyboard(specialty.university_id),
        ))
    }

    async fn apply_info(&self, id: i64) -> AppResult<Reply> {
        let Some(university) = self.universities.find_by_id(id).await? else {
            return Ok(Reply::with_back(format::university_not_found_text()));
        };

        Ok(Reply::new(
            format::apply_text(&university, &self.config.support),
            keyboards::apply_keyboard(university.id),
        ))
    }

    /// Case-insensitive substring search over specialty name and institute.
    async fn search(&self, term: &str) -> AppResult<Reply> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Reply::with_back(format::empty_search_text()));
        }

        let query = term.to_lowercase();
        let found: Vec<Specialty> = self
            .specialties
            .get_all(Criteria::new())
            .await?
            .into_iter()
            .filter(|specialty| specialty.matches(&query))
            .collect();
        let total = found.len();
        let shown = &found[..total.min(self.config.display.search_results_limit)];
        log::info!("Search {:?}: {} hits", term, total);

        Ok(Reply::new(
            format::search_results(term, shown, total),
            keyboards::specialties_keyboard(shown),
        ))
    }
}
