/// Recipe book window
///
/// Glue between iced and the controller: UI messages become controller
/// calls, and the `Effect`s the controller returns become iced tasks
/// talking to the script API.
use iced::widget::text_editor;
use iced::{keyboard, Element, Subscription, Task, Theme};
use tracing::info;

use super::controller::{Controller, Effect, SaveTarget, Screen};
use super::model::{Category, CategoryFilter, Recipe};
use super::view;
use crate::config::RecipesConfig;
use crate::error::AppError;
use crate::gateway::{SheetClient, WriteAck};

/// Multi-line form fields. iced keeps their cursor and selection state, so
/// they live here rather than in the controller; the controller always
/// holds a copy of their text.
#[derive(Default)]
pub struct Editors {
    pub ingredients: text_editor::Content,
    pub instructions: text_editor::Content,
}

/// Main application state
pub struct RecipeBook {
    controller: Controller,
    client: SheetClient,
    editors: Editors,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    Navigate(Screen),
    SearchChanged(String),
    ClearSearch,
    CategorySelected(CategoryFilter),
    OpenRecipe(String),
    CloseRecipe,
    EditRequested,
    DeleteRequested,
    NameChanged(String),
    CategoryPicked(Category),
    IngredientsEdited(text_editor::Action),
    InstructionsEdited(text_editor::Action),
    SubmitForm,
    CancelForm,
    PasswordChanged(String),
    SubmitPassword,
    CancelAuth,
    /// Escape pressed anywhere in the window
    Escape,
    RecipesLoaded(Result<Vec<Recipe>, AppError>),
    PasswordChecked(Result<bool, AppError>),
    Saved(SaveTarget, Result<WriteAck, AppError>),
    Deleted(String, Result<WriteAck, AppError>),
    ReloadDue(bool),
    BannerExpired(u64),
}

impl RecipeBook {
    /// Create the window state and start the first listing
    pub fn new(config: RecipesConfig) -> (Self, Task<Message>) {
        info!(endpoint = %config.script_url, "starting recipe book");

        let mut app = RecipeBook {
            client: SheetClient::new(&config.script_url),
            controller: Controller::new(config),
            editors: Editors::default(),
        };

        let effects = app.controller.start();
        let task = app.run(effects);
        (app, task)
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        let controller = &mut self.controller;

        let effects = match message {
            Message::Navigate(screen) => controller.navigate(screen),
            Message::SearchChanged(term) => {
                controller.search_changed(term);
                Vec::new()
            }
            Message::ClearSearch => {
                controller.clear_search();
                Vec::new()
            }
            Message::CategorySelected(filter) => {
                controller.select_category(filter);
                Vec::new()
            }
            Message::OpenRecipe(id) => {
                controller.open_detail(id);
                Vec::new()
            }
            Message::CloseRecipe => {
                controller.close_detail();
                Vec::new()
            }
            Message::EditRequested => controller.request_edit(),
            Message::DeleteRequested => controller.request_delete(),
            Message::NameChanged(name) => {
                controller.set_name(name);
                Vec::new()
            }
            Message::CategoryPicked(category) => {
                controller.set_category(category);
                Vec::new()
            }
            Message::IngredientsEdited(action) => {
                self.editors.ingredients.perform(action);
                controller.set_ingredients(self.editors.ingredients.text());
                Vec::new()
            }
            Message::InstructionsEdited(action) => {
                self.editors.instructions.perform(action);
                controller.set_instructions(self.editors.instructions.text());
                Vec::new()
            }
            Message::SubmitForm => controller.submit_form(),
            Message::CancelForm => controller.cancel_form(),
            Message::PasswordChanged(password) => {
                controller.password_changed(password);
                Vec::new()
            }
            Message::SubmitPassword => controller.submit_password(),
            Message::CancelAuth => {
                controller.cancel_auth();
                Vec::new()
            }
            Message::Escape => {
                controller.escape();
                Vec::new()
            }
            Message::RecipesLoaded(result) => controller.recipes_loaded(result),
            Message::PasswordChecked(result) => controller.password_checked(result),
            Message::Saved(target, result) => controller.saved(target, result),
            Message::Deleted(id, result) => controller.deleted(id, result),
            Message::ReloadDue(to_dashboard) => controller.reload_due(to_dashboard),
            Message::BannerExpired(id) => {
                controller.banner_expired(id);
                Vec::new()
            }
        };

        self.run(effects)
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        view::view(&self.controller, &self.editors)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        keyboard::on_key_press(|key, _modifiers| match key {
            keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::Escape),
            _ => None,
        })
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        Theme::Light
    }

    fn run(&mut self, effects: Vec<Effect>) -> Task<Message> {
        Task::batch(effects.into_iter().map(|effect| self.perform(effect)))
    }

    fn perform(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::FetchRecipes => {
                let client = self.client.clone();
                Task::perform(
                    async move { client.list_recipes().await.map_err(AppError::from) },
                    Message::RecipesLoaded,
                )
            }
            Effect::ValidatePassword(candidate) => {
                let client = self.client.clone();
                Task::perform(
                    async move {
                        client
                            .validate_password(&candidate)
                            .await
                            .map_err(AppError::from)
                    },
                    Message::PasswordChecked,
                )
            }
            Effect::Save { target, draft } => {
                let client = self.client.clone();
                let request = target.clone();
                Task::perform(
                    async move {
                        let result = match &request {
                            SaveTarget::Create => client.create_recipe(&draft).await,
                            SaveTarget::Update(id) => client.update_recipe(id, &draft).await,
                        };
                        result.map_err(AppError::from)
                    },
                    move |result| Message::Saved(target.clone(), result),
                )
            }
            Effect::Delete(id) => {
                let client = self.client.clone();
                let target = id.clone();
                Task::perform(
                    async move { client.delete_recipe(&target).await.map_err(AppError::from) },
                    move |result| Message::Deleted(id.clone(), result),
                )
            }
            Effect::ScheduleReload { after, to_dashboard } => Task::perform(
                tokio::time::sleep(after),
                move |_| Message::ReloadDue(to_dashboard),
            ),
            Effect::ExpireBanner { id, after } => {
                Task::perform(tokio::time::sleep(after), move |_| Message::BannerExpired(id))
            }
            Effect::FormReplaced => {
                let form = self.controller.form();
                self.editors.ingredients = text_editor::Content::with_text(&form.ingredients);
                self.editors.instructions = text_editor::Content::with_text(&form.instructions);
                Task::none()
            }
        }
    }
}
