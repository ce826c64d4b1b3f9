/// Recipe book controller
///
/// All UI events go through here. The controller mutates the store and its
/// own view state, and returns the side effects it wants performed as
/// `Effect`s; `app.rs` turns those into iced tasks. Keeping effects as plain
/// data lets the whole state machine be tested without a window or network.
///
/// Privileged actions (create, edit, delete) each require the shared
/// password, entered fresh every time:
///
/// ```text
/// Idle ── request ──> AwaitingPassword(action) ── valid ──> Executing(action) ── result ──> Idle
///                            │  ▲
///                            └──┘ rejected: stays, error shown
/// ```
///
/// Once an edit has been authorised the form stays in edit mode, and
/// submitting it saves directly without asking for the password again.
/// Create and delete always re-prompt.
///
/// Writes are not serialised. A second action can be started while the
/// first is still in flight; both complete in whatever order the server
/// answers and the follow-up listing reconciles the store.
use std::time::Duration;

use tracing::{debug, error, info, warn};

use super::model::{Category, CategoryFilter, Recipe, RecipeDraft};
use super::store::RecipeStore;
use crate::config::RecipesConfig;
use crate::error::AppError;
use crate::gateway::WriteAck;
use crate::ui::{BannerKind, Banners};

const MSG_MISSING_FIELDS: &str = "Por favor completa todos los campos";
const MSG_WRONG_PASSWORD: &str = "Contraseña incorrecta";
const MSG_PASSWORD_CHECK_FAILED: &str = "Error al validar contraseña";
const MSG_LOADED_FOR_EDIT: &str = "Receta cargada para edición";
const MSG_NOT_FOUND: &str = "No se encontró la receta";
const MSG_DELETING: &str = "Eliminando receta...";
const MSG_DELETED: &str = "Receta eliminada exitosamente";
const MSG_DELETE_FAILED: &str = "Error al eliminar la receta";
const MSG_CREATED: &str = "Receta guardada exitosamente";
const MSG_UPDATED: &str = "Receta actualizada exitosamente";
const MSG_SAVE_FAILED: &str = "Error al conectar con el servidor.";

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Dashboard,
    Form,
}

/// An action that needs the shared password
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivilegedAction {
    Create,
    Edit { id: String, name: String },
    Delete { id: String, name: String },
}

impl PrivilegedAction {
    pub fn title(&self) -> &'static str {
        match self {
            PrivilegedAction::Create => "Crear Nueva Receta",
            PrivilegedAction::Edit { .. } => "Editar Receta",
            PrivilegedAction::Delete { .. } => "Eliminar Receta",
        }
    }

    pub fn prompt(&self) -> String {
        match self {
            PrivilegedAction::Create => {
                "Ingresa la contraseña para crear una nueva receta".to_string()
            }
            PrivilegedAction::Edit { name, .. } => {
                format!("Ingresa la contraseña para editar \"{}\"", name)
            }
            PrivilegedAction::Delete { name, .. } => {
                format!("Ingresa la contraseña para eliminar \"{}\"", name)
            }
        }
    }
}

/// State of the password dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrompt {
    pub action: PrivilegedAction,
    pub password: String,
    pub error: Option<String>,
    /// A password check is in flight
    pub validating: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Idle,
    AwaitingPassword(AuthPrompt),
    Executing(PrivilegedAction),
}

/// Recipe listing status for the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Loading,
    Ready,
    Failed(String),
}

/// Form field values as typed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeForm {
    pub name: String,
    pub category: Option<Category>,
    pub ingredients: String,
    pub instructions: String,
}

impl RecipeForm {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            category: Some(recipe.category),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
        }
    }

    /// Trimmed draft; every field is required
    pub fn to_draft(&self) -> Result<RecipeDraft, AppError> {
        let name = self.name.trim();
        let ingredients = self.ingredients.trim();
        let instructions = self.instructions.trim();

        match self.category {
            Some(category)
                if !name.is_empty() && !ingredients.is_empty() && !instructions.is_empty() =>
            {
                Ok(RecipeDraft {
                    name: name.to_string(),
                    category,
                    ingredients: ingredients.to_string(),
                    instructions: instructions.to_string(),
                })
            }
            _ => Err(AppError::Validation(MSG_MISSING_FIELDS.to_string())),
        }
    }
}

/// Whether a save creates a recipe or replaces one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(String),
}

/// Side effects requested by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchRecipes,
    ValidatePassword(String),
    Save { target: SaveTarget, draft: RecipeDraft },
    Delete(String),
    /// Re-list after a write; optionally return to the dashboard
    ScheduleReload { after: Duration, to_dashboard: bool },
    ExpireBanner { id: u64, after: Duration },
    /// The form fields were replaced wholesale (reset or loaded for edit)
    FormReplaced,
}

pub struct Controller {
    store: RecipeStore,
    screen: Screen,
    auth: AuthState,
    /// Recipe shown in the detail dialog
    detail: Option<String>,
    form: RecipeForm,
    /// Search box contents as typed
    search_input: String,
    listing: Listing,
    submitting: bool,
    banners: Banners,
    timings: RecipesConfig,
}

impl Controller {
    pub fn new(timings: RecipesConfig) -> Self {
        Self {
            store: RecipeStore::new(),
            screen: Screen::Dashboard,
            auth: AuthState::Idle,
            detail: None,
            form: RecipeForm::default(),
            search_input: String::new(),
            listing: Listing::Loading,
            submitting: false,
            banners: Banners::new(),
            timings,
        }
    }

    // ========== Accessors for the view ==========

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn detail(&self) -> Option<&Recipe> {
        self.detail.as_deref().and_then(|id| self.store.find(id))
    }

    pub fn form(&self) -> &RecipeForm {
        &self.form
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn banners(&self) -> &Banners {
        &self.banners
    }

    pub fn is_editing(&self) -> bool {
        self.store.edit_session().is_active()
    }

    // ========== Startup and navigation ==========

    pub fn start(&mut self) -> Vec<Effect> {
        self.listing = Listing::Loading;
        vec![Effect::FetchRecipes]
    }

    /// Switch screens. Entering the form resets it unless an edit is in progress.
    pub fn navigate(&mut self, screen: Screen) -> Vec<Effect> {
        self.screen = screen;
        if screen == Screen::Form && !self.is_editing() {
            return self.reset_form();
        }
        Vec::new()
    }

    /// Leave the form, abandoning any edit session
    pub fn cancel_form(&mut self) -> Vec<Effect> {
        self.store.end_edit();
        self.screen = Screen::Dashboard;
        self.reset_form()
    }

    // ========== Search and filters ==========

    pub fn search_changed(&mut self, raw: String) {
        self.store.set_search_term(&raw);
        self.search_input = raw;
    }

    pub fn clear_search(&mut self) {
        self.search_changed(String::new());
    }

    pub fn select_category(&mut self, filter: CategoryFilter) {
        self.store.set_category(filter);
    }

    // ========== Detail dialog ==========

    pub fn open_detail(&mut self, id: String) {
        self.detail = Some(id);
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    /// Edit button in the detail dialog
    pub fn request_edit(&mut self) -> Vec<Effect> {
        self.request_from_detail(|recipe| PrivilegedAction::Edit {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
        })
    }

    /// Delete button in the detail dialog
    pub fn request_delete(&mut self) -> Vec<Effect> {
        self.request_from_detail(|recipe| PrivilegedAction::Delete {
            id: recipe.id.clone(),
            name: recipe.name.clone(),
        })
    }

    fn request_from_detail(&mut self, action: impl FnOnce(&Recipe) -> PrivilegedAction) -> Vec<Effect> {
        let Some(recipe) = self.detail() else {
            return Vec::new();
        };
        let action = action(recipe);
        self.close_detail();
        self.open_prompt(action);
        Vec::new()
    }

    // ========== Form ==========

    pub fn set_name(&mut self, name: String) {
        self.form.name = name;
    }

    pub fn set_category(&mut self, category: Category) {
        self.form.category = Some(category);
    }

    pub fn set_ingredients(&mut self, ingredients: String) {
        self.form.ingredients = ingredients;
    }

    pub fn set_instructions(&mut self, instructions: String) {
        self.form.instructions = instructions;
    }

    /// Form submit. In edit mode this saves straight away; otherwise it asks
    /// for the password first. Incomplete forms never leave the client.
    pub fn submit_form(&mut self) -> Vec<Effect> {
        if self.submitting {
            return Vec::new();
        }

        let draft = match self.form.to_draft() {
            Ok(draft) => draft,
            Err(err) => return self.show_error(&err),
        };

        match self.store.edit_session().recipe_id() {
            Some(id) => {
                debug!(id, "saving edit without re-prompt");
                let target = SaveTarget::Update(id.to_string());
                self.begin_save(target, draft)
            }
            None => {
                self.open_prompt(PrivilegedAction::Create);
                Vec::new()
            }
        }
    }

    /// Populate the form from `recipe` and enter edit mode
    pub fn load_recipe_for_edit(&mut self, recipe: &Recipe) -> Vec<Effect> {
        info!(id = %recipe.id, "loading recipe for edit");
        self.store.begin_edit(recipe.id.clone());
        self.form = RecipeForm::from_recipe(recipe);
        self.screen = Screen::Form;

        let mut effects = vec![Effect::FormReplaced];
        effects.extend(self.show_banner(BannerKind::Success, MSG_LOADED_FOR_EDIT));
        effects
    }

    fn reset_form(&mut self) -> Vec<Effect> {
        self.form = RecipeForm::default();
        vec![Effect::FormReplaced]
    }

    fn begin_save(&mut self, target: SaveTarget, draft: RecipeDraft) -> Vec<Effect> {
        self.submitting = true;
        self.banners.hide(BannerKind::Success);
        self.banners.hide(BannerKind::Error);
        vec![Effect::Save { target, draft }]
    }

    // ========== Password dialog ==========

    fn open_prompt(&mut self, action: PrivilegedAction) {
        debug!(?action, "asking for password");
        self.auth = AuthState::AwaitingPassword(AuthPrompt {
            action,
            password: String::new(),
            error: None,
            validating: false,
        });
    }

    pub fn password_changed(&mut self, password: String) {
        if let AuthState::AwaitingPassword(prompt) = &mut self.auth {
            prompt.password = password;
        }
    }

    pub fn submit_password(&mut self) -> Vec<Effect> {
        match &mut self.auth {
            AuthState::AwaitingPassword(prompt) if !prompt.validating => {
                prompt.validating = true;
                prompt.error = None;
                vec![Effect::ValidatePassword(prompt.password.clone())]
            }
            _ => Vec::new(),
        }
    }

    /// Close the password dialog. An in-flight check is not aborted; its
    /// result is ignored when it arrives.
    pub fn cancel_auth(&mut self) {
        if matches!(self.auth, AuthState::AwaitingPassword(_)) {
            self.auth = AuthState::Idle;
        }
    }

    /// Escape key: close whichever dialog is open
    pub fn escape(&mut self) {
        self.close_detail();
        self.cancel_auth();
    }

    // ========== Gateway results ==========

    pub fn recipes_loaded(&mut self, result: Result<Vec<Recipe>, AppError>) -> Vec<Effect> {
        match result {
            Ok(recipes) => {
                info!(count = recipes.len(), "recipes loaded");
                self.store.set_all(recipes);
                self.listing = Listing::Ready;
            }
            Err(err) => {
                error!(error = %err, "failed to load recipes");
                self.listing = Listing::Failed(err.to_string());
            }
        }
        Vec::new()
    }

    pub fn password_checked(&mut self, result: Result<bool, AppError>) -> Vec<Effect> {
        let AuthState::AwaitingPassword(prompt) = &mut self.auth else {
            debug!("password result arrived after the dialog closed, ignoring");
            return Vec::new();
        };
        prompt.validating = false;

        match result {
            Ok(true) => {
                let action = prompt.action.clone();
                info!(?action, "password accepted");
                self.execute(action)
            }
            Ok(false) => {
                warn!(error = %AppError::Auth, "password rejected");
                prompt.error = Some(MSG_WRONG_PASSWORD.to_string());
                Vec::new()
            }
            Err(err) => {
                error!(error = %err, "password check failed");
                prompt.error = Some(MSG_PASSWORD_CHECK_FAILED.to_string());
                Vec::new()
            }
        }
    }

    fn execute(&mut self, action: PrivilegedAction) -> Vec<Effect> {
        match action {
            PrivilegedAction::Create => match self.form.to_draft() {
                Ok(draft) => {
                    self.auth = AuthState::Executing(PrivilegedAction::Create);
                    self.begin_save(SaveTarget::Create, draft)
                }
                Err(err) => {
                    self.auth = AuthState::Idle;
                    self.show_error(&err)
                }
            },
            PrivilegedAction::Edit { id, .. } => {
                self.auth = AuthState::Idle;
                match self.store.find(&id).cloned() {
                    Some(recipe) => self.load_recipe_for_edit(&recipe),
                    None => self.show_error(&AppError::NotFound(id)),
                }
            }
            PrivilegedAction::Delete { id, name } => {
                info!(id = %id, "deleting recipe");
                self.auth = AuthState::Executing(PrivilegedAction::Delete {
                    id: id.clone(),
                    name,
                });
                let mut effects = self.show_banner(BannerKind::Success, MSG_DELETING);
                effects.push(Effect::Delete(id));
                effects
            }
        }
    }

    pub fn saved(&mut self, target: SaveTarget, result: Result<WriteAck, AppError>) -> Vec<Effect> {
        self.submitting = false;
        if target == SaveTarget::Create {
            self.finish_executing(|action| *action == PrivilegedAction::Create);
        }

        match result {
            Ok(ack) => {
                info!(?target, ?ack, "recipe saved");
                let mut effects = Vec::new();

                // Only clear the form this save came from; a newer edit
                // session started meanwhile keeps its fields.
                let text = match &target {
                    SaveTarget::Create => {
                        if !self.is_editing() {
                            effects.extend(self.reset_form());
                        }
                        MSG_CREATED
                    }
                    SaveTarget::Update(id) => {
                        if self.store.edit_session().recipe_id() == Some(id.as_str()) {
                            self.store.end_edit();
                            effects.extend(self.reset_form());
                        }
                        MSG_UPDATED
                    }
                };

                effects.extend(self.show_banner(BannerKind::Success, text));
                effects.push(Effect::ScheduleReload {
                    after: self.timings.reload_after_save(),
                    to_dashboard: true,
                });
                effects
            }
            Err(err) => {
                error!(?target, error = %err, "failed to save recipe");
                self.show_banner(BannerKind::Error, MSG_SAVE_FAILED)
            }
        }
    }

    pub fn deleted(&mut self, id: String, result: Result<WriteAck, AppError>) -> Vec<Effect> {
        self.finish_executing(
            |action| matches!(action, PrivilegedAction::Delete { id: running, .. } if *running == id),
        );

        match result {
            Ok(ack) => {
                info!(id = %id, ?ack, "recipe deleted");
                let mut effects = Vec::new();
                if self.store.edit_session().recipe_id() == Some(id.as_str()) {
                    self.store.end_edit();
                    effects.extend(self.reset_form());
                }
                effects.extend(self.show_banner(BannerKind::Success, MSG_DELETED));
                effects.push(Effect::ScheduleReload {
                    after: self.timings.reload_after_delete(),
                    to_dashboard: false,
                });
                effects
            }
            Err(err) => {
                error!(id = %id, error = %err, "failed to delete recipe");
                self.show_banner(BannerKind::Error, MSG_DELETE_FAILED)
            }
        }
    }

    /// Delayed follow-up of a write
    pub fn reload_due(&mut self, to_dashboard: bool) -> Vec<Effect> {
        if to_dashboard && !self.is_editing() {
            self.screen = Screen::Dashboard;
        }
        self.start()
    }

    pub fn banner_expired(&mut self, id: u64) {
        self.banners.expire(id);
    }

    /// Back to idle, but only if the action still executing is the one
    /// whose result just arrived
    fn finish_executing(&mut self, is_done: impl Fn(&PrivilegedAction) -> bool) {
        if matches!(&self.auth, AuthState::Executing(action) if is_done(action)) {
            self.auth = AuthState::Idle;
        }
    }

    // ========== Banners ==========

    fn show_banner(&mut self, kind: BannerKind, text: &str) -> Vec<Effect> {
        let id = self.banners.push(kind, text);
        vec![Effect::ExpireBanner {
            id,
            after: self.timings.banner_duration(),
        }]
    }

    fn show_error(&mut self, err: &AppError) -> Vec<Effect> {
        warn!(error = %err, "action refused");
        let text = match err {
            AppError::Validation(message) => message.as_str(),
            AppError::NotFound(_) => MSG_NOT_FOUND,
            AppError::Auth => MSG_WRONG_PASSWORD,
            _ => MSG_SAVE_FAILED,
        };
        self.show_banner(BannerKind::Error, text)
    }
}
