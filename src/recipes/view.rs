/// Recipe book rendering
///
/// Pure functions from controller state to widgets; nothing here mutates
/// state. Every state change redraws the whole tree.
use iced::widget::{
    button, column, container, horizontal_space, pick_list, row, scrollable, text, text_editor,
    text_input, Column, Space,
};
use iced::{Alignment, Color, Element, Length};
use iced_aw::Wrap;

use super::app::{Editors, Message};
use super::controller::{AuthPrompt, AuthState, Controller, Listing, Screen};
use super::model::{Category, CategoryFilter, Recipe};
use crate::ui::modal;

const CARD_WIDTH: f32 = 260.0;
const DIALOG_WIDTH: f32 = 520.0;
const ERROR_RED: Color = Color {
    r: 0.80,
    g: 0.20,
    b: 0.20,
    a: 1.0,
};

pub fn view<'a>(controller: &'a Controller, editors: &'a Editors) -> Element<'a, Message> {
    let body = match controller.screen() {
        Screen::Dashboard => dashboard(controller),
        Screen::Form => form(controller, editors),
    };

    let banners = Column::with_children(controller.banners().iter().map(|banner| banner.view()))
        .spacing(6);

    let base: Element<'a, Message> = column![header(controller.screen()), banners, body]
        .spacing(16)
        .padding(24)
        .into();

    let base = match controller.detail() {
        Some(recipe) => modal(base, detail(recipe), Message::CloseRecipe),
        None => base,
    };

    match controller.auth() {
        AuthState::AwaitingPassword(prompt) => modal(base, auth_dialog(prompt), Message::CancelAuth),
        _ => base,
    }
}

fn header<'a>(screen: Screen) -> Element<'a, Message> {
    let nav = |label: &'a str, target: Screen| {
        let style = if screen == target {
            button::primary
        } else {
            button::secondary
        };
        button(text(label))
            .on_press(Message::Navigate(target))
            .padding(10)
            .style(style)
    };

    row![
        text("🍞 Recetario").size(32),
        horizontal_space(),
        nav("Recetas", Screen::Dashboard),
        nav("Agregar Receta", Screen::Form),
    ]
    .spacing(12)
    .align_y(Alignment::Center)
    .into()
}

// ========== Dashboard ==========

fn dashboard(controller: &Controller) -> Element<'_, Message> {
    let mut search = row![text_input("Buscar por nombre o ingrediente...", controller.search_input())
        .on_input(Message::SearchChanged)
        .padding(10)
        .size(16)]
    .spacing(8)
    .align_y(Alignment::Center);

    if !controller.search_input().is_empty() {
        search = search.push(
            button(text("✕"))
                .on_press(Message::ClearSearch)
                .padding(10)
                .style(button::text),
        );
    }

    let active = controller.store().category();
    let chips = std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
        .map(|filter| {
            let style = if filter == active {
                button::primary
            } else {
                button::secondary
            };
            Element::from(
                button(text(filter.label()))
                    .on_press(Message::CategorySelected(filter))
                    .padding([6, 14])
                    .style(style),
            )
        });

    let content: Element<'_, Message> = match controller.listing() {
        Listing::Loading => placeholder("⏳", "Cargando recetas...", None),
        Listing::Failed(message) => load_error(message),
        Listing::Ready if controller.store().filtered().is_empty() => placeholder(
            "🔍",
            "No se encontraron recetas",
            Some("Prueba con otra búsqueda o categoría"),
        ),
        Listing::Ready => Wrap::with_elements(
            controller
                .store()
                .filtered()
                .iter()
                .map(recipe_card)
                .collect(),
        )
        .spacing(16.0)
        .line_spacing(16.0)
        .into(),
    };

    column![
        search,
        row(chips).spacing(8),
        scrollable(content).height(Length::Fill),
    ]
    .spacing(16)
    .into()
}

fn recipe_card(recipe: &Recipe) -> Element<'_, Message> {
    let card = column![
        text(recipe.category.icon()).size(40),
        text(recipe.category.label()).size(12),
        text(&recipe.name).size(20),
        text(recipe.card_preview()).size(14),
    ]
    .spacing(6)
    .width(Length::Fill);

    button(card)
        .on_press(Message::OpenRecipe(recipe.id.clone()))
        .padding(16)
        .width(Length::Fixed(CARD_WIDTH))
        .style(button::secondary)
        .into()
}

fn placeholder<'a>(icon: &'a str, title: &'a str, hint: Option<&'a str>) -> Element<'a, Message> {
    let mut content = column![text(icon).size(48), text(title).size(22)]
        .spacing(8)
        .align_x(Alignment::Center);

    if let Some(hint) = hint {
        content = content.push(text(hint).size(14));
    }

    container(content)
        .width(Length::Fill)
        .padding(40)
        .center_x(Length::Fill)
        .into()
}

fn load_error(message: &str) -> Element<'_, Message> {
    let steps = column![
        text("Pasos para solucionar:").size(14),
        text("1. Verifica que la URL del script sea correcta").size(14),
        text("2. Asegúrate de que el despliegue esté configurado como \"Anyone\"").size(14),
        text("3. Verifica que la hoja se llame \"Recetas\"").size(14),
    ]
    .spacing(4);

    container(
        column![
            text("⚠").size(48),
            text("Error al cargar recetas").size(22),
            text(message).size(14).color(ERROR_RED),
            steps,
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .width(Length::Fill)
    .padding(40)
    .center_x(Length::Fill)
    .into()
}

// ========== Form ==========

fn form<'a>(controller: &'a Controller, editors: &'a Editors) -> Element<'a, Message> {
    let fields = controller.form();

    let (title, subtitle) = if controller.is_editing() {
        ("Editar Receta", format!("Editando: {}", fields.name))
    } else {
        (
            "Agregar Nueva Receta",
            "Completa todos los campos para registrar tu receta".to_string(),
        )
    };

    let submit_label = match (controller.is_submitting(), controller.is_editing()) {
        (true, _) => "Guardando...",
        (false, true) => "✎ Actualizar Receta",
        (false, false) => "💾 Guardar Receta",
    };

    let submit = button(text(submit_label))
        .on_press_maybe((!controller.is_submitting()).then_some(Message::SubmitForm))
        .padding(12)
        .style(button::primary);

    let content = column![
        text(title).size(28),
        text(subtitle).size(14),
        label("Nombre de la receta"),
        text_input("Ej: Concha de vainilla", &fields.name)
            .on_input(Message::NameChanged)
            .padding(10),
        label("Categoría"),
        pick_list(Category::ALL, fields.category, Message::CategoryPicked)
            .placeholder("Selecciona una categoría")
            .padding(10),
        label("Ingredientes (uno por línea)"),
        text_editor(&editors.ingredients)
            .on_action(Message::IngredientsEdited)
            .height(Length::Fixed(150.0)),
        label("Instrucciones"),
        text_editor(&editors.instructions)
            .on_action(Message::InstructionsEdited)
            .height(Length::Fixed(200.0)),
        row![
            button(text("Cancelar"))
                .on_press(Message::CancelForm)
                .padding(12)
                .style(button::secondary),
            submit,
        ]
        .spacing(12),
    ]
    .spacing(10)
    .max_width(720.0);

    scrollable(container(content).center_x(Length::Fill))
        .height(Length::Fill)
        .into()
}

fn label(caption: &str) -> Element<'_, Message> {
    text(caption).size(14).into()
}

// ========== Dialogs ==========

fn detail(recipe: &Recipe) -> Element<'_, Message> {
    let ingredients = Column::with_children(
        recipe
            .ingredient_lines()
            .into_iter()
            .map(|line| Element::from(text(format!("• {}", line)).size(15))),
    )
    .spacing(4);

    let actions = row![
        button(text("✎ Editar"))
            .on_press(Message::EditRequested)
            .padding(10)
            .style(button::primary),
        button(text("🗑 Eliminar"))
            .on_press(Message::DeleteRequested)
            .padding(10)
            .style(button::danger),
        horizontal_space(),
        button(text("Cerrar"))
            .on_press(Message::CloseRecipe)
            .padding(10)
            .style(button::secondary),
    ]
    .spacing(10);

    let body = column![
        row![
            text(recipe.category.icon()).size(36),
            column![
                text(&recipe.name).size(26),
                text(recipe.category.label()).size(14)
            ]
            .spacing(2),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
        text("Ingredientes").size(18),
        ingredients,
        text("Instrucciones").size(18),
        text(&recipe.instructions).size(15),
        Space::with_height(8.0),
        actions,
    ]
    .spacing(10);

    container(scrollable(body))
        .width(Length::Fixed(DIALOG_WIDTH))
        .max_height(600.0)
        .padding(24)
        .style(container::rounded_box)
        .into()
}

fn auth_dialog(prompt: &AuthPrompt) -> Element<'_, Message> {
    let mut body = column![
        text(prompt.action.title()).size(24),
        text(prompt.action.prompt()).size(15),
        text_input("Contraseña", &prompt.password)
            .secure(true)
            .on_input(Message::PasswordChanged)
            .on_submit(Message::SubmitPassword)
            .padding(10),
    ]
    .spacing(12);

    if let Some(error) = &prompt.error {
        body = body.push(text(error).size(14).color(ERROR_RED));
    }

    let validate_label = if prompt.validating {
        "Validando..."
    } else {
        "✓ Validar"
    };

    body = body.push(
        row![
            horizontal_space(),
            button(text("Cancelar"))
                .on_press(Message::CancelAuth)
                .padding(10)
                .style(button::secondary),
            button(text(validate_label))
                .on_press_maybe((!prompt.validating).then_some(Message::SubmitPassword))
                .padding(10)
                .style(button::primary),
        ]
        .spacing(10),
    );

    container(body)
        .width(Length::Fixed(420.0))
        .padding(24)
        .style(container::rounded_box)
        .into()
}
