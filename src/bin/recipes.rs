use hearth::config::AppConfig;
use hearth::recipes::RecipeBook;
use tracing::error;

fn main() -> iced::Result {
    hearth::logging::init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration, using defaults");
            AppConfig::default()
        }
    };

    iced::application("Recetario", RecipeBook::update, RecipeBook::view)
        .subscription(RecipeBook::subscription)
        .theme(RecipeBook::theme)
        .centered()
        .run_with(move || RecipeBook::new(config.recipes))
}
