use hearth::config::AppConfig;
use hearth::gallery::Album;
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

    iced::application("Nuestra Boda", Album::update, Album::view)
        .subscription(Album::subscription)
        .theme(Album::theme)
        .centered()
        .run_with(move || Album::new(config.gallery))
}
