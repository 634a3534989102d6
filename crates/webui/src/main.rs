use webui::{bootstrap, config::AppConfig};

fn main() {
    init_logging();
    let config = AppConfig::from_window().expect("page location must be readable");
    let _app = bootstrap::mount(config).expect("UI must be mountable");
}

fn init_logging() {
    use log::Level;
    use wasm_logger::Config;

    // use debug level for debug builds, warn level for production builds.
    #[cfg(debug_assertions)]
    let level = Level::Trace;
    #[cfg(not(debug_assertions))]
    let level = Level::Warn;

    wasm_logger::init(Config::new(level));
}
