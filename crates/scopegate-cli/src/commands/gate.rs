use crate::tui::app::App;

/// Everything the `run` subcommand needs.
pub struct GateConfig {
    pub skip: bool,
    pub fresh: bool,
    pub title: String,
    pub fps: u32,
    pub store_dir: Option<String>,
}

pub fn run(config: GateConfig) {
    let store = super::store_at(config.store_dir.as_deref());

    // Mount-time bypass: an explicit --skip or a previously persisted unlock
    // goes straight to the content view. Neither path writes the flag — only
    // satisfying the mounted gate does.
    let already = !config.fresh && store.is_unlocked();
    let start_unlocked = config.skip || already;
    if start_unlocked {
        log::info!(
            "gate skipped at mount ({})",
            if config.skip { "--skip" } else { "persisted flag" }
        );
    }

    let persist = store.clone();
    let mut app = App::new(&config.title, config.fps, start_unlocked)
        .on_unlocked(move || {
            if let Err(e) = persist.mark_unlocked() {
                log::warn!("could not persist unlock flag: {e}");
            }
        })
        .on_complete(|| log::info!("gate satisfied — content revealed"));

    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
