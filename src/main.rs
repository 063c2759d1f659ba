use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use eframe::egui;

use xccdf_tailor::config::SettingsManager;
use xccdf_tailor::log_collector::{ensure_logs_dir_exists, get_global_logs_path};
use xccdf_tailor::tailoring::{TailoringOutcome, TailoringSession};
use xccdf_tailor::ui::TailoringApp;
use xccdf_tailor::xccdf::{loader, sample, Benchmark, Policy, Profile};
use xccdf_tailor::LogCollector;

fn main() -> anyhow::Result<()> {
    // =========================================================================
    // SETTINGS
    // =========================================================================
    let settings = SettingsManager::load().unwrap_or_else(|e| {
        eprintln!("[Main] WARNING: Could not load settings, using defaults: {}", e);
        Default::default()
    });

    // =========================================================================
    // LOGGING
    // =========================================================================
    let max_level = if settings.debug_logging {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let log_collector = match get_global_logs_path()
        .and_then(|dir| ensure_logs_dir_exists(&dir).map(|()| dir))
        .and_then(|dir| LogCollector::new(dir, max_level))
    {
        Ok(collector) => collector,
        Err(e) => {
            eprintln!("[Main] WARNING: Log files unavailable, logging in memory only: {}", e);
            LogCollector::in_memory(max_level)
        }
    };
    if let Err(e) = log_collector.install() {
        eprintln!("[Main] WARNING: Failed to set LogCollector as global logger: {}", e);
    }
    log::info!("XCCDF Tailor {} starting", xccdf_tailor::VERSION);

    // =========================================================================
    // DOCUMENT
    // =========================================================================
    let (benchmark, profile, new_profile) = load_input(std::env::args().nth(1).map(PathBuf::from))?;
    let benchmark = Rc::new(benchmark);
    let policy = Rc::new(RefCell::new(Policy::new(Rc::clone(&benchmark), profile)));

    let session = TailoringSession::new(
        Some(Rc::clone(&policy)),
        Some(benchmark),
        new_profile,
        &settings,
    )
    .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    // =========================================================================
    // LAUNCH EGUI
    // =========================================================================
    let outcome: Rc<RefCell<Option<TailoringOutcome>>> = Rc::new(RefCell::new(None));
    let app = ObservedApp {
        app: TailoringApp::new(session, &settings, Some(log_collector)),
        outcome: Rc::clone(&outcome),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };

    eframe::run_native("XCCDF Tailor", options, Box::new(move |_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("egui frontend failed: {}", e))?;

    // =========================================================================
    // SHUTDOWN - HAND THE RESULT TO THE CALLER
    // =========================================================================
    let outcome = *outcome.borrow();
    match outcome {
        Some(TailoringOutcome {
            changes_confirmed: true,
            ..
        }) => {
            let policy = policy.borrow();
            if let Some(profile) = policy.profile() {
                let json = serde_json::to_string_pretty(profile)
                    .context("Failed to serialize tailored profile")?;
                println!("{}", json);
            }
            log::info!("Tailoring confirmed");
        }
        Some(TailoringOutcome { new_profile, .. }) => {
            log::info!("Tailoring discarded (new_profile={})", new_profile);
        }
        None => log::warn!("Window closed without a tailoring outcome"),
    }
    Ok(())
}

/// Benchmark and profile from the given JSON document, or the built-in demo.
fn load_input(path: Option<PathBuf>) -> anyhow::Result<(Benchmark, Profile, bool)> {
    match path {
        Some(path) => {
            let (benchmark, profile) = loader::load_document(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            Ok((benchmark, profile, false))
        }
        None => {
            log::info!("No document given, opening the demo benchmark");
            let benchmark =
                sample::demo_benchmark().map_err(|e| anyhow::anyhow!(e.user_message()))?;
            Ok((benchmark, sample::demo_profile(), true))
        }
    }
}

/// Forwards frames to the tailoring window and records how it ended.
struct ObservedApp {
    app: TailoringApp,
    outcome: Rc<RefCell<Option<TailoringOutcome>>>,
}

impl eframe::App for ObservedApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        eframe::App::update(&mut self.app, ctx, frame);
        if let Some(outcome) = self.app.outcome() {
            *self.outcome.borrow_mut() = Some(outcome);
        }
    }
}
