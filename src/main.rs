mod app;
mod camera;
mod input;
mod layout;
mod profile;
mod util;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to a query-plan profile JSON file to open on startup.
    #[arg(long)]
    profile: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "planscope",
        options,
        Box::new(move |cc| Ok(Box::new(app::PlanScopeApp::new(cc, args.profile.clone())))),
    )
}
