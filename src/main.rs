use std::path::PathBuf;

use clap::Parser;

use socialq::app::SocialqApp;
use socialq::graph::physics::DEFAULT_ITERATIONS;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long, default_value = "socialq.json")]
    data_path: PathBuf,
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };

    eframe::run_native(
        "socialq",
        options,
        Box::new(move |cc| {
            Ok(Box::new(SocialqApp::new(
                cc,
                args.data_path.clone(),
                args.iterations,
            )))
        }),
    )
}
