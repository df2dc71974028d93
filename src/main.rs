mod app;

use app::PointSphereApp;
use point_sphere::config::SphereConfig;

const WINDOW_WIDTH: f32 = 640.0;
const WINDOW_HEIGHT: f32 = 400.0;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Point Sphere");

    let config = SphereConfig::from_env().unwrap_or_else(|e| {
        tracing::warn!("Ignoring environment overrides: {}", e);
        SphereConfig::default()
    });
    tracing::info!(
        "Using {} points, scale {}, spread {}",
        config.point_count,
        config.scale,
        config.spread()
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT]),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    eframe::run_native(
        "point-sphere",
        options,
        Box::new(move |cc| Box::new(PointSphereApp::new(cc, config))),
    )
}
