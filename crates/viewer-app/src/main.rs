//! URDF Viewer main entry point

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "viewer_app=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting URDF Viewer");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("URDF Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "urdf-viewer",
        native_options,
        Box::new(|cc| Ok(Box::new(viewer_app::ViewerApp::new(cc)))),
    )
}

// On the web the application is started through [`viewer_app::WebHandle`].
#[cfg(target_arch = "wasm32")]
fn main() {}
