use pixel_algebra::config::transform::load_config;
use pixel_algebra::image::io::{load_image, save_image};
use std::env;
use std::path::Path;
use std::time::Instant;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let mut image = load_image(&config.input, config.mode)?;
    for step in &config.steps {
        step.queue(&mut image)
            .map_err(|e| format!("Invalid step {step:?}: {e}"))?;
    }
    let composed = image
        .composed_transform()
        .map_err(|e| format!("Failed to compose transforms: {e}"))?;

    let start = Instant::now();
    image
        .apply_transform()
        .map_err(|e| format!("Failed to apply transform: {e}"))?;
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    save_image(&image, &config.output.image)?;
    println!(
        "Applied {} steps ({}x{}) in {elapsed_ms:.2} ms",
        config.steps.len(),
        image.width(),
        image.height()
    );
    println!("Composed transform:\n{composed}");
    println!("Saved transformed image to {}", config.output.image.display());
    Ok(())
}

fn usage() -> String {
    "Usage: transform_demo <config.json>".to_string()
}
