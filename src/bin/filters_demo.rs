use pixel_algebra::channel::{Channel, ThresholdMode};
use pixel_algebra::config::filters::{load_config, FilterKind};
use pixel_algebra::histogram::Histogram;
use pixel_algebra::image::io::{load_image, save_channel, save_image, write_json_file};
use pixel_algebra::image::Image;
use serde::Serialize;
use std::env;
use std::path::Path;

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
    let mut thresholds = Vec::new();
    for filter in &config.filters {
        if let Some(kernel) = filter.kernel() {
            let kernel = kernel.map_err(|e| format!("Invalid {filter:?}: {e}"))?;
            image
                .apply_mask(&kernel)
                .map_err(|e| format!("Failed to apply {filter:?}: {e}"))?;
            continue;
        }
        match *filter {
            FilterKind::Sobel => map_channels(&mut image, |c| c.sobel_magnitude())?,
            FilterKind::Edges => map_channels(&mut image, |c| c.edge_detect())?,
            FilterKind::Otsu { max } => {
                thresholds.extend(image.apply_threshold(0, max, ThresholdMode::Otsu))
            }
            FilterKind::Threshold {
                threshold,
                max,
                mode,
            } => thresholds.extend(image.apply_threshold(threshold, max, mode)),
            _ => {}
        }
    }
    if config.normalize {
        image.normalize();
    }

    save_image(&image, &config.output.image)?;
    println!("Saved filtered image to {}", config.output.image.display());

    let histogram = image
        .channel(0)
        .map(|c| c.values_histogram())
        .unwrap_or_default();
    if let Some(path) = &config.output.histogram_json {
        let summary = FiltersSummary {
            width: image.width(),
            height: image.height(),
            filter_count: config.filters.len(),
            thresholds,
            histogram: &histogram,
        };
        write_json_file(path, &summary)?;
        println!("Saved histogram summary to {}", path.display());
    }
    if let Some(path) = &config.output.histogram_image {
        let chart = &config.histogram;
        let rendered = histogram
            .render_bar_chart(chart.min, chart.max, chart.width, chart.height)
            .ok_or_else(|| {
                format!(
                    "Histogram range {}..={} does not fit {} columns",
                    chart.min, chart.max, chart.width
                )
            })?;
        save_channel(&rendered, path, false)?;
        println!("Saved histogram chart to {}", path.display());
    }

    Ok(())
}

fn map_channels<F>(image: &mut Image, op: F) -> Result<(), String>
where
    F: Fn(&Channel) -> pixel_algebra::Result<Channel>,
{
    for index in 0..image.channels().len() {
        if let Some(channel) = image.channel_mut(index) {
            *channel = op(channel).map_err(|e| format!("Channel {index}: {e}"))?;
        }
    }
    Ok(())
}

fn usage() -> String {
    "Usage: filters_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FiltersSummary<'a> {
    width: usize,
    height: usize,
    filter_count: usize,
    thresholds: Vec<i32>,
    histogram: &'a Histogram,
}
