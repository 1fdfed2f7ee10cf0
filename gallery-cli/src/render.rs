use std::fmt::Write;

use chrono::Local;
use gallery_core::view::{DetailView, GalleryView, PagerControls, WeatherPanel};

const TITLE: &str = "Galerie & Météo";

/// Renders one frame of the gallery as plain text.
pub fn render(view: &GalleryView<'_>) -> String {
    let mut out = String::new();

    let _ = write!(out, "{TITLE} | {}", view.header);
    if let Some(at) = view.updated_at {
        let _ = write!(out, " | mis à jour {}", at.with_timezone(&Local).format("%H:%M:%S"));
    }
    out.push_str("\n\n");

    if let Some(loading) = view.loading {
        let _ = writeln!(out, "{loading}");
    }
    if let Some(error) = view.error {
        let _ = writeln!(out, "[!] {error}");
    }
    if let Some(weather) = &view.weather {
        render_weather(&mut out, weather);
    }

    for (n, image) in view.grid.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {}  ({}x{})  {}",
            n + 1,
            image.tags,
            image.width,
            image.height,
            image.preview_url
        );
    }
    if let Some(empty) = view.empty_message {
        let _ = writeln!(out, "{empty}");
    }

    if let Some(pager) = view.pager {
        render_pager(&mut out, pager);
    }

    out
}

fn render_weather(out: &mut String, weather: &WeatherPanel) {
    let _ = writeln!(out, "{}", weather.title);
    let _ = writeln!(out, "  {}  {}", weather.temperature, weather.description);
    let _ = writeln!(out, "  {} ({})", weather.icon_url, weather.icon_alt);
    let _ = writeln!(out, "  {}", weather.humidity);
    let _ = writeln!(out, "  {}", weather.wind);
    out.push('\n');
}

fn render_pager(out: &mut String, pager: PagerControls) {
    let previous = if pager.previous_enabled { "« Précédent" } else { "  ---------" };
    let next = if pager.next_enabled { "Suivant »" } else { "-------  " };
    let _ = writeln!(out, "\n{previous}   {} / {}   {next}", pager.page, pager.total_pages);
}

/// Renders the detail view of one image.
pub fn render_detail(detail: &DetailView) -> String {
    let mut out = String::from("Détails de l'image\n");
    let _ = writeln!(out, "  {}", detail.image_url);
    let _ = writeln!(out, "  Tags: {}", detail.tags);
    let _ = writeln!(out, "  Dimensions: {}", detail.dimensions);
    if let Some(author) = &detail.author {
        let _ = writeln!(out, "  Auteur: {author}");
    }
    if let Some(page_url) = &detail.page_url {
        let _ = writeln!(out, "  Page: {page_url}");
    }
    out
}
