use std::fmt;

use anyhow::Context;
use gallery_core::{Config, Event, FetchOrchestrator, GalleryRuntime, GalleryView, ImageHit};
use inquire::{InquireError, Select, Text};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Search,
    Next,
    Previous,
    Details,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuChoice::Search => "Nouvelle recherche",
            MenuChoice::Next => "Suivant »",
            MenuChoice::Previous => "« Précédent",
            MenuChoice::Details => "Voir détails",
            MenuChoice::Quit => "Quitter",
        })
    }
}

/// Menu entries matching the controls enabled in `view`.
fn menu_for(view: &GalleryView<'_>) -> Vec<MenuChoice> {
    let mut choices = vec![MenuChoice::Search];
    if let Some(pager) = view.pager {
        if pager.next_enabled {
            choices.push(MenuChoice::Next);
        }
        if pager.previous_enabled {
            choices.push(MenuChoice::Previous);
        }
    }
    if !view.grid.is_empty() {
        choices.push(MenuChoice::Details);
    }
    choices.push(MenuChoice::Quit);
    choices
}

#[derive(Debug, Clone)]
struct ImagePick {
    position: usize,
    image: ImageHit,
}

impl fmt::Display for ImagePick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.position, self.image.tags)
    }
}

/// `Ok(None)` when the user escaped or interrupted the prompt.
fn prompted<T>(result: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(err) => Err(err).context("Failed to read from the terminal"),
    }
}

pub async fn run(config: &Config, city: Option<String>) -> anyhow::Result<()> {
    let mut runtime = GalleryRuntime::new(FetchOrchestrator::from_config(config)?);
    let initial = city.unwrap_or_else(|| config.default_query().to_string());
    runtime.dispatch(Event::Submit(initial))?;

    loop {
        runtime.settle().await;

        let (choices, grid) = {
            let view = GalleryView::from_state(runtime.state());
            print!("{}", render::render(&view));
            (menu_for(&view), view.grid.to_vec())
        };

        let Some(choice) = prompted(Select::new("Action:", choices).prompt())? else {
            return Ok(());
        };

        let event = match choice {
            MenuChoice::Search => {
                let placeholder =
                    runtime.state().search_term().map(|t| t.to_string()).unwrap_or_default();
                let input = Text::new("Rechercher une ville...")
                    .with_placeholder(&placeholder)
                    .prompt();
                match prompted(input)? {
                    Some(raw) => Event::Submit(raw),
                    None => continue,
                }
            }
            MenuChoice::Next => Event::NextPage,
            MenuChoice::Previous => Event::PreviousPage,
            MenuChoice::Details => {
                show_details(&mut runtime, grid)?;
                continue;
            }
            MenuChoice::Quit => return Ok(()),
        };

        if let Err(err) = runtime.dispatch(event) {
            tracing::warn!(error = %err, "navigation rejected");
            println!("{err}");
        }
    }
}

fn show_details(runtime: &mut GalleryRuntime, grid: Vec<ImageHit>) -> anyhow::Result<()> {
    let picks = grid
        .into_iter()
        .enumerate()
        .map(|(n, image)| ImagePick { position: n + 1, image })
        .collect();

    let Some(pick) = prompted(Select::new("Image:", picks).prompt())? else {
        return Ok(());
    };

    runtime.dispatch(Event::ShowDetails(pick.image))?;
    if let Some(detail) = GalleryView::from_state(runtime.state()).detail {
        print!("{}", render::render_detail(&detail));
    }

    prompted(Select::new("", vec!["Close"]).prompt())?;
    runtime.dispatch(Event::CloseDetails)?;
    Ok(())
}
