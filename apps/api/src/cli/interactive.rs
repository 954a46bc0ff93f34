use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect, Select};

use super::display;
use crate::catalog::CompetencySelection;
use crate::matching::{self, MajorQuery};
use crate::state::AppState;

const MENU: [&str; 5] = [
    "Find careers by my top 3 competencies",
    "Find careers by my course major",
    "View statistics",
    "About this app",
    "Exit",
];

/// A search hit reduced to what the job picker needs.
struct Pick {
    code: String,
    label: String,
}

pub async fn run(state: &AppState) -> Result<()> {
    let theme = ColorfulTheme::default();
    display::welcome(state.backend_status);

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("What would you like to do?")
            .items(&MENU)
            .default(0)
            .interact()?;

        let outcome = match choice {
            0 => by_competencies(state, &theme).await,
            1 => by_major(state, &theme).await,
            2 => show_stats(state).await,
            3 => {
                display::about();
                Ok(())
            }
            _ => break,
        };
        if let Err(e) = outcome {
            display::error(&e);
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Would you like to explore more?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
    }

    display::goodbye();
    Ok(())
}

async fn by_competencies(state: &AppState, theme: &ColorfulTheme) -> Result<()> {
    let names: Vec<&str> = state.catalog.competency_names().collect();

    let selection = loop {
        let chosen = MultiSelect::with_theme(theme)
            .with_prompt("Select exactly 3 competencies (space to toggle, enter to confirm)")
            .items(&names)
            .interact()?;
        let picked: Vec<&str> = chosen.iter().map(|&i| names[i]).collect();
        match CompetencySelection::new(&picked, &state.catalog) {
            Ok(selection) => break selection,
            Err(e) => display::warning(&e.to_string()),
        }
    };

    let jobs = state
        .competency
        .search(&selection, state.config.result_limit)
        .await?;
    display::ranked_jobs(&format!("Careers matching: {}", selection.label()), &jobs);

    let picks = jobs
        .iter()
        .enumerate()
        .map(|(i, j)| Pick {
            code: j.onetsoc_code.clone(),
            label: format!("{}. {} ({}% match)", i + 1, j.title, j.match_score),
        })
        .collect();
    pick_job(state, theme, picks).await
}

async fn by_major(state: &AppState, theme: &ColorfulTheme) -> Result<()> {
    let names: Vec<&str> = state.catalog.major_names().collect();
    let index = Select::with_theme(theme)
        .with_prompt("Choose your course major")
        .items(&names)
        .default(0)
        .interact()?;
    let major = state.catalog.validate_major(names[index])?;

    let query = MajorQuery {
        min_score: None,
        max_results: state.config.result_limit,
    };
    let jobs = state.majors.search(&major, query).await?;
    display::major_jobs(&format!("Careers related to {major}"), &jobs);

    let picks = jobs
        .iter()
        .enumerate()
        .map(|(i, j)| Pick {
            code: j.onetsoc_code.clone(),
            label: format!("{}. {} ({}% match)", i + 1, j.title, j.match_score),
        })
        .collect();
    pick_job(state, theme, picks).await
}

async fn pick_job(state: &AppState, theme: &ColorfulTheme, picks: Vec<Pick>) -> Result<()> {
    if picks.is_empty() {
        return Ok(());
    }

    let mut labels: Vec<&str> = picks.iter().map(|p| p.label.as_str()).collect();
    labels.push("Back to main menu");

    let index = Select::with_theme(theme)
        .with_prompt("Select a job to view detailed information")
        .items(&labels)
        .default(0)
        .interact()?;
    let Some(pick) = picks.get(index) else {
        return Ok(());
    };

    match state.jobs.lookup(&pick.code).await? {
        Some(job) => display::job_detail(&job),
        None => display::warning(&format!("Job '{}' was not found", pick.code)),
    }
    Ok(())
}

async fn show_stats(state: &AppState) -> Result<()> {
    let stats = matching::collect_stats(&state.store).await?;
    display::stats(&stats);
    Ok(())
}
