//! Coloured terminal output for the interactive and one-shot commands.

use colored::*;

use crate::catalog::Catalog;
use crate::matching::{MajorMatch, StatsReport};
use crate::models::{ElementRating, JobDetail};
use crate::scoring::RankedOccupation;
use crate::store::BackendStatus;
use crate::views::{truncate, APP_NAME, APP_TAGLINE};

const DESCRIPTION_WIDTH: usize = 80;
/// How many skills and knowledge areas the terminal detail view lists.
const TERMINAL_RATING_LIMIT: usize = 10;

pub fn welcome(status: BackendStatus) {
    println!();
    println!("{}", format!("  {APP_NAME}").cyan().bold());
    println!("{}", format!("  {APP_TAGLINE}").cyan());
    println!();
    println!(
        "{}",
        "Find your ideal career based on your strengths and interests.".yellow()
    );
    println!(
        "{}",
        "Powered by O*NET occupational data and NACE competencies.".dimmed()
    );
    if !status.is_connected() {
        demo_notice();
    }
    println!();
}

pub fn demo_notice() {
    println!(
        "{} {}",
        "Demo mode:".yellow().bold(),
        "no data backend is reachable, searches will fail until one is configured.".yellow()
    );
}

pub fn goodbye() {
    println!();
    println!("{}", format!("Thank you for using {APP_NAME}!").cyan().bold());
    println!("{}", "Good luck with your career exploration.".yellow());
}

pub fn error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), format!("{err:#}").red());
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// One row of a result table, shared by both searches.
struct Row<'a> {
    title: &'a str,
    description: &'a str,
    match_score: u32,
}

fn print_table<'a>(heading: &str, rows: impl ExactSizeIterator<Item = Row<'a>>) {
    println!();
    println!("{}", heading.green().bold());
    println!();

    if rows.len() == 0 {
        warning("No matching careers found. Try different selections.");
        return;
    }

    for (i, row) in rows.enumerate() {
        println!(
            "{:>3}. {}  {}",
            i + 1,
            row.title.yellow().bold(),
            format!("{}%", row.match_score).green()
        );
        println!("     {}", truncate(row.description, DESCRIPTION_WIDTH).dimmed());
    }
}

pub fn ranked_jobs(heading: &str, jobs: &[RankedOccupation]) {
    print_table(
        heading,
        jobs.iter().map(|j| Row {
            title: &j.title,
            description: &j.description,
            match_score: j.match_score,
        }),
    );
}

pub fn major_jobs(heading: &str, jobs: &[MajorMatch]) {
    print_table(
        heading,
        jobs.iter().map(|j| Row {
            title: &j.title,
            description: &j.description,
            match_score: j.match_score,
        }),
    );
}

pub fn job_detail(job: &JobDetail) {
    println!();
    println!("{}", "Detailed Job Information".cyan().bold());
    println!("{}", format!("Job Title: {}", job.title).yellow().bold());
    println!("{}", format!("O*NET-SOC Code: {}", job.onetsoc_code).dimmed());
    println!();

    if let Some(description) = &job.description {
        println!("{}", "Job Description:".blue().bold());
        println!("{description}");
        println!();
    }

    if !job.sample_titles.is_empty() {
        println!("{} {}", "Also Called:".blue().bold(), job.sample_titles.join(", "));
        println!();
    }

    if !job.task_statements.is_empty() {
        println!("{}", "Typical Tasks:".blue().bold());
        for (i, t) in job.task_statements.iter().take(TERMINAL_RATING_LIMIT).enumerate() {
            println!("{}. {}", i + 1, t.task);
        }
        println!();
    }

    if let Some(zone) = &job.job_zone {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        println!("{}", "Job Zone Information:".blue().bold());
        println!("Zone: {}", zone.name);
        println!("Experience Required: {}", or_na(&zone.experience));
        println!("Education Required: {}", or_na(&zone.education));
        println!("Job Training: {}", or_na(&zone.job_training));
        println!();
    }

    if !job.top_competencies.is_empty() {
        println!("{}", "Top Matching NACE Competencies:".blue().bold());
        for (i, c) in job.top_competencies.iter().enumerate() {
            println!("{}. {} ({}% match)", i + 1, c.competency_name, c.match_strength);
        }
        println!();
    }

    if !job.major_mappings.is_empty() {
        println!("{}", "Related Course Majors:".blue().bold());
        for (i, m) in job.major_mappings.iter().enumerate() {
            println!("{}. {} ({}% match)", i + 1, m.major_name, m.match_score);
        }
        println!();
    }

    rating_list("Key Skills Required:", &job.skills);
    rating_list("Knowledge Areas:", &job.knowledge);

    if !job.technology_skills.is_empty() {
        let examples: Vec<&str> = job.technology_skills.iter().map(|c| c.example.as_str()).collect();
        println!("{} {}", "Technology Skills:".blue().bold(), examples.join(", "));
        println!();
    }

    if !job.related_occupations.is_empty() {
        println!("{}", "Related Occupations:".blue().bold());
        for r in &job.related_occupations {
            let title = r.title.as_deref().unwrap_or("Unknown Title");
            println!("  {} {}", r.related_onetsoc_code.dimmed(), title);
        }
        println!();
    }
}

fn rating_list(heading: &str, ratings: &[ElementRating]) {
    if ratings.is_empty() {
        return;
    }
    println!("{}", heading.blue().bold());
    for (i, r) in ratings.iter().take(TERMINAL_RATING_LIMIT).enumerate() {
        println!("{}. {} (Level: {})", i + 1, r.element_name, level(r.data_value));
    }
    println!();
}

/// Rating levels are shown as whole numbers; missing or zero values read "N/A".
fn level(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => format!("{}", v.round()),
        _ => "N/A".to_string(),
    }
}

pub fn stats(stats: &StatsReport) {
    println!();
    println!("{}", "Mapping Statistics".cyan().bold());
    for (label, s) in [("Competency", &stats.competency), ("Major", &stats.major)] {
        println!(
            "{:<12} {} of {} jobs mapped ({})",
            label.bold(),
            s.total_mappings,
            s.total_jobs,
            format!("{}%", s.coverage_percentage).green()
        );
    }
}

pub fn catalog(catalog: &Catalog) {
    println!("{}", "NACE Competencies".cyan().bold());
    for c in &catalog.competencies {
        println!("  {}  {}", c.name.yellow(), c.description.dimmed());
    }
    println!();
    println!("{}", "Course Majors".cyan().bold());
    for m in &catalog.majors {
        println!("  {}  {}", m.name.yellow(), m.description.dimmed());
    }
}

pub fn about() {
    println!();
    println!("{}", format!("About {APP_NAME}").cyan().bold());
    println!("This application helps you discover career paths based on:");
    println!("  - Your top 3 NACE competencies (strengths)");
    println!("  - Your course major or field of study");
    println!();
    println!("It matches your skills and interests against the O*NET occupational database.");
    println!("NACE competencies are industry-recognized skills that employers value across all career fields.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_rounds_and_handles_missing() {
        assert_eq!(level(Some(3.62)), "4");
        assert_eq!(level(Some(2.5)), "3");
        assert_eq!(level(None), "N/A");
        assert_eq!(level(Some(0.0)), "N/A");
    }
}
