use std::fmt::Write;

use crate::catalog::{Catalog, CatalogEntry};
use crate::matching::MajorMatch;
use crate::models::{Commodity, ElementRating, JobDetail};
use crate::scoring::RankedOccupation;

use super::{escape, truncate, APP_NAME, APP_TAGLINE};

/// One row in a results table, shared by both searches.
pub struct ResultRow<'a> {
    pub code: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub match_score: u32,
}

impl<'a> From<&'a RankedOccupation> for ResultRow<'a> {
    fn from(r: &'a RankedOccupation) -> Self {
        ResultRow {
            code: &r.onetsoc_code,
            title: &r.title,
            description: &r.description,
            match_score: r.match_score,
        }
    }
}

impl<'a> From<&'a MajorMatch> for ResultRow<'a> {
    fn from(r: &'a MajorMatch) -> Self {
        ResultRow {
            code: &r.onetsoc_code,
            title: &r.title,
            description: &r.description,
            match_score: r.match_score,
        }
    }
}

fn entry_list(entries: &[CatalogEntry]) -> String {
    entries.iter().fold(String::new(), |mut out, e| {
        let _ = write!(
            out,
            "<li><strong>{}</strong> &ndash; {}</li>",
            escape(e.name),
            escape(e.description)
        );
        out
    })
}

fn options(entries: &[CatalogEntry], selected: Option<&str>) -> String {
    entries.iter().fold(
        String::from(r#"<option value="">Choose...</option>"#),
        |mut out, e| {
            let sel = if selected == Some(e.name) { " selected" } else { "" };
            let _ = write!(
                out,
                r#"<option value="{0}"{sel}>{0}</option>"#,
                escape(e.name)
            );
            out
        },
    )
}

fn error_alert(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<div class="alert alert-danger">{}</div>"#, escape(e)))
        .unwrap_or_default()
}

pub fn home(catalog: &Catalog) -> String {
    format!(
        r#"<section class="hero">
<h1>{APP_NAME}</h1>
<p class="lead">{APP_TAGLINE}</p>
<a class="btn" href="/competencies">Find careers by my top 3 competencies</a>
<a class="btn" href="/majors">Find careers by my course major</a>
</section>
<section>
<h2>NACE Competencies</h2>
<ul>{}</ul>
</section>
<section>
<h2>Course Majors</h2>
<ul>{}</ul>
</section>"#,
        entry_list(&catalog.competencies),
        entry_list(&catalog.majors)
    )
}

/// The three-slot competency form. `picked` re-fills the slots after a validation error.
pub fn competency_form(catalog: &Catalog, picked: [Option<&str>; 3], error: Option<&str>) -> String {
    let labels = ["First", "Second", "Third"];
    let names = ["first", "second", "third"];
    let mut slots = String::new();
    for ((label, name), selected) in labels.iter().zip(names).zip(picked) {
        let _ = write!(
            slots,
            r#"<label>{label} competency <select name="{name}" required>{}</select></label>"#,
            options(&catalog.competencies, selected)
        );
    }

    format!(
        r#"<h1>Find Careers by Competencies</h1>
<p>Select your top 3 strongest competencies: the areas where you excel and feel most confident.</p>
{}
<form id="competencyForm" method="get" action="/competencies/results">
{slots}
<button type="submit" class="btn">Find Matching Careers</button>
</form>
<h2>About the competencies</h2>
<ul>{}</ul>"#,
        error_alert(error),
        entry_list(&catalog.competencies)
    )
}

pub fn major_form(catalog: &Catalog, selected: Option<&str>, error: Option<&str>) -> String {
    format!(
        r#"<h1>Find Careers by Major</h1>
<p>Choose the field of study that best matches your academic focus.</p>
{}
<form id="majorForm" method="get" action="/majors/results">
<label>Course major <select name="major" required>{}</select></label>
<button type="submit" class="btn">Explore Careers</button>
</form>"#,
        error_alert(error),
        options(&catalog.majors, selected)
    )
}

/// Results table, or a "no matches" warning when the search legitimately found nothing.
pub fn results<'a>(heading: &str, rows: impl IntoIterator<Item = ResultRow<'a>>, back_href: &str) -> String {
    let mut body = String::new();
    let mut count = 0usize;
    for (i, row) in rows.into_iter().enumerate() {
        count += 1;
        let _ = write!(
            body,
            r#"<tr><td>{rank}.</td><td><a href="/job/{href}">{title}</a></td><td class="score">{score}%</td><td>{desc}</td></tr>"#,
            rank = i + 1,
            href = urlencoding::encode(row.code),
            title = escape(row.title),
            score = row.match_score,
            desc = escape(&truncate(row.description, 160)),
        );
    }

    if count == 0 {
        return format!(
            r#"<h1>{}</h1>
<div class="alert alert-warning">No matching careers found. Try different selections.</div>
<a class="btn" href="{back_href}">Search again</a>"#,
            escape(heading)
        );
    }

    format!(
        r#"<h1>{}</h1>
<p>Found {count} matching careers.</p>
<table class="results">
<thead><tr><th>Rank</th><th>Job Title</th><th>Match Score</th><th>Description</th></tr></thead>
<tbody>{body}</tbody>
</table>
<a class="btn" href="{back_href}">Search again</a>"#,
        escape(heading)
    )
}

/// Section of already-escaped list items; empty when there are none.
fn section_list(heading: &str, items: Vec<String>) -> String {
    if items.is_empty() {
        return String::new();
    }
    let items: String = items.into_iter().map(|i| format!("<li>{i}</li>")).collect();
    format!("<section><h2>{}</h2><ul>{items}</ul></section>", escape(heading))
}

fn commodity_items(items: &[Commodity]) -> Vec<String> {
    items
        .iter()
        .map(|c| match &c.commodity_title {
            Some(title) => format!(
                "{} <span class=\"level\">({})</span>",
                escape(&c.example),
                escape(title)
            ),
            None => escape(&c.example),
        })
        .collect()
}

fn rating_list(heading: &str, ratings: &[ElementRating]) -> String {
    if ratings.is_empty() {
        return String::new();
    }
    let items = ratings.iter().fold(String::new(), |mut out, r| {
        let level = r
            .data_value
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = write!(
            out,
            "<li>{} <span class=\"level\">(Level: {level})</span></li>",
            escape(&r.element_name)
        );
        out
    });
    format!("<section><h2>{}</h2><ol>{items}</ol></section>", escape(heading))
}

pub fn job_detail(job: &JobDetail) -> String {
    let mut out = format!(
        r#"<h1>{}</h1>
<p class="code">O*NET-SOC Code: {}</p>
<section><h2>Job Description</h2><p>{}</p></section>"#,
        escape(&job.title),
        escape(&job.onetsoc_code),
        escape(job.description.as_deref().unwrap_or("No description available")),
    );

    let also_called: Vec<String> = job
        .alternate_titles
        .iter()
        .chain(&job.sample_titles)
        .map(|t| escape(t))
        .collect();
    out.push_str(&section_list("Also Called", also_called));

    let tasks = job.task_statements.iter().map(|t| escape(&t.task)).collect();
    out.push_str(&section_list("Tasks", tasks));

    if let Some(zone) = &job.job_zone {
        let field = |v: &Option<String>| escape(v.as_deref().unwrap_or("N/A"));
        let _ = write!(
            out,
            r#"<section><h2>Job Zone</h2><dl>
<dt>Zone</dt><dd>{}</dd>
<dt>Experience</dt><dd>{}</dd>
<dt>Education</dt><dd>{}</dd>
<dt>Job Training</dt><dd>{}</dd>
</dl></section>"#,
            escape(&zone.name),
            field(&zone.experience),
            field(&zone.education),
            field(&zone.job_training),
        );
    }

    if !job.top_competencies.is_empty() {
        let items = job.top_competencies.iter().fold(String::new(), |mut s, c| {
            let _ = write!(
                s,
                r#"<li>{} <div class="bar"><span style="width:{pct}%"></span></div> {pct}%</li>"#,
                escape(&c.competency_name),
                pct = c.match_strength
            );
            s
        });
        let _ = write!(
            out,
            "<section><h2>Top Matching NACE Competencies</h2><ol>{items}</ol></section>"
        );
    }

    if !job.major_mappings.is_empty() {
        let items = job.major_mappings.iter().fold(String::new(), |mut s, m| {
            let _ = write!(s, "<li>{} ({}%)</li>", escape(&m.major_name), m.match_score);
            s
        });
        let _ = write!(out, "<section><h2>Related Majors</h2><ul>{items}</ul></section>");
    }

    for (heading, ratings) in [
        ("Key Skills", &job.skills),
        ("Knowledge Areas", &job.knowledge),
        ("Abilities", &job.abilities),
        ("Work Activities", &job.work_activities),
        ("Work Styles", &job.work_styles),
        ("Work Values", &job.work_values),
        ("Work Context", &job.work_context),
        ("Education and Training", &job.education_training),
    ] {
        out.push_str(&rating_list(heading, ratings));
    }

    out.push_str(&section_list("Technology Skills", commodity_items(&job.technology_skills)));
    out.push_str(&section_list("Tools Used", commodity_items(&job.tools_used)));

    let related = job
        .related_occupations
        .iter()
        .map(|r| {
            format!(
                r#"<a href="/job/{}">{}</a>"#,
                urlencoding::encode(&r.related_onetsoc_code),
                escape(r.title.as_deref().unwrap_or(&r.related_onetsoc_code))
            )
        })
        .collect();
    out.push_str(&section_list("Related Occupations", related));

    out
}

pub fn about() -> String {
    format!(
        r#"<h1>About {APP_NAME}</h1>
<p>This application helps you discover career paths based on your top 3 NACE competencies or your course major.</p>
<p>It uses the O*NET occupational database to match your strengths and interests with real career opportunities.
NACE competencies are industry-recognized skills that employers value across all career fields.</p>
<h2>How scores work</h2>
<p>Competency searches weight a match by where the competency ranks in a job's own top three (3, 2, 1) and average the matched scores.
On a job's page, its top competencies and related majors are rescaled relative to each other, so the weakest one still shows a small share instead of 0%.</p>"#
    )
}

pub fn contact() -> String {
    r#"<h1>Contact Us</h1>
<p>Questions about your results? Visit your campus career development office to talk through your options with an advisor.</p>"#
        .to_string()
}

pub fn error(message: &str) -> String {
    format!(
        r#"<h1>Something went wrong</h1>
<div class="alert alert-danger">{}</div>
<a class="btn" href="/">Back to home</a>"#,
        escape(message)
    )
}
