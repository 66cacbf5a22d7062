//! Server-side HTML rendering for the form flow.
//!
//! Pages are askama templates under `templates/`; interpolated values are
//! HTML-escaped by the template engine.

use askama::Template;

use crate::models::{MatchAnalysis, RankedMap, TeamAnalysis};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage;

#[derive(Template)]
#[template(path = "form.html")]
struct FormPage {
    recent_matches: u32,
    all_time_matches: u32,
}

#[derive(Template)]
#[template(path = "analysis.html")]
struct AnalysisPage<'a> {
    title: String,
    match_id: &'a str,
    match_limit: u32,
    teams: Vec<TeamView<'a>>,
}

struct TeamView<'a> {
    name: &'a str,
    players: String,
    rows: Vec<MapRow>,
}

struct MapRow {
    class: &'static str,
    map: &'static str,
    wins: u32,
    losses: u32,
    differential: String,
}

fn differential_class(entry: &RankedMap) -> &'static str {
    if entry.is_favoured() {
        "pick"
    } else if entry.differential < 0.0 {
        "ban"
    } else {
        "even"
    }
}

impl<'a> TeamView<'a> {
    fn new(team: &'a TeamAnalysis) -> Self {
        let rows = team
            .ranked_maps
            .iter()
            .map(|entry| {
                let record = team.tally.get(entry.map);
                MapRow {
                    class: differential_class(entry),
                    map: entry.map.as_str(),
                    wins: record.wins,
                    losses: record.losses,
                    differential: format!("{:+.2}", entry.differential),
                }
            })
            .collect();

        Self {
            name: &team.name,
            players: team.players.join(", "),
            rows,
        }
    }
}

pub fn index_page() -> askama::Result<String> {
    IndexPage.render()
}

/// Match URL form; the radio labels show the configured window sizes.
pub fn form_page(recent_matches: u32, all_time_matches: u32) -> askama::Result<String> {
    FormPage {
        recent_matches,
        all_time_matches,
    }
    .render()
}

/// Both rosters' ranked maps side by side.
pub fn analysis_page(analysis: &MatchAnalysis) -> askama::Result<String> {
    AnalysisPage {
        title: format!("{} vs {}", analysis.roster_1.name, analysis.roster_2.name),
        match_id: analysis.match_id.as_str(),
        match_limit: analysis.match_limit,
        teams: vec![
            TeamView::new(&analysis.roster_1),
            TeamView::new(&analysis.roster_2),
        ],
    }
    .render()
}
