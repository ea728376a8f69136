//! Rendering of a search session for the command line.

use crate::domain::model::SearchSession;
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct CsvRow<'a> {
    name: &'a str,
    distance_km: f64,
    lat: f64,
    lon: f64,
    completion_estimate: String,
}

pub fn to_json(session: &SearchSession) -> Result<String> {
    Ok(serde_json::to_string_pretty(session)?)
}

pub fn to_csv(session: &SearchSession) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for project in &session.projects {
        writer.serialize(CsvRow {
            name: &project.name,
            distance_km: project.distance_km,
            lat: project.location.lat,
            lon: project.location.lon,
            completion_estimate: project
                .completion_estimate
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default(),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn to_table(session: &SearchSession) -> String {
    let name_width = session
        .projects
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Project".len());

    let mut lines = vec![
        format!(
            "Origin: {}  Radius: {} km  Sites: {}",
            session.origin,
            session.radius_km,
            session.projects.len()
        ),
        format!("{:<width$}  {:>8}  {}", "Project", "km", "Completion", width = name_width),
    ];
    for project in &session.projects {
        let estimate = project
            .completion_estimate
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<width$}  {:>8.2}  {}",
            project.name,
            project.distance_km,
            estimate,
            width = name_width
        ));
    }
    lines.join("\n")
}
