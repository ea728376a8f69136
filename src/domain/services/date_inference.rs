//! Completion date inference over unstructured search-result text.
//!
//! The heuristic is deliberately weak: the year mentioned most often inside a
//! near-future window is taken as the likely completion year. It is a signal,
//! not a fact.

use crate::domain::model::CompletionEstimate;
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static MONTH_YEAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?",
        r"|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?[\s,'-]*(\d{4})\b",
    ))
    .unwrap()
});
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// 可接受的年份範圍 (含兩端)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// `current year ..= current year + span`
    pub fn from_current_year(span: i32) -> Self {
        let year = chrono::Local::now().year();
        Self::new(year, year + span)
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Search query for one project: name, optional locality hint, keywords.
pub fn build_search_query(name: &str, locality: Option<&str>, keywords: &[String]) -> String {
    let mut parts = vec![name.trim().to_string()];
    if let Some(locality) = locality.map(str::trim).filter(|l| !l.is_empty()) {
        parts.push(locality.to_string());
    }
    parts.extend(keywords.iter().map(|k| k.trim().to_string()));
    parts.retain(|p| !p.is_empty());
    parts.join(" ")
}

/// Most frequent value; ties go to whichever appeared first.
fn mode_by_first_occurrence<T: Copy + Eq + std::hash::Hash>(values: &[T]) -> Option<T> {
    let mut counts: HashMap<T, usize> = HashMap::new();
    for v in values {
        *counts.entry(*v).or_default() += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for v in values {
        let count = counts[v];
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((*v, count));
        }
    }
    best.map(|(v, _)| v)
}

fn month_index(token: &str) -> Option<usize> {
    let prefix = token.get(..3)?.to_ascii_lowercase();
    MONTHS.iter().position(|m| m.to_ascii_lowercase() == prefix)
}

pub fn infer_completion_date(text: &str, window: YearWindow) -> CompletionEstimate {
    let plain = TAG_RE.replace_all(text, " ");

    // 第一輪：月份 + 年份
    let month_years: Vec<(usize, i32)> = MONTH_YEAR_RE
        .captures_iter(&plain)
        .filter_map(|caps| {
            let month = month_index(&caps[1])?;
            let year: i32 = caps[2].parse().ok()?;
            window.contains(year).then_some((month, year))
        })
        .collect();

    let years: Vec<i32> = if month_years.is_empty() {
        // 第二輪：單獨年份
        YEAR_RE
            .captures_iter(&plain)
            .filter_map(|caps| caps[1].parse::<i32>().ok())
            .filter(|y| window.contains(*y))
            .collect()
    } else {
        month_years.iter().map(|(_, y)| *y).collect()
    };

    let Some(year) = mode_by_first_occurrence(&years) else {
        return CompletionEstimate::NoSignal;
    };

    let months: Vec<usize> = month_years
        .iter()
        .filter(|(_, y)| *y == year)
        .map(|(m, _)| *m)
        .collect();

    match mode_by_first_occurrence(&months) {
        Some(month) => CompletionEstimate::Estimated(format!("{} {}", MONTHS[month], year)),
        None => CompletionEstimate::Estimated(format!("Possession {}", year)),
    }
}
