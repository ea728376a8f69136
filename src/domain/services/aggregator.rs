use crate::domain::model::{Candidate, GeoPoint, Project};
use crate::domain::services::geo::{haversine_km, round2};
use std::collections::HashSet;

/// 聚合規則：半徑、命名標籤與通用名稱
#[derive(Debug, Clone)]
pub struct AggregationRules {
    pub radius_km: f64,
    /// Tags consulted in order when a candidate has no explicit name.
    pub fallback_name_tags: Vec<String>,
    pub generic_name: String,
}

impl AggregationRules {
    fn project_name(&self, candidate: &Candidate) -> String {
        candidate
            .name
            .iter()
            .chain(
                self.fallback_name_tags
                    .iter()
                    .filter_map(|tag| candidate.tags.get(tag)),
            )
            .map(|name| name.trim())
            .find(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.generic_name.clone())
    }
}

/// Turns raw candidates into the canonical project list: filter by radius,
/// sort by distance, keep the nearest of each name, named sites first.
pub fn aggregate(origin: GeoPoint, candidates: Vec<Candidate>, rules: &AggregationRules) -> Vec<Project> {
    let total = candidates.len();

    let mut projects: Vec<Project> = candidates
        .into_iter()
        .map(|candidate| Project {
            name: rules.project_name(&candidate),
            distance_km: round2(haversine_km(origin, candidate.location)),
            location: candidate.location,
            completion_estimate: None,
        })
        .filter(|p| p.distance_km <= rules.radius_km)
        .collect();

    // sort_by 為穩定排序，同距離保留原順序
    projects.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    let mut seen = HashSet::new();
    projects.retain(|p| seen.insert(p.name.clone()));

    let (mut named, generic): (Vec<Project>, Vec<Project>) = projects
        .into_iter()
        .partition(|p| p.name != rules.generic_name);
    named.extend(generic);

    tracing::debug!(
        "Aggregated {} candidates into {} projects within {} km",
        total,
        named.len(),
        rules.radius_km
    );
    named
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::geo::haversine_km;
    use std::collections::HashMap;

    const GENERIC: &str = "Residential Complex/Site";

    fn rules(radius_km: f64) -> AggregationRules {
        AggregationRules {
            radius_km,
            fallback_name_tags: vec!["addr:housename".to_string()],
            generic_name: GENERIC.to_string(),
        }
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(18.5521, 73.7383).unwrap()
    }

    /// 沿正北方向偏移指定公里數
    fn north_of(origin: GeoPoint, km: f64) -> GeoPoint {
        GeoPoint::new(origin.lat + km / 111.19493, origin.lon).unwrap()
    }

    fn candidate(name: Option<&str>, km: f64) -> Candidate {
        Candidate {
            name: name.map(str::to_string),
            location: north_of(origin(), km),
            tags: HashMap::new(),
        }
    }

    #[test]
    fn test_filters_out_of_radius() {
        let projects = aggregate(
            origin(),
            vec![candidate(Some("Near"), 1.2), candidate(Some("Far"), 6.0)],
            &rules(5.0),
        );
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Near");
        assert_eq!(projects[0].distance_km, 1.2);
    }

    #[test]
    fn test_dedup_keeps_nearest() {
        let projects = aggregate(
            origin(),
            vec![
                candidate(Some("Godrej Woodsville"), 1.5),
                candidate(Some("Godrej Woodsville"), 1.0),
            ],
            &rules(5.0),
        );
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Godrej Woodsville");
        assert_eq!(projects[0].distance_km, 1.0);
    }

    #[test]
    fn test_named_before_generic() {
        let projects = aggregate(
            origin(),
            vec![
                candidate(None, 0.3),
                candidate(Some("B Towers"), 2.0),
                candidate(Some("A Heights"), 1.0),
                candidate(None, 0.5),
            ],
            &rules(5.0),
        );
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A Heights", "B Towers", GENERIC]);
        assert_eq!(projects[2].distance_km, 0.3);
    }

    #[test]
    fn test_fallback_tag_and_blank_names() {
        let mut tagged = candidate(Some("   "), 1.0);
        tagged
            .tags
            .insert("addr:housename".to_string(), "Kumar Primus".to_string());
        let projects = aggregate(origin(), vec![tagged], &rules(5.0));
        assert_eq!(projects[0].name, "Kumar Primus");
    }

    #[test]
    fn test_output_invariants() {
        let candidates: Vec<Candidate> = (0..30)
            .map(|i| candidate(Some(&format!("Site {}", i % 7)), i as f64 * 0.4))
            .collect();
        let input_len = candidates.len();
        let projects = aggregate(origin(), candidates, &rules(5.0));

        assert!(projects.len() <= input_len);
        let names: HashSet<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), projects.len());
        for p in &projects {
            assert!(p.distance_km <= 5.0);
            assert!((p.distance_km - haversine_km(origin(), p.location)).abs() < 0.006);
        }
    }
}
