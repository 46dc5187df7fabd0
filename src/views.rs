// src/views.rs

//! Derived projections over the configuration document.
//!
//! Everything here is a pure function of its inputs; none of it touches the
//! store. UI code calls these on values obtained from the store accessors.

use crate::document::{Certification, Planet, Project};
use chrono::{DateTime, NaiveDate};
use rand::Rng;

/// Viewports narrower than this are treated as mobile.
pub const MOBILE_BREAKPOINT_PX: u32 = 768;
/// Orbit scale applied on mobile viewports.
pub const MOBILE_ORBIT_SCALE: f64 = 0.35;

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// A certification is expired when its expiry date lies strictly before `today`.
///
/// Missing or unreadable expiry dates count as "never expires".
#[must_use]
pub fn is_expired(certification: &Certification, today: NaiveDate) -> bool {
    certification
        .expiry_date
        .as_deref()
        .and_then(parse_date)
        .is_some_and(|expiry| expiry < today)
}

#[must_use]
pub fn active_certifications(
    certifications: &[Certification],
    today: NaiveDate,
) -> Vec<Certification> {
    certifications
        .iter()
        .filter(|cert| !is_expired(cert, today))
        .cloned()
        .collect()
}

#[must_use]
pub fn active_certification_count(certifications: &[Certification], today: NaiveDate) -> usize {
    certifications
        .iter()
        .filter(|cert| !is_expired(cert, today))
        .count()
}

/// Looks up the planet behind a `/planet/:id` route.
#[must_use]
pub fn planet_by_id<'a>(planets: &'a [Planet], id: &str) -> Option<&'a Planet> {
    planets.iter().find(|planet| planet.id == id)
}

/// Copies `planets` with a fresh start angle in `[0, 360)` for each, order kept.
pub fn randomize_start_angles<R: Rng + ?Sized>(planets: &[Planet], rng: &mut R) -> Vec<Planet> {
    planets
        .iter()
        .map(|planet| Planet {
            start_angle: rng.gen_range(0.0..360.0),
            ..planet.clone()
        })
        .collect()
}

/// Orbit radius to draw for a given viewport width.
#[must_use]
pub fn scaled_orbit_radius(orbit_radius: f64, viewport_width: u32) -> f64 {
    if viewport_width < MOBILE_BREAKPOINT_PX {
        (orbit_radius * MOBILE_ORBIT_SCALE).round()
    } else {
        orbit_radius
    }
}

/// Inner orbits stack above outer ones.
#[must_use]
pub fn orbit_z_index(orbit_radius: f64) -> i32 {
    50 - (orbit_radius / 10.0).round() as i32
}

#[must_use]
pub fn featured_projects(projects: &[Project]) -> Vec<Project> {
    projects.iter().filter(|project| project.featured).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(parse_date("2024-01-01"), expected);
        assert_eq!(parse_date("2024-01-01T10:00:00Z"), expected);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn mobile_orbits_shrink() {
        assert_eq!(scaled_orbit_radius(200.0, 600), 70.0);
        assert_eq!(scaled_orbit_radius(200.0, 1280), 200.0);
    }

    #[test]
    fn z_index_drops_with_radius() {
        assert_eq!(orbit_z_index(200.0), 30);
        assert!(orbit_z_index(100.0) > orbit_z_index(300.0));
    }
}
