//! The demo signal fixture: five reports about two Austin chargers.
//!
//! All data in this module is hardcoded and fictional. Charger AUS_0123 has
//! three corroborating problem reports from three different sources; charger
//! AUS_0450 has one vague complaint contradicted by a healthy heartbeat,
//! which is exactly the shape certainty triage flags for verification.

use chrono::{TimeZone, Utc};

use gridops_contracts::signal::{Signal, SignalSource, SignalStatus};

/// Build the five-signal demo fixture.
pub fn demo_signals() -> Vec<Signal> {
    vec![
        Signal {
            id: "sig_001".to_string(),
            source: SignalSource::ThreeOneOne,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 20, 20, 0, 0).unwrap(),
            charger_id: "AUS_0123".to_string(),
            lat: 30.2672,
            lon: -97.7431,
            status: SignalStatus::Down,
            text: "charger dead".to_string(),
        },
        Signal {
            id: "sig_002".to_string(),
            source: SignalSource::Ugc,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 20, 20, 5, 0).unwrap(),
            charger_id: "AUS_0123".to_string(),
            lat: 30.2672,
            lon: -97.7431,
            status: SignalStatus::Down,
            text: "connector not working".to_string(),
        },
        Signal {
            id: "sig_003".to_string(),
            source: SignalSource::ChargerApi,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 20, 20, 8, 0).unwrap(),
            charger_id: "AUS_0123".to_string(),
            lat: 30.2672,
            lon: -97.7431,
            status: SignalStatus::Degraded,
            text: "session start failures".to_string(),
        },
        Signal {
            id: "sig_004".to_string(),
            source: SignalSource::ThreeOneOne,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 20, 20, 10, 0).unwrap(),
            charger_id: "AUS_0450".to_string(),
            lat: 30.269,
            lon: -97.749,
            status: SignalStatus::Unknown,
            text: "payment terminal issue".to_string(),
        },
        Signal {
            id: "sig_005".to_string(),
            source: SignalSource::ChargerApi,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 20, 20, 12, 0).unwrap(),
            charger_id: "AUS_0450".to_string(),
            lat: 30.269,
            lon: -97.749,
            status: SignalStatus::Online,
            text: "heartbeat online".to_string(),
        },
    ]
}

/// Deduplicate signals into one location per charger, first sighting wins.
pub fn charger_locations(signals: &[Signal]) -> Vec<gridops_core::geo::LocationPoint> {
    let mut points: Vec<gridops_core::geo::LocationPoint> = Vec::new();
    for signal in signals {
        if points.iter().any(|p| p.charger_id == signal.charger_id) {
            continue;
        }
        points.push(gridops_core::geo::LocationPoint {
            charger_id: signal.charger_id.clone(),
            lat: signal.lat,
            lon: signal.lon,
        });
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_covers_two_chargers_and_three_sources() {
        let signals = demo_signals();
        assert_eq!(signals.len(), 5);

        let chargers: std::collections::HashSet<&str> =
            signals.iter().map(|s| s.charger_id.as_str()).collect();
        assert_eq!(chargers.len(), 2);

        let sources: std::collections::HashSet<SignalSource> =
            signals.iter().map(|s| s.source).collect();
        assert_eq!(sources.len(), 3);
    }

    #[test]
    fn locations_deduplicate_per_charger() {
        let points = charger_locations(&demo_signals());
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].charger_id, "AUS_0123");
        assert_eq!(points[1].charger_id, "AUS_0450");
    }
}
