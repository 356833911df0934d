//! Property-based tests for distance math and the radius query.
//!
//! These tests verify:
//! - Haversine distance is zero on identical points and symmetric
//! - Query results are sorted, bounded by the radius and complete
//! - Providers that are not sharing are never returned

mod helpers;

use helpers::{nearby_request, Marketplace, DELHI};
use nearby_core::geo::{distance_meters, BoundingBox, Coordinate};
use nearby_core::proximity::ProviderProfile;
use proptest::prelude::*;

fn coordinate() -> impl Strategy<Value = Coordinate> {
    (-180.0_f64..=180.0, -90.0_f64..=90.0).prop_map(|(lon, lat)| Coordinate::new(lon, lat))
}

/// Points within roughly 55 km of Delhi, plus a sharing flag.
fn provider_near_delhi() -> impl Strategy<Value = (Coordinate, bool)> {
    (-0.5_f64..=0.5, -0.5_f64..=0.5, any::<bool>()).prop_map(|(dlon, dlat, sharing)| {
        (
            Coordinate::new(DELHI.longitude + dlon, DELHI.latitude + dlat),
            sharing,
        )
    })
}

/// Moves `c` by a small offset, wrapping longitude and clamping latitude.
fn nudge(c: Coordinate, (dlon, dlat): (f64, f64)) -> Coordinate {
    let mut longitude = c.longitude + dlon;
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }
    Coordinate::new(longitude, (c.latitude + dlat).clamp(-90.0, 90.0))
}

// ============================================================================
// Distance
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_to_self_is_zero(a in coordinate()) {
        prop_assert!(distance_meters(a, a).abs() < 1e-6);
    }

    #[test]
    fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        prop_assert!((ab - ba).abs() < 1e-6, "{ab} != {ba}");
    }

    #[test]
    fn distance_never_exceeds_half_circumference(a in coordinate(), b in coordinate()) {
        let d = distance_meters(a, b);
        prop_assert!(d >= 0.0);
        prop_assert!(d <= std::f64::consts::PI * 6_371_000.0 + 1e-3);
    }

    /// The spatial pre-filter must never drop a point that is inside the
    /// radius.
    #[test]
    fn bounding_box_contains_every_point_in_radius(
        center in coordinate(),
        offset in (-0.6_f64..=0.6, -0.6_f64..=0.6),
        radius in 1.0_f64..=50_000.0,
    ) {
        let point = nudge(center, offset);
        if distance_meters(center, point) <= radius {
            prop_assert!(BoundingBox::around(center, radius).contains(point));
        }
    }
}

// ============================================================================
// Radius query
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn query_results_are_sorted_bounded_and_consented(
        providers in prop::collection::vec(provider_near_delhi(), 0..20),
        radius in 1_i64..=50_000,
    ) {
        let market = Marketplace::new();
        for (i, (at, sharing)) in providers.iter().enumerate() {
            market.add_provider(ProviderProfile::new(format!("p{i}"), "P"), *at, *sharing);
        }

        let response = market
            .service
            .nearby(&nearby_request(DELHI, Some(radius)))
            .unwrap();
        prop_assert_eq!(response.count, response.data.len());

        #[allow(clippy::cast_precision_loss)]
        let limit = radius as f64;
        for pair in response.data.windows(2) {
            prop_assert!(pair[0].distance_meters <= pair[1].distance_meters);
        }
        for result in &response.data {
            // Rounded to a tenth for display; filtering used full precision.
            prop_assert!(result.distance_meters <= limit + 0.05);

            let index: usize = result.provider_id.as_str()[1..].parse().unwrap();
            prop_assert!(providers[index].1, "{} is not sharing", result.provider_id);
        }

        for (i, (at, sharing)) in providers.iter().enumerate() {
            if *sharing && distance_meters(DELHI, *at) <= limit - 1.0 {
                let id = format!("p{i}");
                prop_assert!(
                    response.data.iter().any(|r| r.provider_id.as_str() == id),
                    "{id} within radius but missing"
                );
            }
        }
    }
}
