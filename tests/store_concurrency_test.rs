//! Concurrent readers alongside a writer on one shared store.
//!
//! Queries run on several threads while the provider's coordinates flip
//! between two positions. Every query must observe one whole write: the
//! returned distance is always exactly the old or the new position.

mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use helpers::{nearby_request, north_of, update_at, Marketplace, DELHI};
use nearby_core::geo::{distance_meters, round_to_tenth};
use nearby_core::proximity::ProviderProfile;
use nearby_core::Identity;

const READERS: usize = 4;
const WRITES: usize = 200;

#[test]
fn queries_see_either_position_during_updates() {
    let market = Marketplace::new();
    let before = north_of(DELHI, 1_000.0);
    let after = north_of(DELHI, 2_000.0);
    let id = market.add_provider(ProviderProfile::new("mover", "Mover"), before, true);
    let me = Identity::authenticated(id.clone());

    let expected = [
        round_to_tenth(distance_meters(DELHI, before)),
        round_to_tenth(distance_meters(DELHI, after)),
    ];
    let request = nearby_request(DELHI, Some(5_000));
    let writing = AtomicBool::new(true);
    let (market, request, writing, expected) = (&market, &request, &writing, &expected);

    thread::scope(|s| {
        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                s.spawn(move || {
                    let mut seen = 0_usize;
                    while writing.load(Ordering::SeqCst) || seen == 0 {
                        let response = market.service.nearby(request).unwrap();
                        assert_eq!(response.count, 1, "provider vanished mid-update");
                        let distance = response.data[0].distance_meters;
                        assert!(
                            expected.contains(&distance),
                            "distance {distance} is neither {} nor {}",
                            expected[0],
                            expected[1]
                        );
                        seen += 1;
                    }
                    seen
                })
            })
            .collect();

        for i in 0..WRITES {
            let target = if i % 2 == 0 { after } else { before };
            market
                .service
                .update_location(&me, &id, &update_at(target))
                .unwrap();
        }
        writing.store(false, Ordering::SeqCst);

        for reader in readers {
            assert!(reader.join().unwrap() > 0);
        }
    });

    // WRITES is even, so the last write restored `before`.
    let status = market.service.own_location(&me, &id).unwrap();
    assert_eq!(status.coordinates, Some(before));
}
