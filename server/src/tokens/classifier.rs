//! Active/expired classification of darshan tokens.
//!
//! A token's validity ends at its slot's closing minute on its visit date,
//! in venue-local time. The classification is never stored; every read
//! recomputes it against the current instant.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::{TimeSlot, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Active,
    Expired,
}

/// The instant a token stops being valid, or `None` when its slot string
/// cannot be read.
pub fn expires_at(token: &Token) -> Option<NaiveDateTime> {
    TimeSlot::parse_end(&token.time_slot)
        .ok()
        .map(|end| token.date.and_time(end))
}

/// `true` only when `now` is strictly past the slot's end. A token whose slot
/// cannot be parsed stays active.
pub fn is_expired(token: &Token, now: NaiveDateTime) -> bool {
    match TimeSlot::parse_end(&token.time_slot) {
        Ok(end) => now > token.date.and_time(end),
        Err(e) => {
            tracing::warn!(
                token_id = %token.id,
                time_slot = %token.time_slot,
                error = %e,
                "Unreadable time slot, keeping token active"
            );
            false
        }
    }
}

pub fn classify(token: &Token, now: NaiveDateTime) -> Classification {
    if is_expired(token, now) {
        Classification::Expired
    } else {
        Classification::Active
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub active: Vec<Token>,
    pub expired: Vec<Token>,
}

/// Splits `tokens` into active and expired, each ordered newest booking first.
/// Equal `created_at` values keep their input order.
pub fn partition(tokens: &[Token], now: NaiveDateTime) -> Partition {
    let (mut active, mut expired): (Vec<Token>, Vec<Token>) = tokens
        .iter()
        .cloned()
        .partition(|token| !is_expired(token, now));

    newest_first(&mut active);
    newest_first(&mut expired);

    Partition { active, expired }
}

fn newest_first(tokens: &mut [Token]) {
    tokens.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn token(slot: &str, created_at: DateTime<Utc>) -> Token {
        Token {
            id: Uuid::new_v4(),
            temple: "somnath".to_string(),
            name: "Asha".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time_slot: slot.to_string(),
            created_at,
        }
    }

    fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn booked(day: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, h, 0, 0).unwrap()
    }

    #[test]
    fn test_within_slot_is_active() {
        let t = token("08:00 - 09:00", booked(1, 0));
        assert!(!is_expired(&t, at(1, 8, 30, 0)));
        assert_eq!(classify(&t, at(1, 8, 30, 0)), Classification::Active);
    }

    #[test]
    fn test_one_second_past_end_is_expired() {
        let t = token("08:00 - 09:00", booked(1, 0));
        assert!(is_expired(&t, at(1, 9, 0, 1)));
        assert_eq!(classify(&t, at(1, 9, 0, 1)), Classification::Expired);
    }

    #[test]
    fn test_exact_end_instant_is_still_active() {
        let t = token("08:00 - 09:00", booked(1, 0));
        assert!(!is_expired(&t, at(1, 9, 0, 0)));
    }

    #[test]
    fn test_sub_second_past_end_is_expired() {
        let t = token("08:00 - 09:00", booked(1, 0));
        let now = at(1, 9, 0, 0) + chrono::Duration::milliseconds(1);
        assert!(is_expired(&t, now));
    }

    #[test]
    fn test_unparseable_slot_is_always_active() {
        for slot in ["garbage", "08:00 -", "08:00 - xx:yy", ""] {
            let t = token(slot, booked(1, 0));
            assert!(!is_expired(&t, at(1, 0, 0, 0)), "slot {slot:?}");
            assert!(!is_expired(&t, at(30, 23, 59, 59)), "slot {slot:?}");
            assert!(expires_at(&t).is_none());
        }
    }

    #[test]
    fn test_expiry_only_looks_at_end_component() {
        let t = token("?? - 09:00", booked(1, 0));
        assert_eq!(expires_at(&t), Some(at(1, 9, 0, 0)));
        assert!(is_expired(&t, at(1, 9, 0, 1)));
    }

    #[test]
    fn test_extra_separator_or_seconds_still_expire_at_end_minute() {
        for slot in ["08:00 - 09:00 - 10:00", "08:00 - 09:00:30"] {
            let t = token(slot, booked(1, 0));
            assert_eq!(expires_at(&t), Some(at(1, 9, 0, 0)), "slot {slot:?}");
            assert!(!is_expired(&t, at(1, 9, 0, 0)), "slot {slot:?}");
            assert!(is_expired(&t, at(3, 0, 0, 0)), "slot {slot:?}");
        }
    }

    #[test]
    fn test_unpadded_end_time_is_read() {
        let t = token("8:00 - 9:00", booked(1, 0));
        assert!(is_expired(&t, at(3, 0, 0, 0)));
    }

    #[test]
    fn test_partition_orders_newest_booking_first() {
        let older = token("08:00 - 09:00", booked(1, 10));
        let newer = token("08:00 - 09:00", booked(2, 10));
        let split = partition(&[older.clone(), newer.clone()], at(1, 8, 0, 0));

        assert_eq!(split.active, vec![newer, older]);
        assert!(split.expired.is_empty());
    }

    #[test]
    fn test_partition_splits_and_keeps_ties_stable() {
        let first = token("06:00 - 07:00", booked(1, 10));
        let second = token("06:00 - 07:00", booked(1, 10));
        let live = token("18:00 - 19:00", booked(3, 10));
        let input = vec![first.clone(), live.clone(), second.clone()];

        let split = partition(&input, at(1, 12, 0, 0));

        assert_eq!(split.active, vec![live]);
        assert_eq!(split.expired, vec![first, second]);
        assert_eq!(input.len(), 3);
    }

    #[test]
    fn test_partition_of_empty_input() {
        assert_eq!(partition(&[], at(1, 0, 0, 0)), Partition::default());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        const SLOTS: &[&str] = &[
            "06:00 - 07:00",
            "08:00 - 09:00",
            "12:30 - 13:15",
            "23:00 - 23:59",
            "garbage",
            "10:00 - ",
        ];

        fn arb_token() -> impl Strategy<Value = Token> {
            (
                prop::array::uniform16(any::<u8>()),
                0u32..10,
                prop::sample::select(SLOTS),
                0i64..2_000_000,
            )
                .prop_map(|(id, day, slot, created)| Token {
                    id: Uuid::from_bytes(id),
                    temple: "somnath".to_string(),
                    name: "visitor".to_string(),
                    date: NaiveDate::from_ymd_opt(2024, 6, 1 + day).unwrap(),
                    time_slot: slot.to_string(),
                    created_at: Utc.timestamp_opt(1_717_000_000 + created, 0).unwrap(),
                })
        }

        fn arb_now() -> impl Strategy<Value = NaiveDateTime> {
            (0i64..(12 * 86_400)).prop_map(|secs| at(1, 0, 0, 0) + chrono::Duration::seconds(secs))
        }

        proptest! {
            #[test]
            fn partition_covers_input_exactly_once(
                tokens in prop::collection::vec(arb_token(), 0..40),
                now in arb_now(),
            ) {
                let split = partition(&tokens, now);
                prop_assert_eq!(split.active.len() + split.expired.len(), tokens.len());

                for t in &split.active {
                    prop_assert!(!is_expired(t, now));
                }
                for t in &split.expired {
                    prop_assert!(is_expired(t, now));
                }

                let mut seen: Vec<Uuid> = split
                    .active
                    .iter()
                    .chain(split.expired.iter())
                    .map(|t| t.id)
                    .collect();
                let mut expected: Vec<Uuid> = tokens.iter().map(|t| t.id).collect();
                seen.sort();
                expected.sort();
                prop_assert_eq!(seen, expected);
            }

            #[test]
            fn partition_sides_are_newest_first(
                tokens in prop::collection::vec(arb_token(), 0..40),
                now in arb_now(),
            ) {
                let split = partition(&tokens, now);
                for side in [&split.active, &split.expired] {
                    for pair in side.windows(2) {
                        prop_assert!(pair[0].created_at >= pair[1].created_at);
                    }
                }
            }

            #[test]
            fn garbage_slot_never_expires(now in arb_now()) {
                let t = token("garbage", booked(1, 0));
                prop_assert_eq!(classify(&t, now), Classification::Active);
            }
        }
    }
}
