//! The short line under today's balance that changes with the time of day.

use rand::{Rng, seq::IndexedRandom};

const LATE_NIGHT: &[&str] = &["Dunia sudah tidur."];

const MORNING: &[&str] = &[
    "Masih pagi, belum terlalu ramai.",
    "Suasana pagi ini lumayan tenang.",
    "Belum banyak aktivitas hari ini.",
];

const MORNING_NEGATIVE: &[&str] = &[
    "Pagi yang cukup sibuk.",
    "Lumayan banyak aktivitas awal ini.",
    "Perputaran pagi ini cukup terasa.",
];

const AFTERNOON: &[&str] = &[
    "Setengah hari sudah terlewati.",
    "Hari ini berjalan seperti biasa.",
    "Masih ada sisa waktu hari ini.",
];

const AFTERNOON_NEGATIVE: &[&str] = &[
    "Siang ini lumayan padat.",
    "Aktivitas hari ini terus berjalan.",
    "Hari ini cukup banyak cerita.",
];

const EVENING: &[&str] = &[
    "Satu hari hampir selesai.",
    "Waktunya mulai melambat.",
    "Malam yang cukup damai.",
];

const EVENING_NEGATIVE: &[&str] = &[
    "Hari yang lumayan panjang.",
    "Satu hari yang cukup padat.",
    "Banyak hal lewat hari ini.",
];

fn phrases_for(hour: u8, is_negative: bool) -> &'static [&'static str] {
    match (hour, is_negative) {
        (5..=10, false) => MORNING,
        (5..=10, true) => MORNING_NEGATIVE,
        (11..=16, false) => AFTERNOON,
        (11..=16, true) => AFTERNOON_NEGATIVE,
        (17..=23, false) => EVENING,
        (17..=23, true) => EVENING_NEGATIVE,
        _ => LATE_NIGHT,
    }
}

/// Pick a phrase for the local `hour` (0-23) and whether today's balance is
/// below zero.
pub fn select_micro_copy(hour: u8, is_negative: bool, rng: &mut impl Rng) -> &'static str {
    phrases_for(hour, is_negative)
        .choose(rng)
        .copied()
        .unwrap_or(LATE_NIGHT[0])
}
