// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account-size detection from head counts and keywords in the message.

use std::sync::LazyLock;

use regex::Regex;
use switchboard_core::{Message, OrgSize};

use crate::cues::CueText;

/// A number followed by a seat-like noun: "50 seats", "20+ users", "12 full-time doctors".
///
/// A leading time preposition is captured so "in 2024 users ..." can be
/// recognized as a year.
static COUNT_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:\b(?P<prep>in|since|during|by|until|before|after|from|through)\s+)?\b(?P<count>\d[\d,]*)\s*\+?\s*(?:full[- ]time\s+|part[- ]time\s+|active\s+|licensed\s+)?(?:seats?|users?|licen[cs]es?|accounts?|doctors?|physicians?|practitioners?|dentists?|therapists?|providers?|clinicians?|specialists?|nurses?|staff|employees?|people|members?|locations?|clinics?|sites?|offices?|practices?)\b",
    )
    .expect("seat-count pattern is valid")
});

/// "team of 30", "staff of 25".
static GROUP_OF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:team|staff|practice|group|network)\s+of\s+(?P<count>\d[\d,]*)\b")
        .expect("group-size pattern is valid")
});

const ENTERPRISE_KEYWORDS: &[&str] = &[
    "enterprise",
    "hospital network",
    "hospital group",
    "health system",
    "chain of clinics",
];

/// Detected account size plus the head count that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgSizeSignal {
    pub size: OrgSize,
    /// Largest head count found, if any.
    pub seat_count: Option<u64>,
}

/// Classifies accounts as small clinics or enterprises.
#[derive(Debug, Clone, Copy)]
pub struct OrgSizeDetector {
    threshold: u32,
}

impl OrgSizeDetector {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// An explicit head count wins over keywords; no signal means small clinic.
    pub fn detect(&self, message: &Message) -> OrgSizeSignal {
        let text = message.as_str();
        let seat_count = largest_count(text);

        let size = match seat_count {
            Some(count) if count >= u64::from(self.threshold) => OrgSize::Enterprise,
            Some(_) => OrgSize::SmallClinic,
            None if CueText::new(text).first(ENTERPRISE_KEYWORDS).is_some() => {
                OrgSize::Enterprise
            }
            None => OrgSize::SmallClinic,
        };

        OrgSizeSignal { size, seat_count }
    }
}

impl Default for OrgSizeDetector {
    fn default() -> Self {
        Self::new(20)
    }
}

fn largest_count(text: &str) -> Option<u64> {
    COUNT_NOUN_RE
        .captures_iter(text)
        .chain(GROUP_OF_RE.captures_iter(text))
        .filter_map(|caps| {
            let count = caps.name("count")?.as_str().trim_end_matches(',');
            if caps.name("prep").is_some() && is_year(count) {
                return None;
            }
            count.replace(',', "").parse::<u64>().ok()
        })
        .max()
}

/// Four bare digits in 1900..=2099.
fn is_year(digits: &str) -> bool {
    digits.len() == 4 && digits.parse::<u16>().is_ok_and(|n| (1900..=2099).contains(&n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(text: &str) -> OrgSizeSignal {
        OrgSizeDetector::default().detect(&Message::new(text).unwrap())
    }

    #[test]
    fn small_head_count_is_small_clinic() {
        let signal = detect("I want to use video calls for my clinic with 5 doctors");
        assert_eq!(signal.size, OrgSize::SmallClinic);
        assert_eq!(signal.seat_count, Some(5));
    }

    #[test]
    fn large_seat_count_is_enterprise() {
        let signal = detect("Our enterprise account (50 seats) wants analytics access");
        assert_eq!(signal.size, OrgSize::Enterprise);
        assert_eq!(signal.seat_count, Some(50));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(detect("We have 20 users").size, OrgSize::Enterprise);
        assert_eq!(detect("We have 19 users").size, OrgSize::SmallClinic);
    }

    #[test]
    fn explicit_count_beats_enterprise_keyword() {
        let signal = detect("We're on the enterprise tier but only 4 seats");
        assert_eq!(signal.size, OrgSize::SmallClinic);
    }

    #[test]
    fn keyword_without_count_is_enterprise() {
        assert_eq!(detect("Our hospital network needs this").size, OrgSize::Enterprise);
        assert_eq!(detect("Enterprise plan question").size, OrgSize::Enterprise);
    }

    #[test]
    fn no_signal_defaults_to_small_clinic() {
        let signal = detect("The calendar sync is broken");
        assert_eq!(signal.size, OrgSize::SmallClinic);
        assert_eq!(signal.seat_count, None);
    }

    #[test]
    fn largest_count_decides() {
        let signal = detect("3 locations and 45 practitioners in total");
        assert_eq!(signal.seat_count, Some(45));
        assert_eq!(signal.size, OrgSize::Enterprise);
    }

    #[test]
    fn grouped_digits_and_modifiers_are_understood() {
        assert_eq!(detect("about 1,200 users").seat_count, Some(1200));
        assert_eq!(detect("20+ seats").seat_count, Some(20));
        assert_eq!(detect("12 full-time doctors").seat_count, Some(12));
        assert_eq!(detect("a team of 30 across two sites").seat_count, Some(30));
    }

    #[test]
    fn numbers_without_seat_nouns_are_ignored() {
        let signal = detect("Invoice 4821 from March 2024 is wrong");
        assert_eq!(signal.seat_count, None);
    }

    #[test]
    fn years_after_time_prepositions_are_not_head_counts() {
        let signal = detect("In 2024 users reported slow logins");
        assert_eq!(signal.seat_count, None);
        assert_eq!(signal.size, OrgSize::SmallClinic);

        assert_eq!(detect("Since 2019 staff have used the app").seat_count, None);
        assert_eq!(detect("Since 2024, users keep asking").seat_count, None);
        assert_eq!(detect("in 25 clinics").seat_count, Some(25));
        assert_eq!(detect("by 2,500 users").seat_count, Some(2500));
    }

    #[test]
    fn custom_threshold_applies() {
        let detector = OrgSizeDetector::new(5);
        let signal = detector.detect(&Message::new("we have 6 doctors").unwrap());
        assert_eq!(signal.size, OrgSize::Enterprise);
    }
}
