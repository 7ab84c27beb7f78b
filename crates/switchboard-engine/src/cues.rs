// SPDX-FileCopyrightText: 2026 Switchboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phrase cues shared by the trigger evaluator and the heuristic provider.
//!
//! Matching is case-insensitive and anchored at a word start, so a cue acts
//! as a stem: `"crash"` matches "crashes" and "crashing", while `"happy"`
//! does not match "unhappy". Punctuation is folded to spaces on both sides,
//! which is why cues spell "can't" as `"can t"`.

/// Message text normalized for cue matching.
#[derive(Debug, Clone)]
pub struct CueText {
    folded: String,
}

impl CueText {
    pub fn new(text: &str) -> Self {
        Self {
            folded: format!(" {} ", fold(text)),
        }
    }

    /// Whether `cue` occurs at a word start.
    pub fn has(&self, cue: &str) -> bool {
        let cue = fold(cue);
        !cue.is_empty() && self.folded.contains(&format!(" {cue}"))
    }

    /// The first cue from `cues` that occurs, if any.
    pub fn first<'a>(&self, cues: &[&'a str]) -> Option<&'a str> {
        cues.iter().copied().find(|c| self.has(c))
    }

    /// Every cue from `cues` that occurs.
    pub fn all<'a>(&self, cues: &[&'a str]) -> Vec<&'a str> {
        cues.iter().copied().filter(|c| self.has(c)).collect()
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Explicit statements that the account already has Premium.
pub const ALREADY_PREMIUM: &[&str] = &[
    "already on premium",
    "already have premium",
    "already pay for premium",
    "already subscribed to premium",
    "we are on premium",
    "we re on premium",
    "our premium plan",
    "our premium subscription",
    "as a premium customer",
];

pub const NOT_PREMIUM: &[&str] = &[
    "not on premium",
    "free plan",
    "basic plan",
    "starter plan",
    "standard plan",
];

pub const ONBOARDING_INCOMPLETE: &[&str] = &[
    "just signed up",
    "just joined",
    "new account",
    "still onboarding",
    "haven t finished onboarding",
    "have not finished onboarding",
    "not finished onboarding",
    "first week",
    "getting started",
    "setting up our account",
    "not set up yet",
];

pub const ONBOARDING_COMPLETE: &[&str] = &[
    "finished onboarding",
    "completed onboarding",
    "onboarding is done",
];

/// Something is broken right now.
pub const INCIDENT: &[&str] = &[
    "broken",
    "not working",
    "doesn t work",
    "does not work",
    "stopped working",
    "isn t working",
    "error",
    "crash",
    "bug",
    "outage",
    "is down",
    "went down",
    "fails",
    "failed",
    "failing",
    "failure",
    "glitch",
    "can t log in",
    "cannot log in",
    "won t load",
    "not loading",
    "not syncing",
];

pub const LOW_ENGAGEMENT: &[&str] = &[
    "haven t used",
    "have not used",
    "stopped using",
    "rarely use",
    "barely use",
    "don t use",
    "not using",
    "haven t logged in",
    "haven t been using",
];

pub const HIGH_ENGAGEMENT: &[&str] = &["every day", "daily", "all the time"];

pub const BAD_STANDING: &[&str] = &[
    "overdue",
    "unpaid",
    "payment failed",
    "card declined",
    "past due",
    "suspended",
    "cancel",
    "refund",
    "chargeback",
    "outstanding invoice",
];

pub const RENEWAL_SOON: &[&str] = &[
    "renew",
    "contract ends",
    "contract expires",
    "contract is ending",
    "contract is up",
    "end of our contract",
    "subscription expires",
    "subscription ends",
    "expiring",
];

pub const RECENTLY_RENEWED: &[&str] = &["just renewed", "recently renewed", "renewed last"];

pub const VIDEO_CALLS: &[&str] = &[
    "video call",
    "video consult",
    "video visit",
    "video appointment",
    "telemedicine",
    "telehealth",
    "teleconsult",
    "online consultation",
];

pub const ANALYTICS: &[&str] = &["analytics", "advanced report", "insights dashboard"];

/// Premium-only capabilities named outright. Bare "upgrade" or "unlock" is not
/// enough: app upgrades and locked accounts are not premium requests.
pub const PREMIUM_SUITE: &[&str] = &[
    "premium feature",
    "premium suite",
    "premium tier",
    "premium module",
    "upgrade to premium",
    "upgrade our plan to premium",
    "unlock premium",
];

pub const POSITIVE: &[&str] = &[
    "love",
    "great",
    "thank",
    "awesome",
    "amazing",
    "excellent",
    "happy",
    "fantastic",
    "wonderful",
    "appreciate",
    "enjoy",
    "helpful",
    "pleased",
    "glad",
];

pub const NEGATIVE: &[&str] = &[
    "not happy",
    "unhappy",
    "not great",
    "frustrat",
    "angry",
    "annoy",
    "terrible",
    "awful",
    "disappoint",
    "ridiculous",
    "worst",
    "hate",
];

pub const ANGRY: &[&str] = &[
    "angry",
    "furious",
    "unacceptable",
    "ridiculous",
    "worst",
    "terrible",
    "awful",
    "hate",
    "outrageous",
];

pub const FRUSTRATED: &[&str] = &[
    "frustrat",
    "annoy",
    "disappoint",
    "still not",
    "keeps",
    "fed up",
    "not happy",
    "unhappy",
];

pub const USAGE_GROWTH: &[&str] = &[
    "more patients",
    "more appointments",
    "more bookings",
    "growing fast",
    "we re growing",
    "we are growing",
    "busier",
    "doubled",
    "tripled",
    "fully booked",
    "booked solid",
    "expanding",
    "new location",
    "opening a second",
];

pub const TEAM_GROWTH: &[&str] = &[
    "new doctor",
    "new physician",
    "new staff",
    "new colleague",
    "new hire",
    "hiring",
    "hired",
    "add users",
    "add more users",
    "adding users",
    "add a user",
    "additional users",
    "more seats",
    "add seats",
    "extra seats",
    "joining our team",
    "joined our team",
    "another doctor",
    "more doctors",
    "second doctor",
    "new receptionist",
    "new nurse",
];

pub const HOW_TO: &[&str] = &[
    "how do i",
    "how to",
    "how can i",
    "where do i",
    "where can i find",
    "tutorial",
    "guide",
    "explain",
    "show me",
    "walk me through",
    "what does",
    "help me understand",
    "documentation",
];

pub const REONBOARDING: &[&str] = &[
    "refresher",
    "retrain",
    "re train",
    "forgot how",
    "start over",
    "set up again",
    "coming back",
    "reactivate",
    "from scratch",
    "train our new",
    "onboard our new",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive() {
        let text = CueText::new("We LOVE the Video Calls");
        assert!(text.has("love"));
        assert!(text.has("video call"));
    }

    #[test]
    fn cues_match_as_word_stems() {
        let text = CueText::new("The app keeps crashing");
        assert!(text.has("crash"));
        assert!(!text.has("ashing"));
    }

    #[test]
    fn negated_words_do_not_match_their_stem() {
        let text = CueText::new("We are unhappy");
        assert!(!text.has("happy"));
        assert!(text.has("unhappy"));
    }

    #[test]
    fn apostrophes_fold_to_spaces() {
        let text = CueText::new("It doesn't work, I can't log in!");
        assert!(text.has("doesn t work"));
        assert!(text.has("can't log in"));
    }

    #[test]
    fn phrases_span_collapsed_whitespace() {
        let text = CueText::new("video\n   call please");
        assert!(text.has("video call"));
    }

    #[test]
    fn first_and_all_report_matched_cues() {
        let text = CueText::new("broken and failing");
        assert_eq!(text.first(INCIDENT), Some("broken"));
        assert_eq!(text.all(INCIDENT), vec!["broken", "failing"]);
        assert_eq!(text.first(VIDEO_CALLS), None);
    }

    #[test]
    fn empty_cue_never_matches() {
        assert!(!CueText::new("anything").has("  "));
    }

    #[test]
    fn calendar_is_not_a_premium_cue() {
        let text = CueText::new("The calendar sync is broken");
        assert!(text.first(VIDEO_CALLS).is_none());
        assert!(text.first(ANALYTICS).is_none());
        assert!(text.first(PREMIUM_SUITE).is_none());
    }

    #[test]
    fn generic_upgrade_and_unlock_are_not_premium_cues() {
        for message in [
            "Since last night's app upgrade, nobody can log in",
            "I can't unlock my account after the password reset",
        ] {
            assert!(CueText::new(message).first(PREMIUM_SUITE).is_none(), "{message}");
        }
        assert_eq!(
            CueText::new("How do we upgrade to Premium?").first(PREMIUM_SUITE),
            Some("upgrade to premium")
        );
    }
}
