use chrono::Utc;

use crate::environment::types::{Badge, BadgeTier, Entry, HelpContribution};

/// An achievement and the activity it takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    pub min: usize,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

/// Ascending by `min`
pub const THRESHOLDS: [Threshold; 5] = [
    Threshold {
        min: 1,
        name: "First Step",
        icon: "👣",
        color: "bg-gray-100 text-gray-800",
    },
    Threshold {
        min: 5,
        name: "Generous Giver",
        icon: "🎁",
        color: "bg-blue-100 text-blue-800",
    },
    Threshold {
        min: 10,
        name: "Community Hero",
        icon: "🦸",
        color: "bg-purple-100 text-purple-800",
    },
    Threshold {
        min: 25,
        name: "Legendary Giver",
        icon: "⭐",
        color: "bg-yellow-100 text-yellow-800",
    },
    Threshold {
        min: 50,
        name: "Giveaway Champion",
        icon: "🏆",
        color: "bg-orange-100 text-orange-800",
    },
];

/// Entries plus contributions authored by `user_id`
pub fn activity_count<'a>(
    user_id: &str,
    entries: impl IntoIterator<Item = &'a Entry>,
    contributions: impl IntoIterator<Item = &'a HelpContribution>,
) -> usize {
    let entries = entries.into_iter().filter(|e| e.user_id == user_id).count();
    let contributions = contributions
        .into_iter()
        .filter(|c| c.user_id == user_id)
        .count();
    entries + contributions
}

/// Every badge `user_id` has earned but doesn't hold yet, lowest first
pub fn evaluate<'a>(
    user_id: &str,
    entries: impl IntoIterator<Item = &'a Entry>,
    contributions: impl IntoIterator<Item = &'a HelpContribution>,
    existing: &[Badge],
) -> Vec<Badge> {
    let activity = activity_count(user_id, entries, contributions);
    THRESHOLDS
        .iter()
        .enumerate()
        .take_while(|(_, threshold)| activity >= threshold.min)
        .filter(|(_, threshold)| !existing.iter().any(|b| b.name == threshold.name))
        .map(|(position, threshold)| Badge {
            id: crate::helper::mint_id("badge"),
            name: threshold.name.to_string(),
            description: format!(
                "Earned after {} giveaway/contribution activities",
                threshold.min
            ),
            icon: threshold.icon.to_string(),
            color: Some(threshold.color.to_string()),
            tier: BadgeTier::from_repr(position as u8 + 1),
            earned_at: Some(Utc::now()),
        })
        .collect()
}
