//! Meta snapshot: card, pair and archetype usage across top players' decks.
//!
//! # Responsibilities
//! - Pull the player's deck out of a battle log entry
//! - Count card usage, card pairs and win-condition archetypes
//! - Render the most common entries with their share of analysed decks
//!
//! # Design Decisions
//! - Pure aggregation over JSON values; fetching is the caller's job
//! - Only ladder battles (`PvP`, `pathOfLegend`) are counted
//! - The first side of a battle log entry is the player whose log it is
//! - Ties are broken by name so the output is stable

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Win-condition cards per archetype, checked in order.
pub const WIN_CONDITIONS: &[(&str, &[&str])] = &[
    (
        "Beatdown",
        &[
            "Golem",
            "Lava Hound",
            "Giant",
            "Electro Giant",
            "Goblin Giant",
            "Royal Giant",
            "Elixir Golem",
        ],
    ),
    ("Siege", &["X-Bow", "Mortar"]),
    (
        "Control",
        &[
            "Miner",
            "Graveyard",
            "Goblin Barrel",
            "Wall Breakers",
            "Skeleton Barrel",
        ],
    ),
    ("Cycle", &["Hog Rider", "Royal Hogs", "Ram Rider", "Battle Ram"]),
    (
        "Bridge Spam",
        &["P.E.K.K.A", "Mega Knight", "Elite Barbarians", "Royal Recruits"],
    ),
    ("Air", &["Balloon"]),
    ("Three Musketeers", &["Three Musketeers"]),
];

/// Archetype of a deck with no known win condition.
pub const UNKNOWN_ARCHETYPE: &str = "Unknown";

/// Battle types included in the snapshot.
pub const LADDER_BATTLE_TYPES: [&str; 2] = ["PvP", "pathOfLegend"];

/// Entries kept in the card and pair rankings.
pub const TOP_ENTRIES: usize = 10;

/// First archetype whose win conditions appear in `cards`.
pub fn classify_archetype<S: AsRef<str>>(cards: &[S]) -> &'static str {
    WIN_CONDITIONS
        .iter()
        .find(|(_, win_conditions)| {
            cards
                .iter()
                .any(|card| win_conditions.contains(&card.as_ref()))
        })
        .map(|(archetype, _)| *archetype)
        .unwrap_or(UNKNOWN_ARCHETYPE)
}

/// Card names of the player's side of a ladder battle.
///
/// `None` for other battle types and for entries without a deck.
pub fn ladder_deck(battle: &Value) -> Option<Vec<String>> {
    let battle_type = battle.get("type")?.as_str()?;
    if !LADDER_BATTLE_TYPES.contains(&battle_type) {
        return None;
    }

    let cards: Vec<String> = battle
        .get("team")?
        .get(0)?
        .get("cards")?
        .as_array()?
        .iter()
        .filter_map(|card| card.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

/// Player tags of a rankings payload (`{"items": [{"tag": ..}, ..]}`).
pub fn ranked_player_tags(rankings: &Value) -> Vec<String> {
    rankings
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("tag").and_then(Value::as_str))
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Running counters for a meta snapshot.
#[derive(Debug, Default)]
pub struct MetaAnalyzer {
    cards: HashMap<String, u32>,
    pairs: HashMap<String, u32>,
    archetypes: HashMap<&'static str, u32>,
    decks: u32,
}

impl MetaAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count up to `battle_limit` ladder decks from one player's battle log.
    ///
    /// Returns the number of decks counted.
    pub fn add_battle_log(&mut self, battle_log: &Value, battle_limit: usize) -> usize {
        let Some(battles) = battle_log.as_array() else {
            tracing::debug!("Battle log is not a list, skipping player");
            return 0;
        };

        let decks: Vec<Vec<String>> = battles
            .iter()
            .filter_map(ladder_deck)
            .take(battle_limit)
            .collect();

        for deck in &decks {
            self.add_deck(deck);
        }
        decks.len()
    }

    /// Count one deck.
    pub fn add_deck<S: AsRef<str>>(&mut self, cards: &[S]) {
        for card in cards {
            *self.cards.entry(card.as_ref().to_string()).or_default() += 1;
        }

        let mut sorted: Vec<&str> = cards.iter().map(|card| card.as_ref()).collect();
        sorted.sort_unstable();
        for (i, first) in sorted.iter().enumerate() {
            for second in &sorted[i + 1..] {
                *self.pairs.entry(format!("{} + {}", first, second)).or_default() += 1;
            }
        }

        *self.archetypes.entry(classify_archetype(cards)).or_default() += 1;
        self.decks += 1;
    }

    pub fn decks_analyzed(&self) -> u32 {
        self.decks
    }

    /// Render the counters. `players_analyzed` is reported as given.
    pub fn snapshot(&self, players_analyzed: usize) -> MetaSnapshot {
        let share = |count: u32| format_share(count, self.decks);

        MetaSnapshot {
            meta_summary: MetaSummary {
                total_players_analyzed: players_analyzed,
                total_decks_analyzed: self.decks,
            },
            top_cards: most_common(&self.cards, Some(TOP_ENTRIES))
                .into_iter()
                .map(|(card, count)| CardUsage {
                    card: card.to_string(),
                    count,
                    usage_rate: share(count),
                })
                .collect(),
            top_synergies: most_common(&self.pairs, Some(TOP_ENTRIES))
                .into_iter()
                .map(|(pair, count)| Synergy {
                    pair: pair.to_string(),
                    count,
                })
                .collect(),
            archetypes: most_common(&self.archetypes, None)
                .into_iter()
                .map(|(archetype, count)| ArchetypeShare {
                    archetype: archetype.to_string(),
                    count,
                    share: share(count),
                })
                .collect(),
        }
    }
}

fn most_common<K: AsRef<str>>(counts: &HashMap<K, u32>, limit: Option<usize>) -> Vec<(&str, u32)> {
    let mut entries: Vec<(&str, u32)> = counts.iter().map(|(k, v)| (k.as_ref(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}

fn format_share(count: u32, total: u32) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", f64::from(count) * 100.0 / f64::from(total))
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaSnapshot {
    pub meta_summary: MetaSummary,
    pub top_cards: Vec<CardUsage>,
    pub top_synergies: Vec<Synergy>,
    pub archetypes: Vec<ArchetypeShare>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaSummary {
    pub total_players_analyzed: usize,
    pub total_decks_analyzed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CardUsage {
    pub card: String,
    pub count: u32,
    pub usage_rate: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Synergy {
    pub pair: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeShare {
    pub archetype: String,
    pub count: u32,
    pub share: String,
}
