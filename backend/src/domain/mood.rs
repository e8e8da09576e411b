//! Mood tracker domain: the fixed mood vocabulary, its tone/energy
//! classification, recorded entries, and the derived insights (per-mood
//! statistics and the spiral heuristic).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Longest accepted cause, in characters.
pub const MOOD_CAUSE_MAX: usize = 500;
/// Default number of recent entries inspected by the spiral heuristic.
pub const DEFAULT_SPIRAL_WINDOW: u32 = 5;
/// Largest spiral window a caller may request.
pub const MAX_SPIRAL_WINDOW: u32 = 50;
/// Fewest entries needed before the spiral heuristic reports a direction.
pub const MIN_SPIRAL_ENTRIES: usize = 3;
/// Default stats window in days.
pub const DEFAULT_STATS_DAYS: u32 = 30;
/// Longest stats window in days.
pub const MAX_STATS_DAYS: u32 = 365;
/// Default number of history entries returned.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
/// Most history entries returned in one response.
pub const MAX_HISTORY_LIMIT: u32 = 200;

/// Emotional valence of a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodTone {
    Positive,
    Negative,
}

impl MoodTone {
    /// Lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Arousal level of a mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodEnergy {
    Low,
    High,
}

impl MoodEnergy {
    /// Lowercase storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

macro_rules! moods {
    ($($variant:ident => ($tone:ident, $energy:ident)),* $(,)?) => {
        /// The closed set of moods a user can record.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum Mood {
            $($variant,)*
        }

        impl Mood {
            /// Every mood, in table order.
            pub const ALL: &'static [Mood] = &[$(Mood::$variant,)*];

            /// Canonical label, e.g. `"Calm"`.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }

            /// Fixed tone for this mood.
            pub fn tone(self) -> MoodTone {
                match self {
                    $(Self::$variant => MoodTone::$tone,)*
                }
            }

            /// Fixed energy for this mood.
            pub fn energy(self) -> MoodEnergy {
                match self {
                    $(Self::$variant => MoodEnergy::$energy,)*
                }
            }
        }
    };
}

moods! {
    Calm => (Positive, Low),
    Relaxed => (Positive, Low),
    Content => (Positive, Low),
    Peaceful => (Positive, Low),
    Grateful => (Positive, Low),
    Excited => (Positive, High),
    Joyful => (Positive, High),
    Thrilled => (Positive, High),
    Inspired => (Positive, High),
    Playful => (Positive, High),
    Depressed => (Negative, Low),
    Tired => (Negative, Low),
    Disappointed => (Negative, Low),
    Annoyed => (Negative, Low),
    Bored => (Negative, Low),
    Anxious => (Negative, High),
    Overwhelmed => (Negative, High),
    Panicked => (Negative, High),
    Irritated => (Negative, High),
    Frustrated => (Negative, High),
}

/// Raised for labels outside the mood table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    /// Case-insensitive lookup.
    ///
    /// # Examples
    /// ```
    /// use mindspace::domain::{Mood, MoodEnergy, MoodTone};
    ///
    /// let mood: Mood = "anxious".parse().unwrap();
    /// assert_eq!(mood.tone(), MoodTone::Negative);
    /// assert_eq!(mood.energy(), MoodEnergy::High);
    /// assert!("Hangry".parse::<Mood>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|mood| mood.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownMood(needle.to_owned()))
    }
}

impl TryFrom<String> for Mood {
    type Error = UnknownMood;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Mood> for &'static str {
    fn from(value: Mood) -> Self {
        value.label()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failure for [`MoodCause`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cause must be at most {max} characters")]
pub struct CauseTooLong {
    pub max: usize,
}

/// Optional free-text explanation for an entry, trimmed, at most 500 chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct MoodCause(String);

impl MoodCause {
    /// Trim and validate. Blank input yields `None`.
    pub fn parse(raw: &str) -> Result<Option<Self>, CauseTooLong> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MOOD_CAUSE_MAX {
            return Err(CauseTooLong {
                max: MOOD_CAUSE_MAX,
            });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }
}

impl AsRef<str> for MoodCause {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<MoodCause> for String {
    fn from(value: MoodCause) -> Self {
        value.0
    }
}

/// Identifier for a recorded mood entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoodEntryId(Uuid);

impl MoodEntryId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for MoodEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One timestamped mood observation owned by a user.
///
/// Tone and energy are derived from `mood` on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: MoodEntryId,
    pub user_id: UserId,
    pub mood: Mood,
    pub cause: Option<MoodCause>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Derived tone.
    pub fn tone(&self) -> MoodTone {
        self.mood.tone()
    }

    /// Derived energy.
    pub fn energy(&self) -> MoodEnergy {
        self.mood.energy()
    }
}

/// Per-mood aggregate over a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodStat {
    pub mood: Mood,
    pub count: u32,
    pub tone: MoodTone,
    pub energy: MoodEnergy,
}

/// Count entries per mood, most frequent first; ties sort by label.
pub fn mood_stats<'a>(entries: impl IntoIterator<Item = &'a MoodEntry>) -> Vec<MoodStat> {
    let mut counts: BTreeMap<Mood, u32> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_default() += 1;
    }
    let mut stats: Vec<MoodStat> = counts
        .into_iter()
        .map(|(mood, count)| MoodStat {
            mood,
            count,
            tone: mood.tone(),
            energy: mood.energy(),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.mood.label().cmp(b.mood.label()))
    });
    stats
}

/// Direction reported by the spiral heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiralDirection {
    InsufficientData,
    Upward,
    Downward,
    Mixed,
}

/// Confidence attached to a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpiralStrength {
    Strong,
    Moderate,
    Neutral,
}

/// Outcome of [`detect_spiral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodSpiral {
    pub spiral: SpiralDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<SpiralStrength>,
    pub positive_count: u32,
    pub negative_count: u32,
    pub window: u32,
}

/// Classify the trend across the most recent entries.
///
/// `recent` must already be limited to the newest `window` entries. Shares
/// are measured against `window`, not against how many entries exist, so a
/// short history needs a larger majority to register.
///
/// # Examples
/// ```
/// use mindspace::domain::{detect_spiral_from_tones, MoodTone, SpiralDirection, SpiralStrength};
///
/// let tones = [MoodTone::Positive, MoodTone::Positive, MoodTone::Positive, MoodTone::Negative];
/// let spiral = detect_spiral_from_tones(tones, 5);
/// assert_eq!(spiral.spiral, SpiralDirection::Upward);
/// assert_eq!(spiral.strength, Some(SpiralStrength::Moderate));
/// ```
pub fn detect_spiral_from_tones(
    recent: impl IntoIterator<Item = MoodTone>,
    window: u32,
) -> MoodSpiral {
    let (mut positive_count, mut negative_count, mut total) = (0_u32, 0_u32, 0_usize);
    for tone in recent {
        total += 1;
        match tone {
            MoodTone::Positive => positive_count += 1,
            MoodTone::Negative => negative_count += 1,
        }
    }

    let mut result = MoodSpiral {
        spiral: SpiralDirection::InsufficientData,
        strength: None,
        positive_count,
        negative_count,
        window,
    };
    if total < MIN_SPIRAL_ENTRIES {
        return result;
    }

    // Integer form of `count >= window * 0.7` / `0.6`.
    let meets = |count: u32, tenths: u64| u64::from(count) * 10 >= u64::from(window) * tenths;
    let (spiral, strength) = if meets(positive_count, 7) {
        (SpiralDirection::Upward, SpiralStrength::Strong)
    } else if meets(positive_count, 6) {
        (SpiralDirection::Upward, SpiralStrength::Moderate)
    } else if meets(negative_count, 7) {
        (SpiralDirection::Downward, SpiralStrength::Strong)
    } else if meets(negative_count, 6) {
        (SpiralDirection::Downward, SpiralStrength::Moderate)
    } else {
        (SpiralDirection::Mixed, SpiralStrength::Neutral)
    };
    result.spiral = spiral;
    result.strength = Some(strength);
    result
}

/// Convenience wrapper over [`detect_spiral_from_tones`] for entries.
pub fn detect_spiral<'a>(
    recent: impl IntoIterator<Item = &'a MoodEntry>,
    window: u32,
) -> MoodSpiral {
    detect_spiral_from_tones(recent.into_iter().map(MoodEntry::tone), window)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    use super::MoodTone::{Negative as N, Positive as P};

    fn entry(mood: Mood, minutes_ago: i64) -> MoodEntry {
        let now = Utc::now();
        MoodEntry {
            id: MoodEntryId::random(),
            user_id: UserId::random(),
            mood,
            cause: None,
            timestamp: now - Duration::minutes(minutes_ago),
            created_at: now,
        }
    }

    #[rstest]
    #[case(Mood::Calm, MoodTone::Positive, MoodEnergy::Low)]
    #[case(Mood::Grateful, MoodTone::Positive, MoodEnergy::Low)]
    #[case(Mood::Playful, MoodTone::Positive, MoodEnergy::High)]
    #[case(Mood::Bored, MoodTone::Negative, MoodEnergy::Low)]
    #[case(Mood::Frustrated, MoodTone::Negative, MoodEnergy::High)]
    fn mood_table_classifies(
        #[case] mood: Mood,
        #[case] tone: MoodTone,
        #[case] energy: MoodEnergy,
    ) {
        assert_eq!(mood.tone(), tone);
        assert_eq!(mood.energy(), energy);
    }

    #[rstest]
    fn mood_table_is_balanced() {
        assert_eq!(Mood::ALL.len(), 20);
        for tone in [P, N] {
            for energy in [MoodEnergy::Low, MoodEnergy::High] {
                let count = Mood::ALL
                    .iter()
                    .filter(|m| m.tone() == tone && m.energy() == energy)
                    .count();
                assert_eq!(count, 5, "{tone:?}/{energy:?}");
            }
        }
    }

    #[rstest]
    #[case("Calm", Mood::Calm)]
    #[case("  overwhelmed ", Mood::Overwhelmed)]
    #[case("JOYFUL", Mood::Joyful)]
    fn parse_is_case_insensitive(#[case] raw: &str, #[case] expected: Mood) {
        assert_eq!(raw.parse::<Mood>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Happy")]
    #[case("Sad")]
    fn parse_rejects_unknown_labels(#[case] raw: &str) {
        assert!(raw.parse::<Mood>().is_err());
    }

    #[rstest]
    fn mood_serialises_as_label() {
        let value = serde_json::to_value(Mood::Peaceful).expect("serialise");
        assert_eq!(value, serde_json::json!("Peaceful"));
    }

    #[rstest]
    fn cause_is_trimmed_and_bounded() {
        assert_eq!(MoodCause::parse("   ").expect("blank ok"), None);
        let cause = MoodCause::parse("  work deadline ").expect("ok").expect("some");
        assert_eq!(cause.as_ref(), "work deadline");
        assert_eq!(
            MoodCause::parse(&"x".repeat(MOOD_CAUSE_MAX + 1)),
            Err(CauseTooLong {
                max: MOOD_CAUSE_MAX
            })
        );
        assert!(MoodCause::parse(&"x".repeat(MOOD_CAUSE_MAX)).is_ok());
    }

    #[rstest]
    #[case(vec![], SpiralDirection::InsufficientData, None)]
    #[case(vec![P, P], SpiralDirection::InsufficientData, None)]
    #[case(vec![P, P, P, P, P], SpiralDirection::Upward, Some(SpiralStrength::Strong))]
    #[case(vec![P, P, P, P, N], SpiralDirection::Upward, Some(SpiralStrength::Strong))]
    #[case(vec![P, P, P, N, N], SpiralDirection::Upward, Some(SpiralStrength::Moderate))]
    #[case(vec![N, N, N, N, P], SpiralDirection::Downward, Some(SpiralStrength::Strong))]
    #[case(vec![N, N, N, P, P], SpiralDirection::Downward, Some(SpiralStrength::Moderate))]
    #[case(vec![P, P, N], SpiralDirection::Mixed, Some(SpiralStrength::Neutral))]
    #[case(vec![P, P, P], SpiralDirection::Upward, Some(SpiralStrength::Moderate))]
    fn spiral_classifies_default_window(
        #[case] tones: Vec<MoodTone>,
        #[case] direction: SpiralDirection,
        #[case] strength: Option<SpiralStrength>,
    ) {
        let spiral = detect_spiral_from_tones(tones, DEFAULT_SPIRAL_WINDOW);
        assert_eq!(spiral.spiral, direction);
        assert_eq!(spiral.strength, strength);
    }

    #[rstest]
    fn spiral_scales_thresholds_with_window() {
        let tones = vec![P; 7].into_iter().chain(vec![N; 3]);
        let spiral = detect_spiral_from_tones(tones, 10);
        assert_eq!(spiral.spiral, SpiralDirection::Upward);
        assert_eq!(spiral.strength, Some(SpiralStrength::Strong));
        assert_eq!(spiral.positive_count, 7);
        assert_eq!(spiral.negative_count, 3);
    }

    #[rstest]
    fn spiral_from_entries_uses_tones() {
        let entries = [
            entry(Mood::Anxious, 1),
            entry(Mood::Tired, 2),
            entry(Mood::Panicked, 3),
            entry(Mood::Calm, 4),
        ];
        let spiral = detect_spiral(&entries, 5);
        assert_eq!(spiral.spiral, SpiralDirection::Downward);
        assert_eq!(spiral.strength, Some(SpiralStrength::Moderate));
    }

    #[rstest]
    fn stats_sort_by_count_then_label() {
        let entries = [
            entry(Mood::Tired, 1),
            entry(Mood::Calm, 2),
            entry(Mood::Tired, 3),
            entry(Mood::Anxious, 4),
        ];
        let stats = mood_stats(&entries);
        let summary: Vec<_> = stats.iter().map(|s| (s.mood, s.count)).collect();
        assert_eq!(
            summary,
            vec![(Mood::Tired, 2), (Mood::Anxious, 1), (Mood::Calm, 1)]
        );
        assert_eq!(stats[0].tone, MoodTone::Negative);
        assert_eq!(stats[0].energy, MoodEnergy::Low);
    }
}
