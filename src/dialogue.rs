//! Flavor text spoken by the character, tiered by relationship level.
//!
//! Tier = `min(level, 4)` for dialogue, `min(level, 5)` for the status label.
//! Every table is non-empty and all selection goes through modulo, so no
//! click count or level can index out of bounds.

use rand::Rng;

/// Highest dialogue tier; levels above this reuse the last table.
pub const MAX_DIALOGUE_TIER: u32 = 4;

/// Spoken on the very first appearance, whatever the level.
pub const FIRST_GREETING: &str = "…可愛い青虫だね";

pub const APPEARANCE_LINES: [&[&str]; 5] = [
    // 0-4 squashes: just met
    &["…また来たんだね", "…そこにいたのか", "…おいで", "…よく来たね"],
    // 5-9: getting close
    &["…待ってたよ", "…また会えたね", "…いい子だね", "…今日も来てくれたんだね", "…嬉しいよ"],
    // 10-14: trust
    &["…君は可愛いね", "…もう離れられないみたいだ", "…特別な存在だよ", "…君のこと、好きだよ", "…大切にするからね"],
    // 15-19: deep bond
    &["…君は僕のものだよ", "…愛おしいな", "…ずっと一緒にいよう", "…君だけを見てる", "…とても大事な子だ"],
    // 20+: fated
    &[
        "…運命を感じるよ",
        "…君は僕の宝物だ",
        "…永遠に君のそばに",
        "…この瞬間が愛しい",
        "…完璧な関係だね",
        "…君に出会えてよかった",
    ],
];

pub const SQUASH_LINES: [&[&str]; 5] = [
    &["…いい子だね", "…可愛いよ", "…よくできました", "…素直だね", "…いい感じだ"],
    &["…気持ちよさそうだね", "…もっと…", "…素敵だよ", "…とても素直だ", "…完璧だ"],
    &["…愛してるよ", "…完璧…", "…君だけだよ", "…最高に可愛い", "…理想的な青虫だ", "…君は特別だよ"],
    &[
        "…たまらないね",
        "…最高の瞬間だ",
        "…幸せ…",
        "…完璧なつぶされっぷり",
        "…もっとつぶしてあげる",
        "…ご褒美あげる",
    ],
    &["…永遠にこうしていたい", "…運命だね", "…これが愛だよ", "…君は僕だけのもの", "…至福のひととき", "…最高に幸せだ"],
];

pub const STATUS_LABELS: [&str; 6] = ["出会ったばかり", "知り合い", "親しい仲", "信頼し合う関係", "深い絆", "運命の相手"];

fn dialogue_tier(level: u32) -> usize {
    level.min(MAX_DIALOGUE_TIER) as usize
}

/// Line spoken when a caterpillar appears. Deterministic in its arguments.
pub fn appearance_line(click_count: u32, level: u32) -> &'static str {
    if click_count == 0 {
        return FIRST_GREETING;
    }
    let lines = APPEARANCE_LINES[dialogue_tier(level)];
    lines[click_count as usize % lines.len()]
}

/// Line spoken on a squash, picked uniformly from the tier's table.
pub fn squash_line<R: Rng + ?Sized>(level: u32, rng: &mut R) -> &'static str {
    let lines = SQUASH_LINES[dialogue_tier(level)];
    lines[rng.random_range(0..lines.len())]
}

pub fn status_label(level: u32) -> &'static str {
    STATUS_LABELS[(level as usize).min(STATUS_LABELS.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_first_greeting_ignores_level() {
        for level in [0, 1, 4, 5, 1000] {
            assert_eq!(appearance_line(0, level), "…可愛い青虫だね");
        }
    }

    #[test]
    fn test_appearance_line_wraps_by_count() {
        // tier 0 has four lines: count 4 wraps to index 0
        assert_eq!(appearance_line(1, 0), "…そこにいたのか");
        assert_eq!(appearance_line(4, 0), "…また来たんだね");
        assert_eq!(appearance_line(5, 1), "…待ってたよ");
        assert_eq!(appearance_line(u32::MAX, 9), appearance_line(u32::MAX, 4));
    }

    #[test]
    fn test_squash_line_stays_in_tier() {
        let mut rng = SmallRng::seed_from_u64(7);
        for level in 0..12u32 {
            let tier = level.min(4) as usize;
            for _ in 0..50 {
                let line = squash_line(level, &mut rng);
                assert!(SQUASH_LINES[tier].contains(&line), "level {level}: '{line}' not in tier {tier}");
            }
        }
    }

    #[test]
    fn test_squash_and_appearance_tables_are_disjoint_per_tier() {
        for tier in 0..5 {
            for line in SQUASH_LINES[tier] {
                assert!(!APPEARANCE_LINES[tier].contains(line), "tier {tier} shares '{line}'");
            }
        }
    }

    #[test]
    fn test_status_label_clamps() {
        assert_eq!(status_label(0), "出会ったばかり");
        assert_eq!(status_label(5), "運命の相手");
        assert_eq!(status_label(6), status_label(5));
        assert_eq!(status_label(u32::MAX), status_label(5));
    }
}
