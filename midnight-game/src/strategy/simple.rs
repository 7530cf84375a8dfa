//! Context-free keep policies.
use crate::constants::{KEEP_FIVE_MAX_REMAINING, KEEP_FOUR_REMAINING, QUALIFIERS};
use crate::dice::{Dice, Die, take_one};
use crate::strategy::SimpleStrategy;

/// Secure the qualifiers first, then only bank near-certain value.
///
/// Once qualified it keeps every 6, a 5 only with two or fewer dice left, and
/// a 4 only as the very last die. Falls back to the highest die when nothing
/// else was kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Conservative;

impl SimpleStrategy for Conservative {
    fn name(&self) -> &'static str {
        "conservative"
    }

    fn decide(&self, kept: &[Die], rolled: &[Die]) -> Dice {
        let mut remaining: Dice = rolled.iter().copied().collect();
        let mut chosen = Dice::new();
        claim_missing_qualifiers(kept, &mut remaining, &mut chosen);
        finish_keep(kept, rolled, remaining, chosen)
    }
}

/// Like [`Conservative`], but banks sixes together with qualifiers on the
/// opening roll of a turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Middle;

impl SimpleStrategy for Middle {
    fn name(&self) -> &'static str {
        "middle"
    }

    fn decide(&self, kept: &[Die], rolled: &[Die]) -> Dice {
        let mut remaining: Dice = rolled.iter().copied().collect();
        let mut chosen = Dice::new();
        if kept.is_empty() {
            for die in opening_keep(rolled) {
                if take_one(&mut remaining, die) {
                    chosen.push(die);
                }
            }
        } else {
            claim_missing_qualifiers(kept, &mut remaining, &mut chosen);
        }
        finish_keep(kept, rolled, remaining, chosen)
    }
}

/// Always keep the single highest die.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepMax;

impl SimpleStrategy for KeepMax {
    fn name(&self) -> &'static str {
        "keep-max"
    }

    fn decide(&self, _kept: &[Die], rolled: &[Die]) -> Dice {
        highest(rolled)
    }
}

/// Keep every missing qualifier that was rolled, otherwise the highest die.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QualifierHunter;

impl SimpleStrategy for QualifierHunter {
    fn name(&self) -> &'static str {
        "qualifier-hunter"
    }

    fn decide(&self, kept: &[Die], rolled: &[Die]) -> Dice {
        let chosen: Dice = QUALIFIERS
            .iter()
            .copied()
            .filter(|q| !kept.contains(q) && rolled.contains(q))
            .collect();
        if chosen.is_empty() {
            highest(rolled)
        } else {
            chosen
        }
    }
}

fn qualifies_with(kept: &[Die], chosen: &[Die]) -> bool {
    QUALIFIERS
        .iter()
        .all(|q| kept.contains(q) || chosen.contains(q))
}

/// Scan `remaining` in roll order, moving each still-missing qualifier into
/// `chosen` until the hand qualifies.
fn claim_missing_qualifiers(kept: &[Die], remaining: &mut Dice, chosen: &mut Dice) {
    let mut idx = 0;
    while idx < remaining.len() && !qualifies_with(kept, chosen) {
        let die = remaining[idx];
        if QUALIFIERS.contains(&die) && !kept.contains(&die) && !chosen.contains(&die) {
            chosen.push(die);
            remaining.remove(idx);
        } else {
            idx += 1;
        }
    }
}

/// Opening-roll keep for [`Middle`]: qualifiers plus sixes when they are cheap.
fn opening_keep(rolled: &[Die]) -> Dice {
    let sixes = rolled.iter().filter(|&&d| d == 6).count();
    let rolled_qualifiers: Dice = QUALIFIERS
        .iter()
        .copied()
        .filter(|q| rolled.contains(q))
        .collect();

    let mut keep = Dice::new();
    if rolled_qualifiers.len() == QUALIFIERS.len() {
        if sixes > 0 {
            keep.extend(rolled_qualifiers);
            keep.extend(std::iter::repeat_n(6, sixes));
        } else if let Some(&first) = rolled.iter().find(|d| QUALIFIERS.contains(d)) {
            keep.push(first);
        }
    } else if !rolled_qualifiers.is_empty() {
        keep.extend(rolled_qualifiers);
        keep.extend(std::iter::repeat_n(6, sixes.min(1)));
    }
    keep
}

/// Greedy tail once the hand qualifies.
fn keep_when_qualified(remaining: &mut Dice) -> Dice {
    let mut keep = Dice::new();
    loop {
        if take_one(remaining, 6) {
            keep.push(6);
        } else if remaining.len() <= KEEP_FIVE_MAX_REMAINING && take_one(remaining, 5) {
            keep.push(5);
        } else if remaining.len() == KEEP_FOUR_REMAINING && take_one(remaining, 4) {
            keep.push(4);
        } else {
            break;
        }
    }
    keep
}

fn finish_keep(kept: &[Die], rolled: &[Die], mut remaining: Dice, mut chosen: Dice) -> Dice {
    if qualifies_with(kept, &chosen) {
        chosen.extend(keep_when_qualified(&mut remaining));
    }
    if chosen.is_empty() {
        return highest(rolled);
    }
    chosen
}

fn highest(rolled: &[Die]) -> Dice {
    rolled.iter().max().copied().into_iter().collect()
}
