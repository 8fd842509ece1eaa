//! Pairing algorithms for the match scheduler.
//!
//! Single-elimination runs over the plain subpopulation slice because every
//! round depends on the previous round's winners. The other styles run over a
//! [`MatchArena`] and only ever iterate the focal rows `x` of the chunk they
//! were given.

use super::arena::MatchArena;
use super::quota::OpponentQuota;
use crate::error::Result;
use crate::population::{Chunk, Fitness, Individual};
use crate::problem::GroupedProblem;
use rand::seq::SliceRandom;
use rand::Rng;

/// Plays a knockout bracket over `individuals`, returning the match count.
///
/// Each round matches slot `x` against slot `len - x - 1` and then moves the
/// winner into the lower slot, so after the last round the champion sits at
/// index 0. Exact ties are settled with a fair coin. With an odd bracket
/// length the middle slot gets a bye.
///
/// When the length is not a power of two, byes make win counts unequal
/// across individuals; that is accepted, not corrected.
pub(crate) fn single_elimination<P, R>(
    individuals: &mut [P::Individual],
    problem: &P,
    subpop: usize,
    rng: &mut R,
) -> usize
where
    P: GroupedProblem,
    R: Rng + ?Sized,
{
    let mut len = individuals.len();
    let mut matches = 0;

    while len > 1 {
        for x in 0..len / 2 {
            let y = len - x - 1;
            let (left, right) = individuals.split_at_mut(y);
            let mut group = [&mut left[x], &mut right[0]];
            problem.evaluate(&mut group, &[true, true], true, &[subpop, subpop], 0);
            matches += 1;
        }

        for x in 0..len / 2 {
            let y = len - x - 1;
            let challenger = individuals[y].fitness();
            let holder = individuals[x].fitness();
            let challenger_wins = challenger.better_than(holder)
                || (challenger.equivalent_to(holder) && rng.random_bool(0.5));
            if challenger_wins {
                individuals.swap(x, y);
            }
        }

        len = if len % 2 == 1 { len / 2 + 1 } else { len / 2 };
    }

    matches
}

/// Plays every row `x` in `rows` against every `y > x` of the whole
/// subpopulation, so each unordered pair is played by exactly one worker.
pub(crate) fn round_robin<P: GroupedProblem>(
    arena: &MatchArena<'_, P>,
    rows: Chunk,
    worker: usize,
) -> Result<()> {
    let n = arena.len();
    for x in rows.indices() {
        for y in x + 1..n {
            arena.play(x, y, [true, true], worker)?;
        }
    }
    Ok(())
}

/// Draws `group_size` distinct opponents for each row, without replacement
/// and never the row itself. Only the focal individual is updated.
pub(crate) fn random_one_way<P, R>(
    arena: &MatchArena<'_, P>,
    rows: Chunk,
    group_size: usize,
    rng: &mut R,
    worker: usize,
) -> Result<()>
where
    P: GroupedProblem,
    R: Rng + ?Sized,
{
    let n = arena.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    for x in rows.indices() {
        let mut remaining: Vec<usize> = order.iter().copied().filter(|&y| y != x).collect();
        for _ in 0..group_size {
            let pick = rng.random_range(0..remaining.len());
            let y = remaining.swap_remove(pick);
            arena.play(x, y, [true, false], worker)?;
        }
    }
    Ok(())
}

/// Fills each row's quota with opponents, higher indices first.
///
/// If the higher-indexed individuals are no more than the row still needs,
/// it plays all of them; otherwise it samples just enough. Any shortfall is
/// filled from random lower-indexed individuals. An opponent is updated only
/// while it is below its own quota, unless `allow_over_evaluation` is set.
pub(crate) fn random_two_way<P, R>(
    arena: &MatchArena<'_, P>,
    rows: Chunk,
    quota: &OpponentQuota,
    allow_over_evaluation: bool,
    rng: &mut R,
    worker: usize,
) -> Result<()>
where
    P: GroupedProblem,
    R: Rng + ?Sized,
{
    let n = arena.len();
    for x in rows.indices() {
        let need = quota.remaining(x);
        if need == 0 {
            continue;
        }

        let mut higher: Vec<usize> = (x + 1..n).collect();
        if higher.len() <= need {
            for y in higher {
                if !play_counted(arena, quota, x, y, allow_over_evaluation, worker)? {
                    break;
                }
            }
        } else {
            for _ in 0..need {
                let pick = rng.random_range(0..higher.len());
                let y = higher.swap_remove(pick);
                if !play_counted(arena, quota, x, y, allow_over_evaluation, worker)? {
                    break;
                }
            }
        }

        let mut lower: Vec<usize> = (0..x).collect();
        while quota.remaining(x) > 0 && !lower.is_empty() {
            let pick = rng.random_range(0..lower.len());
            let y = lower.swap_remove(pick);
            if !play_counted(arena, quota, x, y, allow_over_evaluation, worker)? {
                break;
            }
        }
    }
    Ok(())
}

/// Plays `x` against `y` if `x` still has a free slot. Returns whether the
/// match was played.
fn play_counted<P: GroupedProblem>(
    arena: &MatchArena<'_, P>,
    quota: &OpponentQuota,
    x: usize,
    y: usize,
    allow_over_evaluation: bool,
    worker: usize,
) -> Result<bool> {
    if !quota.try_claim(x) {
        return Ok(false);
    }
    let opponent_update = quota.try_claim(y) || allow_over_evaluation;
    arena.play(x, y, [true, opponent_update], worker)?;
    Ok(true)
}
