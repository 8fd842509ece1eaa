//! Shared fixtures for unit tests.

use crate::population::Individual;
use crate::problem::GroupedProblem;
use crate::population::Population;
use std::sync::Mutex;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Player {
    pub id: usize,
    pub score: f64,
    pub evaluated: bool,
}

impl Individual for Player {
    type Fitness = f64;
    fn fitness(&self) -> &f64 {
        &self.score
    }
    fn fitness_mut(&mut self) -> &mut f64 {
        &mut self.score
    }
    fn is_evaluated(&self) -> bool {
        self.evaluated
    }
    fn set_evaluated(&mut self, evaluated: bool) {
        self.evaluated = evaluated;
    }
}

/// Players whose ids are `offset..offset + scores.len()`.
pub(crate) fn players_from(offset: usize, scores: &[f64]) -> Vec<Player> {
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| Player {
            id: offset + i,
            score,
            evaluated: false,
        })
        .collect()
}

pub(crate) fn players(scores: &[f64]) -> Vec<Player> {
    players_from(0, scores)
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MatchRecord {
    pub ids: Vec<usize>,
    pub update: Vec<bool>,
    pub subpops: Vec<usize>,
    pub count_victories_only: bool,
    pub worker: usize,
}

/// Records every call and never changes fitness.
#[derive(Debug, Default)]
pub(crate) struct RecordingProblem {
    pub records: Mutex<Vec<MatchRecord>>,
    pub preprocessed: Vec<(Vec<bool>, bool)>,
    pub postprocessed: Vec<(Vec<bool>, bool)>,
    /// Panic when a match involves this id.
    pub fail_on: Option<usize>,
}

impl RecordingProblem {
    pub(crate) fn failing_on(id: usize) -> Self {
        Self {
            fail_on: Some(id),
            ..Self::default()
        }
    }

    pub(crate) fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Unordered id pairs of every two-slot match, smaller id first.
    pub(crate) fn pairs(&self) -> Vec<(usize, usize)> {
        self.records()
            .iter()
            .map(|r| (r.ids[0].min(r.ids[1]), r.ids[0].max(r.ids[1])))
            .collect()
    }

    /// How many matches flagged each id for update, indexed by id.
    pub(crate) fn update_counts(&self, n: usize) -> Vec<usize> {
        let mut counts = vec![0; n];
        for r in self.records() {
            for (id, &flag) in r.ids.iter().zip(&r.update) {
                if flag {
                    counts[*id] += 1;
                }
            }
        }
        counts
    }
}

impl GroupedProblem for RecordingProblem {
    type Individual = Player;

    fn preprocess(
        &mut self,
        _population: &mut Population<Player>,
        assess: &[bool],
        count_victories_only: bool,
    ) {
        self.preprocessed.push((assess.to_vec(), count_victories_only));
    }

    fn evaluate(
        &self,
        group: &mut [&mut Player],
        update: &[bool],
        count_victories_only: bool,
        subpops: &[usize],
        worker: usize,
    ) {
        assert_eq!(group.len(), update.len());
        assert_eq!(group.len(), subpops.len());
        let ids: Vec<usize> = group.iter().map(|p| p.id).collect();
        if let Some(bad) = self.fail_on {
            if ids.contains(&bad) {
                panic!("scripted failure on individual {bad}");
            }
        }
        self.records.lock().unwrap().push(MatchRecord {
            ids,
            update: update.to_vec(),
            subpops: subpops.to_vec(),
            count_victories_only,
            worker,
        });
    }

    fn postprocess(
        &mut self,
        population: &mut Population<Player>,
        assess: &[bool],
        count_victories_only: bool,
    ) -> usize {
        self.postprocessed.push((assess.to_vec(), count_victories_only));
        let mut finalized = 0;
        for (subpop, &flag) in population.subpops.iter_mut().zip(assess) {
            if flag {
                for p in subpop.individuals.iter_mut() {
                    p.evaluated = true;
                    finalized += 1;
                }
            }
        }
        finalized
    }
}
