//! Demo nurse rosters.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::day::DayOfWeek;
use crate::domain::{Nurse, NurseId, Preference, ShiftType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoData {
    Small,
    Large,
}

impl std::str::FromStr for DemoData {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SMALL" => Ok(DemoData::Small),
            "LARGE" => Ok(DemoData::Large),
            _ => Err(()),
        }
    }
}

impl DemoData {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoData::Small => "SMALL",
            DemoData::Large => "LARGE",
        }
    }

    fn parameters(&self) -> DemoDataParameters {
        match self {
            DemoData::Small => DemoDataParameters {
                nurse_count: 15,
                preference_count_distribution: vec![(0, 1.0), (1, 4.0), (2, 3.0), (3, 2.0)],
            },
            DemoData::Large => DemoDataParameters {
                nurse_count: 50,
                preference_count_distribution: vec![(0, 1.0), (1, 2.0), (2, 3.0), (3, 3.0)],
            },
        }
    }
}

struct DemoDataParameters {
    nurse_count: usize,
    preference_count_distribution: Vec<(usize, f64)>,
}

/// List of available demo data sets.
pub fn list_demo_data() -> Vec<&'static str> {
    vec!["SMALL", "LARGE"]
}

/// Generates a demo roster of the given size. Ids start at 1.
pub fn generate(demo: DemoData) -> Vec<Nurse> {
    let params = demo.parameters();
    let mut rng = StdRng::seed_from_u64(0);

    let name_permutations = generate_name_permutations(&mut rng);

    (0..params.nurse_count)
        .map(|i| {
            let name = &name_permutations[i % name_permutations.len()];
            let count = pick_count(&mut rng, &params.preference_count_distribution);
            let preferences: Vec<Preference> = (0..count)
                .map(|_| random_preference(&mut rng))
                .collect();
            Nurse::new(i as NurseId + 1, name.as_str()).with_preferences(preferences)
        })
        .collect()
}

fn random_preference(rng: &mut StdRng) -> Preference {
    let day = DayOfWeek::ALL.choose(rng).copied().unwrap_or(DayOfWeek::Monday);
    let shift = ShiftType::ALL.choose(rng).copied().unwrap_or(ShiftType::Day);
    Preference::new(day, shift)
}

/// Pick a count based on weighted distribution.
fn pick_count(rng: &mut StdRng, distribution: &[(usize, f64)]) -> usize {
    let total_weight: f64 = distribution.iter().map(|(_, w)| w).sum();
    let mut choice = rng.gen::<f64>() * total_weight;

    for (count, weight) in distribution {
        if choice < *weight {
            return *count;
        }
        choice -= weight;
    }
    distribution.last().map(|(c, _)| *c).unwrap_or(1)
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn generate_name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}
