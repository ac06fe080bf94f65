//! Educational facts shown on the level transition screen

use crate::sim::RandomSource;

pub const FACTS: &[&str] = &[
    "Dill has been grown for over 5,000 years; ancient Egyptians used it as a remedy.",
    "Carrots were originally purple or yellow. Orange carrots appeared in the 17th century.",
    "A zucchini is botanically a fruit: it grows from the flower and holds the seeds.",
    "Bell peppers contain more vitamin C per gram than oranges.",
    "Eating vegetables of different colours gives your body different vitamins.",
    "Zucchini flowers are edible and are often stuffed and fried.",
    "Carrots are about 88% water.",
    "Sweet peppers start green and turn red, yellow or orange as they ripen.",
    "Dill seeds and leaves taste different, so cooks treat them as two separate spices.",
    "A single zucchini plant can produce dozens of fruits in one summer.",
];

/// Pick a fact uniformly at random
pub fn random_fact(rng: &mut impl RandomSource) -> &'static str {
    let index = ((rng.next_unit() * FACTS.len() as f32) as usize).min(FACTS.len() - 1);
    FACTS[index]
}
