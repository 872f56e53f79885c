use itertools::{Itertools, repeat_n};

use crate::automaton::Language;

/// All words over `alphabet` of length below `max_word_length`, shortest
/// first.
pub fn words_up_to(
    alphabet: &[char],
    max_word_length: usize,
) -> impl Iterator<Item = Vec<char>> + '_ {
    (0..max_word_length)
        .flat_map(move |i| repeat_n(alphabet.iter().copied(), i).multi_cartesian_product())
}

/// Checks if two automata accept the same language by comparing them on all
/// words over the alphabet of `a` up to a certain length.
pub fn same_language(a: &impl Language, b: &impl Language, max_word_length: usize) -> bool {
    first_difference(a, b, max_word_length).is_none()
}

/// The shortest word below `max_word_length` on which the two automata
/// disagree.
pub fn first_difference(
    a: &impl Language,
    b: &impl Language,
    max_word_length: usize,
) -> Option<Vec<char>> {
    let alphabet = a.alphabet();
    words_up_to(&alphabet, max_word_length).find(|word| a.accepts(word) != b.accepts(word))
}

pub fn assert_same_language(a: &impl Language, b: &impl Language, max_word_length: usize) {
    // first we need to check if the alphabets are the same
    if a.alphabet() != b.alphabet() {
        panic!("Alphabets are not the same");
    }

    if let Some(word) = first_difference(a, b, max_word_length) {
        let word = word.iter().collect::<String>();
        if a.accepts_str(&word) {
            panic!(
                "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                word
            );
        } else {
            panic!(
                "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                word
            );
        }
    }
}
