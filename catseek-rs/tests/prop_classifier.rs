use proptest::prelude::*;

use catseek::{Category, Classifier, ResponseBank, Responder};

const GREETINGS: [&str; 3] = ["hi", "hello", "hey"];

fn responder(seed: u64) -> Responder {
    Responder::with_seed(ResponseBank::classic(), Classifier::default(), seed)
}

fn assert_reply_in(seed: u64, input: &str, expected: Category) {
    let mut responder = responder(seed);
    assert_eq!(responder.classify(input), expected, "input: {:?}", input);
    let reply = responder.respond(input).to_string();
    assert!(
        responder.bank().contains(expected, &reply),
        "reply {:?} not in {} list",
        reply,
        expected
    );
}

/// Any text without `?`, biased toward letters that change under lowercasing
fn text_without_question_mark() -> impl Strategy<Value = String> {
    prop_oneof![
        "[^?]{0,32}",
        "[a-zA-ZİIıßΣσÄäÉé !.,]{0,24}",
    ]
}

fn mixed_case(word: &str, mask: &[bool]) -> String {
    word.chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
        .collect()
}

fn contains_greeting(input: &str) -> bool {
    let lowered = input.to_lowercase();
    GREETINGS.iter().any(|g| lowered.contains(g))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_question_mark_always_wins(
        before in ".{0,32}",
        after in ".{0,32}",
        seed in any::<u64>(),
    ) {
        let input = format!("{}?{}", before, after);
        assert_reply_in(seed, &input, Category::Question);
    }

    #[test]
    fn prop_greeting_without_question_is_hello(
        before in text_without_question_mark(),
        after in text_without_question_mark(),
        greeting in prop::sample::select(GREETINGS.to_vec()),
        mask in prop::collection::vec(any::<bool>(), 1..6),
        seed in any::<u64>(),
    ) {
        let input = format!("{}{}{}", before, mixed_case(greeting, &mask), after);
        assert_reply_in(seed, &input, Category::Hello);
    }

    #[test]
    fn prop_plain_text_is_default(
        input in text_without_question_mark(),
        seed in any::<u64>(),
    ) {
        prop_assume!(!contains_greeting(&input));
        assert_reply_in(seed, &input, Category::Default);
    }

    #[test]
    fn prop_classifier_matches_lowercase_substring_rule(
        input in text_without_question_mark(),
    ) {
        let expected = if contains_greeting(&input) {
            Category::Hello
        } else {
            Category::Default
        };
        prop_assert_eq!(Classifier::default().classify(&input), expected);
    }
}
