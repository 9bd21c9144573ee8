use regex::Regex;

/// Local rule-based responder in the style of the classic ELIZA program.
///
/// Input is lowercased and matched against an ordered rule list; the first
/// matching rule answers, rotating through its response variants. Captured
/// fragments are echoed back with pronouns reflected ("my" -> "your").
pub struct Eliza {
    rules: Vec<Rule>,
    fallbacks: Vec<&'static str>,
    next_fallback: usize,
}

struct Rule {
    pattern: Regex,
    responses: Vec<&'static str>,
    next: usize,
}

impl Rule {
    fn new(pattern: &str, responses: Vec<&'static str>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rule pattern should compile"),
            responses,
            next: 0,
        }
    }
}

impl Eliza {
    pub fn new() -> Self {
        let rules = vec![
            Rule::new(
                r"\bi need (.+)",
                vec![
                    "Why do you need {}?",
                    "Would it really help you to get {}?",
                    "Are you sure you need {}?",
                ],
            ),
            Rule::new(
                r"\bi want (.+)",
                vec![
                    "Why do you want {}?",
                    "What would it mean to you if you got {}?",
                ],
            ),
            Rule::new(
                r"\bwhy don't you ([^?]+)\??",
                vec![
                    "Do you really think I don't {}?",
                    "Perhaps eventually I will {}.",
                ],
            ),
            Rule::new(
                r"\bwhy can't i ([^?]+)\??",
                vec![
                    "Do you think you should be able to {}?",
                    "What would it take for you to {}?",
                ],
            ),
            Rule::new(
                r"\bi can't (.+)",
                vec![
                    "How do you know you can't {}?",
                    "Have you really tried?",
                ],
            ),
            Rule::new(
                r"\bi am (.+)|\bi'm (.+)",
                vec![
                    "How long have you been {}?",
                    "How do you feel about being {}?",
                    "Why do you think you are {}?",
                ],
            ),
            Rule::new(
                r"\bare you ([^?]+)\??",
                vec![
                    "Why does it matter whether I am {}?",
                    "Would you prefer it if I were not {}?",
                ],
            ),
            Rule::new(
                r"\bbecause (.+)",
                vec![
                    "Is that the real reason?",
                    "What other reasons come to mind?",
                ],
            ),
            Rule::new(
                r"\bsorry\b",
                vec![
                    "There is no need to apologize.",
                    "What feelings do you have when you apologize?",
                ],
            ),
            Rule::new(
                r"\b(?:hello|hi|hey)\b",
                vec![
                    "Hello. How are you feeling today?",
                    "Hi there. What would you like to talk about?",
                ],
            ),
            Rule::new(
                r"\b(?:mother|father|mom|dad|family|brother|sister)\b",
                vec![
                    "Tell me more about your family.",
                    "How do you feel about your family?",
                ],
            ),
            Rule::new(
                r"\b(?:computer|machine|robot)\b",
                vec![
                    "Do computers worry you?",
                    "What do you think machines have to do with your problem?",
                ],
            ),
            Rule::new(r"\byes\b", vec!["You seem quite sure.", "I see."]),
            Rule::new(
                r"\bno\b",
                vec!["Why not?", "Are you saying no just to be negative?"],
            ),
            Rule::new(
                r"\?$",
                vec![
                    "Why do you ask?",
                    "What do you think?",
                    "Does that question interest you?",
                ],
            ),
        ];

        let fallbacks = vec![
            "Please tell me more.",
            "Can you elaborate on that?",
            "How does that make you feel?",
            "I see. Please go on.",
            "Let's change the subject. What else is on your mind?",
        ];

        Self {
            rules,
            fallbacks,
            next_fallback: 0,
        }
    }

    /// Produce a reply for the given user text. Never returns an empty string.
    pub fn respond(&mut self, input: &str) -> String {
        let input = input.trim().to_lowercase();

        for rule in &mut self.rules {
            let Some(captures) = rule.pattern.captures(&input) else {
                continue;
            };
            let response = rule.responses[rule.next % rule.responses.len()];
            rule.next = rule.next.wrapping_add(1);

            // First non-empty capture group, if the rule has one.
            let fragment = captures
                .iter()
                .skip(1)
                .flatten()
                .map(|group| group.as_str())
                .next();
            return match fragment {
                Some(fragment) if response.contains("{}") => {
                    response.replace("{}", &reflect(fragment))
                }
                _ => response.to_string(),
            };
        }

        let fallback = self.fallbacks[self.next_fallback % self.fallbacks.len()];
        self.next_fallback = self.next_fallback.wrapping_add(1);
        fallback.to_string()
    }
}

impl Default for Eliza {
    fn default() -> Self {
        Self::new()
    }
}

/// Swap first- and second-person words so echoed fragments read naturally.
fn reflect(fragment: &str) -> String {
    let trimmed = fragment.trim_end_matches(['.', '!', '?', ',']);
    trimmed
        .split_whitespace()
        .map(|word| match word {
            "i" => "you",
            "me" => "you",
            "my" => "your",
            "mine" => "yours",
            "am" => "are",
            "was" => "were",
            "you" => "i",
            "your" => "my",
            "yours" => "mine",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" ")
}
