//! Canned response templates per intent category.
//!
//! The table is an exhaustive `match`, so adding a category without
//! templates fails to compile.

use super::intent::IntentCategory;
use super::random::RandomSource;

const GREETING: &[&str] = &[
    "Hey there! How's it going?",
    "Hi! Nice to see you!",
    "Hello! What's new?",
    "Hey! How are you doing?",
    "Hi there! How can I help you today?",
    "Hello! Great to talk to you!",
    "Hey! What's on your mind?",
    "Hi! How's your day going?",
];

const STATUS_UPDATE: &[&str] = &[
    "That's great to hear!",
    "Awesome! What have you been up to?",
    "Nice! How's everything else going?",
    "Glad to hear that!",
    "That's wonderful! Anything new?",
    "Cool! What's happening with you?",
];

const MINIMAL_RESPONSE: &[&str] = &[
    "I see!",
    "Okay, cool!",
    "No worries!",
    "That's fine!",
    "Alright then!",
    "Sounds good to me!",
    "Got it!",
    "No problem!",
];

const FOOD_RELATED: &[&str] = &[
    "Nice! What did you have to eat?",
    "Sounds good! I hope it was tasty!",
    "Food is always great! What was your favorite part?",
    "Yum! I'm getting hungry just thinking about food!",
    "Good to hear you ate! Was it delicious?",
];

const LIFE_QUESTION: &[&str] = &[
    "Life is pretty interesting these days!",
    "Life has its ups and downs, but overall it's good!",
    "I think life is what you make of it!",
    "Life is full of surprises, don't you think?",
    "I'm enjoying life! How about you?",
];

const ATTENTION_CHECK: &[&str] = &[
    "Yes, I'm listening! What's up?",
    "I'm here and paying attention!",
    "Of course I'm listening! Go ahead.",
    "Yes, I hear you! What would you like to talk about?",
    "I'm all ears! What's on your mind?",
];

const QUESTION_PERSONAL: &[&str] = &[
    "That's an interesting question! What do you think?",
    "I'm not sure about that myself. What's your opinion?",
    "That's something worth thinking about!",
    "I'm still learning about that. What's your perspective?",
    "That's a great question! I'd love to know your thoughts too.",
];

const QUESTION_FACTUAL: &[&str] = &[
    "From what I know, it's quite fascinating.",
    "I believe there are different perspectives on that.",
    "Based on what I've learned, it's an interesting topic.",
    "I think that depends on how you look at it.",
    "In my understanding, it's something worth exploring.",
];

const AGREEMENT: &[&str] = &[
    "I agree!",
    "That's right!",
    "Exactly what I was thinking!",
    "You've got a point there!",
    "I think so too!",
    "Definitely!",
    "Absolutely!",
    "For sure!",
];

const THANKS: &[&str] = &[
    "You're welcome!",
    "No problem at all!",
    "Happy to help!",
    "Anytime!",
    "Of course! Glad I could help!",
];

const CASUAL_STATEMENT: &[&str] = &[
    "I see what you mean!",
    "That makes sense!",
    "Interesting point!",
    "I get what you're saying.",
    "That's a good way to look at it!",
    "I understand where you're coming from.",
    "Cool! Tell me more about that.",
    "Nice! What else is new?",
];

/// Connectors for joining exactly two clause responses.
pub const PAIR_CONNECTORS: &[&str] = &[
    "{} and also {}",
    "{}, and {}",
    "Well, {} plus {}",
    "{} - and to add to that, {}",
    "{}. Also, {}",
];

/// Maps intent categories to templates and picks one.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateResponder;

impl TemplateResponder {
    pub fn new() -> Self {
        Self
    }

    /// All candidate templates for `category`, in a fixed order.
    pub fn candidates(&self, category: IntentCategory) -> &'static [&'static str] {
        match category {
            IntentCategory::Greeting => GREETING,
            IntentCategory::StatusUpdate => STATUS_UPDATE,
            IntentCategory::MinimalResponse => MINIMAL_RESPONSE,
            IntentCategory::FoodRelated => FOOD_RELATED,
            IntentCategory::LifeQuestion => LIFE_QUESTION,
            IntentCategory::AttentionCheck => ATTENTION_CHECK,
            IntentCategory::QuestionPersonal => QUESTION_PERSONAL,
            IntentCategory::QuestionFactual => QUESTION_FACTUAL,
            IntentCategory::Agreement => AGREEMENT,
            IntentCategory::Thanks => THANKS,
            IntentCategory::CasualStatement => CASUAL_STATEMENT,
        }
    }

    /// Pick one template for `category`.
    pub fn respond(&self, category: IntentCategory, rng: &mut dyn RandomSource) -> &'static str {
        let candidates = self.candidates(category);
        candidates[rng.pick_index(candidates.len())]
    }

    /// Join clause responses: two use a random connector, more are joined as sentences.
    pub fn combine(&self, responses: &[String], rng: &mut dyn RandomSource) -> String {
        match responses {
            [] => String::new(),
            [only] => only.clone(),
            [first, second] => {
                let connector = PAIR_CONNECTORS[rng.pick_index(PAIR_CONNECTORS.len())];
                let mut pieces = connector.splitn(3, "{}");
                let head = pieces.next().unwrap_or_default();
                let middle = pieces.next().unwrap_or_default();
                let tail = pieces.next().unwrap_or_default();
                format!("{}{}{}{}{}", head, first, middle, second, tail)
            }
            _ => format!("{}.", responses.join(". ")),
        }
    }
}
