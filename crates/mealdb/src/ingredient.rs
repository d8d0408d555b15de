//! Singular/plural forms of ingredient names.
//!
//! The recipe API indexes ingredients by an exact name, mostly singular. Querying both
//! forms of what the user typed increases recall.

/// Nouns with a single form, kept as typed.
const UNCOUNTABLE: &[&str] = &[
    "asparagus",
    "basil",
    "beef",
    "bread",
    "broccoli",
    "butter",
    "celery",
    "cheese",
    "chicken",
    "chocolate",
    "cinnamon",
    "cod",
    "couscous",
    "cream",
    "fish",
    "flour",
    "garlic",
    "ginger",
    "honey",
    "hummus",
    "lamb",
    "lettuce",
    "meat",
    "milk",
    "molasses",
    "oil",
    "oregano",
    "parsley",
    "pasta",
    "pork",
    "rice",
    "salmon",
    "salt",
    "spaghetti",
    "spinach",
    "sugar",
    "thyme",
    "tuna",
    "vinegar",
    "water",
    "yogurt",
];

/// Singular forms ending in `ie`, whose plural is not an `ies -> y` word.
const IE_STEMS: &[&str] = &[
    "brownie", "calorie", "cookie", "genie", "pie", "smoothie", "veggie", "zombie",
];

/// Words ending in a consonant and `o` that take a plain `s`.
const O_PLURAL_S: &[&str] = &[
    "avocado", "burrito", "cappuccino", "chorizo", "espresso", "gelato", "jalapeno",
    "pesto", "piccolo", "prosciutto", "risotto", "taco",
];

const SIBILANT_ES: &[&str] = &["sses", "xes", "zes", "ches", "shes"];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn is_uncountable(word: &str) -> bool {
    UNCOUNTABLE.contains(&word)
}

fn char_before(word: &str, suffix_len: usize) -> Option<char> {
    word.chars().rev().nth(suffix_len)
}

/// Singular form of a single lowercase word.
pub fn singularize(word: &str) -> String {
    if is_uncountable(word) {
        return word.to_owned();
    }

    if let Some(stem) = word.strip_suffix('s').filter(|stem| IE_STEMS.contains(stem)) {
        return stem.to_owned();
    }

    if word.len() > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }

    if let Some(stem) = word.strip_suffix("oes") {
        return format!("{stem}o");
    }

    if SIBILANT_ES.iter().any(|suffix| word.ends_with(suffix)) {
        return word[..word.len() - 2].to_owned();
    }

    if word.len() > 2
        && word.ends_with('s')
        && !["ss", "us", "is"].iter().any(|suffix| word.ends_with(suffix))
    {
        return word[..word.len() - 1].to_owned();
    }

    word.to_owned()
}

/// Plural form of a single lowercase singular word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() || is_uncountable(word) {
        return word.to_owned();
    }

    if word.ends_with('y') && char_before(word, 1).is_some_and(|c| !is_vowel(c)) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    if word.ends_with('o')
        && char_before(word, 1).is_some_and(|c| !is_vowel(c))
        && !O_PLURAL_S.contains(&word)
    {
        return format!("{word}es");
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Query forms for an ingredient: the singular form first, then the plural form when it
/// differs. Only the last word of a multi-word ingredient is inflected.
pub fn forms(ingredient: &str) -> Vec<String> {
    let normalized = ingredient
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let Some((prefix, last)) = split_last_word(&normalized) else {
        return vec![];
    };

    let singular_last = singularize(last);
    let plural_last = pluralize(&singular_last);
    let singular = format!("{prefix}{singular_last}");
    let plural = format!("{prefix}{plural_last}");

    if singular == plural {
        vec![singular]
    } else {
        vec![singular, plural]
    }
}

fn split_last_word(normalized: &str) -> Option<(&str, &str)> {
    if normalized.is_empty() {
        return None;
    }

    match normalized.rfind(' ') {
        Some(at) => Some((&normalized[..=at], &normalized[at + 1..])),
        None => Some(("", normalized)),
    }
}
