// Humanization Lexicons
// Static word and phrase tables consumed by the rewriting passes. Order
// matters for the paired replacement lists: they are applied first to last.

/// Formal words with their informal alternatives. Keys are matched against
/// punctuation-stripped lowercase tokens.
pub static VOCABULARY_REPLACEMENTS: &[(&str, &[&str])] = &[
    ("utilize", &["use", "employ", "apply", "leverage", "harness", "deploy", "implement"]),
    ("demonstrate", &["show", "exhibit", "display", "reveal", "illustrate", "manifest", "present"]),
    (
        "implement",
        &["carry out", "execute", "put into practice", "deploy", "establish", "enact", "realize"],
    ),
    ("facilitate", &["enable", "help", "assist", "support", "make possible", "ease", "streamline"]),
    ("optimize", &["improve", "enhance", "refine", "perfect", "streamline", "fine-tune", "boost"]),
    ("analyze", &["examine", "study", "investigate", "assess", "evaluate", "scrutinize", "dissect"]),
    ("generate", &["create", "produce", "develop", "form", "build", "craft", "construct"]),
    ("process", &["handle", "manage", "deal with", "work through", "tackle", "address", "approach"]),
    (
        "comprehensive",
        &["thorough", "complete", "extensive", "detailed", "full", "exhaustive", "wide-ranging"],
    ),
    (
        "efficient",
        &["effective", "productive", "streamlined", "optimized", "smooth", "swift", "capable"],
    ),
    (
        "significant",
        &["important", "notable", "considerable", "substantial", "major", "meaningful", "impactful"],
    ),
    ("various", &["different", "multiple", "diverse", "several", "numerous", "assorted", "varied"]),
    ("numerous", &["many", "multiple", "countless", "various", "plenty of", "abundant", "ample"]),
    ("essential", &["crucial", "vital", "important", "necessary", "key", "fundamental", "critical"]),
    (
        "fundamental",
        &["basic", "core", "essential", "primary", "underlying", "foundational", "elemental"],
    ),
    ("subsequently", &["then", "next", "afterwards", "later", "following that", "after that"]),
    ("therefore", &["so", "thus", "hence", "as a result", "consequently", "for this reason"]),
    ("however", &["but", "yet", "still", "though", "although", "nevertheless", "on the other hand"]),
    ("moreover", &["also", "furthermore", "additionally", "besides", "what's more", "in addition"]),
    ("nevertheless", &["however", "still", "yet", "even so", "nonetheless", "all the same"]),
];

pub static SENTENCE_STARTERS: &[&str] = &[
    "Interestingly,", "Moreover,", "Furthermore,", "Additionally,", "In fact,",
    "Notably,", "Surprisingly,", "Consequently,", "As a result,", "Therefore,",
    "However,", "Nevertheless,", "On the other hand,", "In contrast,", "Meanwhile,",
    "Ultimately,", "Essentially,", "Particularly,", "Specifically,", "Generally,",
    "Remarkably,", "Curiously,", "Undoubtedly,", "Certainly,", "Obviously,",
    "Clearly,", "Evidently,", "Naturally,", "Typically,", "Frequently,",
];

pub static HUMAN_EXPRESSIONS: &[&str] = &[
    "it's worth noting that", "one might argue that", "it seems that",
    "from my perspective", "in my experience", "as we can see",
    "it's clear that", "without a doubt", "arguably", "presumably",
    "it appears that", "one could say", "it's evident that",
    "I believe", "in my opinion", "personally", "frankly speaking",
    "to be honest", "quite simply", "put simply", "in other words",
    "that is to say", "what I mean is", "the point is", "the thing is",
];

pub static CONTRACTIONS: &[(&str, &str)] = &[
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("should not", "shouldn't"),
    ("cannot", "can't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("have not", "haven't"),
    ("has not", "hasn't"),
    ("had not", "hadn't"),
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("you are", "you're"),
    ("I am", "I'm"),
    ("he is", "he's"),
    ("she is", "she's"),
    ("who is", "who's"),
    ("what is", "what's"),
    ("where is", "where's"),
    ("when is", "when's"),
];

pub static FORMAL_REPLACEMENTS: &[(&str, &str)] = &[
    ("in order to", "to"),
    ("due to the fact that", "because"),
    ("in the event that", "if"),
    ("for the purpose of", "to"),
    ("with regard to", "about"),
    ("in accordance with", "following"),
    ("subsequent to", "after"),
    ("prior to", "before"),
    ("in spite of the fact that", "although"),
    ("owing to the fact that", "because"),
    ("in view of the fact that", "since"),
    ("for the reason that", "because"),
    ("in the light of", "considering"),
    ("with reference to", "about"),
    ("in connection with", "about"),
    ("as regards", "about"),
    ("concerning the matter of", "about"),
    ("in relation to", "about"),
];

pub static PERSONAL_TOUCHES: &[&str] = &[
    "In my experience,", "From what I've seen,", "As I understand it,",
    "The way I see it,", "In my view,", "From my standpoint,",
];

// Advanced-stage tables.

pub static DISCOURSE_MARKERS: &[(&str, &[&str])] = &[
    ("addition", &["furthermore", "moreover", "additionally", "in addition", "also", "besides"]),
    (
        "contrast",
        &["however", "nevertheless", "on the other hand", "conversely", "in contrast", "yet"],
    ),
    (
        "cause_effect",
        &["therefore", "consequently", "as a result", "thus", "hence", "accordingly"],
    ),
    (
        "example",
        &["for instance", "for example", "such as", "namely", "specifically", "in particular"],
    ),
    ("emphasis", &["indeed", "certainly", "undoubtedly", "clearly", "obviously", "definitely"]),
    ("sequence", &["first", "second", "next", "then", "finally", "subsequently"]),
];

pub static HEDGING_EXPRESSIONS: &[&str] = &[
    "it seems that", "it appears that", "perhaps", "possibly", "likely",
    "it could be argued that", "one might say", "to some extent",
    "in many cases", "generally speaking", "broadly speaking",
    "it is possible that", "there is a chance that", "it may be that",
];

pub static INTENSIFIERS: &[&str] =
    &["extremely", "highly", "remarkably", "exceptionally", "particularly", "especially"];

pub static DOWNTONERS: &[&str] =
    &["somewhat", "rather", "quite", "fairly", "relatively", "moderately"];

pub static COLLOQUIAL_REPLACEMENTS: &[(&str, &[&str])] = &[
    ("very good", &["excellent", "outstanding", "superb", "fantastic", "great"]),
    ("very bad", &["terrible", "awful", "horrible", "dreadful", "poor"]),
    ("very big", &["huge", "enormous", "massive", "gigantic", "vast"]),
    ("very small", &["tiny", "minuscule", "microscopic", "minute", "petite"]),
    ("very fast", &["rapid", "swift", "speedy", "quick", "brisk"]),
    ("very slow", &["sluggish", "gradual", "leisurely", "unhurried", "deliberate"]),
];

pub static SUBJECTIVE_MARKERS: &[&str] = &[
    "I believe", "in my opinion", "from my perspective", "personally",
    "it strikes me that", "I feel that", "my impression is",
    "as I see it", "to my mind", "I would argue that",
];

pub static EMOTIONAL_ADJECTIVES: &[&str] =
    &["fascinating", "intriguing", "remarkable", "surprising", "compelling", "striking"];

pub static RELATIVE_CLAUSES: &[&str] = &[
    "which is essential",
    "that proves effective",
    "which demonstrates value",
    "that shows promise",
];

pub static PARTICIPIAL_PHRASES: &[&str] = &[
    "Building on this foundation",
    "Considering these factors",
    "Taking this into account",
    "Recognizing the importance",
];

pub static METAPHORS: &[(&str, &str)] = &[
    ("process", "journey"),
    ("system", "ecosystem"),
    ("method", "pathway"),
    ("approach", "strategy"),
    ("solution", "key"),
];

pub static EMPHASIS_TERMS: &[&str] = &["important", "essential", "crucial", "significant", "vital"];
