//! Text normalization: case folding, punctuation stripping, tokenization,
//! stopword removal, and Snowball stemming.

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
    static ref FRENCH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "au","aux","avec","ce","ces","dans","de","des","du","elle","en","et","eux","il","ils",
            "je","la","le","les","leur","lui","ma","mais","me","même","mes","moi","mon","ne","nos",
            "notre","nous","on","ou","par","pas","pour","qu","que","qui","sa","se","ses","son","sur",
            "ta","te","tes","toi","ton","tu","un","une","vos","votre","vous",
            "c","d","j","l","à","m","n","s","t","y",
            "été","étée","étées","étés","étant","étante","étants","étantes",
            "suis","es","est","sommes","êtes","sont","serai","seras","sera","serons","serez","seront",
            "serais","serait","serions","seriez","seraient","étais","était","étions","étiez","étaient",
            "fus","fut","fûmes","fûtes","furent","sois","soit","soyons","soyez","soient","fusse",
            "fusses","fût","fussions","fussiez","fussent",
            "ayant","ayante","ayantes","ayants","eu","eue","eues","eus","ai","as","avons","avez","ont",
            "aurai","auras","aura","aurons","aurez","auront","aurais","aurait","aurions","auriez",
            "auraient","avais","avait","avions","aviez","avaient","eut","eûmes","eûtes","eurent",
            "aie","aies","ait","ayons","ayez","aient","eusse","eusses","eût","eussions","eussiez",
            "eussent",
        ];
        words.iter().copied().collect()
    };
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren",
            "as","at","be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could","couldn","did","didn","do","does","doesn","doing","don","down",
            "during","each","few","for","from","further","had","hadn","has","hasn","have","haven",
            "having","he","her","here","hers","herself","him","himself","his","how","i","if","in",
            "into","is","isn","it","its","itself","just","me","more","most","mustn","my","myself",
            "no","nor","not","now","of","off","on","once","only","or","other","our","ours",
            "ourselves","out","over","own","same","she","should","shouldn","so","some","such","than",
            "that","the","their","theirs","them","themselves","then","there","these","they","this",
            "those","through","to","too","under","until","up","very","was","wasn","we","were","weren",
            "what","when","where","which","while","who","whom","why","will","with","won","would",
            "wouldn","you","your","yours","yourself","yourselves",
        ];
        words.iter().copied().collect()
    };
}

/// Corpus language, selecting the stopword set and stemming rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    French,
    English,
}

impl Language {
    /// Parse a language name, case-insensitively. Unsupported names fall
    /// back to English rather than failing.
    pub fn from_name(name: &str) -> Language {
        match name.to_lowercase().as_str() {
            "french" | "fr" | "francais" | "français" => Language::French,
            "english" | "en" => Language::English,
            other => {
                tracing::warn!(language = other, "unsupported language, falling back to english");
                Language::English
            }
        }
    }

    fn stopwords(self) -> &'static HashSet<&'static str> {
        match self {
            Language::French => &FRENCH_STOPWORDS,
            Language::English => &ENGLISH_STOPWORDS,
        }
    }

    fn algorithm(self) -> Algorithm {
        match self {
            Language::French => Algorithm::French,
            Language::English => Algorithm::English,
        }
    }
}

/// Tokens shorter than this are dropped.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;

/// Turns raw text into index terms. One instance per thread; construction
/// is cheap and every other component takes it by reference.
pub struct Normalizer {
    language: Language,
    min_token_len: usize,
    stemmer: Stemmer,
    stopwords: &'static HashSet<&'static str>,
}

impl Normalizer {
    pub fn new(language: Language) -> Self {
        Self::with_min_token_len(language, DEFAULT_MIN_TOKEN_LEN)
    }

    pub fn with_min_token_len(language: Language, min_token_len: usize) -> Self {
        Self {
            language,
            min_token_len,
            stemmer: Stemmer::create(language.algorithm()),
            stopwords: language.stopwords(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Normalize raw text into an ordered term sequence.
    ///
    /// NFKC-fold and lowercase, replace every character that is neither
    /// alphanumeric nor whitespace with a space, split on whitespace, drop
    /// stopwords and tokens shorter than the minimum length, then stem.
    /// Always returns a (possibly empty) sequence, never an error.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let folded = text.nfkc().collect::<String>().to_lowercase();
        let cleaned = NON_WORD.replace_all(&folded, " ");
        cleaned
            .split_whitespace()
            .filter(|token| {
                token.chars().count() >= self.min_token_len && !self.stopwords.contains(token)
            })
            .map(|token| self.stemmer.stem(token).into_owned())
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Language::default())
    }
}
