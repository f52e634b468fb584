//! Practice language catalogue
//!
//! The fixed set of languages offered in dropdowns, plus the default example
//! vocabulary for each. Stored vocabulary lists keep the language as a plain
//! string; this enum is not used to reject unknown languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Languages offered for practice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Japanese,
    Chinese,
    Korean,
}

/// Example words returned for a language outside the catalogue
const FALLBACK_EXAMPLES: &[&str] = &["hello", "goodbye", "please", "thank you", "yes", "no"];

impl Language {
    /// All languages in dropdown order
    pub const ALL: [Language; 9] = [
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Russian,
        Language::Japanese,
        Language::Chinese,
        Language::Korean,
    ];

    /// English display name (also the wire value)
    pub fn name(self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Japanese => "Japanese",
            Language::Chinese => "Chinese",
            Language::Korean => "Korean",
        }
    }

    /// Beginner example vocabulary for this language
    pub fn example_vocabulary(self) -> &'static [&'static str] {
        match self {
            Language::Spanish => &[
                "hola", "adiós", "por favor", "gracias", "sí", "no", "yo", "tú", "él", "ella",
                "nosotros", "ellos", "agua", "pan", "libro", "casa", "perro", "gato", "comer",
                "beber", "hablar", "leer", "escribir", "caminar", "correr", "bueno", "malo",
                "grande", "pequeño", "rojo", "azul", "verde", "amarillo",
            ],
            Language::French => &[
                "bonjour", "au revoir", "s'il vous plaît", "merci", "oui", "non", "je", "tu",
                "il", "elle", "nous", "ils", "elles", "eau", "pain", "livre", "maison", "chien",
                "chat", "manger", "boire", "parler", "lire", "écrire", "marcher", "courir",
                "bon", "mauvais", "grand", "petit", "rouge", "bleu", "vert", "jaune",
            ],
            Language::German => &[
                "hallo", "auf wiedersehen", "bitte", "danke", "ja", "nein", "ich", "du", "er",
                "sie", "wir", "wasser", "brot", "buch", "haus", "hund", "katze", "essen",
                "trinken", "sprechen", "lesen", "schreiben", "gehen", "laufen", "gut",
                "schlecht", "groß", "klein", "rot", "blau", "grün", "gelb",
            ],
            Language::Italian => &[
                "ciao", "arrivederci", "per favore", "grazie", "sì", "no", "io", "tu", "lui",
                "lei", "noi", "loro", "acqua", "pane", "libro", "casa", "cane", "gatto",
                "mangiare", "bere", "parlare", "leggere", "scrivere", "camminare", "correre",
                "buono", "cattivo", "grande", "piccolo", "rosso", "blu", "verde", "giallo",
            ],
            Language::Portuguese => &[
                "olá", "adeus", "por favor", "obrigado", "sim", "não", "eu", "tu", "ele", "ela",
                "nós", "eles", "elas", "água", "pão", "livro", "casa", "cão", "gato", "comer",
                "beber", "falar", "ler", "escrever", "andar", "correr", "bom", "mau", "grande",
                "pequeno", "vermelho", "azul", "verde", "amarelo",
            ],
            Language::Russian => &[
                "привет", "до свидания", "пожалуйста", "спасибо", "да", "нет", "я", "ты", "он",
                "она", "мы", "они", "вода", "хлеб", "книга", "дом", "собака", "кот", "есть",
                "пить", "говорить", "читать", "писать", "ходить", "бегать", "хороший", "плохой",
                "большой", "маленький", "красный", "синий", "зеленый", "желтый",
            ],
            Language::Japanese => &[
                "こんにちは", "さようなら", "お願いします", "ありがとう", "はい", "いいえ", "私",
                "あなた", "彼", "彼女", "私たち", "彼ら", "水", "パン", "本", "家", "犬", "猫",
                "食べる", "飲む", "話す", "読む", "書く", "歩く", "走る", "良い", "悪い",
                "大きい", "小さい", "赤", "青", "緑", "黄色",
            ],
            Language::Chinese => &[
                "你好", "再见", "请", "谢谢", "是", "不", "我", "你", "他", "她", "我们", "他们",
                "水", "面包", "书", "家", "狗", "猫", "吃", "喝", "说话", "读", "写", "走", "跑",
                "好", "坏", "大", "小", "红色", "蓝色", "绿色", "黄色",
            ],
            Language::Korean => &[
                "안녕하세요", "안녕히 가세요", "제발", "감사합니다", "예", "아니요", "나", "너",
                "그", "그녀", "우리", "그들", "물", "빵", "책", "집", "개", "고양이", "먹다",
                "마시다", "말하다", "읽다", "쓰다", "걷다", "달리다", "좋은", "나쁜", "큰",
                "작은", "빨간색", "파란색", "녹색", "노란색",
            ],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    /// Case-insensitive match on the English name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unsupported language: {}", s)))
    }
}

/// Example vocabulary for a language name, falling back to basic English words
pub fn example_vocabulary(language: &str) -> &'static [&'static str] {
    language
        .parse::<Language>()
        .map(Language::example_vocabulary)
        .unwrap_or(FALLBACK_EXAMPLES)
}

/// Display names of every catalogued language, in dropdown order
pub fn language_names() -> Vec<&'static str> {
    Language::ALL.iter().map(|lang| lang.name()).collect()
}
