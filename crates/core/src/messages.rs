//! User-facing strings.
//!
//! The audience reads Uzbek, so every message the pipeline returns is in
//! Uzbek; only the encyclopedia edition names vary by language code.

use crate::format::markup::{bold, escape};

pub const EMPTY_QUERY: &str = "Nimani bilmoqchisiz? Qidirish uchun mavzu nomini yozing.";

pub const LOOKUP_FAILED: &str = "❌ Qidirishda kutilmagan xatolik yuz berdi. Iltimos, keyinroq urinib ko'ring.";

/// Display name of the encyclopedia edition for a language code.
pub fn edition_name(lang: &str) -> String {
    match lang {
        "uz" => "O'zbekcha Vikipediya".to_string(),
        "en" => "English Wikipedia".to_string(),
        "ru" => "Русская Википедия".to_string(),
        other => format!("Wikipedia ({})", other.to_uppercase()),
    }
}

/// Label of the "read full article" action.
pub fn read_more_label(lang: &str) -> String {
    format!("🔗 To‘liq maqolani o‘qish ({})", lang.to_uppercase())
}

pub fn not_found(query: &str) -> String {
    format!(
        "❌ Kechirasiz, '{query}' bo‘yicha hech qanday ma'lumot topilmadi.\nIltimos so‘rovni boshqacha yozib ko'ring."
    )
}

/// Numbered list of candidate topics for an ambiguous query.
pub fn ambiguous(query: &str, lang: &str, options: &[String]) -> String {
    let variants = options
        .iter()
        .enumerate()
        .map(|(i, title)| format!("{}. {}", i + 1, title))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "'{query}' bir nechta ma'noga ega. ({})\nQuyidagi variantlardan birini aniq yozing:\n\n{variants}",
        edition_name(lang)
    )
}

/// Heading line that opens every served answer, already escaped for markup.
pub fn answer_header(topic: &str, lang: &str) -> String {
    format!("📌 {} ({})\n\n", bold(topic), escape(&edition_name(lang)))
}
