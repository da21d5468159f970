//! Suffix-Konstruktor fuer Anzeigenamen
//!
//! Baut aus den Suffix-Beitraegen der anwendbaren Links den an den
//! Anzeigenamen anzuhaengenden Suffix zusammen: hoechstens ein
//! "permanenter" Anteil (aus Permanent-Links) plus die mit einzelnen
//! Leerzeichen verketteten Beitraege aller uebrigen Links in
//! Aggregationsreihenfolge.

use voicelink_store::LinkKind;

/// Akkumulator fuer Suffix-Beitraege
#[derive(Debug, Clone, Default)]
pub struct SuffixKonstruktor {
    permanent: String,
    fluechtig: String,
}

impl SuffixKonstruktor {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Bringt den Suffix eines Links ein; leere Beitraege sind wirkungslos
    pub fn hinzufuegen(&mut self, kind: LinkKind, suffix: &str) {
        if suffix.is_empty() {
            return;
        }
        match kind {
            LinkKind::Permanent => {
                // Hoechstens ein permanenter Anteil; weitere werden verworfen
                if self.permanent.is_empty() {
                    self.permanent = suffix.to_string();
                }
            }
            _ => {
                if !self.fluechtig.is_empty() {
                    self.fluechtig.push(' ');
                }
                self.fluechtig.push_str(suffix);
            }
        }
    }

    /// Gesamtsuffix: permanenter Anteil zuerst, ohne ueberfluessige Trenner
    pub fn gesamt(&self) -> String {
        match (self.permanent.is_empty(), self.fluechtig.is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.permanent.clone(),
            (true, false) => self.fluechtig.clone(),
            (false, false) => format!("{} {}", self.permanent, self.fluechtig),
        }
    }

    pub fn ist_leer(&self) -> bool {
        self.permanent.is_empty() && self.fluechtig.is_empty()
    }
}

/// Haengt den Suffix idempotent an einen Anzeigenamen an
///
/// Endet der Name bereits auf den Suffix, bleibt er unveraendert
/// (zweimaliges Anwenden laesst den Namen nie wachsen). Wuerde das
/// Ergebnis das Laengen-Limit sprengen, entfaellt der Suffix komplett;
/// abgeschnitten wird nie.
pub fn anwenden(basis: &str, suffix: &str, limit: usize) -> String {
    if suffix.is_empty() || basis.ends_with(suffix) {
        return basis.to_string();
    }
    let neu = format!("{basis} {suffix}");
    if neu.chars().count() > limit {
        basis.to_string()
    } else {
        neu
    }
}

/// Entfernt eine zuvor angehaengte Suffix-Instanz vom Anzeigenamen
///
/// Der Trenner vor dem Suffix wird mit entfernt; ohne Treffer bleibt
/// der Name unveraendert.
pub fn entfernen(name: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        return name.to_string();
    }
    match name.strip_suffix(suffix) {
        Some(rest) => rest.trim_end().to_string(),
        None => name.to_string(),
    }
}
