//! # Generación de Ids
//! src/articulos/id.rs
//!
//! Ids cortos aleatorios con el alfabeto URL-safe de nanoid
//! (`A-Za-z0-9_-`). No se verifica unicidad: con 64^6 combinaciones la
//! probabilidad de colisión se acepta como despreciable para este volumen.

use rand::Rng;

/// Largo fijo de los ids generados
pub const ID_LENGTH: usize = 6;

/// Alfabeto URL-safe (64 símbolos)
const ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Fuente de identificadores para articulos nuevos
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Generador aleatorio por defecto
#[derive(Debug, Clone, Copy)]
pub struct NanoIdGenerator {
    length: usize,
}

impl NanoIdGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for NanoIdGenerator {
    fn default() -> Self {
        Self::new(ID_LENGTH)
    }
}

impl IdGenerator for NanoIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..self.length)
            // 64 símbolos: un índice uniforme en 0..64 no tiene sesgo
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_length() {
        let id = NanoIdGenerator::default().generate();
        assert_eq!(id.len(), ID_LENGTH);
    }

    #[test]
    fn test_custom_length() {
        assert_eq!(NanoIdGenerator::new(21).generate().len(), 21);
    }

    #[test]
    fn test_only_url_safe_chars() {
        let generator = NanoIdGenerator::default();
        for _ in 0..200 {
            let id = generator.generate();
            assert!(
                id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                "unexpected char in {}",
                id
            );
        }
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let unique: HashSet<&u8> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 64);
    }

    #[test]
    fn test_ids_are_mostly_unique() {
        let generator = NanoIdGenerator::default();
        let ids: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        // 1000 ids sobre 64^6 combinaciones: una colisión sería rarísima
        assert!(ids.len() >= 999);
    }
}
