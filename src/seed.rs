// src/seed.rs

use crate::models::module::Module;

/// The built-in learning catalog, embedded at compile time and inserted on
/// startup when missing. Also used directly by the in-memory test store.
pub fn builtin_modules() -> Result<Vec<Module>, serde_json::Error> {
    serde_json::from_str(include_str!("../seed/modules.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses() {
        let modules = builtin_modules().expect("embedded catalog must parse");
        assert_eq!(modules.len(), 3);
        assert_eq!(
            modules.iter().map(|m| m.exercises.len()).sum::<usize>(),
            9
        );

        let zero_shot = modules.iter().find(|m| m.id == "zero-shot").unwrap();
        assert!(zero_shot.exercises.iter().any(|e| e.id == "zs-1"));
        assert!(!zero_shot.objectives.is_empty());
        assert!(!zero_shot.concepts.is_empty());
    }
}
