use uuid::Uuid;

/// Generate a fresh node id.
///
/// Ids are UUID v4 strings, unique with overwhelming probability across
/// the process lifetime. No coordination is required between editables.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..1000).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_are_non_empty() {
        assert!(!new_id().is_empty());
    }
}
