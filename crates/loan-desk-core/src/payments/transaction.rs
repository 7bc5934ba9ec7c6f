use uuid::Uuid;

use crate::types::TransactionId;

const PREFIX: &str = "TXN";

impl TransactionId {
    /// A fresh `TXN`-prefixed identifier backed by a random v4 UUID, so two
    /// submissions in the same millisecond cannot collide.
    pub fn generate() -> Self {
        let body = Uuid::new_v4().simple().to_string().to_ascii_uppercase();
        TransactionId(format!("{PREFIX}{body}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_prefixed_and_distinct() {
        let ids: HashSet<String> = (0..1000).map(|_| TransactionId::generate().0).collect();
        assert_eq!(ids.len(), 1000);
        for id in &ids {
            assert!(id.starts_with("TXN"));
            assert_eq!(id.len(), 3 + 32);
            assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
        }
    }
}
