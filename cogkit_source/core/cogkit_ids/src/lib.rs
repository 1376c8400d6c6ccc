pub mod ids;

pub use ids::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_nil() {
        let nil = NodeID::nil();
        assert!(nil.is_nil());
        assert_eq!(nil.index(), 0);
        assert_eq!(nil.generation(), 0);
        assert_eq!(NodeID::default(), nil);
    }

    #[test]
    fn node_id_parts() {
        let id = NodeID::from_parts(5, 2);
        assert_eq!(id.index(), 5);
        assert_eq!(id.generation(), 2);
        assert!(!id.is_nil());
    }

    #[test]
    fn node_id_generation_distinguishes_reused_slot() {
        let first = NodeID::from_parts(3, 0);
        let reused = NodeID::from_parts(3, 1);
        assert_ne!(first, reused);
        assert_eq!(first.index(), reused.index());
    }

    #[test]
    fn serial_ids_are_unique_and_nonzero() {
        let a = ListenerID::next();
        let b = ListenerID::next();
        assert_ne!(a, b);
        assert!(a.as_u64() > 0);
        assert!(RunID::next().as_u64() > 0);
    }

    #[test]
    fn uuids_are_unique() {
        assert_ne!(new_uuid(), new_uuid());
    }
}
