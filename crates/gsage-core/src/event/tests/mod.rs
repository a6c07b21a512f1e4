// Event system test module
#[cfg(test)]
mod dispatcher_tests;

#[cfg(test)]
mod tests {
    use crate::event::{EventResult, DEFAULT_PRIORITY};

    #[test]
    fn test_default_priority_is_highest_precedence_zero() {
        assert_eq!(DEFAULT_PRIORITY, 0);
    }

    #[test]
    fn test_event_result_from_bool() {
        assert_eq!(EventResult::from(true), EventResult::Continue);
        assert_eq!(EventResult::from(false), EventResult::Stop);
        assert!(EventResult::Stop.is_stop());
        assert!(!EventResult::Continue.is_stop());
    }
}
