//! # Handling Priority
//!
//! A totally ordered value operation handlers use to declare how eagerly,
//! if at all, they can service a request.
//!
//! The sentinel is a tagged variant rather than a missing field, so the
//! ordering rules fall out of the variant order: `CannotHandle` compares
//! below every carried value, values compare as signed integers.

use super::errors::{PriorityError, PriorityResult};

/// How eagerly a handler can service a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandlingPriority {
    /// The handler cannot service the request at all
    CannotHandle,
    /// The handler can service the request with the given eagerness
    Handle(i32),
}

impl HandlingPriority {
    /// Sentinel: the handler cannot service the request
    pub const CANNOT_HANDLE: Self = Self::CannotHandle;

    /// Lowest eagerness a willing handler can declare
    pub const DEFAULT: Self = Self::Handle(i32::MIN);

    /// Highest eagerness a handler can declare
    pub const MAX: Self = Self::Handle(i32::MAX);

    /// Wrap an integer priority
    pub fn from_value(value: i32) -> Self {
        Self::Handle(value)
    }

    /// Numeric value, absent for the sentinel
    pub fn value(&self) -> Option<i32> {
        match self {
            Self::CannotHandle => None,
            Self::Handle(value) => Some(*value),
        }
    }

    /// True only for the sentinel
    pub fn is_cannot_handle(&self) -> bool {
        matches!(self, Self::CannotHandle)
    }

    /// Produce a new priority increased by `delta`
    ///
    /// The receiver is never mutated. Fails on the sentinel, on a
    /// non-positive `delta`, and when the result would exceed the maximum
    /// representable value.
    pub fn increase(&self, delta: i32) -> PriorityResult<Self> {
        let value = match self {
            Self::CannotHandle => return Err(PriorityError::NoValue),
            Self::Handle(value) => *value,
        };
        if delta <= 0 {
            return Err(PriorityError::NonPositiveIncrease(delta));
        }
        value
            .checked_add(delta)
            .map(Self::Handle)
            .ok_or(PriorityError::Overflow {
                value,
                increase: delta,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_below_every_value() {
        assert!(HandlingPriority::CANNOT_HANDLE < HandlingPriority::DEFAULT);
        assert!(HandlingPriority::CANNOT_HANDLE < HandlingPriority::from_value(i32::MIN));
        assert!(HandlingPriority::CANNOT_HANDLE < HandlingPriority::from_value(-1));
        assert!(HandlingPriority::CANNOT_HANDLE < HandlingPriority::MAX);
    }

    #[test]
    fn test_values_order_as_signed_integers() {
        for (a, b) in [(-10, -9), (-1, 0), (0, 1), (5, 10), (i32::MIN, i32::MAX)] {
            assert!(HandlingPriority::from_value(a) < HandlingPriority::from_value(b));
        }
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(
            HandlingPriority::from_value(i32::MIN),
            HandlingPriority::DEFAULT
        );
        assert_eq!(
            HandlingPriority::CANNOT_HANDLE,
            HandlingPriority::CannotHandle
        );
        assert_ne!(
            HandlingPriority::from_value(1),
            HandlingPriority::from_value(2)
        );
    }

    #[test]
    fn test_is_cannot_handle() {
        assert!(HandlingPriority::CANNOT_HANDLE.is_cannot_handle());
        assert!(!HandlingPriority::DEFAULT.is_cannot_handle());
        assert_eq!(HandlingPriority::CANNOT_HANDLE.value(), None);
        assert_eq!(HandlingPriority::from_value(7).value(), Some(7));
    }

    #[test]
    fn test_increase_produces_new_instance() {
        let original = HandlingPriority::from_value(10);
        let increased = original.increase(5).unwrap();
        assert_eq!(increased, HandlingPriority::from_value(15));
        assert_eq!(original, HandlingPriority::from_value(10));
    }

    #[test]
    fn test_increase_sentinel_fails() {
        assert_eq!(
            HandlingPriority::CANNOT_HANDLE.increase(1),
            Err(PriorityError::NoValue)
        );
    }

    #[test]
    fn test_increase_requires_positive_delta() {
        let priority = HandlingPriority::from_value(10);
        assert_eq!(
            priority.increase(0),
            Err(PriorityError::NonPositiveIncrease(0))
        );
        assert_eq!(
            priority.increase(-1),
            Err(PriorityError::NonPositiveIncrease(-1))
        );
    }

    #[test]
    fn test_increase_overflow_fails() {
        assert_eq!(
            HandlingPriority::MAX.increase(1),
            Err(PriorityError::Overflow {
                value: i32::MAX,
                increase: 1,
            })
        );
        // reaching the maximum exactly is representable
        assert_eq!(
            HandlingPriority::from_value(i32::MAX - 1).increase(1),
            Ok(HandlingPriority::MAX)
        );
    }

    #[test]
    fn test_order_is_transitive_over_mixed_values() {
        let mut priorities = vec![
            HandlingPriority::MAX,
            HandlingPriority::CANNOT_HANDLE,
            HandlingPriority::from_value(0),
            HandlingPriority::DEFAULT,
            HandlingPriority::from_value(-5),
        ];
        priorities.sort();
        assert_eq!(
            priorities,
            vec![
                HandlingPriority::CANNOT_HANDLE,
                HandlingPriority::DEFAULT,
                HandlingPriority::from_value(-5),
                HandlingPriority::from_value(0),
                HandlingPriority::MAX,
            ]
        );
    }
}
