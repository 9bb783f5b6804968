//! Status returned by behavior nodes.

/// Result of evaluating a node for one frame.
///
/// There is no `Running` variant. A node that represents ongoing activity
/// (walking to a waypoint) succeeds every frame it makes progress and keeps
/// its progress in the context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
}

impl Status {
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Success becomes Failure and vice versa.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

impl From<bool> for Status {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_maps_to_status() {
        assert_eq!(Status::from(true), Status::Success);
        assert_eq!(Status::from(false), Status::Failure);
        assert!(Status::from(false).invert().is_success());
    }
}
