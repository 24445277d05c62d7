//! This module provides the Bounds struct representing the flux constraints of a reaction
use std::fmt::{Display, Formatter};

use crate::metabolic_model::reaction::Direction;
use crate::metabolic_model::ModelError;

/// Lower and upper flux bound of a reaction. Negative values denote flux in the reverse
/// direction, either bound may be infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    lb: f64,
    ub: f64,
}

impl Bounds {
    /// Create new bounds, failing if `lb > ub` or either bound is NaN
    pub fn new(lb: f64, ub: f64) -> Result<Bounds, ModelError> {
        Bounds::assert_valid(lb, ub)?;
        Ok(Bounds { lb, ub })
    }

    /// `[-inf, inf]`
    pub fn unbounded() -> Bounds {
        Bounds {
            lb: f64::NEG_INFINITY,
            ub: f64::INFINITY,
        }
    }

    /// `[0, inf]`
    pub fn forward() -> Bounds {
        Bounds {
            lb: 0.,
            ub: f64::INFINITY,
        }
    }

    /// Default bounds implied by a reaction direction
    pub fn for_direction(direction: Direction) -> Bounds {
        match direction {
            Direction::Forward => Bounds::forward(),
            Direction::Reversible => Bounds::unbounded(),
        }
    }

    /// Lower bound
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// Upper bound
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Set the lower bound, validated against the current upper bound
    pub fn set_lb(&mut self, lb: f64) -> Result<(), ModelError> {
        Bounds::assert_valid(lb, self.ub)?;
        self.lb = lb;
        Ok(())
    }

    /// Set the upper bound, validated against the current lower bound
    pub fn set_ub(&mut self, ub: f64) -> Result<(), ModelError> {
        Bounds::assert_valid(self.lb, ub)?;
        self.ub = ub;
        Ok(())
    }

    /// Set both bounds at once
    pub fn set(&mut self, lb: f64, ub: f64) -> Result<(), ModelError> {
        Bounds::assert_valid(lb, ub)?;
        self.lb = lb;
        self.ub = ub;
        Ok(())
    }

    pub fn lb_is_finite(&self) -> bool {
        self.lb.is_finite()
    }

    pub fn ub_is_finite(&self) -> bool {
        self.ub.is_finite()
    }

    /// Direction suggested by the bounds: forward when the lower bound is non-negative,
    /// reversible otherwise.
    ///
    /// # Note:
    /// This is only a suggestion, a [`Reaction`](crate::metabolic_model::reaction::Reaction)
    /// keeps its own direction, see
    /// [`find_effective_bounds`](crate::metabolic_model::reaction::Reaction::find_effective_bounds)
    pub fn direction(&self) -> Direction {
        if self.lb >= 0. {
            Direction::Forward
        } else {
            Direction::Reversible
        }
    }

    /// Copy of the bounds with infinite values replaced by `±inf_value`
    pub(crate) fn finite(&self, inf_value: f64) -> (f64, f64) {
        let replace = |v: f64| {
            if v.is_infinite() {
                inf_value.copysign(v)
            } else {
                v
            }
        };
        (replace(self.lb), replace(self.ub))
    }

    fn assert_valid(lb: f64, ub: f64) -> Result<(), ModelError> {
        if lb.is_nan() || ub.is_nan() || lb > ub {
            return Err(ModelError::InvalidBounds { lb, ub });
        }
        Ok(())
    }
}

impl Display for Bounds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.lb, self.ub)
    }
}
