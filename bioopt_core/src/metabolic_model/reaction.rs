//! This module provides a struct for representing reactions, together with the reaction
//! members (stoichiometric participants) and the reaction direction
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Deref, DerefMut};

use derive_builder::{Builder, UninitializedFieldError};

use crate::metabolic_model::bounds::Bounds;
use crate::metabolic_model::metabolite::assert_name;
use crate::metabolic_model::ModelError;

/// Reaction directionality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Irreversible, flux can only go from reactants to products
    Forward,
    /// Flux can go both ways
    Reversible,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "->"),
            Direction::Reversible => write!(f, "<->"),
        }
    }
}

/// A metabolite participating in a reaction together with its stoichiometric coefficient
///
/// ### Note
/// The metabolite is referenced by name, the name is the key into
/// [`Model::metabolites`](crate::metabolic_model::model::Model). All members of a model that
/// name the same metabolite therefore share a single [`Metabolite`](crate::metabolic_model::metabolite::Metabolite).
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionMember {
    metabolite: String,
    coefficient: f64,
}

impl ReactionMember {
    /// Create a new reaction member, the coefficient must be strictly positive
    pub fn new<S: Into<String>>(metabolite: S, coefficient: f64) -> Result<Self, ModelError> {
        let metabolite = metabolite.into();
        assert_name(&metabolite, "Metabolite")?;
        assert_coefficient(coefficient)?;
        Ok(ReactionMember {
            metabolite,
            coefficient,
        })
    }

    /// Name of the referenced metabolite
    pub fn metabolite(&self) -> &str {
        &self.metabolite
    }

    pub fn set_metabolite<S: Into<String>>(&mut self, metabolite: S) -> Result<(), ModelError> {
        let metabolite = metabolite.into();
        assert_name(&metabolite, "Metabolite")?;
        self.metabolite = metabolite;
        Ok(())
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn set_coefficient(&mut self, coefficient: f64) -> Result<(), ModelError> {
        assert_coefficient(coefficient)?;
        self.coefficient = coefficient;
        Ok(())
    }
}

impl Display for ReactionMember {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.coefficient, self.metabolite)
    }
}

impl Add for ReactionMember {
    type Output = ReactionMemberList;

    fn add(self, rhs: ReactionMember) -> Self::Output {
        ReactionMemberList(vec![self, rhs])
    }
}

impl Add<ReactionMemberList> for ReactionMember {
    type Output = ReactionMemberList;

    fn add(self, rhs: ReactionMemberList) -> Self::Output {
        let mut members = Vec::with_capacity(rhs.len() + 1);
        members.push(self);
        members.extend(rhs.0);
        ReactionMemberList(members)
    }
}

fn assert_coefficient(coefficient: f64) -> Result<(), ModelError> {
    if !(coefficient.is_finite() && coefficient > 0.) {
        return Err(ModelError::NonPositiveCoefficient(coefficient));
    }
    Ok(())
}

/// Ordered list of reaction members, order of declaration is kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionMemberList(Vec<ReactionMember>);

impl ReactionMemberList {
    pub fn new() -> Self {
        ReactionMemberList(Vec::new())
    }

    pub fn push(&mut self, member: ReactionMember) {
        self.0.push(member);
    }

    pub fn extend<I: IntoIterator<Item = ReactionMember>>(&mut self, members: I) {
        self.0.extend(members);
    }

    /// Find a member by metabolite name
    pub fn find_member(&self, name: &str) -> Option<&ReactionMember> {
        self.0.iter().find(|m| m.metabolite == name)
    }
}

impl Deref for ReactionMemberList {
    type Target = [ReactionMember];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ReactionMemberList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<ReactionMember>> for ReactionMemberList {
    fn from(members: Vec<ReactionMember>) -> Self {
        ReactionMemberList(members)
    }
}

impl From<ReactionMember> for ReactionMemberList {
    fn from(member: ReactionMember) -> Self {
        ReactionMemberList(vec![member])
    }
}

impl FromIterator<ReactionMember> for ReactionMemberList {
    fn from_iter<T: IntoIterator<Item = ReactionMember>>(iter: T) -> Self {
        ReactionMemberList(iter.into_iter().collect())
    }
}

impl IntoIterator for ReactionMemberList {
    type Item = ReactionMember;
    type IntoIter = std::vec::IntoIter<ReactionMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ReactionMemberList {
    type Item = &'a ReactionMember;
    type IntoIter = std::slice::Iter<'a, ReactionMember>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Add<ReactionMember> for ReactionMemberList {
    type Output = ReactionMemberList;

    fn add(mut self, rhs: ReactionMember) -> Self::Output {
        self.0.push(rhs);
        self
    }
}

impl Add for ReactionMemberList {
    type Output = ReactionMemberList;

    fn add(mut self, rhs: ReactionMemberList) -> Self::Output {
        self.0.extend(rhs.0);
        self
    }
}

impl AddAssign<ReactionMember> for ReactionMemberList {
    fn add_assign(&mut self, rhs: ReactionMember) {
        self.0.push(rhs);
    }
}

impl AddAssign for ReactionMemberList {
    fn add_assign(&mut self, rhs: ReactionMemberList) {
        self.0.extend(rhs.0);
    }
}

impl Display for ReactionMemberList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let members: Vec<String> = self.0.iter().map(|m| m.to_string()).collect();
        write!(f, "{}", members.join(" + "))
    }
}

/// Represents a reaction in the metabolic model
///
/// Missing direction and bounds are derived from each other when building:
/// - neither given: reversible with `[-inf, inf]`
/// - only bounds: the direction suggested by the bounds
/// - only direction: `[0, inf]` for forward, `[-inf, inf]` for reversible
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(skip, error = "ModelError"))]
pub struct Reaction {
    /// Used to identify the reaction
    #[builder(setter(into))]
    name: String,
    /// Left hand side of the reaction
    pub reactants: ReactionMemberList,
    /// Right hand side of the reaction
    pub products: ReactionMemberList,
    /// Declared directionality
    pub direction: Direction,
    /// Flux bounds, see [`Reaction::find_effective_bounds`]
    pub bounds: Bounds,
}

impl ReactionBuilder {
    /// Build the reaction, deriving direction and bounds as described on [`Reaction`]
    pub fn build(&self) -> Result<Reaction, ModelError> {
        let name = self
            .name
            .clone()
            .ok_or(UninitializedFieldError::new("name"))?;
        Reaction::new(
            name,
            self.reactants.clone().unwrap_or_default(),
            self.products.clone().unwrap_or_default(),
            self.direction,
            self.bounds,
        )
    }
}

impl Reaction {
    /// Create a new reaction
    pub fn new<S: Into<String>>(
        name: S,
        reactants: ReactionMemberList,
        products: ReactionMemberList,
        direction: Option<Direction>,
        bounds: Option<Bounds>,
    ) -> Result<Reaction, ModelError> {
        let name = name.into();
        assert_name(&name, "Reaction")?;
        let (direction, bounds) = match (direction, bounds) {
            (None, None) => (Direction::Reversible, Bounds::unbounded()),
            (None, Some(b)) => (b.direction(), b),
            (Some(d), None) => (d, Bounds::for_direction(d)),
            (Some(d), Some(b)) => (d, b),
        };
        Ok(Reaction {
            name,
            reactants,
            products,
            direction,
            bounds,
        })
    }

    /// Reaction carrying only a name and bounds, used for constraint section lines
    pub fn bounds_only<S: Into<String>>(name: S, bounds: Bounds) -> Result<Reaction, ModelError> {
        Reaction::new(
            name,
            ReactionMemberList::new(),
            ReactionMemberList::new(),
            None,
            Some(bounds),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) -> Result<(), ModelError> {
        let name = name.into();
        assert_name(&name, "Reaction")?;
        self.name = name;
        Ok(())
    }

    /// Iterate over reactants followed by products
    pub fn participants(&self) -> impl Iterator<Item = &ReactionMember> {
        self.reactants.iter().chain(self.products.iter())
    }

    /// Reset bounds to the default for the reaction direction
    pub fn bounds_reset(&mut self) {
        self.bounds = Bounds::for_direction(self.direction);
    }

    /// Whether the stored bounds are the ones implied by the direction alone
    pub(crate) fn has_default_bounds(&self) -> bool {
        self.bounds == Bounds::for_direction(self.direction)
    }

    /// Bounds a solver should use. A forward reaction with a negative lower bound is
    /// clamped to a lower bound of 0, e.g. forward `[-10, 10]` becomes `[0, 10]`
    pub fn find_effective_bounds(&self) -> Result<Bounds, ModelError> {
        let lb = if self.direction == Direction::Forward && self.bounds.lb() < 0. {
            0.
        } else {
            self.bounds.lb()
        };
        Bounds::new(lb, self.bounds.ub())
    }

    /// Swap reactants and products and negate the bounds so the reaction runs the other way
    ///
    /// Only reversible reactions whose bounds are not strictly positive can be reversed.
    pub fn reverse(&mut self) -> Result<(), ModelError> {
        if self.direction != Direction::Reversible {
            return Err(ModelError::IrreversibleReaction(self.name.clone()));
        }
        if self.bounds.lb() > 0. && self.bounds.ub() > 0. {
            return Err(ModelError::StrictlyForward(self.name.clone()));
        }
        std::mem::swap(&mut self.reactants, &mut self.products);
        self.bounds = Bounds::new(-self.bounds.ub(), -self.bounds.lb())?;
        Ok(())
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}: {} {} {}",
            self.name, self.bounds, self.reactants, self.direction, self.products
        )
    }
}
