//! Cheapest
//!
//! Cheapest works out the least you can pay for a list of items when some of them can be
//! bought together in repeatable bundle promotions. It ships an exact backtracking solver and
//! a fast greedy one that gives an upper bound.

pub mod catalog;
pub mod cli;
pub mod items;
pub mod parse;
pub mod prelude;
pub mod promotions;
pub mod report;
pub mod scenario;
pub mod solvers;
