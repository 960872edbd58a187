//! Common utilities for integration tests

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{
    assert_rows_close,
    compute_l2_error,
    dirichlet_heat,
    first_order,
    relative_error,
    second_order,
    wave,
};
